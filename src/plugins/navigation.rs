use crate::components::{Body, ChaseTarget, Grounded, Navigator, Velocity};
use crate::game_logic::movement::integrate;
use crate::game_logic::navigation::{
    AgentSnapshot, MovementIntent, NavigationController, NavigationState,
};
use crate::level::LevelDefinition;
use crate::pathfinding::{Aabb, AgentKind, EntityObstacle, ObstacleManager, ObstacleSource, PathPlanner};
use crate::resources::NavigationConfig;
use bevy::prelude::*;

pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NavigationConfig>()
            .init_resource::<ObstacleManager>()
            .add_systems(
                Update,
                (sync_dynamic_obstacles, drive_navigation_agents, apply_kinematics).chain(),
            );
    }
}

/// Rebuild the dynamic obstacle list from entities carrying `ObstacleSource`
pub fn sync_dynamic_obstacles(
    mut obstacles: ResMut<ObstacleManager>,
    sources: Query<(Entity, &Body, &ObstacleSource)>,
) {
    obstacles.clear_dynamic_obstacles();
    for (entity, body, source) in &sources {
        let bounds = Aabb::new(body.position.x, body.position.y, body.size.x, body.size.y);
        obstacles.add_dynamic_obstacle(EntityObstacle::from_source(entity, bounds, source));
    }
}

/// Run the navigation controller for every agent against one shared planner
pub fn drive_navigation_agents(
    time: Res<Time>,
    config: Res<NavigationConfig>,
    level: Option<Res<LevelDefinition>>,
    obstacles: Res<ObstacleManager>,
    targets: Query<&Body, (With<ChaseTarget>, Without<Navigator>)>,
    mut agents: Query<(&Navigator, &Body, &Grounded, &mut NavigationState, &mut MovementIntent)>,
) {
    let Some(level) = level else {
        return;
    };

    let settings = &config.settings;
    let planner = PathPlanner::new(
        &*obstacles,
        level.mapper(),
        level.bounds(),
        settings.planner_config(),
    )
    .with_debug(settings.debug_flags());

    let ground_config = settings.controller_config(AgentKind::Ground);
    let flying_config = settings.controller_config(AgentKind::Flying);
    let ground = NavigationController::new(&planner, &ground_config);
    let flying = NavigationController::new(&planner, &flying_config);

    let target = targets.iter().next().map(Body::center);
    let now = time.elapsed_secs();

    for (navigator, body, grounded, mut state, mut intent) in &mut agents {
        let controller = match state.kind {
            AgentKind::Ground => &ground,
            AgentKind::Flying => &flying,
        };
        let snapshot = AgentSnapshot {
            time: now,
            position: body.position,
            airborne: !grounded.0,
        };
        *intent = controller.update(&mut state, snapshot, target);
        trace!("{navigator}: {:?}", *intent);
    }
}

/// Step every agent's body through one frame of kinematics
pub fn apply_kinematics(
    time: Res<Time>,
    config: Res<NavigationConfig>,
    obstacles: Res<ObstacleManager>,
    mut agents: Query<(&Navigator, &MovementIntent, &mut Body, &mut Velocity, &mut Grounded)>,
) {
    let kinematics = config.settings.kinematic_config();
    let delta = time.delta_secs();

    for (navigator, intent, mut body, mut velocity, mut grounded) in &mut agents {
        grounded.0 = integrate(
            &mut body,
            &mut velocity,
            intent,
            navigator.kind,
            &*obstacles,
            &kinematics,
            delta,
        );
    }
}
