use crate::components::{Body, ChaseTarget, Grounded, Navigator, Velocity};
use crate::game_logic::errors::{LedgeError, LedgeResult};
use crate::game_logic::navigation::{MovementIntent, NavigationState};
use crate::level::LevelDefinition;
use crate::pathfinding::ObstacleManager;
use crate::resources::NavigationConfig;
use bevy::prelude::*;

/// Used when the configured level cannot be loaded
const FALLBACK_LEVEL: &str = "
..............
..............
.G..........P.
##############
";

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NavigationConfig>()
            .init_resource::<ObstacleManager>()
            .add_systems(Startup, (load_level, spawn_level_entities).chain());
    }
}

/// Install the level and its static obstacles. A `LevelDefinition` inserted
/// before startup wins over the configured file.
pub fn load_level(
    mut commands: Commands,
    config: Res<NavigationConfig>,
    existing: Option<Res<LevelDefinition>>,
) {
    if let Some(level) = existing {
        install_obstacles(&mut commands, &level);
        return;
    }

    let level = match load_level_from_config(&config) {
        Ok(level) => level,
        Err(err) => {
            warn!("Failed to load level: {err}");
            match create_fallback_level() {
                Ok(level) => {
                    info!("Using built-in fallback level '{}'", level.name);
                    level
                }
                Err(fallback_err) => {
                    error!("Failed to create fallback level: {fallback_err}");
                    return;
                }
            }
        }
    };

    install_obstacles(&mut commands, &level);
    commands.insert_resource(level);
}

fn install_obstacles(commands: &mut Commands, level: &LevelDefinition) {
    let obstacles = ObstacleManager::from_level(level);
    info!(
        "Level '{}' ready: {}x{} tiles, {} solid obstacles",
        level.name,
        level.width,
        level.height,
        obstacles.solid_count()
    );
    commands.insert_resource(obstacles);
}

fn load_level_from_config(config: &NavigationConfig) -> LedgeResult<LevelDefinition> {
    let level_file = &config.level_file_path;
    info!("Attempting to load level from: {level_file}");

    let result = LevelDefinition::load_from_path(level_file);
    if let Err(err) = &result {
        match err {
            LedgeError::LevelFileNotFound { path } => {
                warn!(
                    "Level file not found: {}. Check level_file_path in the config.",
                    path.display()
                );
            }
            LedgeError::InvalidLevelData { reason } => {
                warn!("Level data is invalid: {reason}");
            }
            LedgeError::CorruptedLevelFile { reason } => {
                warn!("Level file is corrupted ({reason}); re-export it with pathquery --convert");
            }
            _ => debug!("Level loading failed with error: {err}"),
        }
    }

    result
}

pub fn create_fallback_level() -> LedgeResult<LevelDefinition> {
    LevelDefinition::parse_ascii("fallback", FALLBACK_LEVEL)
}

/// Spawn the chase target and one navigator per agent spawn
pub fn spawn_level_entities(
    mut commands: Commands,
    config: Res<NavigationConfig>,
    level: Option<Res<LevelDefinition>>,
) {
    let Some(level) = level else {
        warn!("No level loaded, nothing to spawn");
        return;
    };

    let mapper = level.mapper();
    let settings = &config.settings;
    let footprint = settings.agent_footprint();
    let size = footprint.size();

    match level.target_spawn {
        Some(cell) => {
            let position = mapper.cell_center(cell) - size * 0.5;
            commands.spawn((ChaseTarget, Body::new(position, size), Name::new("ChaseTarget")));
        }
        None => warn!("Level '{}' has no target spawn; agents will idle", level.name),
    }

    for (id, spawn) in level.agent_spawns.iter().enumerate() {
        let navigator = Navigator {
            kind: spawn.kind,
            id: id as u32,
        };
        let position = mapper.cell_center(spawn.cell) - size * 0.5;
        debug!("Spawning {navigator} at {}", spawn.cell);

        commands.spawn((
            navigator,
            Body::new(position, size),
            Velocity::default(),
            Grounded::default(),
            NavigationState::new(spawn.kind, footprint, settings.move_speed(spawn.kind)),
            MovementIntent::default(),
            Name::new(navigator.to_string()),
        ));
    }

    info!("Spawned {} navigation agents", level.agent_spawns.len());
}
