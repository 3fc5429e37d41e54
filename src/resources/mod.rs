use crate::config::range_types::*;
use crate::game_logic::movement::KinematicConfig;
use crate::game_logic::navigation::ControllerConfig;
use crate::game_logic::stuck::StuckConfig;
use crate::pathfinding::{AgentFootprint, AgentKind, DebugFlags, PlannerConfig};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq, Validate)]
#[serde(default)]
pub struct NavigationConfig {
    /// Level to load, relative to the working directory
    #[validate(length(min = 1))]
    pub level_file_path: String,
    #[validate(nested)]
    pub settings: NavigationSettings,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            level_file_path: "levels/demo.txt".to_string(),
            settings: NavigationSettings::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Validate)]
#[serde(default)]
pub struct NavigationSettings {
    // Search settings
    #[validate(range(min = 1, max = 200))]
    pub max_search_radius: u32,
    #[validate(range(min = 1, max = 100000))]
    pub max_iterations: usize,
    #[validate(range(min = 1, max = 10))]
    pub max_jump_height: i32,
    #[validate(range(min = 1, max = 10))]
    pub max_straight_jump_height: i32,
    #[validate(range(min = 1, max = 10))]
    pub max_jump_distance: i32,
    #[validate(range(min = 1, max = 20))]
    pub max_fall_distance: i32,
    pub enable_direct_shortcut: bool,
    pub simplify_paths: bool,
    #[validate(range(min = 1, max = 50))]
    pub waypoint_interval: usize,

    // Agent settings
    pub agent_width: PixelDistance,
    pub agent_height: PixelDistance,
    pub ground_move_speed: MovementSpeed,
    pub flying_move_speed: MovementSpeed,

    // Replanning settings
    pub max_pathfinding_distance: PixelDistance,
    pub ground_pathfinding_cooldown: CooldownSeconds,
    pub flying_pathfinding_cooldown: CooldownSeconds,
    pub target_movement_threshold: PixelDistance,
    pub follow_distance: PixelDistance,

    // Movement settings
    pub probe_distance: TileFraction,
    pub jump_cooldown: CooldownSeconds,
    pub recovery_speed_factor: SpeedFactor,

    // Stuck detection settings
    pub stuck_duration: CooldownSeconds,
    pub recovery_timeout: CooldownSeconds,

    // Physics settings
    pub gravity: Acceleration,
    pub jump_speed: MovementSpeed,
    pub max_fall_speed: MovementSpeed,

    // Debug settings
    pub debug_search: bool,
    pub debug_collisions: bool,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            // Search settings
            max_search_radius: 30,
            max_iterations: 200,
            max_jump_height: 3,
            max_straight_jump_height: 2,
            max_jump_distance: 4,
            max_fall_distance: 4,
            enable_direct_shortcut: true,
            simplify_paths: true,
            waypoint_interval: 3,

            // Agent settings
            agent_width: PixelDistance::new(30.0),
            agent_height: PixelDistance::new(30.0),
            ground_move_speed: MovementSpeed::new(4.0),
            flying_move_speed: MovementSpeed::new(3.0),

            // Replanning settings
            max_pathfinding_distance: PixelDistance::new(400.0),
            ground_pathfinding_cooldown: CooldownSeconds::new(0.5),
            flying_pathfinding_cooldown: CooldownSeconds::new(0.8),
            target_movement_threshold: PixelDistance::new(64.0),
            follow_distance: PixelDistance::new(50.0),

            // Movement settings
            probe_distance: TileFraction::new(0.5),
            jump_cooldown: CooldownSeconds::new(1.0),
            recovery_speed_factor: SpeedFactor::new(0.7),

            // Stuck detection settings
            stuck_duration: CooldownSeconds::new(3.0),
            recovery_timeout: CooldownSeconds::new(5.0),

            // Physics settings
            gravity: Acceleration::new(0.8),
            jump_speed: MovementSpeed::new(15.0),
            max_fall_speed: MovementSpeed::new(20.0),

            // Debug settings
            debug_search: false,
            debug_collisions: false,
        }
    }
}

impl NavigationSettings {
    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            max_search_radius: self.max_search_radius,
            max_iterations: self.max_iterations,
            max_jump_height: self.max_jump_height,
            max_straight_jump_height: self.max_straight_jump_height,
            max_jump_distance: self.max_jump_distance,
            max_fall_distance: self.max_fall_distance,
            enable_direct_shortcut: self.enable_direct_shortcut,
            simplify_paths: self.simplify_paths,
            waypoint_interval: self.waypoint_interval,
            ..PlannerConfig::default()
        }
    }

    pub fn controller_config(&self, kind: AgentKind) -> ControllerConfig {
        let cooldown = match kind {
            AgentKind::Ground => self.ground_pathfinding_cooldown,
            AgentKind::Flying => self.flying_pathfinding_cooldown,
        };
        ControllerConfig {
            max_pathfinding_distance: self.max_pathfinding_distance.get(),
            pathfinding_cooldown: cooldown.get(),
            target_movement_threshold: self.target_movement_threshold.get(),
            follow_distance: self.follow_distance.get(),
            probe_distance: self.probe_distance.get(),
            cautious_probe_distance: self.probe_distance.get() * 0.5,
            jump_cooldown: self.jump_cooldown.get(),
            recovery_speed_factor: self.recovery_speed_factor.get(),
            stuck: StuckConfig {
                stuck_duration: self.stuck_duration.get(),
                recovery_timeout: self.recovery_timeout.get(),
                ..StuckConfig::default()
            },
            ..ControllerConfig::for_kind(kind)
        }
    }

    pub fn debug_flags(&self) -> DebugFlags {
        DebugFlags {
            verbose_search: self.debug_search,
            collision_checks: self.debug_collisions,
        }
    }

    pub fn kinematic_config(&self) -> KinematicConfig {
        KinematicConfig {
            gravity: self.gravity.get(),
            jump_speed: self.jump_speed.get(),
            max_fall_speed: self.max_fall_speed.get(),
        }
    }

    pub fn agent_footprint(&self) -> AgentFootprint {
        AgentFootprint::new(self.agent_width.get(), self.agent_height.get())
    }

    pub fn move_speed(&self, kind: AgentKind) -> f32 {
        match kind {
            AgentKind::Ground => self.ground_move_speed.get(),
            AgentKind::Flying => self.flying_move_speed.get(),
        }
    }
}
