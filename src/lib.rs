pub mod components;
pub mod config;
pub mod game_logic;
pub mod grid;
pub mod level;
pub mod pathfinding;
pub mod plugins;
pub mod resources;

pub use plugins::*;

pub use game_logic::errors::{LedgeError, LedgeResult};
pub use grid::{GridCell, GridMapper, WorldBounds};
pub use level::LevelDefinition;
pub use pathfinding::{AgentFootprint, AgentKind, Path, PathPlanner, PlannerConfig};
