//! Trait-based obstacle system answering occupancy queries for the planner

use bevy::prelude::*;

pub mod collision_shapes;
pub mod entity_obstacles;
pub mod environment_obstacles;
pub mod obstacle_manager;

pub use collision_shapes::*;
pub use entity_obstacles::*;
pub use environment_obstacles::*;
pub use obstacle_manager::*;

/// Read-only query surface: is this world-space rectangle free of solid obstacles?
///
/// Called many times per search, so implementations should be cheap and must
/// not mutate world state.
pub trait OccupancyOracle {
    fn is_position_free(&self, x: f32, y: f32, width: f32, height: f32) -> bool;

    fn is_box_free(&self, aabb: &Aabb) -> bool {
        self.is_position_free(aabb.min.x, aabb.min.y, aabb.size.x, aabb.size.y)
    }
}

impl<F> OccupancyOracle for F
where
    F: Fn(f32, f32, f32, f32) -> bool,
{
    fn is_position_free(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self(x, y, width, height)
    }
}

/// Any world object that can occupy space
pub trait Obstacle: Send + Sync {
    /// World-space bounds of the obstacle
    fn bounding_box(&self) -> Aabb;

    /// Capability flag; non-solid objects never block movement
    fn is_solid(&self) -> bool {
        true
    }

    fn blocks(&self, query: &Aabb) -> bool {
        self.is_solid() && self.bounding_box().overlaps(query)
    }

    fn world_position(&self) -> Vec2 {
        self.bounding_box().min
    }
}

/// Type-erased obstacle for collections
pub type BoxedObstacle = Box<dyn Obstacle>;
