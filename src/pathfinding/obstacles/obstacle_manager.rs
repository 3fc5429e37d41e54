//! Centralized obstacle storage that doubles as the planner's occupancy oracle

use crate::grid::GridMapper;
use crate::level::LevelDefinition;
use crate::pathfinding::obstacles::*;
use bevy::prelude::*;

/// Holds every obstacle in the world and answers occupancy queries
#[derive(Default, Resource)]
pub struct ObstacleManager {
    static_obstacles: Vec<BoxedObstacle>,
    dynamic_obstacles: Vec<BoxedObstacle>,
}

impl ObstacleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the static set from a level's block placements
    pub fn from_level(level: &LevelDefinition) -> Self {
        let mut manager = Self::new();
        manager.add_level_blocks(level, &level.mapper());
        manager
    }

    pub fn add_level_blocks(&mut self, level: &LevelDefinition, mapper: &GridMapper) {
        for placement in &level.blocks {
            self.static_obstacles
                .push(Box::new(EnvironmentObstacle::from_placement(placement, mapper)));
        }
    }

    pub fn add_static_obstacle(&mut self, obstacle: impl Obstacle + 'static) {
        self.static_obstacles.push(Box::new(obstacle));
    }

    pub fn add_dynamic_obstacle(&mut self, obstacle: EntityObstacle) {
        self.dynamic_obstacles.push(Box::new(obstacle));
    }

    /// Clear all dynamic obstacles (called each frame before re-syncing)
    pub fn clear_dynamic_obstacles(&mut self) {
        self.dynamic_obstacles.clear();
    }

    pub fn clear_all(&mut self) {
        self.static_obstacles.clear();
        self.dynamic_obstacles.clear();
    }

    /// Get count of obstacles by type
    pub fn obstacle_counts(&self) -> (usize, usize) {
        (self.static_obstacles.len(), self.dynamic_obstacles.len())
    }

    pub fn solid_count(&self) -> usize {
        self.all_obstacles().filter(|o| o.is_solid()).count()
    }

    fn all_obstacles(&self) -> impl Iterator<Item = &BoxedObstacle> {
        self.static_obstacles.iter().chain(self.dynamic_obstacles.iter())
    }

    /// First solid obstacle overlapping the box, if any
    pub fn first_blocker(&self, query: &Aabb) -> Option<&dyn Obstacle> {
        self.all_obstacles()
            .find(|obstacle| obstacle.blocks(query))
            .map(|obstacle| obstacle.as_ref())
    }
}

impl OccupancyOracle for ObstacleManager {
    fn is_position_free(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        let query = Aabb::new(x, y, width, height);
        self.first_blocker(&query).is_none()
    }
}
