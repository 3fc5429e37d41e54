//! Dynamic obstacles for entities that move or toggle solidity

use crate::pathfinding::obstacles::{Aabb, Obstacle};
use bevy::prelude::*;

/// Snapshot of a solid entity, rebuilt every frame
#[derive(Debug, Clone)]
pub struct EntityObstacle {
    pub entity_id: Entity,
    pub bounds: Aabb,
    pub obstacle_type: EntityObstacleType,
    pub solid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityObstacleType {
    Crate,
    Door,
}

impl EntityObstacle {
    pub fn new(entity_id: Entity, bounds: Aabb, obstacle_type: EntityObstacleType) -> Self {
        Self {
            entity_id,
            bounds,
            obstacle_type,
            solid: true,
        }
    }

    pub fn from_source(entity_id: Entity, bounds: Aabb, source: &ObstacleSource) -> Self {
        Self {
            entity_id,
            bounds,
            obstacle_type: source.obstacle_type,
            solid: source.is_solid,
        }
    }
}

impl Obstacle for EntityObstacle {
    fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    fn is_solid(&self) -> bool {
        self.solid
    }
}

/// Component marking an entity as an occupancy obstacle
#[derive(Component, Debug, Clone)]
pub struct ObstacleSource {
    pub obstacle_type: EntityObstacleType,
    pub is_solid: bool,
}

impl ObstacleSource {
    pub fn new(obstacle_type: EntityObstacleType) -> Self {
        Self {
            obstacle_type,
            is_solid: true,
        }
    }

    pub fn door() -> Self {
        Self::new(EntityObstacleType::Door)
    }

    /// An open door stops blocking but keeps its entity
    pub fn open(&mut self) {
        self.is_solid = false;
    }

    pub fn close(&mut self) {
        self.is_solid = true;
    }
}
