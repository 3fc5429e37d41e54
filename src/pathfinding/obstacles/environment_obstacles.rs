//! Static obstacles built from level tiles

use crate::grid::{GridCell, GridMapper};
use crate::level::{BlockKind, BlockPlacement};
use crate::pathfinding::obstacles::{Aabb, Obstacle};

/// A tile-sized block placed by the level
#[derive(Debug, Clone)]
pub struct EnvironmentObstacle {
    pub kind: BlockKind,
    pub cell: GridCell,
    pub bounds: Aabb,
}

impl EnvironmentObstacle {
    pub fn from_placement(placement: &BlockPlacement, mapper: &GridMapper) -> Self {
        Self {
            kind: placement.kind,
            cell: placement.cell,
            bounds: Aabb::from_cell(placement.cell, mapper),
        }
    }
}

impl Obstacle for EnvironmentObstacle {
    fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    fn is_solid(&self) -> bool {
        self.kind.is_solid()
    }
}
