//! Conversion between world pixels and discrete grid cells.
//!
//! World space is screen space: `y` grows downward, so the cell "above" a cell
//! has a smaller `y`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// A tile on the navigation grid
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The cell directly underneath, the one that provides ground support
    pub const fn below(self) -> Self {
        self.offset(0, 1)
    }

    pub const fn above(self) -> Self {
        self.offset(0, -1)
    }

    /// Manhattan distance in cells (heuristic for A*)
    pub fn manhattan_distance(&self, other: &GridCell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl std::fmt::Display for GridCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Maps between world pixels and grid cells for a fixed tile size and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMapper {
    tile_size: f32,
    scale: f32,
}

impl GridMapper {
    /// Panics if either factor is non-positive; configuration clamps these first.
    pub fn new(tile_size: f32, scale: f32) -> Self {
        assert!(
            tile_size.is_finite() && tile_size > 0.0,
            "tile size must be positive, got {tile_size}"
        );
        assert!(
            scale.is_finite() && scale > 0.0,
            "scale must be positive, got {scale}"
        );
        Self { tile_size, scale }
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Edge length of one cell in world pixels
    pub fn tile_pixel_size(&self) -> f32 {
        self.tile_size * self.scale
    }

    pub fn world_to_grid(&self, world: Vec2) -> GridCell {
        let size = self.tile_pixel_size();
        GridCell::new(
            (world.x / size).floor() as i32,
            (world.y / size).floor() as i32,
        )
    }

    /// Top-left corner of the cell in world space
    pub fn grid_to_world(&self, cell: GridCell) -> Vec2 {
        let size = self.tile_pixel_size();
        Vec2::new(cell.x as f32 * size, cell.y as f32 * size)
    }

    /// Center of the cell in world space; paths run through these points
    pub fn cell_center(&self, cell: GridCell) -> Vec2 {
        self.grid_to_world(cell) + Vec2::splat(self.tile_pixel_size() * 0.5)
    }

    /// Top-left corner of the cell containing `world`
    pub fn snap_to_grid(&self, world: Vec2) -> Vec2 {
        self.grid_to_world(self.world_to_grid(world))
    }
}

impl Default for GridMapper {
    fn default() -> Self {
        Self::new(16.0, 3.0)
    }
}

/// Inclusive rectangle of cells the planner may visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min: GridCell,
    pub max: GridCell,
}

impl WorldBounds {
    pub const fn new(min: GridCell, max: GridCell) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.x >= self.min.x && cell.x <= self.max.x && cell.y >= self.min.y && cell.y <= self.max.y
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::new(GridCell::new(0, 0), GridCell::new(100, 100))
    }
}
