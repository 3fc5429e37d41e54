//! Movement rules: which cells an agent can occupy and reach in one step

use crate::grid::{GridCell, GridMapper, WorldBounds};
use crate::pathfinding::obstacles::{Aabb, OccupancyOracle};
use crate::pathfinding::{AgentFootprint, AgentKind, PlannerConfig};
use bevy::prelude::*;

/// Flying moves in the order they are generated: N, S, W, E, NW, NE, SW, SE
const FLYING_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// The search's view of the world for one agent kind and footprint
pub struct SearchSpace<'a, O: OccupancyOracle + ?Sized> {
    oracle: &'a O,
    mapper: &'a GridMapper,
    bounds: &'a WorldBounds,
    config: &'a PlannerConfig,
    kind: AgentKind,
    footprint: AgentFootprint,
    log_collisions: bool,
}

impl<'a, O: OccupancyOracle + ?Sized> SearchSpace<'a, O> {
    pub fn new(
        oracle: &'a O,
        mapper: &'a GridMapper,
        bounds: &'a WorldBounds,
        config: &'a PlannerConfig,
        kind: AgentKind,
        footprint: AgentFootprint,
        log_collisions: bool,
    ) -> Self {
        Self {
            oracle,
            mapper,
            bounds,
            config,
            kind,
            footprint,
            log_collisions,
        }
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    fn box_free(&self, query: Aabb) -> bool {
        let free = self.oracle.is_box_free(&query);
        if self.log_collisions {
            trace!(
                "Occupancy query at ({:.1}, {:.1}) size {:.1}x{:.1}: {}",
                query.min.x,
                query.min.y,
                query.size.x,
                query.size.y,
                if free { "free" } else { "blocked" }
            );
        }
        free
    }

    /// Whether the footprint, centered on the cell, overlaps anything solid.
    ///
    /// Footprints larger than the threshold are also tested aligned to the
    /// cell's top-left corner.
    pub fn is_solid(&self, cell: GridCell) -> bool {
        let size = self.footprint.size();
        let center = self.mapper.cell_center(cell);
        let centered = Aabb::new(
            center.x - size.x * 0.5,
            center.y - size.y * 0.5,
            size.x,
            size.y,
        );
        if !self.box_free(centered) {
            return true;
        }

        let threshold = self.config.large_footprint_threshold;
        if size.x > threshold || size.y > threshold {
            let corner = self.mapper.grid_to_world(cell);
            return !self.box_free(Aabb::new(corner.x, corner.y, size.x, size.y));
        }

        false
    }

    /// In bounds and not solid
    pub fn is_valid(&self, cell: GridCell) -> bool {
        self.bounds.contains(cell) && !self.is_solid(cell)
    }

    /// Something solid directly underneath
    pub fn has_ground_support(&self, cell: GridCell) -> bool {
        self.is_solid(cell.below())
    }

    /// Step cost: walking plus a per-cell surcharge for climbing or falling
    pub fn move_cost(&self, from: GridCell, to: GridCell) -> u32 {
        let dy = to.y - from.y;
        let vertical = if dy < 0 {
            self.config.climb_cost_per_cell * dy.unsigned_abs()
        } else {
            self.config.fall_cost_per_cell * dy.unsigned_abs()
        };
        self.config.walk_cost + vertical
    }

    pub fn neighbors(&self, cell: GridCell) -> Vec<GridCell> {
        match self.kind {
            AgentKind::Ground => self.ground_neighbors(cell),
            AgentKind::Flying => self.flying_neighbors(cell),
        }
    }

    fn flying_neighbors(&self, cell: GridCell) -> Vec<GridCell> {
        FLYING_OFFSETS
            .iter()
            .map(|&(dx, dy)| cell.offset(dx, dy))
            .filter(|&next| self.is_valid(next))
            .collect()
    }

    fn ground_neighbors(&self, cell: GridCell) -> Vec<GridCell> {
        let mut result = Vec::with_capacity(8);
        let supported = self.has_ground_support(cell);
        let max_fall = self.config.max_fall_distance;

        for dir in [-1, 1] {
            let step = cell.offset(dir, 0);
            let step_valid = self.is_valid(step);

            if step_valid && self.has_ground_support(step) {
                result.push(step);
                continue;
            }

            // Walking off an edge: the step cell and the column under it
            if step_valid {
                if let Some(landing) = self.landing_below(step, cell.y + max_fall) {
                    result.push(landing);
                }
            }

            if !supported {
                continue;
            }

            for height in 1..=self.config.max_jump_height {
                let target = cell.offset(dir, -height);
                if self.is_valid(target)
                    && self.can_jump(cell, target)
                    && self.trajectory_clear(cell, target)
                {
                    result.push(target);
                }
            }
        }

        if supported {
            let straight = self
                .config
                .max_straight_jump_height
                .min(self.config.max_jump_height);
            for height in 1..=straight {
                let target = cell.offset(0, -height);
                if !self.is_valid(target) {
                    break;
                }
                if self.trajectory_clear(cell, target) {
                    result.push(target);
                }
            }
        }

        if let Some(landing) = self.landing_below(cell.below(), cell.y + max_fall) {
            result.push(landing);
        }

        result
    }

    /// Scan down from `first` to the first supported cell no lower than
    /// `lowest_row`. Every cell passed through must be free.
    fn landing_below(&self, first: GridCell, lowest_row: i32) -> Option<GridCell> {
        let mut probe = first;
        while probe.y <= lowest_row {
            if !self.is_valid(probe) {
                return None;
            }
            if self.has_ground_support(probe) {
                return Some(probe);
            }
            probe = probe.below();
        }
        None
    }

    /// Jump feasibility: within the rise, drop and span limits, and no solid
    /// cell on the sampled straight line between the endpoints.
    pub fn can_jump(&self, from: GridCell, to: GridCell) -> bool {
        let dx = to.x - from.x;
        let dy = to.y - from.y;

        if -dy > self.config.max_jump_height
            || dy > self.config.max_fall_distance
            || dx.abs() > self.config.max_jump_distance
        {
            return false;
        }

        let steps = dx.abs().max(dy.abs()) + 1;
        (1..steps).all(|i| !self.is_solid(sample_line(from, to, i, steps)))
    }

    /// Path validation for a single transition; adjacent moves are trivially clear
    pub fn trajectory_clear(&self, from: GridCell, to: GridCell) -> bool {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx.abs() <= 1 && dy.abs() <= 1 {
            return true;
        }

        let steps = dx.abs().max(dy.abs());
        (1..steps).all(|i| !self.is_solid(sample_line(from, to, i, steps)))
    }

    /// Whether the goal can be taken in one move without a search.
    ///
    /// Ground agents additionally need the move to be one the search itself
    /// would generate, so the shortcut never finds a path the search can't.
    pub fn can_reach_directly(&self, from: GridCell, to: GridCell) -> bool {
        if from == to {
            return false;
        }
        let reach = self.config.direct_reach;
        if (to.x - from.x).abs() > reach || (to.y - from.y).abs() > reach {
            return false;
        }
        if !self.can_jump(from, to) {
            return false;
        }

        match self.kind {
            AgentKind::Flying => true,
            AgentKind::Ground => self.ground_neighbors(from).contains(&to),
        }
    }

    /// A straight horizontal run the agent can traverse without a waypoint:
    /// every cell free and, for ground agents, supported.
    pub fn is_direct_traversable(&self, from: GridCell, to: GridCell) -> bool {
        if from.y != to.y {
            return false;
        }
        let (lo, hi) = (from.x.min(to.x), from.x.max(to.x));
        (lo..=hi).all(|x| {
            let cell = GridCell::new(x, from.y);
            self.is_valid(cell)
                && (self.kind == AgentKind::Flying || self.has_ground_support(cell))
        })
    }
}

/// Point `i` of `steps` along the line, rounded half up to a cell
fn sample_line(from: GridCell, to: GridCell, i: i32, steps: i32) -> GridCell {
    let t = i as f32 / steps as f32;
    let x = from.x as f32 + (to.x - from.x) as f32 * t;
    let y = from.y as f32 + (to.y - from.y) as f32 * t;
    GridCell::new(round_half_up(x), round_half_up(y))
}

fn round_half_up(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::test_support::*;

    fn contains_all(found: &[GridCell], expected: &[(i32, i32)]) -> bool {
        expected
            .iter()
            .all(|&(x, y)| found.contains(&GridCell::new(x, y)))
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(1.5), 2);
        assert_eq!(round_half_up(1.49), 1);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(-0.51), -1);
    }

    #[test]
    fn test_move_cost_by_direction() {
        let (level, obstacles) = world("....\n####");
        let planner = planner(&level, &obstacles);
        let space = planner.search_space(AgentKind::Ground, footprint());
        let origin = GridCell::new(5, 5);

        assert_eq!(space.move_cost(origin, origin.offset(1, 0)), 10);
        assert_eq!(space.move_cost(origin, origin.offset(1, -2)), 10 + 30);
        assert_eq!(space.move_cost(origin, origin.offset(0, 3)), 10 + 15);
    }

    #[test]
    fn test_support_and_validity() {
        let (level, obstacles) = world(
            "
....
.#..
####
",
        );
        let planner = planner(&level, &obstacles);
        let space = planner.search_space(AgentKind::Ground, footprint());

        assert!(space.is_valid(GridCell::new(0, 1)));
        assert!(!space.is_valid(GridCell::new(1, 1)));
        assert!(!space.is_valid(GridCell::new(-1, 1)));
        assert!(space.has_ground_support(GridCell::new(0, 1)));
        assert!(space.has_ground_support(GridCell::new(1, 0)));
        assert!(!space.has_ground_support(GridCell::new(0, 0)));
    }

    #[test]
    fn test_flying_neighbors_are_eight_free_cells() {
        let (level, obstacles) = world(
            "
.....
..#..
.....
.....
",
        );
        let planner = planner(&level, &obstacles);
        let space = planner.search_space(AgentKind::Flying, footprint());

        let around = space.neighbors(GridCell::new(1, 2));
        assert_eq!(around.len(), 7);
        assert!(!around.contains(&GridCell::new(2, 1)));
        assert_eq!(around[0], GridCell::new(1, 1));

        let corner = space.neighbors(GridCell::new(0, 0));
        assert_eq!(corner.len(), 3);
    }

    #[test]
    fn test_ground_walks_along_floor() {
        let (level, obstacles) = world(
            "
.....
.....
.....
#####
",
        );
        let planner = planner(&level, &obstacles);
        let space = planner.search_space(AgentKind::Ground, footprint());

        let found = space.neighbors(GridCell::new(2, 2));
        assert!(contains_all(&found, &[(1, 2), (3, 2), (2, 1), (2, 0)]));
        // Steps were accepted so no sideways jumps are generated
        assert!(!found.contains(&GridCell::new(3, 1)));
        assert!(found.iter().all(|cell| cell.y <= 2));
    }

    #[test]
    fn test_unsupported_cell_only_falls_or_drifts() {
        let (level, obstacles) = world(
            "
.....
.....
.....
#####
",
        );
        let planner = planner(&level, &obstacles);
        let space = planner.search_space(AgentKind::Ground, footprint());

        let found = space.neighbors(GridCell::new(2, 0));
        assert!(contains_all(&found, &[(1, 2), (3, 2), (2, 2)]));
        assert!(found.iter().all(|cell| cell.y > 0), "mid-air cells must not rise: {found:?}");
    }

    #[test]
    fn test_overhang_blocks_jump_line() {
        let (level, obstacles) = world(
            "
......
......
...###
......
######
",
        );
        let planner = planner(&level, &obstacles);
        let space = planner.search_space(AgentKind::Ground, footprint());
        let from = GridCell::new(2, 3);

        // The top of the overhang is two cells up but the line crosses it
        assert!(!space.can_jump(from, GridCell::new(3, 1)));

        let found = space.neighbors(from);
        assert!(contains_all(&found, &[(3, 3), (2, 2), (2, 1)]));
        assert!(!found.contains(&GridCell::new(3, 1)));

        // Jumping straight up first and stepping across works
        assert!(space.neighbors(GridCell::new(2, 1)).contains(&GridCell::new(3, 1)));
    }

    #[test]
    fn test_wall_blocks_low_jump_but_not_high_one() {
        let (level, obstacles) = world(
            "
........
........
........
...#....
########
",
        );
        let planner = planner(&level, &obstacles);
        let space = planner.search_space(AgentKind::Ground, footprint());
        let from = GridCell::new(2, 3);

        // The wall cell sits on the straight line for a one-cell hop
        assert!(!space.can_jump(from, GridCell::new(3, 2)));
        assert!(space.can_jump(from, GridCell::new(3, 1)));

        let found = space.neighbors(from);
        assert!(!found.contains(&GridCell::new(3, 3)));
        assert!(!found.contains(&GridCell::new(3, 2)));
        assert!(contains_all(&found, &[(3, 1), (3, 0), (2, 2), (2, 1), (1, 3)]));
    }

    #[test]
    fn test_tall_wall_prevents_corner_cutting() {
        let (level, obstacles) = world(
            "
........
........
........
........
........
........
........
........
...#....
...#....
########
",
        );
        let planner = planner(&level, &obstacles);
        let space = planner.search_space(AgentKind::Ground, footprint());

        let found = space.neighbors(GridCell::new(2, 9));
        assert!(!found.contains(&GridCell::new(3, 8)));
        assert!(!found.contains(&GridCell::new(3, 7)), "jump would clip the wall: {found:?}");
        assert!(found.contains(&GridCell::new(2, 7)));

        // From the top of a straight jump the wall top is a plain step
        assert!(space.neighbors(GridCell::new(2, 7)).contains(&GridCell::new(3, 7)));
    }

    #[test]
    fn test_fall_limit_and_landing() {
        let (level, obstacles) = world(
            "
.........
##.......
.........
.........
.........
.........
.........
######...
....#....
#########
",
        );
        let planner = planner(&level, &obstacles);
        let space = planner.search_space(AgentKind::Ground, footprint());

        // Walking off the top ledge would be a six-cell drop
        let found = space.neighbors(GridCell::new(1, 0));
        assert_eq!(found, vec![GridCell::new(0, 0)]);

        let found = space.neighbors(GridCell::new(5, 6));
        assert!(!found.contains(&GridCell::new(6, 6)));
        assert!(found.contains(&GridCell::new(6, 8)));

        // Straight down stops on the first support
        assert!(space.neighbors(GridCell::new(4, 2)).contains(&GridCell::new(4, 6)));
        assert!(space.neighbors(GridCell::new(7, 4)).contains(&GridCell::new(7, 8)));

        // Five cells of open air is past the fall limit in every direction
        assert!(space.neighbors(GridCell::new(7, 3)).is_empty());
    }

    #[test]
    fn test_deep_drop_off_ledge_lands_in_column() {
        let (level, obstacles) = world(
            "
......
###...
......
......
######
",
        );
        let planner = planner(&level, &obstacles);
        let space = planner.search_space(AgentKind::Ground, footprint());

        // A straight line from (2, 0) to (3, 3) passes through the ledge itself
        let found = space.neighbors(GridCell::new(2, 0));
        assert!(found.contains(&GridCell::new(3, 3)), "{found:?}");
        assert!(!found.contains(&GridCell::new(3, 1)));
    }

    #[test]
    fn test_trajectory_and_direct_reach() {
        let (level, obstacles) = world(
            "
......
......
..#...
......
######
",
        );
        let planner = planner(&level, &obstacles);
        let ground = planner.search_space(AgentKind::Ground, footprint());
        let flying = planner.search_space(AgentKind::Flying, footprint());

        assert!(ground.trajectory_clear(GridCell::new(1, 3), GridCell::new(2, 3)));
        assert!(!flying.trajectory_clear(GridCell::new(0, 2), GridCell::new(4, 2)));
        assert!(flying.trajectory_clear(GridCell::new(0, 0), GridCell::new(4, 0)));

        assert!(flying.can_reach_directly(GridCell::new(1, 1), GridCell::new(3, 1)));
        assert!(!flying.can_reach_directly(GridCell::new(1, 2), GridCell::new(3, 2)));
        assert!(ground.can_reach_directly(GridCell::new(0, 3), GridCell::new(1, 3)));
        // Open air two cells over is not a ground move
        assert!(!ground.can_reach_directly(GridCell::new(0, 1), GridCell::new(2, 1)));
        assert!(!flying.can_reach_directly(GridCell::new(1, 1), GridCell::new(1, 1)));
    }

    #[test]
    fn test_direct_traversable_rows() {
        let (level, obstacles) = world(
            "
........
........
###.####
",
        );
        let planner = planner(&level, &obstacles);
        let ground = planner.search_space(AgentKind::Ground, footprint());
        let flying = planner.search_space(AgentKind::Flying, footprint());

        assert!(ground.is_direct_traversable(GridCell::new(0, 1), GridCell::new(2, 1)));
        assert!(!ground.is_direct_traversable(GridCell::new(0, 1), GridCell::new(5, 1)));
        assert!(flying.is_direct_traversable(GridCell::new(0, 1), GridCell::new(5, 1)));
        assert!(!flying.is_direct_traversable(GridCell::new(0, 1), GridCell::new(5, 0)));
    }
}
