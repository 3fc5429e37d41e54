use crate::game_logic::debug::PathDebugger;
use crate::grid::{GridCell, GridMapper, WorldBounds};
use bevy::prelude::*;
use derive_more::Display;
use pathfinding::prelude::astar;
use serde::{Deserialize, Serialize};
use std::cell::Cell;

pub mod neighbors;
pub mod obstacles;
pub mod simplify;

pub use neighbors::SearchSpace;
pub use obstacles::*;

/// Selects the neighbor rule set used during search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// Gravity-bound: walks, falls and jumps between supported cells
    #[default]
    #[display("ground")]
    Ground,
    /// Moves freely in 8 directions
    #[display("flying")]
    Flying,
}

/// Collision rectangle of the agent requesting a path, in world pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentFootprint {
    pub width: f32,
    pub height: f32,
}

impl AgentFootprint {
    /// Panics on negative or non-finite dimensions, which indicate a bug in the caller
    pub fn new(width: f32, height: f32) -> Self {
        assert!(
            width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0,
            "agent footprint must have finite, non-negative dimensions, got {width}x{height}"
        );
        Self { width, height }
    }

    /// Zero-area footprints cannot be planned for
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Configuration for the platformer A* search.
///
/// Costs are integers scaled by 10 so the search can run on `u32`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Manhattan cell distance beyond which a request is rejected outright
    pub max_search_radius: u32,
    /// Node expansions before the search gives up
    pub max_iterations: usize,
    /// Highest rise of a single jump, in cells
    pub max_jump_height: i32,
    /// Highest rise of a jump straight up
    pub max_straight_jump_height: i32,
    /// Widest horizontal span of a single jump, in cells
    pub max_jump_distance: i32,
    /// Deepest drop of a single fall, in cells
    pub max_fall_distance: i32,
    pub walk_cost: u32,
    pub climb_cost_per_cell: u32,
    pub fall_cost_per_cell: u32,
    /// Cell distance at or under which the direct shortcut is attempted
    pub direct_path_radius: u32,
    /// Per-axis cell reach of the direct shortcut
    pub direct_reach: i32,
    pub enable_direct_shortcut: bool,
    pub simplify_paths: bool,
    /// A waypoint is kept at least every this many cells on long straight runs
    pub waypoint_interval: usize,
    /// Footprints wider or taller than this also test the cell-aligned box
    pub large_footprint_threshold: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_search_radius: 30,
            max_iterations: 200,
            max_jump_height: 3,
            max_straight_jump_height: 2,
            max_jump_distance: 4,
            max_fall_distance: 4,
            walk_cost: 10,
            climb_cost_per_cell: 15,
            fall_cost_per_cell: 5,
            direct_path_radius: 3,
            direct_reach: 2,
            enable_direct_shortcut: true,
            simplify_paths: true,
            waypoint_interval: 3,
            large_footprint_threshold: 32.0,
        }
    }
}

/// Diagnostic toggles; they only change what gets logged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugFlags {
    pub verbose_search: bool,
    pub collision_checks: bool,
}

/// One point an agent steers toward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub position: Vec2,
    /// Source cell, kept for debugging
    pub cell: Option<GridCell>,
}

impl Waypoint {
    pub fn new(position: Vec2, cell: Option<GridCell>) -> Self {
        Self { position, cell }
    }
}

/// Ordered waypoints in world space. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    waypoints: Vec<Waypoint>,
}

impl Path {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    /// Waypoints at the centers of the given cells
    pub fn from_cells(cells: &[GridCell], mapper: &GridMapper) -> Self {
        Self::new(
            cells
                .iter()
                .map(|&cell| Waypoint::new(mapper.cell_center(cell), Some(cell)))
                .collect(),
        )
    }

    /// Two-point path straight from `start` to `goal`
    pub fn direct(start: Vec2, goal: Vec2, mapper: &GridMapper) -> Self {
        Self::new(vec![
            Waypoint::new(start, Some(mapper.world_to_grid(start))),
            Waypoint::new(goal, Some(mapper.world_to_grid(goal))),
        ])
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter()
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.waypoints.iter().map(|w| w.position).collect()
    }

    pub fn final_destination(&self) -> Option<Vec2> {
        self.waypoints.last().map(|w| w.position)
    }
}

/// Bookkeeping from a single search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub expanded: usize,
    pub used_shortcut: bool,
    pub exhausted: bool,
}

/// A found path plus the data that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub path: Path,
    /// Cells as reconstructed by the search
    pub raw_cells: Vec<GridCell>,
    /// Cells after simplification; these back the waypoints
    pub cells: Vec<GridCell>,
    pub cost: u32,
    pub stats: SearchStats,
}

/// Platformer-aware A* planner over an injected occupancy oracle.
///
/// Stateless between calls; building one per frame is cheap.
pub struct PathPlanner<'w, O: OccupancyOracle + ?Sized> {
    oracle: &'w O,
    mapper: GridMapper,
    bounds: WorldBounds,
    config: PlannerConfig,
    debug: DebugFlags,
}

impl<'w, O: OccupancyOracle + ?Sized> PathPlanner<'w, O> {
    pub fn new(oracle: &'w O, mapper: GridMapper, bounds: WorldBounds, config: PlannerConfig) -> Self {
        Self {
            oracle,
            mapper,
            bounds,
            config,
            debug: DebugFlags::default(),
        }
    }

    pub fn with_debug(mut self, debug: DebugFlags) -> Self {
        self.debug = debug;
        self
    }

    pub fn set_debug_logging(&mut self, enabled: bool) {
        self.debug.verbose_search = enabled;
    }

    pub fn set_collision_debugging(&mut self, enabled: bool) {
        self.debug.collision_checks = enabled;
    }

    pub fn oracle(&self) -> &'w O {
        self.oracle
    }

    pub fn mapper(&self) -> &GridMapper {
        &self.mapper
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn debug_flags(&self) -> DebugFlags {
        self.debug
    }

    /// Search view for one agent kind and footprint
    pub fn search_space(&self, kind: AgentKind, footprint: AgentFootprint) -> SearchSpace<'_, O> {
        SearchSpace::new(
            self.oracle,
            &self.mapper,
            &self.bounds,
            &self.config,
            kind,
            footprint,
            self.debug.collision_checks,
        )
    }

    /// Find a platformer-feasible path between two world points.
    ///
    /// `None` means no path was found within budget, which is routine.
    pub fn find_path(
        &self,
        start: Vec2,
        goal: Vec2,
        kind: AgentKind,
        footprint: AgentFootprint,
    ) -> Option<Path> {
        self.plan(start, goal, kind, footprint).map(|outcome| outcome.path)
    }

    /// Like [`find_path`](Self::find_path) but keeps the cells, cost and stats
    pub fn plan(
        &self,
        start: Vec2,
        goal: Vec2,
        kind: AgentKind,
        footprint: AgentFootprint,
    ) -> Option<PlanOutcome> {
        if !footprint.is_usable() {
            warn!(
                "Pathfinding rejected: unusable footprint {}x{}",
                footprint.width, footprint.height
            );
            return None;
        }

        let start_cell = self.mapper.world_to_grid(start);
        let goal_cell = self.mapper.world_to_grid(goal);
        let distance = start_cell.manhattan_distance(&goal_cell);

        if self.debug.verbose_search {
            PathDebugger::log_request(start_cell, goal_cell, kind, footprint);
        }

        if distance > self.config.max_search_radius {
            if self.debug.verbose_search {
                PathDebugger::log_rejection("goal beyond search radius", start_cell, goal_cell);
            }
            return None;
        }

        let space = self.search_space(kind, footprint);

        if !space.is_valid(start_cell) || !space.is_valid(goal_cell) {
            if self.debug.verbose_search {
                PathDebugger::log_rejection("start or goal blocked", start_cell, goal_cell);
            }
            return None;
        }

        if self.config.enable_direct_shortcut
            && distance <= self.config.direct_path_radius
            && space.can_reach_directly(start_cell, goal_cell)
        {
            let cells = vec![start_cell, goal_cell];
            let outcome = PlanOutcome {
                path: Path::direct(start, goal, &self.mapper),
                raw_cells: cells.clone(),
                cost: space.move_cost(start_cell, goal_cell),
                cells,
                stats: SearchStats {
                    expanded: 0,
                    used_shortcut: true,
                    exhausted: false,
                },
            };
            if self.debug.verbose_search {
                PathDebugger::log_outcome(&outcome);
            }
            return Some(outcome);
        }

        let expanded = Cell::new(0usize);
        let exhausted = Cell::new(false);
        let max_iterations = self.config.max_iterations;
        let walk_cost = self.config.walk_cost;

        let result = astar(
            &start_cell,
            |cell| {
                if exhausted.get() {
                    return Vec::new();
                }
                let count = expanded.get() + 1;
                expanded.set(count);
                if count > max_iterations {
                    exhausted.set(true);
                    return Vec::new();
                }

                let current = *cell;
                space
                    .neighbors(current)
                    .into_iter()
                    .map(|next| (next, space.move_cost(current, next)))
                    .collect()
            },
            |cell| cell.manhattan_distance(&goal_cell) * walk_cost,
            |cell| *cell == goal_cell && !exhausted.get(),
        );

        let stats = SearchStats {
            expanded: expanded.get().min(max_iterations),
            used_shortcut: false,
            exhausted: exhausted.get(),
        };

        let Some((raw_cells, cost)) = result else {
            if self.debug.verbose_search {
                PathDebugger::log_search_failure(start_cell, goal_cell, &stats);
            }
            return None;
        };

        let cells = if self.config.simplify_paths {
            simplify::simplify_cells(&raw_cells, &space, self.config.waypoint_interval)
        } else {
            raw_cells.clone()
        };

        let outcome = PlanOutcome {
            path: Path::from_cells(&cells, &self.mapper),
            raw_cells,
            cells,
            cost,
            stats,
        };

        if self.debug.verbose_search {
            PathDebugger::log_outcome(&outcome);
            PathDebugger::verify_transitions(&outcome.raw_cells, &space);
        }

        Some(outcome)
    }

    /// Reduce a raw cell path, see [`simplify::simplify_cells`]
    pub fn simplify(
        &self,
        cells: &[GridCell],
        kind: AgentKind,
        footprint: AgentFootprint,
    ) -> Vec<GridCell> {
        let space = self.search_space(kind, footprint);
        simplify::simplify_cells(cells, &space, self.config.waypoint_interval)
    }

    /// In bounds and not blocked for this footprint
    pub fn is_cell_walkable(&self, cell: GridCell, footprint: AgentFootprint) -> bool {
        self.search_space(AgentKind::Ground, footprint).is_valid(cell)
    }

    pub fn has_ground_support(&self, cell: GridCell, footprint: AgentFootprint) -> bool {
        self.search_space(AgentKind::Ground, footprint)
            .has_ground_support(cell)
    }

    /// Legal single-step transitions out of `cell`
    pub fn neighbors(
        &self,
        cell: GridCell,
        kind: AgentKind,
        footprint: AgentFootprint,
    ) -> Vec<GridCell> {
        self.search_space(kind, footprint).neighbors(cell)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    const FLAT: &str = "
........................................
........................................
........................................
........................................
########################################
";

    fn assert_step_bounds(cells: &[GridCell], config: &PlannerConfig) {
        for pair in cells.windows(2) {
            let dy = pair[1].y - pair[0].y;
            assert!(
                -dy <= config.max_jump_height,
                "step {} -> {} rises more than the jump height",
                pair[0],
                pair[1]
            );
            assert!(
                dy <= config.max_fall_distance,
                "step {} -> {} drops more than the fall distance",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_flat_floor_path_stays_on_row() {
        let (level, obstacles) = world(FLAT);
        let planner = planner(&level, &obstacles);

        let outcome = planner
            .plan(at(&level, 2, 3), at(&level, 20, 3), AgentKind::Ground, footprint())
            .expect("open floor should be walkable");

        assert!(outcome.raw_cells.iter().all(|cell| cell.y == 3));
        for pair in outcome.raw_cells.windows(2) {
            assert_eq!(pair[1].x - pair[0].x, 1, "steps should march right one cell at a time");
        }
        assert_eq!(outcome.cost, 18 * 10);

        let xs: Vec<f32> = outcome.path.iter().map(|w| w.position.x).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
        assert!(outcome.path.iter().all(|w| w.position.y == at(&level, 0, 3).y));
    }

    #[test]
    fn test_path_runs_through_tile_centers() {
        let (level, obstacles) = world(FLAT);
        let planner = planner(&level, &obstacles);

        let path = planner
            .find_path(at(&level, 1, 3), at(&level, 12, 3), AgentKind::Ground, footprint())
            .unwrap();

        let mapper = level.mapper();
        for waypoint in path.iter() {
            let cell = waypoint.cell.unwrap();
            assert_eq!(waypoint.position, mapper.cell_center(cell));
        }
        assert_eq!(path.final_destination(), Some(at(&level, 12, 3)));
    }

    #[test]
    fn test_distance_fast_reject_on_open_map() {
        let level = crate::level::LevelDefinition::new("open".to_string(), 100, 100).unwrap();
        let always_free = |_: f32, _: f32, _: f32, _: f32| true;
        let planner = PathPlanner::new(
            &always_free,
            level.mapper(),
            level.bounds(),
            PlannerConfig::default(),
        );

        // 31 cells apart on an empty map
        let outcome = planner.plan(
            at(&level, 10, 10),
            at(&level, 41, 10),
            AgentKind::Flying,
            footprint(),
        );
        assert!(outcome.is_none());

        // 30 cells apart is still searched
        let outcome = planner.plan(
            at(&level, 10, 10),
            at(&level, 40, 10),
            AgentKind::Flying,
            footprint(),
        );
        assert!(outcome.is_some());
    }

    #[test]
    fn test_blocked_goal_returns_none() {
        let (level, obstacles) = world(
            "
..........
......#...
##########
",
        );
        let planner = planner(&level, &obstacles);

        let path = planner.find_path(at(&level, 1, 1), at(&level, 6, 1), AgentKind::Ground, footprint());
        assert!(path.is_none());
    }

    #[test]
    fn test_out_of_bounds_goal_returns_none() {
        let (level, obstacles) = world(FLAT);
        let planner = planner(&level, &obstacles);

        let path = planner.find_path(at(&level, 1, 3), at(&level, 45, 3), AgentKind::Ground, footprint());
        assert!(path.is_none());

        let path = planner.find_path(at(&level, 1, 3), at(&level, 1, -1), AgentKind::Flying, footprint());
        assert!(path.is_none());
    }

    #[test]
    fn test_unusable_footprint_returns_none() {
        let (level, obstacles) = world(FLAT);
        let planner = planner(&level, &obstacles);

        let flat = AgentFootprint::new(30.0, 0.0);
        assert!(planner.find_path(at(&level, 1, 3), at(&level, 8, 3), AgentKind::Ground, flat).is_none());

        let nan = AgentFootprint {
            width: f32::NAN,
            height: 30.0,
        };
        assert!(planner.find_path(at(&level, 1, 3), at(&level, 8, 3), AgentKind::Ground, nan).is_none());
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn test_negative_footprint_panics() {
        let _ = AgentFootprint::new(-1.0, 30.0);
    }

    #[test]
    fn test_flat_jump_scenario() {
        // Start at world (0,0); a one-cell wall two cells to the right of it
        let level = crate::level::LevelDefinition::new("jump".to_string(), 8, 8).unwrap();
        let mapper = level.mapper();
        let tile = mapper.tile_pixel_size();
        let solid = |cell: GridCell| cell.y == 1 || cell == GridCell::new(2, 0);
        let oracle = move |x: f32, y: f32, w: f32, h: f32| {
            let min = GridCell::new((x / tile).floor() as i32, (y / tile).floor() as i32);
            let max = GridCell::new(
                ((x + w) / tile).ceil() as i32 - 1,
                ((y + h) / tile).ceil() as i32 - 1,
            );
            (min.x..=max.x).all(|cx| (min.y..=max.y).all(|cy| !solid(GridCell::new(cx, cy))))
        };
        let bounds = WorldBounds::new(GridCell::new(0, -5), GridCell::new(10, 10));
        let planner = PathPlanner::new(&oracle, mapper, bounds, PlannerConfig::default());

        let outcome = planner
            .plan(Vec2::new(0.0, 0.0), mapper.cell_center(GridCell::new(3, 0)), AgentKind::Ground, footprint())
            .expect("a one-cell wall should be jumpable");

        assert!(outcome.raw_cells.iter().all(|cell| *cell != GridCell::new(2, 0)));
        let rises: Vec<i32> = outcome
            .raw_cells
            .windows(2)
            .map(|pair| pair[0].y - pair[1].y)
            .filter(|rise| *rise > 0)
            .collect();
        assert!(!rises.is_empty(), "expected a jump step in {:?}", outcome.raw_cells);
        assert!(rises.iter().all(|rise| *rise <= planner.config().max_jump_height));
    }

    #[test]
    fn test_unreachable_behind_full_wall() {
        let (level, obstacles) = world(
            "
.....#.....
.....#.....
.....#.....
.....#.....
.....#.....
###########
",
        );
        let planner = planner(&level, &obstacles);

        let path = planner.find_path(at(&level, 1, 4), at(&level, 9, 4), AgentKind::Ground, footprint());
        assert!(path.is_none());

        let path = planner.find_path(at(&level, 1, 4), at(&level, 9, 4), AgentKind::Flying, footprint());
        assert!(path.is_none());
    }

    #[test]
    fn test_flying_path_goes_over_wall() {
        let (level, obstacles) = world(
            "
...........
.....#.....
.....#.....
.....#.....
###########
",
        );
        let planner = planner(&level, &obstacles);

        let outcome = planner
            .plan(at(&level, 1, 3), at(&level, 9, 3), AgentKind::Flying, footprint())
            .unwrap();
        assert!(outcome.raw_cells.iter().any(|cell| cell.y == 0));
        assert!(outcome.raw_cells.iter().all(|cell| planner.is_cell_walkable(*cell, footprint())));
    }

    #[test]
    fn test_ground_path_climbs_stairs() {
        let (level, obstacles) = world(
            "
..............
..............
..........####
.......#######
....##########
##############
",
        );
        let planner = planner(&level, &obstacles);

        let outcome = planner
            .plan(at(&level, 1, 4), at(&level, 12, 1), AgentKind::Ground, footprint())
            .unwrap();

        assert_eq!(outcome.raw_cells.last(), Some(&GridCell::new(12, 1)));
        assert_step_bounds(&outcome.raw_cells, planner.config());
        assert_eq!(
            crate::game_logic::debug::PathDebugger::verify_transitions(
                &outcome.raw_cells,
                &planner.search_space(AgentKind::Ground, footprint())
            ),
            0
        );
    }

    #[test]
    fn test_ground_path_drops_off_ledge() {
        let (level, obstacles) = world(
            "
..........
####......
..........
..........
..........
##########
",
        );
        let planner = planner(&level, &obstacles);

        let outcome = planner
            .plan(at(&level, 1, 0), at(&level, 8, 4), AgentKind::Ground, footprint())
            .unwrap();

        assert_step_bounds(&outcome.raw_cells, planner.config());
        let drops = outcome
            .raw_cells
            .windows(2)
            .filter(|pair| pair[1].y > pair[0].y)
            .count();
        assert!(drops >= 1);
    }

    #[test]
    fn test_pit_deeper_than_fall_limit_is_unreachable() {
        let (level, obstacles) = world(
            "
..........
####......
..........
..........
..........
..........
..........
##########
",
        );
        let planner = planner(&level, &obstacles);

        // Walking off the ledge would mean a six-cell drop
        let ground = planner.find_path(at(&level, 1, 0), at(&level, 8, 6), AgentKind::Ground, footprint());
        assert!(ground.is_none());

        let flying = planner.find_path(at(&level, 1, 0), at(&level, 8, 6), AgentKind::Flying, footprint());
        assert!(flying.is_some());
    }

    #[test]
    fn test_step_bounds_on_random_levels() {
        let mut rng = Pcg64::seed_from_u64(42);
        let config = PlannerConfig::default();

        for _ in 0..25 {
            let mut rows = Vec::new();
            for y in 0..10 {
                let row: String = (0..16)
                    .map(|_| if y == 9 || rng.gen_bool(0.18) { '#' } else { '.' })
                    .collect();
                rows.push(row);
            }
            let (level, obstacles) = world(&rows.join("\n"));
            let planner = planner(&level, &obstacles);

            for _ in 0..10 {
                let start = GridCell::new(rng.gen_range(0..16), rng.gen_range(0..9));
                let goal = GridCell::new(rng.gen_range(0..16), rng.gen_range(0..9));
                let mapper = level.mapper();
                for kind in [AgentKind::Ground, AgentKind::Flying] {
                    if let Some(outcome) =
                        planner.plan(mapper.cell_center(start), mapper.cell_center(goal), kind, footprint())
                    {
                        if kind == AgentKind::Ground {
                            assert_step_bounds(&outcome.raw_cells, &config);
                        }
                        assert_eq!(outcome.raw_cells.first(), Some(&start));
                        assert_eq!(outcome.raw_cells.last(), Some(&goal));
                        assert_eq!(outcome.cells.first(), Some(&start));
                        assert_eq!(outcome.cells.last(), Some(&goal));
                    }
                }
            }
        }
    }

    #[test]
    fn test_replanning_is_deterministic() {
        let (level, obstacles) = world(
            "
..............
......##......
..............
...##....##...
##############
",
        );
        let planner = planner(&level, &obstacles);
        let (start, goal) = (at(&level, 0, 3), at(&level, 13, 3));

        let first = planner.plan(start, goal, AgentKind::Ground, footprint()).unwrap();
        let second = planner.plan(start, goal, AgentKind::Ground, footprint()).unwrap();

        assert_eq!(first.cost, second.cost);
        assert_eq!(first.raw_cells, second.raw_cells);
        assert_eq!(first.path, second.path);
    }

    #[test]
    fn test_iteration_cap_reports_no_path() {
        let (level, obstacles) = world(FLAT);
        let config = PlannerConfig {
            max_iterations: 3,
            enable_direct_shortcut: false,
            ..PlannerConfig::default()
        };
        let planner = PathPlanner::new(&obstacles, level.mapper(), level.bounds(), config);

        let outcome = planner.plan(at(&level, 1, 3), at(&level, 20, 3), AgentKind::Ground, footprint());
        assert!(outcome.is_none());
    }

    #[test]
    fn test_shortcut_matches_full_search_reachability() {
        let (level, obstacles) = world(
            "
..........
..#....#..
..#.......
.....##...
.##.......
##########
",
        );
        let with_shortcut = planner(&level, &obstacles);
        let without_shortcut = PathPlanner::new(
            &obstacles,
            level.mapper(),
            level.bounds(),
            PlannerConfig {
                enable_direct_shortcut: false,
                ..PlannerConfig::default()
            },
        );

        let mut shortcut_hits = 0;
        for sy in 0..5 {
            for sx in 0..10 {
                for gy in 0..5 {
                    for gx in 0..10 {
                        let (start, goal) = (GridCell::new(sx, sy), GridCell::new(gx, gy));
                        if start.manhattan_distance(&goal) > 3 {
                            continue;
                        }
                        let mapper = level.mapper();
                        for kind in [AgentKind::Ground, AgentKind::Flying] {
                            let fast = with_shortcut.plan(
                                mapper.cell_center(start),
                                mapper.cell_center(goal),
                                kind,
                                footprint(),
                            );
                            let full = without_shortcut.plan(
                                mapper.cell_center(start),
                                mapper.cell_center(goal),
                                kind,
                                footprint(),
                            );
                            assert_eq!(
                                fast.is_some(),
                                full.is_some(),
                                "{kind} {start} -> {goal} disagrees with the shortcut enabled"
                            );
                            if fast.is_some_and(|o| o.stats.used_shortcut) {
                                shortcut_hits += 1;
                            }
                        }
                    }
                }
            }
        }
        assert!(shortcut_hits > 0);
    }

    #[test]
    fn test_debug_flags_do_not_change_results() {
        let (level, obstacles) = world(
            "
..........
....#.....
..........
..##..#...
##########
",
        );
        let quiet = planner(&level, &obstacles);
        let mut loud = planner(&level, &obstacles);
        loud.set_debug_logging(true);
        loud.set_collision_debugging(true);

        for (start, goal) in [((0, 2), (9, 2)), ((0, 2), (4, 0)), ((9, 0), (1, 2))] {
            for kind in [AgentKind::Ground, AgentKind::Flying] {
                let a = quiet.plan(at(&level, start.0, start.1), at(&level, goal.0, goal.1), kind, footprint());
                let b = loud.plan(at(&level, start.0, start.1), at(&level, goal.0, goal.1), kind, footprint());
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_large_footprint_needs_room() {
        let (level, obstacles) = world(
            "
..........
..........
#####.####
..........
##########
",
        );
        let planner = planner(&level, &obstacles);

        // A one-cell gap in a ceiling lets a small flyer through but not a wide one
        let small = planner.find_path(at(&level, 5, 0), at(&level, 5, 3), AgentKind::Flying, footprint());
        assert!(small.is_some());

        let wide = AgentFootprint::new(60.0, 40.0);
        let large = planner.find_path(at(&level, 5, 0), at(&level, 5, 3), AgentKind::Flying, wide);
        assert!(large.is_none());
    }

    #[test]
    fn test_path_accessors() {
        let mapper = GridMapper::default();
        let path = Path::direct(Vec2::new(10.0, 10.0), Vec2::new(100.0, 10.0), &mapper);

        assert_eq!(path.len(), 2);
        assert!(!path.is_empty());
        assert_eq!(path.get(1).and_then(|w| w.cell), Some(GridCell::new(2, 0)));
        assert_eq!(path.positions(), vec![Vec2::new(10.0, 10.0), Vec2::new(100.0, 10.0)]);
        assert!(path.get(2).is_none());
    }
}
