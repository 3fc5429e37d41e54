use crate::grid::GridCell;
use crate::pathfinding::{
    AgentFootprint, AgentKind, OccupancyOracle, PlanOutcome, SearchSpace, SearchStats,
};
use bevy::prelude::*;

/// Debug logging utility for path planning
pub struct PathDebugger;

impl PathDebugger {
    /// Log the request before any checks run
    pub fn log_request(start: GridCell, goal: GridCell, kind: AgentKind, footprint: AgentFootprint) {
        info!(
            "PATH REQUEST: {} -> {} kind({}) footprint({:.1}x{:.1}) distance({})",
            start,
            goal,
            kind,
            footprint.width,
            footprint.height,
            start.manhattan_distance(&goal)
        );
    }

    /// Log why a request was turned down before searching
    pub fn log_rejection(reason: &str, start: GridCell, goal: GridCell) {
        info!("PATH REJECTED: {} -> {} ({})", start, goal, reason);
    }

    pub fn log_search_failure(start: GridCell, goal: GridCell, stats: &SearchStats) {
        info!(
            "PATH NOT FOUND: {} -> {} expanded({}) exhausted({})",
            start, goal, stats.expanded, stats.exhausted
        );
    }

    /// Log a found path with its cells
    pub fn log_outcome(outcome: &PlanOutcome) {
        let cells: Vec<String> = outcome.cells.iter().map(ToString::to_string).collect();
        info!(
            "PATH FOUND: raw({}) simplified({}) cost({}) expanded({}) shortcut({}) cells[{}]",
            outcome.raw_cells.len(),
            outcome.cells.len(),
            outcome.cost,
            outcome.stats.expanded,
            outcome.stats.used_shortcut,
            cells.join(" ")
        );
    }

    /// Re-check every step of a raw path against the movement rules.
    ///
    /// Returns the number of illegal transitions, warning about each one.
    pub fn verify_transitions<O: OccupancyOracle + ?Sized>(
        cells: &[GridCell],
        space: &SearchSpace<'_, O>,
    ) -> usize {
        let mut invalid = 0;
        for pair in cells.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if !space.neighbors(from).contains(&to) {
                warn!(
                    "PATH CHECK: illegal {} step {} -> {}",
                    space.kind(),
                    from,
                    to
                );
                invalid += 1;
            }
        }
        invalid
    }
}
