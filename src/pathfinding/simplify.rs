//! Reduces a cell-by-cell path to the waypoints an agent actually needs

use crate::grid::GridCell;
use crate::pathfinding::SearchSpace;
use crate::pathfinding::obstacles::OccupancyOracle;

/// Keep the endpoints, every cell where the path moves vertically or turns,
/// and enough cells on horizontal runs that each kept segment is directly
/// traversable. A cell is also kept at least every `interval` cells.
pub fn simplify_cells<O: OccupancyOracle + ?Sized>(
    cells: &[GridCell],
    space: &SearchSpace<'_, O>,
    interval: usize,
) -> Vec<GridCell> {
    if cells.len() <= 2 {
        return cells.to_vec();
    }

    let mut kept = vec![cells[0]];
    let mut last_kept = 0;

    for i in 1..cells.len() - 1 {
        let (prev, current, next) = (cells[i - 1], cells[i], cells[i + 1]);

        let keep = involves_vertical_movement(prev, current, next)
            || changes_direction(prev, current, next)
            || !space.is_direct_traversable(cells[last_kept], next)
            || i - last_kept >= interval;

        if keep {
            kept.push(current);
            last_kept = i;
        }
    }

    kept.push(cells[cells.len() - 1]);
    kept
}

fn involves_vertical_movement(prev: GridCell, current: GridCell, next: GridCell) -> bool {
    prev.y != current.y || current.y != next.y
}

fn direction(from: GridCell, to: GridCell) -> (i32, i32) {
    ((to.x - from.x).signum(), (to.y - from.y).signum())
}

fn changes_direction(prev: GridCell, current: GridCell, next: GridCell) -> bool {
    direction(prev, current) != direction(current, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::AgentKind;
    use crate::pathfinding::test_support::*;

    fn row(y: i32, xs: std::ops::RangeInclusive<i32>) -> Vec<GridCell> {
        xs.map(|x| GridCell::new(x, y)).collect()
    }

    #[test]
    fn test_short_paths_unchanged() {
        let (level, obstacles) = world("....\n####");
        let planner = planner(&level, &obstacles);
        let space = planner.search_space(AgentKind::Ground, footprint());

        let cells = row(0, 0..=1);
        assert_eq!(simplify_cells(&cells, &space, 3), cells);
        assert!(simplify_cells(&[], &space, 3).is_empty());
    }

    #[test]
    fn test_straight_run_keeps_periodic_waypoints() {
        let (level, obstacles) = world("............\n############");
        let planner = planner(&level, &obstacles);
        let space = planner.search_space(AgentKind::Ground, footprint());

        let simplified = simplify_cells(&row(0, 0..=9), &space, 3);
        assert_eq!(
            simplified,
            vec![
                GridCell::new(0, 0),
                GridCell::new(3, 0),
                GridCell::new(6, 0),
                GridCell::new(9, 0)
            ]
        );
    }

    #[test]
    fn test_vertical_moves_are_kept() {
        let (level, obstacles) = world(
            "
..........
..........
..........
##########
",
        );
        let planner = planner(&level, &obstacles);
        let space = planner.search_space(AgentKind::Ground, footprint());

        let cells = vec![
            GridCell::new(0, 2),
            GridCell::new(1, 2),
            GridCell::new(1, 1),
            GridCell::new(2, 1),
            GridCell::new(3, 2),
            GridCell::new(4, 2),
        ];
        let simplified = simplify_cells(&cells, &space, 10);

        for cell in &cells[1..5] {
            assert!(simplified.contains(cell), "{cell} should be kept");
        }
        assert_eq!(simplified.first(), cells.first());
        assert_eq!(simplified.last(), cells.last());
    }

    #[test]
    fn test_gap_in_floor_forces_waypoint() {
        let (level, obstacles) = world(
            "
..........
..........
####.#####
",
        );
        let planner = planner(&level, &obstacles);
        let ground = planner.search_space(AgentKind::Ground, footprint());
        let flying = planner.search_space(AgentKind::Flying, footprint());

        let cells = row(0, 0..=7);
        let for_flying = simplify_cells(&cells, &flying, 100);
        assert_eq!(for_flying, vec![GridCell::new(0, 0), GridCell::new(7, 0)]);

        let cells = row(1, 0..=7);
        let for_ground = simplify_cells(&cells, &ground, 100);
        // Cells on either side of the unsupported gap cell become waypoints
        assert!(for_ground.contains(&GridCell::new(3, 1)));
        assert!(for_ground.contains(&GridCell::new(5, 1)));
        assert!(!for_ground.contains(&GridCell::new(2, 1)));
    }

    #[test]
    fn test_simplified_is_subsequence_of_raw() {
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
        let outcome = planner
            .plan(at(&level, 0, 3), at(&level, 13, 3), AgentKind::Ground, footprint())
            .unwrap();

        let mut raw = outcome.raw_cells.iter();
        for cell in &outcome.cells {
            assert!(raw.any(|c| c == cell), "{cell} is not in raw order");
        }
    }
}
