use std::ops::ControlFlow;

use fxhash::FxHashMap;

use crate::cell::{CellState, Position};
use crate::frontier::PriorityFrontier;
use crate::grid::Grid;
use crate::path::{reconstruct_path, CameFrom};
use crate::solver::{heuristic, GridSolver, SearchOutcome};
use crate::STEP_COST;

/// Best-first search ordered on `g + h` with the Manhattan [heuristic]. Ties on `g + h`
/// go to the cell that entered the frontier first.
///
/// A queued cell that is reached more cheaply gets a new predecessor and `g`, but keeps
/// its place in the frontier.
#[derive(Clone, Copy, Debug, Default)]
pub struct AstarSolver;

impl GridSolver for AstarSolver {
    fn name(&self) -> &'static str {
        "A*"
    }

    fn explore<F>(
        &self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        on_step: &mut F,
    ) -> SearchOutcome
    where
        F: FnMut(&Grid) -> ControlFlow<()>,
    {
        let mut frontier = PriorityFrontier::new();
        let mut came_from = CameFrom::default();
        // Cells missing from the map have an infinite cost.
        let mut g_value: FxHashMap<Position, usize> = FxHashMap::default();
        g_value.insert(start, 0);
        frontier.push(start, heuristic(&start, &end));

        while let Some(current) = frontier.pop() {
            if current == end {
                return match reconstruct_path(&came_from, start, end, grid, on_step) {
                    Some(path) => SearchOutcome::Found(path),
                    None => SearchOutcome::Cancelled,
                };
            }

            let cost = g_value.get(&current).copied().unwrap_or_default();
            for neighbour in grid.neighbors_of(current) {
                let tentative = cost + STEP_COST;
                if g_value.get(&neighbour).is_some_and(|&g| g <= tentative) {
                    continue;
                }
                came_from.insert(neighbour, current);
                g_value.insert(neighbour, tentative);
                if !frontier.contains(&neighbour) {
                    frontier.push(neighbour, tentative + heuristic(&neighbour, &end));
                    grid.set_search_state(neighbour, CellState::Frontier);
                }
            }

            if on_step(grid).is_break() {
                return SearchOutcome::Cancelled;
            }

            if current != start {
                grid.set_search_state(current, CellState::Visited);
            }
        }
        SearchOutcome::NoPath
    }
}
