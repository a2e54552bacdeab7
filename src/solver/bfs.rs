use std::ops::ControlFlow;

use crate::cell::{CellState, Position};
use crate::frontier::FifoFrontier;
use crate::grid::Grid;
use crate::path::{reconstruct_path, CameFrom};
use crate::solver::{GridSolver, SearchOutcome};

/// Uninformed breadth-first search. Cells are expanded level by level, so the first
/// time the end shows up as a neighbour the path to it is a shortest one.
#[derive(Clone, Copy, Debug, Default)]
pub struct BfsSolver;

impl GridSolver for BfsSolver {
    fn name(&self) -> &'static str {
        "BFS"
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
        let mut came_from = CameFrom::default();
        if start == end {
            return match reconstruct_path(&came_from, start, end, grid, on_step) {
                Some(path) => SearchOutcome::Found(path),
                None => SearchOutcome::Cancelled,
            };
        }
        let mut frontier = FifoFrontier::new();
        frontier.push(start);

        while let Some(current) = frontier.pop() {
            for neighbour in grid.neighbors_of(current) {
                // The goal is tested as it is discovered, one level before it would be popped.
                if neighbour == end {
                    came_from.insert(neighbour, current);
                    return match reconstruct_path(&came_from, start, end, grid, on_step) {
                        Some(path) => SearchOutcome::Found(path),
                        None => SearchOutcome::Cancelled,
                    };
                }
                if frontier.push(neighbour) {
                    came_from.insert(neighbour, current);
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
