use std::ops::ControlFlow;

use log::{debug, info, warn};

use crate::cell::Position;
use crate::error::SearchError;
use crate::grid::Grid;
use crate::path::Path;

pub mod astar;
pub mod bfs;

/// Result of a search that was allowed to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Path),
    /// The frontier ran dry: start and end lie in different regions.
    NoPath,
    /// The observation hook asked to stop. Cell states are left as they were.
    Cancelled,
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            _ => None,
        }
    }
    pub fn into_path(self) -> Option<Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            _ => None,
        }
    }
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

/// Manhattan distance between two cells, the A* heuristic. Admissible and consistent
/// for unit-cost moves in four directions.
pub fn heuristic(a: &Position, b: &Position) -> usize {
    a.manhattan_distance(b)
}

pub trait GridSolver {
    fn name(&self) -> &'static str;

    /// Runs the search itself. Preconditions have been checked by [solve](Self::solve).
    fn explore<F>(
        &self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        on_step: &mut F,
    ) -> SearchOutcome
    where
        F: FnMut(&Grid) -> ControlFlow<()>;

    /// Checks the endpoints and the adjacency, then searches from `start` to `end`,
    /// calling `on_step` as cells change state.
    fn solve<F>(
        &self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        mut on_step: F,
    ) -> Result<SearchOutcome, SearchError>
    where
        F: FnMut(&Grid) -> ControlFlow<()>,
    {
        check_endpoints(grid, start, end)?;
        info!("{} search from {} to {}", self.name(), start, end);
        let outcome = self.explore(grid, start, end, &mut on_step);
        match &outcome {
            SearchOutcome::Found(path) => {
                info!("{} found a path of {} steps", self.name(), path.steps())
            }
            SearchOutcome::NoPath => {
                info!("{} exhausted the frontier, {} is not reachable", self.name(), end)
            }
            SearchOutcome::Cancelled => debug!("{} search cancelled", self.name()),
        }
        Ok(outcome)
    }
}

fn check_endpoints(grid: &Grid, start: Position, end: Position) -> Result<(), SearchError> {
    for pos in [start, end] {
        if !grid.in_bounds(pos) {
            return Err(SearchError::OutOfBounds {
                position: pos,
                rows: grid.rows(),
            });
        }
        if grid.is_barrier(pos) {
            return Err(SearchError::BarrierEndpoint(pos));
        }
    }
    if grid.is_adjacency_stale() {
        warn!("Refusing to search, barriers changed since the last adjacency refresh");
        return Err(SearchError::StaleAdjacency);
    }
    Ok(())
}

/// Hook that never cancels, for callers that do not observe the search.
pub fn unobserved(_: &Grid) -> ControlFlow<()> {
    ControlFlow::Continue(())
}
