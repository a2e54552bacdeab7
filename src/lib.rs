//! # grid_search
//!
//! Shortest paths on a square grid of cells with four-directional, unit-cost movement.
//! Two interchangeable searches are provided: [A*](https://en.wikipedia.org/wiki/A*_search_algorithm)
//! with the Manhattan heuristic and plain
//! [breadth-first search](https://en.wikipedia.org/wiki/Breadth-first_search).
//!
//! Searches report progress only through cell states ([CellState::Frontier],
//! [CellState::Visited], [CellState::Path]) and an observation hook that is called as
//! the search advances, which is where a renderer can draw or a caller can cancel.
//!
//! ```
//! use grid_search::{search, unobserved, Grid, Position, SearchKind};
//!
//! let mut grid: Grid = "S..\n##.\nE..".parse().unwrap();
//! let outcome = search(
//!     SearchKind::AStar,
//!     &mut grid,
//!     Position::new(0, 0),
//!     Position::new(2, 0),
//!     unobserved,
//! )
//! .unwrap();
//! assert_eq!(outcome.path().unwrap().steps(), 6);
//! ```
mod cell;
mod error;
pub mod frontier;
mod grid;
mod path;
pub mod solver;

use core::fmt;
use std::ops::ControlFlow;
use std::str::FromStr;

pub use crate::cell::{Cell, CellState, Direction, Position};
pub use crate::error::{GridError, ParseGridError, SearchError};
pub use crate::grid::{Grid, GridConfig};
pub use crate::path::Path;
pub use crate::solver::{
    astar::AstarSolver, bfs::BfsSolver, heuristic, unobserved, GridSolver, SearchOutcome,
};

/// Order in which neighbours are enumerated. Among equally short paths this decides
/// which one is found.
pub const NEIGHBOR_ORDER: [Direction; 4] = [
    Direction::Down,
    Direction::Up,
    Direction::Right,
    Direction::Left,
];

/// Cost of a single move.
pub const STEP_COST: usize = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchKind {
    AStar,
    Bfs,
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchKind::AStar => write!(f, "astar"),
            SearchKind::Bfs => write!(f, "bfs"),
        }
    }
}

impl FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "astar" | "a*" => Ok(SearchKind::AStar),
            "bfs" => Ok(SearchKind::Bfs),
            other => Err(format!("unknown search kind {other:?}")),
        }
    }
}

/// Recomputes neighbours and connected components. Call after changing barriers and
/// before searching.
pub fn refresh_adjacency(grid: &mut Grid) {
    grid.refresh_adjacency();
}

/// Searches from `start` to `end` with the chosen algorithm. `on_step` is called after
/// every expanded cell and for every path cell marked afterwards; returning
/// [ControlFlow::Break] stops the search with [SearchOutcome::Cancelled].
pub fn search<F>(
    kind: SearchKind,
    grid: &mut Grid,
    start: Position,
    end: Position,
    on_step: F,
) -> Result<SearchOutcome, SearchError>
where
    F: FnMut(&Grid) -> ControlFlow<()>,
{
    match kind {
        SearchKind::AStar => AstarSolver.solve(grid, start, end, on_step),
        SearchKind::Bfs => BfsSolver.solve(grid, start, end, on_step),
    }
}

/// Like [search], between the grid's own Start and End markers.
pub fn search_marked<F>(
    kind: SearchKind,
    grid: &mut Grid,
    on_step: F,
) -> Result<SearchOutcome, SearchError>
where
    F: FnMut(&Grid) -> ControlFlow<()>,
{
    let start = grid.start().ok_or(SearchError::MissingStart)?;
    let end = grid.end().ok_or(SearchError::MissingEnd)?;
    search(kind, grid, start, end, on_step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_search_needs_both_markers() {
        let mut grid = Grid::new(3, 30);
        assert_eq!(
            search_marked(SearchKind::Bfs, &mut grid, unobserved),
            Err(SearchError::MissingStart)
        );
        grid.place(Position::new(0, 0)).unwrap();
        assert_eq!(
            search_marked(SearchKind::Bfs, &mut grid, unobserved),
            Err(SearchError::MissingEnd)
        );
        grid.place(Position::new(2, 2)).unwrap();
        grid.place(Position::new(1, 1)).unwrap();
        refresh_adjacency(&mut grid);
        for kind in [SearchKind::AStar, SearchKind::Bfs] {
            grid.clear_search_marks();
            let outcome = search_marked(kind, &mut grid, unobserved).unwrap();
            assert_eq!(outcome.path().unwrap().steps(), 4);
        }
    }

    #[test]
    fn search_kind_names() {
        assert_eq!("AStar".parse::<SearchKind>(), Ok(SearchKind::AStar));
        assert_eq!("bfs".parse::<SearchKind>(), Ok(SearchKind::Bfs));
        assert!("dijkstra".parse::<SearchKind>().is_err());
        assert_eq!(SearchKind::AStar.to_string(), "astar");
    }
}
