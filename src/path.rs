use core::fmt;
use std::ops::ControlFlow;

use indexmap::IndexMap;
use itertools::Itertools;
use fxhash::FxBuildHasher;

use crate::cell::{CellState, Position};
use crate::grid::Grid;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Predecessor map of a search run: each reached cell maps to the cell that discovered it.
pub(crate) type CameFrom = FxIndexMap<Position, Position>;

/// A found path, ordered from start to end inclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    cells: Vec<Position>,
}

impl Path {
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }
    /// Number of moves, one less than the number of cells.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }
    pub fn start(&self) -> Option<Position> {
        self.cells.first().copied()
    }
    pub fn end(&self) -> Option<Position> {
        self.cells.last().copied()
    }
    pub fn contains(&self, pos: &Position) -> bool {
        self.cells.contains(pos)
    }

    /// Checks that every cell lies on the grid, is not a barrier, and that consecutive
    /// cells share an edge.
    pub fn is_valid_on(&self, grid: &Grid) -> bool {
        !self.cells.is_empty()
            && self
                .cells
                .iter()
                .all(|&p| grid.in_bounds(p) && !grid.is_barrier(p))
            && self
                .cells
                .iter()
                .tuple_windows()
                .all(|(a, b)| a.is_adjacent(b))
    }
}

impl IntoIterator for Path {
    type Item = Position;
    type IntoIter = std::vec::IntoIter<Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.cells.iter().join(" -> "))
    }
}

/// Walks the predecessor map back from `end`, marking each cell in between as
/// [CellState::Path] and reporting it to `on_step`, then restores the start and end
/// markers. Returns [None] if `on_step` asked to stop.
pub(crate) fn reconstruct_path<F>(
    came_from: &CameFrom,
    start: Position,
    end: Position,
    grid: &mut Grid,
    on_step: &mut F,
) -> Option<Path>
where
    F: FnMut(&Grid) -> ControlFlow<()>,
{
    let mut cells = vec![end];
    let mut current = end;
    while let Some(&previous) = came_from.get(&current) {
        current = previous;
        cells.push(current);
        if current == start {
            break;
        }
        grid.set_search_state(current, CellState::Path);
        if on_step(grid).is_break() {
            return None;
        }
    }
    grid.restore_endpoints(start, end);
    cells.reverse();
    Some(Path { cells })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn came_from(pairs: &[((usize, usize), (usize, usize))]) -> CameFrom {
        pairs
            .iter()
            .map(|&(a, b)| (Position::from(a), Position::from(b)))
            .collect()
    }

    #[test]
    fn marks_interior_and_restores_endpoints() {
        let mut grid = Grid::new(3, 90);
        let start = Position::new(0, 0);
        let end = Position::new(0, 2);
        grid.mark(start, CellState::Start).unwrap();
        grid.mark(end, CellState::End).unwrap();
        grid.set_search_state(end, CellState::Frontier);
        let map = came_from(&[((0, 1), (0, 0)), ((0, 2), (0, 1)), ((1, 0), (0, 0))]);
        let mut calls = 0;
        let path = reconstruct_path(&map, start, end, &mut grid, &mut |_: &Grid| {
            calls += 1;
            ControlFlow::Continue(())
        })
        .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(path.cells(), &[start, Position::new(0, 1), end]);
        assert_eq!(path.steps(), 2);
        assert_eq!(grid.state(Position::new(0, 1)), Some(CellState::Path));
        assert_eq!(grid.state(end), Some(CellState::End));
        assert_eq!(grid.state(start), Some(CellState::Start));
        assert!(path.is_valid_on(&grid));
    }

    #[test]
    fn stops_when_asked() {
        let mut grid = Grid::new(3, 90);
        let map = came_from(&[((0, 1), (0, 0)), ((1, 1), (0, 1)), ((2, 1), (1, 1))]);
        let path = reconstruct_path(
            &map,
            Position::new(0, 0),
            Position::new(2, 1),
            &mut grid,
            &mut |_: &Grid| ControlFlow::Break(()),
        );
        assert!(path.is_none());
        assert_eq!(grid.count(CellState::Path), 1);
    }

    #[test]
    fn rejects_disconnected_paths() {
        let grid = Grid::new(3, 90);
        let path = Path {
            cells: vec![Position::new(0, 0), Position::new(1, 1)],
        };
        assert!(!path.is_valid_on(&grid));
        assert_eq!(path.to_string(), "(0, 0) -> (1, 1)");
    }
}
