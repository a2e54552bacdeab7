use core::fmt;
use std::str::FromStr;

use itertools::iproduct;
use log::debug;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::cell::{Cell, CellState, Position};
use crate::error::{GridError, ParseGridError};
use crate::NEIGHBOR_ORDER;

/// Caller-side geometry. The search never reads the pixel width; it only exists so a
/// renderer can place cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridConfig {
    pub rows: usize,
    pub pixel_width: u32,
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        GridConfig {
            rows: 50,
            pixel_width: 800,
        }
    }
}

/// [Grid] owns a square, row-major block of [Cell]s. Besides cell states it keeps the
/// adjacency of every cell as a [u8] mask (one bit per [Direction](crate::Direction))
/// and the connected components of the free cells in a [UnionFind]. Both are derived
/// from the barrier layout and only recomputed by [refresh_adjacency](Self::refresh_adjacency).
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    pixel_width: u32,
    cells: Vec<Cell>,
    neighbours: Vec<u8>,
    components: UnionFind<usize>,
    adjacency_dirty: bool,
    start: Option<Position>,
    end: Option<Position>,
}

impl Default for Grid {
    fn default() -> Grid {
        Grid::from_config(&GridConfig::default())
    }
}

impl Grid {
    /// Builds a `rows`x`rows` grid of free cells with up to date adjacency.
    pub fn new(rows: usize, pixel_width: u32) -> Grid {
        let cells = iproduct!(0..rows, 0..rows)
            .map(|(row, col)| Cell::new(Position::new(row, col)))
            .collect::<Vec<Cell>>();
        let mut grid = Grid {
            rows,
            pixel_width,
            neighbours: vec![0; cells.len()],
            components: UnionFind::new(cells.len()),
            cells,
            adjacency_dirty: true,
            start: None,
            end: None,
        };
        grid.refresh_adjacency();
        grid
    }

    pub fn from_config(config: &GridConfig) -> Grid {
        Grid::new(config.rows, config.pixel_width)
    }

    /// Number of cells per side.
    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn pixel_width(&self) -> u32 {
        self.pixel_width
    }
    /// Side length of a single cell in pixels.
    pub fn cell_width(&self) -> u32 {
        u32::try_from(self.rows)
            .ok()
            .and_then(|rows| self.pixel_width.checked_div(rows))
            .unwrap_or(0)
    }
    pub fn start(&self) -> Option<Position> {
        self.start
    }
    pub fn end(&self) -> Option<Position> {
        self.end
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.rows
    }
    fn ix(&self, pos: Position) -> usize {
        pos.row * self.rows + pos.col
    }
    fn checked_ix(&self, pos: Position) -> Result<usize, GridError> {
        if self.in_bounds(pos) {
            Ok(self.ix(pos))
        } else {
            Err(GridError::OutOfBounds {
                position: pos,
                rows: self.rows,
            })
        }
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.in_bounds(pos).then(|| &self.cells[self.ix(pos)])
    }
    pub fn state(&self, pos: Position) -> Option<CellState> {
        self.cell(pos).map(Cell::state)
    }
    pub fn is_barrier(&self, pos: Position) -> bool {
        self.cell(pos).is_some_and(Cell::is_barrier)
    }
    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
    /// Number of cells currently in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state == state).count()
    }

    /// Sets a caller-owned state on a cell. Marking a new Start or End releases the
    /// previous one back to Free, so at most one of each exists.
    pub fn mark(&mut self, pos: Position, state: CellState) -> Result<(), GridError> {
        self.checked_ix(pos)?;
        if state.is_search_mark() {
            return Err(GridError::EngineOwnedState(state));
        }
        let conflict = match state {
            CellState::Start => self.end == Some(pos),
            CellState::End => self.start == Some(pos),
            CellState::Barrier => self.start == Some(pos) || self.end == Some(pos),
            _ => false,
        };
        if conflict {
            return Err(GridError::EndpointConflict(pos));
        }
        self.assign(pos, state);
        Ok(())
    }

    /// Returns a cell to Free, releasing the Start or End marker it may hold.
    pub fn reset(&mut self, pos: Position) -> Result<(), GridError> {
        self.mark(pos, CellState::Free)
    }

    /// Places the next marker on a cell: the start if there is none, then the end, then
    /// barriers. Placing onto an existing start or end does nothing. Returns the state
    /// the cell ends up in.
    pub fn place(&mut self, pos: Position) -> Result<CellState, GridError> {
        let ix = self.checked_ix(pos)?;
        if self.start.is_none() && self.end != Some(pos) {
            self.assign(pos, CellState::Start);
        } else if self.end.is_none() && self.start != Some(pos) {
            self.assign(pos, CellState::End);
        } else if self.start != Some(pos) && self.end != Some(pos) {
            self.assign(pos, CellState::Barrier);
        }
        Ok(self.cells[ix].state)
    }

    pub fn erase(&mut self, pos: Position) -> Result<(), GridError> {
        self.reset(pos)
    }

    /// Discards every cell and starts over with a free grid of the same geometry.
    pub fn clear(&mut self) {
        *self = Grid::new(self.rows, self.pixel_width);
    }

    /// Reverts Visited, Frontier and Path cells to Free and restores the Start and End
    /// markers, leaving barriers alone.
    pub fn clear_search_marks(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.state.is_search_mark() {
                cell.state = CellState::Free;
            }
        }
        if let Some(start) = self.start {
            let ix = self.ix(start);
            self.cells[ix].state = CellState::Start;
        }
        if let Some(end) = self.end {
            let ix = self.ix(end);
            self.cells[ix].state = CellState::End;
        }
    }

    /// Writes a state while keeping the marker bookkeeping and the dirty flag in sync.
    fn assign(&mut self, pos: Position, state: CellState) {
        let ix = self.ix(pos);
        let previous = self.cells[ix].state;
        if self.start == Some(pos) {
            self.start = None;
        }
        if self.end == Some(pos) {
            self.end = None;
        }
        let released = match state {
            CellState::Start => self.start.replace(pos),
            CellState::End => self.end.replace(pos),
            _ => None,
        };
        if let Some(old) = released {
            let old_ix = self.ix(old);
            self.cells[old_ix].state = CellState::Free;
        }
        if (previous == CellState::Barrier) != (state == CellState::Barrier) {
            self.adjacency_dirty = true;
        }
        self.cells[ix].state = state;
    }

    /// Used by the engine for Frontier, Visited and Path marks.
    pub(crate) fn set_search_state(&mut self, pos: Position, state: CellState) {
        debug_assert!(state.is_search_mark());
        let ix = self.ix(pos);
        self.cells[ix].state = state;
    }

    /// Re-marks both endpoints after a path was traced over them. When they coincide
    /// only the Start marker moves; an End marker elsewhere is kept.
    pub(crate) fn restore_endpoints(&mut self, start: Position, end: Position) {
        if start != end {
            self.assign(end, CellState::End);
        }
        self.assign(start, CellState::Start);
    }

    /// True when barriers changed after the last [refresh_adjacency](Self::refresh_adjacency).
    pub fn is_adjacency_stale(&self) -> bool {
        self.adjacency_dirty
    }

    /// Recomputes the neighbour mask of every cell and the connected components. Needs
    /// to run after barrier edits and before searching.
    pub fn refresh_adjacency(&mut self) {
        debug!("Refreshing adjacency of {}x{} grid", self.rows, self.rows);
        for ix in 0..self.cells.len() {
            let pos = self.cells[ix].position();
            let mask = NEIGHBOR_ORDER
                .iter()
                .filter(|&&dir| {
                    pos.step(dir, self.rows)
                        .is_some_and(|n| !self.is_barrier(n))
                })
                .fold(0, |mask, dir| mask | dir.bit());
            self.neighbours[ix] = mask;
        }
        self.generate_components();
        self.adjacency_dirty = false;
    }

    /// Generates a new [UnionFind] structure and links up free neighbours to the same components.
    fn generate_components(&mut self) {
        debug!("Generating connected components");
        self.components = UnionFind::new(self.cells.len());
        for ix in 0..self.cells.len() {
            if self.cells[ix].is_barrier() {
                continue;
            }
            let pos = self.cells[ix].position();
            // Down and Right are enough, the other two links are made from the neighbour.
            for n in [Position::new(pos.row + 1, pos.col), Position::new(pos.row, pos.col + 1)] {
                if self.in_bounds(n) && !self.is_barrier(n) {
                    let n_ix = self.ix(n);
                    self.components.union(ix, n_ix);
                }
            }
        }
    }

    /// Free neighbours of a cell in [NEIGHBOR_ORDER], as of the last adjacency refresh.
    pub fn neighbors_of(&self, pos: Position) -> SmallVec<[Position; 4]> {
        if !self.in_bounds(pos) {
            return SmallVec::new();
        }
        let mask = self.neighbours[self.ix(pos)];
        NEIGHBOR_ORDER
            .iter()
            .filter(|dir| mask & dir.bit() != 0)
            .filter_map(|&dir| pos.step(dir, self.rows))
            .collect()
    }

    /// Retrieves the component id a given [Position] belongs to.
    pub fn get_component(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| self.components.find(self.ix(pos)))
    }

    /// Checks if `a` and `b` are free cells on the same connected component.
    pub fn reachable(&self, a: Position, b: Position) -> bool {
        if !self.in_bounds(a) || !self.in_bounds(b) || self.is_barrier(a) || self.is_barrier(b)
        {
            return false;
        }
        self.components.equiv(self.ix(a), self.ix(b))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.rows == 0 {
            return Ok(());
        }
        for row in self.cells.chunks(self.rows) {
            let line = row.iter().map(|c| c.state.symbol()).collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Parses the text form written by [Display](fmt::Display): one line per row using
/// `.` free, `#` barrier, `S` start and `E` end. Blank lines and indentation are ignored.
impl FromStr for Grid {
    type Err = ParseGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<&str>>();
        if lines.is_empty() {
            return Err(ParseGridError::Empty);
        }
        let rows = lines.len();
        let mut grid = Grid::new(rows, GridConfig::default().pixel_width);
        for (row, line) in lines.iter().enumerate() {
            let len = line.chars().count();
            if len != rows {
                return Err(ParseGridError::NotSquare {
                    line: row,
                    len,
                    expected: rows,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                let pos = Position::new(row, col);
                let state = match symbol {
                    '.' => continue,
                    '#' => CellState::Barrier,
                    'S' if grid.start.is_some() => {
                        return Err(ParseGridError::DuplicateStart(pos))
                    }
                    'S' => CellState::Start,
                    'E' if grid.end.is_some() => return Err(ParseGridError::DuplicateEnd(pos)),
                    'E' => CellState::End,
                    _ => {
                        return Err(ParseGridError::UnknownSymbol {
                            line: row,
                            column: col,
                            symbol,
                        })
                    }
                };
                grid.assign(pos, state);
            }
        }
        grid.refresh_adjacency();
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_is_free_and_square() {
        let grid = Grid::new(4, 800);
        assert_eq!(grid.cells().count(), 16);
        assert_eq!(grid.count(CellState::Free), 16);
        assert_eq!(grid.cell_width(), 200);
        assert!(!grid.is_adjacency_stale());
        let cell = grid.cell(Position::new(2, 3)).unwrap();
        assert_eq!((cell.row(), cell.col()), (2, 3));
        assert!(grid.cell(Position::new(4, 0)).is_none());
    }

    #[test]
    fn neighbour_order_is_down_up_right_left() {
        let grid = Grid::new(3, 90);
        let n = grid.neighbors_of(Position::new(1, 1));
        assert_eq!(
            n.as_slice(),
            &[
                Position::new(2, 1),
                Position::new(0, 1),
                Position::new(1, 2),
                Position::new(1, 0)
            ]
        );
        assert_eq!(grid.neighbors_of(Position::new(0, 0)).len(), 2);
    }

    #[test]
    fn barriers_need_refresh_to_drop_out() {
        let mut grid = Grid::new(3, 90);
        grid.mark(Position::new(2, 1), CellState::Barrier).unwrap();
        assert!(grid.is_adjacency_stale());
        // Still the old relation until refreshed.
        assert_eq!(grid.neighbors_of(Position::new(1, 1)).len(), 4);
        grid.refresh_adjacency();
        assert!(!grid.is_adjacency_stale());
        let n = grid.neighbors_of(Position::new(1, 1));
        assert_eq!(n.len(), 3);
        assert!(!n.contains(&Position::new(2, 1)));
    }

    #[test]
    fn single_start_and_end() {
        let mut grid = Grid::new(3, 90);
        let a = Position::new(0, 0);
        let b = Position::new(0, 1);
        grid.mark(a, CellState::Start).unwrap();
        grid.mark(b, CellState::Start).unwrap();
        assert_eq!(grid.start(), Some(b));
        assert_eq!(grid.state(a), Some(CellState::Free));
        assert_eq!(grid.count(CellState::Start), 1);
        assert_eq!(
            grid.mark(b, CellState::End),
            Err(GridError::EndpointConflict(b))
        );
        assert_eq!(
            grid.mark(b, CellState::Barrier),
            Err(GridError::EndpointConflict(b))
        );
        assert_eq!(
            grid.mark(a, CellState::Path),
            Err(GridError::EngineOwnedState(CellState::Path))
        );
        grid.reset(b).unwrap();
        assert_eq!(grid.start(), None);
    }

    #[test]
    fn place_follows_start_end_barrier_order() {
        let mut grid = Grid::new(3, 90);
        let s = Position::new(0, 0);
        let e = Position::new(2, 2);
        let w = Position::new(1, 1);
        assert_eq!(grid.place(s), Ok(CellState::Start));
        assert_eq!(grid.place(s), Ok(CellState::Start));
        assert_eq!(grid.place(e), Ok(CellState::End));
        assert_eq!(grid.place(w), Ok(CellState::Barrier));
        assert_eq!(grid.place(e), Ok(CellState::End));
        grid.erase(s).unwrap();
        assert_eq!(grid.start(), None);
        // Next placement becomes the start again.
        assert_eq!(grid.place(Position::new(0, 2)), Ok(CellState::Start));
        assert!(matches!(
            grid.place(Position::new(3, 0)),
            Err(GridError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn clear_rebuilds_grid() {
        let mut grid: Grid = "S#.\n.#.\n..E".parse().unwrap();
        grid.clear();
        assert_eq!(grid.count(CellState::Free), 9);
        assert_eq!(grid.start(), None);
        assert_eq!(grid.end(), None);
        assert!(!grid.is_adjacency_stale());
    }

    /// Tests whether cells are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // |.#.|
        // |.#.|
        // |.#.|
        let grid: Grid = ".#.\n.#.\n.#.".parse().unwrap();
        let left = Position::new(0, 0);
        assert!(grid.reachable(left, Position::new(2, 0)));
        assert!(!grid.reachable(left, Position::new(0, 2)));
        assert!(!grid.reachable(left, Position::new(0, 1)));
        assert_eq!(
            grid.get_component(Position::new(1, 2)),
            grid.get_component(Position::new(2, 2))
        );
    }

    #[test]
    fn parse_and_display_round_trip() {
        let text = "S..\n.#.\n..E\n";
        let grid: Grid = text.parse().unwrap();
        assert_eq!(grid.start(), Some(Position::new(0, 0)));
        assert_eq!(grid.end(), Some(Position::new(2, 2)));
        assert_eq!(grid.to_string(), text);
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Grid>().unwrap_err(), ParseGridError::Empty);
        assert_eq!(
            "..\n...".parse::<Grid>().unwrap_err(),
            ParseGridError::NotSquare {
                line: 1,
                len: 3,
                expected: 2
            }
        );
        assert_eq!(
            "S.\nS.".parse::<Grid>().unwrap_err(),
            ParseGridError::DuplicateStart(Position::new(1, 0))
        );
        assert!(matches!(
            ".?\n..".parse::<Grid>().unwrap_err(),
            ParseGridError::UnknownSymbol { symbol: '?', .. }
        ));
    }

    #[test]
    fn clearing_search_marks_restores_endpoints() {
        let mut grid: Grid = "S.\n.E".parse().unwrap();
        let end = Position::new(1, 1);
        grid.set_search_state(end, CellState::Frontier);
        grid.set_search_state(Position::new(0, 1), CellState::Visited);
        grid.clear_search_marks();
        assert_eq!(grid.state(end), Some(CellState::End));
        assert_eq!(grid.state(Position::new(0, 1)), Some(CellState::Free));
    }
}
