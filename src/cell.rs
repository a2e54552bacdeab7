use core::fmt;

/// Row/column identity of a cell. Rows grow downwards, columns grow to the right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    /// [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) in grid steps.
    pub fn manhattan_distance(&self, other: &Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Whether the two positions share an edge.
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// The position one step in `dir`, if it stays inside a `rows`x`rows` grid.
    pub fn step(&self, dir: Direction, rows: usize) -> Option<Position> {
        let p = match dir {
            Direction::Down => Position::new(self.row + 1, self.col),
            Direction::Up => Position::new(self.row.checked_sub(1)?, self.col),
            Direction::Right => Position::new(self.row, self.col + 1),
            Direction::Left => Position::new(self.row, self.col.checked_sub(1)?),
        };
        (p.row < rows && p.col < rows).then_some(p)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position::new(row, col)
    }
}

/// The four cardinal moves. The discriminant is the bit used in adjacency masks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Down = 0,
    Up = 1,
    Right = 2,
    Left = 3,
}

impl Direction {
    pub fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Traversal state of a cell. Start, End and Barrier are set by callers; Frontier,
/// Visited and Path are set by the search engine while it runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Free,
    Barrier,
    Start,
    End,
    Visited,
    Frontier,
    Path,
}

impl CellState {
    /// Symbol used by the text rendering of a grid.
    pub fn symbol(self) -> char {
        match self {
            CellState::Free => '.',
            CellState::Barrier => '#',
            CellState::Start => 'S',
            CellState::End => 'E',
            CellState::Visited => 'x',
            CellState::Frontier => 'o',
            CellState::Path => '*',
        }
    }

    /// States only the search engine may assign.
    pub fn is_search_mark(self) -> bool {
        matches!(
            self,
            CellState::Visited | CellState::Frontier | CellState::Path
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    pub(crate) state: CellState,
}

impl Cell {
    pub(crate) fn new(position: Position) -> Cell {
        Cell {
            position,
            state: CellState::Free,
        }
    }
    pub fn position(&self) -> Position {
        self.position
    }
    pub fn row(&self) -> usize {
        self.position.row
    }
    pub fn col(&self) -> usize {
        self.position.col
    }
    pub fn state(&self) -> CellState {
        self.state
    }
    pub fn is_barrier(&self) -> bool {
        self.state == CellState::Barrier
    }
}
