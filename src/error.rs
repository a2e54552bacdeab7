use thiserror::Error;

use crate::cell::{CellState, Position};

/// Rejected grid edits.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("{position} lies outside the {rows}x{rows} grid")]
    OutOfBounds { position: Position, rows: usize },
    #[error("{0} holds the start or end marker")]
    EndpointConflict(Position),
    #[error("{0:?} is assigned by the search engine only")]
    EngineOwnedState(CellState),
}

/// Preconditions a search checks before touching any cell.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("no start cell has been placed")]
    MissingStart,
    #[error("no end cell has been placed")]
    MissingEnd,
    #[error("{position} lies outside the {rows}x{rows} grid")]
    OutOfBounds { position: Position, rows: usize },
    #[error("endpoint {0} is a barrier")]
    BarrierEndpoint(Position),
    #[error("barriers changed since adjacency was last refreshed")]
    StaleAdjacency,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseGridError {
    #[error("grid text contains no rows")]
    Empty,
    #[error("line {line} has {len} cells, expected {expected}")]
    NotSquare {
        line: usize,
        len: usize,
        expected: usize,
    },
    #[error("unknown symbol {symbol:?} at line {line}, column {column}")]
    UnknownSymbol {
        line: usize,
        column: usize,
        symbol: char,
    },
    #[error("second start marker at {0}")]
    DuplicateStart(Position),
    #[error("second end marker at {0}")]
    DuplicateEnd(Position),
}
