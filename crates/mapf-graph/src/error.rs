//! Graph-subsystem error type.

use thiserror::Error;

/// Errors produced by `mapf-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("map parse error at line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    #[error("{width}x{height} grid has more cells than a u32 can index")]
    TooLarge { width: u32, height: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
