//! Error types for mapf-output.

use thiserror::Error;

use mapf_core::AgentId;

/// Errors that can occur when writing results.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;

/// First rule a solution breaks.  Times are frame indices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Infeasibility {
    #[error("first frame differs from the starts")]
    WrongStart,

    #[error("last frame does not satisfy the goal condition")]
    GoalNotReached,

    #[error("frame {t} has {found} agents, expected {expected}")]
    WrongWidth { t: usize, found: usize, expected: usize },

    #[error("{agent} jumps between non-adjacent vertices at t={t}")]
    InvalidMove { agent: AgentId, t: usize },

    #[error("{a} and {b} share a vertex at t={t}")]
    VertexConflict { a: AgentId, b: AgentId, t: usize },

    #[error("{a} and {b} swap vertices at t={t}")]
    SwapConflict { a: AgentId, b: AgentId, t: usize },
}
