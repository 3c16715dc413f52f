use thiserror::Error;

use mapf_core::{AgentId, MapfError};

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("{starts} starts but {goals} goals")]
    LengthMismatch { starts: usize, goals: usize },

    #[error("{first} and {second} share a start vertex")]
    DuplicateStart { first: AgentId, second: AgentId },

    #[error("{first} and {second} share a goal vertex")]
    DuplicateGoal { first: AgentId, second: AgentId },

    #[error("cell ({x}, {y}) is blocked or outside the grid")]
    BlockedCell { x: u32, y: u32 },

    #[error("requested {requested} agents, only {available} available")]
    NotEnoughAgents { requested: usize, available: usize },

    #[error("scenario parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] MapfError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type InstanceResult<T> = Result<T, InstanceError>;
