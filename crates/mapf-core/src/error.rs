//! Workspace error type.
//!
//! Sub-crates define their own error enums and convert `MapfError` into them
//! via `#[from]`, or keep them separate.  Both patterns are acceptable; prefer
//! whichever keeps error sites clean.

use thiserror::Error;

use crate::{AgentId, VertexId};

/// The top-level error type for `mapf-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum MapfError {
    #[error("agent {agent} refers to {vertex}, graph has {vertex_count} vertices")]
    VertexOutOfRange {
        agent:        AgentId,
        vertex:       VertexId,
        vertex_count: usize,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `mapf-core`.
pub type MapfResult<T> = Result<T, MapfError>;
