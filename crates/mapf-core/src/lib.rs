//! `mapf-core` — foundational types for the lacam-rs MAPF workspace.
//!
//! This crate is a dependency of every other `mapf-*` crate.  It intentionally
//! has no `mapf-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module            | Contents                                              |
//! |-------------------|-------------------------------------------------------|
//! | [`ids`]           | `AgentId`, `VertexId`                                 |
//! | [`configuration`] | `Configuration`, `Solution`                           |
//! | [`time`]          | `Deadline`, `PlannerConfig`, `GoalCondition`          |
//! | [`rng`]           | `PlannerRng`                                          |
//! | [`error`]         | `MapfError`, `MapfResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, configurations and  |
//! |         | `PlannerConfig`.                                           |

pub mod configuration;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use configuration::{Configuration, Solution};
pub use error::{MapfError, MapfResult};
pub use ids::{AgentId, VertexId};
pub use rng::PlannerRng;
pub use time::{Deadline, GoalCondition, PlannerConfig};
