//! `mapf-planner` — LaCAM search over configurations with PIBT as the
//! successor generator.
//!
//! # Two-level search
//!
//! ```text
//! open ← [start]                       (DFS stack of search nodes)
//! loop:
//!   ① top   — peek; goal test; pop when its constraint queue is empty
//!   ② low   — take one constraint, queue its children (next agent × moves)
//!   ③ step  — PIBT completes the constraint into a full configuration
//!   ④ high  — known configuration → push its node again (graph search);
//!             otherwise create a child node and push it
//! ```
//!
//! The loop polls its [`Deadline`](mapf_core::Deadline) once per iteration.
//! Failure to plan is reported as a value ([`PlanStatus`]), never as an error.
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`dist_table`] | `DistTable` (lazy per-agent BFS)                      |
//! | [`constraint`] | `ConstraintArena`, `ConstraintNode`, `ConstraintId`   |
//! | [`node`]       | `SearchNode`, priority rules                          |
//! | [`pibt`]       | `StepResolver`                                        |
//! | [`planner`]    | `Planner`, `PlanReport`, `PlanStatus`, `solve`        |
//! | [`portfolio`]  | `solve_portfolio`                                     |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs portfolio restarts on Rayon's thread pool.        |

pub mod constraint;
pub mod dist_table;
pub mod node;
pub mod pibt;
pub mod planner;
pub mod portfolio;


pub use constraint::{ConstraintArena, ConstraintId, ConstraintNode};
pub use dist_table::DistTable;
pub use node::{SearchNode, SearchNodeId};
pub use pibt::StepResolver;
pub use planner::{solve, PlanReport, PlanStatus, Planner, SearchStats};
pub use portfolio::solve_portfolio;
