//! `mapf-instance` — start/goal problems over a [`Graph`](mapf_graph::Graph).
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`instance`] | `Instance` (validated start and goal configurations)      |
//! | [`scenario`] | MovingAI `.scen` loading                                  |
//! | [`error`]    | `InstanceError`, `InstanceResult<T>`                      |

pub mod error;
pub mod instance;
pub mod scenario;


pub use error::{InstanceError, InstanceResult};
pub use instance::Instance;
pub use scenario::{load_scenario, parse_scenario};
