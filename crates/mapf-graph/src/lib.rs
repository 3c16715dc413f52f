//! `mapf-graph` — grid graph, builder, and map loading.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`graph`]    | `Graph` (CSR adjacency over passable cells), `CellKind`   |
//! | [`builder`]  | `GridBuilder`                                             |
//! | [`map_file`] | MovingAI `.map` parsing (`load_map`, `parse_map`)         |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `CellKind`.             |

pub mod builder;
pub mod error;
pub mod graph;
pub mod map_file;

#[cfg(test)]
mod tests;

pub use builder::GridBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{CellKind, Graph};
pub use map_file::{load_map, parse_map};
