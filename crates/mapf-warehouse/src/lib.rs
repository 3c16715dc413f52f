//! `mapf-warehouse` — life-long cargo delivery on top of `mapf-planner`.
//!
//! Agents repeatedly fetch cargo from shelves and deliver it to an unloading
//! port, optionally staging it in a cache next to the ports.  Each planning
//! episode ends as soon as any agent reaches its current goal; task states
//! then advance and the next episode starts from where the agents stopped.
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`cache`]    | `Cache`, `CacheBlock`, `CacheKind`                    |
//! | [`goals`]    | `GoalGenerator` (windowed request stream)             |
//! | [`lifelong`] | `Warehouse`, `WarehouseConfig`, `run_lifelong`        |
//! | [`observer`] | `EpisodeObserver`, `NoopObserver`                     |
//! | [`error`]    | `CacheError`, `WarehouseError`                        |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `serde`    | `Serialize`/`Deserialize` for `CacheKind` and config.  |
//! | `parallel` | Forwarded to `mapf-planner`.                           |

pub mod cache;
pub mod error;
pub mod goals;
pub mod lifelong;
pub mod observer;

#[cfg(test)]
mod tests;

pub use cache::{Cache, CacheBlock, CacheKind};
pub use error::{CacheError, CacheResult, WarehouseError, WarehouseResult};
pub use goals::GoalGenerator;
pub use lifelong::{run_lifelong, LifelongReport, TaskStatus, Warehouse, WarehouseConfig};
pub use observer::{EpisodeObserver, NoopObserver};
