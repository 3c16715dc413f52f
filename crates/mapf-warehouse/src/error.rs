use thiserror::Error;

use mapf_core::VertexId;
use mapf_instance::InstanceError;

/// Misuse of the cargo cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("unknown cache kind `{0}` (expected none, lru, fifo or random)")]
    UnknownKind(String),

    #[error("cache kind `none` has no eviction policy")]
    NoPolicy,

    #[error("map has no cache blocks")]
    NoBlocks,

    #[error("{0} is not a cache block")]
    UnknownBlock(VertexId),

    #[error("cache block {block} is not reserved for cargo {cargo}")]
    NotReserved { cargo: VertexId, block: VertexId },

    #[error("cache block {block} holds no locked cargo {cargo}")]
    NotLocked { cargo: VertexId, block: VertexId },
}

pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("warehouse configuration error: {0}")]
    Config(String),

    #[error("map has no unloading port")]
    NoUnloadingPort,

    #[error("map has no cargo shelves")]
    NoCargo,

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("instance error: {0}")]
    Instance(#[from] InstanceError),
}

pub type WarehouseResult<T> = Result<T, WarehouseError>;
