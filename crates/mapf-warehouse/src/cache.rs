//! Cargo cache next to the unloading ports.
//!
//! # Block life cycle
//!
//! ```text
//!            try_insert_cache                update_cargo_into_cache
//!  empty ───────────────────▶ reserved ──────────────────────────▶ stored
//!  stored (victim, unlocked) ─┘  (coming = cargo, insert_lock)        │
//!                                                                    │ try_cache_cargo
//!                                                                    ▼
//!                                       update_cargo_from_cache ◀── locked (get_lock > 0)
//! ```
//!
//! A reserved block forgets its previous cargo immediately, so no agent is
//! ever sent to fetch cargo that is about to be overwritten.  Blocks with
//! any lock are never chosen as victims.
//!
//! | Policy   | Victim among unlocked stored blocks          |
//! |----------|----------------------------------------------|
//! | `Lru`    | smallest last-use stamp (hits refresh it)    |
//! | `Fifo`   | smallest insertion stamp                     |
//! | `Random` | uniform                                      |

use std::fmt;
use std::str::FromStr;

use mapf_core::{PlannerRng, VertexId};

use crate::{CacheError, CacheResult};

// ── CacheKind ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CacheKind {
    /// No cache: every query misses.
    #[default]
    None,
    Lru,
    Fifo,
    Random,
}

impl CacheKind {
    pub fn is_enabled(self) -> bool {
        self != CacheKind::None
    }
}

impl FromStr for CacheKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none"   => Ok(CacheKind::None),
            "lru"    => Ok(CacheKind::Lru),
            "fifo"   => Ok(CacheKind::Fifo),
            "random" => Ok(CacheKind::Random),
            _ => Err(CacheError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CacheKind::None   => "NONE",
            CacheKind::Lru    => "LRU",
            CacheKind::Fifo   => "FIFO",
            CacheKind::Random => "RANDOM",
        };
        f.write_str(s)
    }
}

// ── CacheBlock ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct CacheBlock {
    pub vertex:      VertexId,
    /// Cargo currently stored.
    pub cargo:       Option<VertexId>,
    /// Cargo an agent is bringing in.
    pub coming:      Option<VertexId>,
    /// Agents on their way to fetch `cargo`.
    pub get_lock:    u32,
    pub insert_lock: u32,
    pub lru:         u64,
    pub fifo:        u64,
}

impl CacheBlock {
    fn new(vertex: VertexId) -> Self {
        Self { vertex, cargo: None, coming: None, get_lock: 0, insert_lock: 0, lru: 0, fifo: 0 }
    }

    pub fn is_free(&self) -> bool {
        self.cargo.is_none() && self.coming.is_none()
    }

    pub fn is_locked(&self) -> bool {
        self.get_lock > 0 || self.insert_lock > 0
    }
}

// ── Cache ─────────────────────────────────────────────────────────────────────

pub struct Cache {
    kind:   CacheKind,
    blocks: Vec<CacheBlock>,
    /// Monotonic stamp source for `lru` and `fifo`.
    clock:  u64,
    rng:    PlannerRng,
}

impl Cache {
    /// One block per cache-block vertex.
    pub fn new(kind: CacheKind, block_vertices: &[VertexId], rng: PlannerRng) -> CacheResult<Self> {
        if !kind.is_enabled() {
            return Err(CacheError::NoPolicy);
        }
        if block_vertices.is_empty() {
            return Err(CacheError::NoBlocks);
        }
        let blocks = block_vertices.iter().map(|&v| CacheBlock::new(v)).collect();
        Ok(Self { kind, blocks, clock: 0, rng })
    }

    pub fn kind(&self) -> CacheKind {
        self.kind
    }

    pub fn blocks(&self) -> &[CacheBlock] {
        &self.blocks
    }

    /// `true` if `cargo` is stored (not merely on its way in).
    pub fn contains(&self, cargo: VertexId) -> bool {
        self.stored_index(cargo).is_some()
    }

    pub fn is_coming(&self, cargo: VertexId) -> bool {
        self.blocks.iter().any(|b| b.coming == Some(cargo))
    }

    /// On a hit, lock the block for fetching and return it.
    pub fn try_cache_cargo(&mut self, cargo: VertexId) -> Option<VertexId> {
        let Some(i) = self.stored_index(cargo) else {
            log::debug!("cache miss: cargo {cargo}");
            return None;
        };
        let stamp = self.tick();
        let block = &mut self.blocks[i];
        block.get_lock += 1;
        block.lru = stamp;
        log::debug!("cache hit: cargo {cargo} at {}", block.vertex);
        Some(block.vertex)
    }

    /// Reserve a block for `cargo`, evicting if needed.  `None` when the
    /// cargo is already stored or coming, or every block is locked.
    pub fn try_insert_cache(&mut self, cargo: VertexId) -> Option<VertexId> {
        if self.contains(cargo) || self.is_coming(cargo) {
            return None;
        }

        let i = match self.blocks.iter().position(CacheBlock::is_free) {
            Some(i) => i,
            None => self.pick_victim()?,
        };

        let stamp = self.tick();
        let block = &mut self.blocks[i];
        if let Some(old) = block.cargo.take() {
            log::debug!("evict cargo {old} from {}", block.vertex);
        }
        block.coming = Some(cargo);
        block.insert_lock += 1;
        block.lru = stamp;
        block.fifo = stamp;
        log::debug!("reserve {} for cargo {cargo}", block.vertex);
        Some(block.vertex)
    }

    /// Commit a reservation made by [`try_insert_cache`](Self::try_insert_cache).
    pub fn update_cargo_into_cache(&mut self, cargo: VertexId, block: VertexId) -> CacheResult<()> {
        let i = self.block_index(block)?;
        let b = &mut self.blocks[i];
        if b.coming != Some(cargo) || b.insert_lock == 0 {
            return Err(CacheError::NotReserved { cargo, block });
        }
        b.cargo = Some(cargo);
        b.coming = None;
        b.insert_lock -= 1;
        log::debug!("stored cargo {cargo} at {block}");
        Ok(())
    }

    /// Release one fetch lock taken by [`try_cache_cargo`](Self::try_cache_cargo).
    pub fn update_cargo_from_cache(&mut self, cargo: VertexId, block: VertexId) -> CacheResult<()> {
        let i = self.block_index(block)?;
        let b = &mut self.blocks[i];
        if b.cargo != Some(cargo) || b.get_lock == 0 {
            return Err(CacheError::NotLocked { cargo, block });
        }
        b.get_lock -= 1;
        log::debug!("fetched cargo {cargo} from {block}");
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn stored_index(&self, cargo: VertexId) -> Option<usize> {
        self.blocks.iter().position(|b| b.cargo == Some(cargo))
    }

    fn block_index(&self, block: VertexId) -> CacheResult<usize> {
        self.blocks
            .iter()
            .position(|b| b.vertex == block)
            .ok_or(CacheError::UnknownBlock(block))
    }

    fn pick_victim(&mut self) -> Option<usize> {
        let unlocked = self.blocks.iter().enumerate().filter(|(_, b)| !b.is_locked());
        match self.kind {
            CacheKind::Lru => unlocked.min_by_key(|(_, b)| b.lru).map(|(i, _)| i),
            CacheKind::Fifo => unlocked.min_by_key(|(_, b)| b.fifo).map(|(i, _)| i),
            CacheKind::Random => {
                let candidates: Vec<usize> = unlocked.map(|(i, _)| i).collect();
                self.rng.choose(&candidates).copied()
            }
            CacheKind::None => None,
        }
    }
}
