//! Grid graph representation.
//!
//! # Data layout
//!
//! Only passable cells become vertices.  Vertex ids are dense (`0..size()`)
//! and assigned in row-major cell order, so `VertexId` order matches the
//! order cells appear in a map file.
//!
//! Adjacency uses **Compressed Sparse Row (CSR)** format.  The neighbors of
//! `VertexId v` occupy the slice:
//!
//! ```text
//! adjacency[ neighbor_start[v] .. neighbor_start[v+1] ]
//! ```
//!
//! Within a vertex the order is fixed: left, right, up (`y+1`), down
//! (`y-1`).  Planners rely on this order being stable for deterministic
//! tie-breaking.

use mapf_core::VertexId;

// ── CellKind ──────────────────────────────────────────────────────────────────

/// What a grid cell holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    /// Not a vertex.
    Obstacle,
    /// Plain aisle.
    #[default]
    Free,
    /// Where agents drop off delivered cargo.
    UnloadingPort,
    /// Staging slot of the warehouse cache.
    CacheBlock,
    /// Storage shelf holding one cargo type.
    Cargo,
}

impl CellKind {
    /// Map-file character to cell kind.  Unknown characters are passable.
    pub fn from_char(c: char) -> Self {
        match c {
            'T' | '@' => CellKind::Obstacle,
            'U' => CellKind::UnloadingPort,
            'C' => CellKind::CacheBlock,
            'H' => CellKind::Cargo,
            _ => CellKind::Free,
        }
    }

    #[inline]
    pub fn is_passable(self) -> bool {
        self != CellKind::Obstacle
    }

    /// Shelf-like cells; isolated from each other in cache mode.
    #[inline]
    pub fn is_storage(self) -> bool {
        matches!(self, CellKind::CacheBlock | CellKind::Cargo)
    }
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// Undirected 4-connected grid graph in CSR format.
///
/// Immutable after construction; use [`GridBuilder`](crate::GridBuilder) or
/// [`load_map`](crate::load_map).  Shared by reference between planners on
/// different threads.
pub struct Graph {
    pub width:  u32,
    pub height: u32,

    // ── Vertex data ───────────────────────────────────────────────────────
    /// Raw cell index (`width * y + x`) of each vertex.  Indexed by `VertexId`.
    pub vertex_cell: Vec<u32>,

    /// Cell kind of each vertex.  Never `Obstacle`.
    pub vertex_kind: Vec<CellKind>,

    /// Cell index → vertex, `VertexId::INVALID` for obstacles.
    pub(crate) cell_vertex: Vec<VertexId>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Length = `size() + 1`.
    pub neighbor_start: Vec<u32>,
    pub adjacency:      Vec<VertexId>,

    // ── Warehouse annotations (ascending vertex order) ────────────────────
    pub unloading_ports: Vec<VertexId>,
    pub cache_blocks:    Vec<VertexId>,
    pub cargo_vertices:  Vec<VertexId>,
}

impl Graph {
    /// Number of vertices, `|V|`.
    #[inline]
    pub fn size(&self) -> usize {
        self.vertex_cell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_cell.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.len() / 2
    }

    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        v.index() < self.size()
    }

    /// Passable neighbors of `v` in left, right, up, down order.
    #[inline]
    pub fn neighbors(&self, v: VertexId) -> &[VertexId] {
        let start = self.neighbor_start[v.index()] as usize;
        let end   = self.neighbor_start[v.index() + 1] as usize;
        &self.adjacency[start..end]
    }

    #[inline]
    pub fn degree(&self, v: VertexId) -> usize {
        self.neighbors(v).len()
    }

    #[inline]
    pub fn is_adjacent(&self, u: VertexId, v: VertexId) -> bool {
        self.neighbors(u).contains(&v)
    }

    /// Raw cell index `width * y + x`.
    #[inline]
    pub fn cell(&self, v: VertexId) -> u32 {
        self.vertex_cell[v.index()]
    }

    #[inline]
    pub fn kind(&self, v: VertexId) -> CellKind {
        self.vertex_kind[v.index()]
    }

    /// Grid coordinates `(x, y)` of `v`.
    #[inline]
    pub fn xy(&self, v: VertexId) -> (u32, u32) {
        let cell = self.cell(v);
        (cell % self.width, cell / self.width)
    }

    /// The vertex at `(x, y)`, or `None` for obstacles and out-of-grid cells.
    pub fn vertex_at(&self, x: u32, y: u32) -> Option<VertexId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let v = self.cell_vertex[(self.width * y + x) as usize];
        (v != VertexId::INVALID).then_some(v)
    }

    /// Iterator over all vertex ids.
    pub fn vertices(&self) -> impl DoubleEndedIterator<Item = VertexId> + ExactSizeIterator + '_ {
        (0..self.size() as u32).map(VertexId)
    }
}
