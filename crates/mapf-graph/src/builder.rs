//! Incremental grid construction.

use mapf_core::VertexId;

use crate::graph::{CellKind, Graph};
use crate::{GraphError, GraphResult};

// ── GridBuilder ───────────────────────────────────────────────────────────────

/// Construct a [`Graph`] cell by cell, then call [`build`](Self::build).
///
/// Every cell starts as [`CellKind::Free`].  Cell indices are `u32`, so
/// `width * height` must fit in one.
///
/// # Example
///
/// ```
/// use mapf_graph::{CellKind, GridBuilder};
///
/// let mut b = GridBuilder::new(3, 2).unwrap();
/// b.set(1, 0, CellKind::Obstacle).unwrap();
/// let g = b.build(false);
/// assert_eq!(g.size(), 5);
/// assert!(g.vertex_at(1, 0).is_none());
/// ```
pub struct GridBuilder {
    width:  u32,
    height: u32,
    cells:  Vec<CellKind>,
}

impl GridBuilder {
    pub fn new(width: u32, height: u32) -> GraphResult<Self> {
        let cells = width
            .checked_mul(height)
            .ok_or(GraphError::TooLarge { width, height })?;
        Ok(Self { width, height, cells: vec![CellKind::Free; cells as usize] })
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    pub fn set(&mut self, x: u32, y: u32, kind: CellKind) -> GraphResult<()> {
        if x >= self.width || y >= self.height {
            return Err(GraphError::OutOfBounds { x, y, width: self.width, height: self.height });
        }
        self.cells[(self.width * y + x) as usize] = kind;
        Ok(())
    }

    pub fn get(&self, x: u32, y: u32) -> Option<CellKind> {
        (x < self.width && y < self.height).then(|| self.cells[(self.width * y + x) as usize])
    }

    /// Consume the builder and produce a [`Graph`].
    ///
    /// With `isolate_cargo`, two storage cells (cargo shelves or cache
    /// blocks) are never adjacent, so shelves are only reachable from aisles.
    pub fn build(self, isolate_cargo: bool) -> Graph {
        let Self { width, height, cells } = self;

        // Number passable cells in row-major order.
        let mut cell_vertex = vec![VertexId::INVALID; cells.len()];
        let mut vertex_cell = Vec::new();
        let mut vertex_kind = Vec::new();
        let mut unloading_ports = Vec::new();
        let mut cache_blocks    = Vec::new();
        let mut cargo_vertices  = Vec::new();

        for (cell, &kind) in cells.iter().enumerate() {
            if !kind.is_passable() {
                continue;
            }
            let v = VertexId(vertex_cell.len() as u32);
            cell_vertex[cell] = v;
            vertex_cell.push(cell as u32);
            vertex_kind.push(kind);
            match kind {
                CellKind::UnloadingPort => unloading_ports.push(v),
                CellKind::CacheBlock    => cache_blocks.push(v),
                CellKind::Cargo         => cargo_vertices.push(v),
                CellKind::Free | CellKind::Obstacle => {}
            }
        }

        let at = |x: u32, y: u32| cell_vertex[(width * y + x) as usize];

        // Build CSR arrays; neighbor order is left, right, up, down.
        let mut neighbor_start = Vec::with_capacity(vertex_cell.len() + 1);
        let mut adjacency      = Vec::with_capacity(vertex_cell.len() * 4);
        neighbor_start.push(0u32);

        for (v, &cell) in vertex_cell.iter().enumerate() {
            let (x, y) = (cell % width, cell / width);
            let storage = vertex_kind[v].is_storage();

            let mut candidates = [VertexId::INVALID; 4];
            if x > 0 {
                candidates[0] = at(x - 1, y);
            }
            if x + 1 < width {
                candidates[1] = at(x + 1, y);
            }
            if y + 1 < height {
                candidates[2] = at(x, y + 1);
            }
            if y > 0 {
                candidates[3] = at(x, y - 1);
            }

            for u in candidates {
                if u == VertexId::INVALID {
                    continue;
                }
                if isolate_cargo && storage && vertex_kind[u.index()].is_storage() {
                    continue;
                }
                adjacency.push(u);
            }
            neighbor_start.push(adjacency.len() as u32);
        }

        log::debug!(
            "built {}x{} grid: {} vertices, {} edges, {} ports, {} cache blocks, {} cargo",
            width,
            height,
            vertex_cell.len(),
            adjacency.len() / 2,
            unloading_ports.len(),
            cache_blocks.len(),
            cargo_vertices.len(),
        );

        Graph {
            width,
            height,
            vertex_cell,
            vertex_kind,
            cell_vertex,
            neighbor_start,
            adjacency,
            unloading_ports,
            cache_blocks,
            cargo_vertices,
        }
    }
}
