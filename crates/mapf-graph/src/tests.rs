//! Unit tests for mapf-graph.
//!
//! All tests use hand-written ASCII maps so they run without asset files.

#[cfg(test)]
mod helpers {
    use crate::{parse_map, Graph};

    /// ```text
    /// y=0  . . . .
    /// y=1  . @ @ .
    /// y=2  . . . .
    /// ```
    pub const RING: &str = "type octile\nheight 3\nwidth 4\nmap\n....\n.@@.\n....\n";

    /// Warehouse strip: two shelves side by side, a cache block and a port.
    ///
    /// ```text
    /// y=0  U . . .
    /// y=1  . H H C
    /// y=2  . . . .
    /// ```
    pub const STRIP: &str = "type octile\nheight 3\nwidth 4\nmap\nU...\n.HHC\n....\n";

    pub fn ring() -> Graph {
        parse_map(RING.as_bytes(), false).unwrap()
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use mapf_core::VertexId;

    use crate::{CellKind, GraphError, GridBuilder};

    #[test]
    fn open_grid_counts() {
        let g = GridBuilder::new(3, 3).unwrap().build(false);
        assert_eq!(g.size(), 9);
        // 2 * (3 * 2) horizontal + vertical edges
        assert_eq!(g.edge_count(), 12);
    }

    #[test]
    fn ids_follow_row_major_order() {
        let mut b = GridBuilder::new(3, 2).unwrap();
        b.set(0, 0, CellKind::Obstacle).unwrap();
        let g = b.build(false);
        assert_eq!(g.vertex_at(1, 0), Some(VertexId(0)));
        assert_eq!(g.vertex_at(0, 1), Some(VertexId(2)));
        assert_eq!(g.xy(VertexId(2)), (0, 1));
        assert_eq!(g.cell(VertexId(2)), 3);
    }

    #[test]
    fn neighbor_order_left_right_up_down() {
        let g = GridBuilder::new(3, 3).unwrap().build(false);
        let center = g.vertex_at(1, 1).unwrap();
        let expect = [
            g.vertex_at(0, 1).unwrap(),
            g.vertex_at(2, 1).unwrap(),
            g.vertex_at(1, 2).unwrap(),
            g.vertex_at(1, 0).unwrap(),
        ];
        assert_eq!(g.neighbors(center), &expect);
    }

    #[test]
    fn out_of_bounds_set_errors() {
        let mut b = GridBuilder::new(2, 2).unwrap();
        assert!(matches!(b.set(2, 0, CellKind::Free), Err(GraphError::OutOfBounds { .. })));
        assert_eq!(b.get(5, 5), None);
    }

    #[test]
    fn oversized_grid_is_rejected() {
        assert!(matches!(
            GridBuilder::new(70_000, 70_000),
            Err(GraphError::TooLarge { width: 70_000, height: 70_000 })
        ));
    }

    #[test]
    fn adjacency_is_symmetric() {
        let g = super::helpers::ring();
        for u in g.vertices() {
            for &v in g.neighbors(u) {
                assert!(g.is_adjacent(v, u), "{u} -> {v} without reverse edge");
            }
        }
    }
}

// ── Map parsing ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod map_file {
    use crate::{parse_map, CellKind, GraphError};

    use super::helpers::{RING, STRIP};

    #[test]
    fn parses_ring() {
        let g = parse_map(RING.as_bytes(), false).unwrap();
        assert_eq!((g.width, g.height), (4, 3));
        assert_eq!(g.size(), 10);
        assert!(g.vertex_at(1, 1).is_none());
        assert!(g.vertex_at(2, 1).is_none());
        assert_eq!(g.degree(g.vertex_at(0, 0).unwrap()), 2);
    }

    #[test]
    fn crlf_is_accepted() {
        let crlf = RING.replace('\n', "\r\n");
        let g = parse_map(crlf.as_bytes(), false).unwrap();
        assert_eq!(g.size(), 10);
    }

    #[test]
    fn warehouse_annotations() {
        let g = parse_map(STRIP.as_bytes(), false).unwrap();
        assert_eq!(g.unloading_ports, vec![g.vertex_at(0, 0).unwrap()]);
        assert_eq!(g.cache_blocks, vec![g.vertex_at(3, 1).unwrap()]);
        assert_eq!(
            g.cargo_vertices,
            vec![g.vertex_at(1, 1).unwrap(), g.vertex_at(2, 1).unwrap()],
        );
        assert_eq!(g.kind(g.vertex_at(3, 1).unwrap()), CellKind::CacheBlock);
    }

    #[test]
    fn isolation_cuts_shelf_to_shelf_edges() {
        let open = parse_map(STRIP.as_bytes(), false).unwrap();
        let iso = parse_map(STRIP.as_bytes(), true).unwrap();
        let h1 = iso.vertex_at(1, 1).unwrap();
        let h2 = iso.vertex_at(2, 1).unwrap();
        let c = iso.vertex_at(3, 1).unwrap();

        assert!(open.is_adjacent(h1, h2));
        assert!(!iso.is_adjacent(h1, h2));
        assert!(!iso.is_adjacent(h2, c));
        // Aisles still reach the shelves.
        assert!(iso.is_adjacent(h1, iso.vertex_at(1, 0).unwrap()));
        assert!(iso.is_adjacent(iso.vertex_at(1, 2).unwrap(), h1));
    }

    #[test]
    fn short_row_is_rejected() {
        let bad = "type octile\nheight 2\nwidth 3\nmap\n...\n..\n";
        assert!(matches!(parse_map(bad.as_bytes(), false), Err(GraphError::Parse { .. })));
    }

    #[test]
    fn missing_rows_are_rejected() {
        let bad = "type octile\nheight 3\nwidth 2\nmap\n..\n..\n";
        assert!(matches!(parse_map(bad.as_bytes(), false), Err(GraphError::Parse { .. })));
    }

    #[test]
    fn missing_header_is_rejected() {
        let bad = "type octile\nmap\n..\n";
        assert!(matches!(parse_map(bad.as_bytes(), false), Err(GraphError::Parse { .. })));
    }

    #[test]
    fn oversized_header_is_rejected() {
        let bad = "type octile\nheight 70000\nwidth 70000\nmap\n...\n";
        assert!(matches!(parse_map(bad.as_bytes(), false), Err(GraphError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = crate::load_map("/nonexistent/lacam.map", false);
        assert!(matches!(err, Err(GraphError::Io(_))));
    }
}
