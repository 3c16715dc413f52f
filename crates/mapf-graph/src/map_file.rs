//! MovingAI `.map` loading.
//!
//! # Format
//!
//! ```text
//! type octile
//! height 4
//! width 5
//! map
//! .....
//! .@@..
//! .....
//! U..HH
//! ```
//!
//! Row `k` after the `map` line is `y = k`.  See [`CellKind::from_char`] for
//! the cell alphabet.  CRLF line endings are accepted.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::builder::GridBuilder;
use crate::graph::{CellKind, Graph};
use crate::{GraphError, GraphResult};

/// Load a map file from disk.
pub fn load_map(path: impl AsRef<Path>, isolate_cargo: bool) -> GraphResult<Graph> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let graph = parse_map(BufReader::new(file), isolate_cargo)?;
    log::info!(
        "loaded map {}: {}x{}, {} vertices",
        path.display(),
        graph.width,
        graph.height,
        graph.size(),
    );
    Ok(graph)
}

/// Parse a map from any buffered reader (a `&[u8]` works for literals).
pub fn parse_map<R: BufRead>(reader: R, isolate_cargo: bool) -> GraphResult<Graph> {
    let mut lines = reader.lines().enumerate();

    let mut width:  Option<u32> = None;
    let mut height: Option<u32> = None;
    let mut saw_map = false;

    // ── Header ────────────────────────────────────────────────────────────
    for (lineno, line) in lines.by_ref() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("height"), Some(n)) => height = Some(parse_dim(n, lineno)?),
            (Some("width"), Some(n))  => width = Some(parse_dim(n, lineno)?),
            (Some("map"), None) => {
                saw_map = true;
                break;
            }
            _ => {}
        }
    }

    let (Some(width), Some(height)) = (width, height) else {
        return Err(GraphError::Parse { line: 0, msg: "missing width or height".into() });
    };
    if !saw_map {
        return Err(GraphError::Parse { line: 0, msg: "missing `map` line".into() });
    }

    if width.checked_mul(height).is_none() {
        return Err(GraphError::Parse {
            line: 0,
            msg:  format!("{width}x{height} map is too large"),
        });
    }

    // ── Cells ─────────────────────────────────────────────────────────────
    let mut builder = GridBuilder::new(width, height)?;
    let mut y = 0;
    for (lineno, line) in lines {
        if y == height {
            break;
        }
        let line = line?;
        let row: Vec<char> = line.trim_end_matches('\r').chars().collect();
        if row.len() < width as usize {
            return Err(GraphError::Parse {
                line: lineno + 1,
                msg:  format!("row has {} cells, expected {}", row.len(), width),
            });
        }
        for (x, &c) in row.iter().take(width as usize).enumerate() {
            builder.set(x as u32, y, CellKind::from_char(c))?;
        }
        y += 1;
    }

    if y < height {
        return Err(GraphError::Parse {
            line: 0,
            msg:  format!("map has {y} rows, expected {height}"),
        });
    }

    Ok(builder.build(isolate_cargo))
}

fn parse_dim(s: &str, lineno: usize) -> GraphResult<u32> {
    s.parse().map_err(|_| GraphError::Parse {
        line: lineno + 1,
        msg:  format!("invalid dimension `{s}`"),
    })
}
