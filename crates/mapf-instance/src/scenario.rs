//! MovingAI scenario loader.
//!
//! # Format
//!
//! A `version` line followed by one tab-separated row per agent:
//!
//! ```text
//! version 1
//! 0	random-32-32-10.map	32	32	5	3	20	17	25.4
//! ```
//!
//! | Column | Meaning                        |
//! |--------|--------------------------------|
//! | 1      | bucket                         |
//! | 2      | map file name                  |
//! | 3, 4   | map width, height              |
//! | 5, 6   | start `x`, `y`                 |
//! | 7, 8   | goal `x`, `y`                  |
//! | 9      | optimal length (octile)        |
//!
//! Rows whose start or goal lies on an obstacle are skipped.  Loading stops
//! once `n` agents have been read.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use mapf_core::{Configuration, VertexId};
use mapf_graph::Graph;

use crate::{Instance, InstanceError, InstanceResult};

// ── Scenario record ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[allow(dead_code)]
struct ScenarioRecord {
    bucket:     u32,
    map:        String,
    map_width:  u32,
    map_height: u32,
    start_x:    u32,
    start_y:    u32,
    goal_x:     u32,
    goal_y:     u32,
    optimal:    f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the first `n` usable agents of a scenario file.
pub fn load_scenario<'g>(graph: &'g Graph, path: &Path, n: usize) -> InstanceResult<Instance<'g>> {
    let file = std::fs::File::open(path)?;
    let ins = parse_scenario(graph, file, n)?;
    log::info!("loaded scenario {}: {} agents", path.display(), ins.num_agents());
    Ok(ins)
}

/// Like [`load_scenario`] but accepts any `Read` source.
pub fn parse_scenario<'g, R: Read>(graph: &'g Graph, reader: R, n: usize) -> InstanceResult<Instance<'g>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut starts: Vec<VertexId> = Vec::with_capacity(n);
    let mut goals:  Vec<VertexId> = Vec::with_capacity(n);

    for result in csv_reader.records() {
        if starts.len() == n {
            break;
        }
        let record = result?;
        let first = record.get(0).unwrap_or("").trim();
        if first.is_empty() || first.starts_with("version") {
            continue;
        }
        let row: ScenarioRecord = record
            .deserialize(None)
            .map_err(|e| InstanceError::Parse(e.to_string()))?;

        let s = graph.vertex_at(row.start_x, row.start_y);
        let g = graph.vertex_at(row.goal_x, row.goal_y);
        match (s, g) {
            (Some(s), Some(g)) => {
                starts.push(s);
                goals.push(g);
            }
            _ => log::warn!(
                "skipping scenario row ({}, {}) -> ({}, {}): blocked cell",
                row.start_x,
                row.start_y,
                row.goal_x,
                row.goal_y,
            ),
        }
    }

    if starts.len() < n {
        return Err(InstanceError::NotEnoughAgents { requested: n, available: starts.len() });
    }

    Instance::new(graph, Configuration::new(starts), Configuration::new(goals))
}
