//! Plain-text result log read by the visualiser.
//!
//! ```text
//! agents=2
//! map_file=random-32-32-10.map
//! solver=planner
//! solved=1
//! soc=..  soc_lb=..  makespan=..  makespan_lb=..  sum_of_loss=..  sum_of_loss_lb=..
//! comp_time=..
//! seed=0
//! starts=(x,y),(x,y),
//! goals=(x,y),(x,y),
//! solution=
//! 0:(x,y),(x,y),
//! 1:(x,y),(x,y),
//! ```
//!
//! With `short` the log stops after `seed=`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use mapf_core::{Configuration, Solution};
use mapf_graph::Graph;
use mapf_instance::Instance;

use crate::{OutputResult, SolutionStats};

/// Everything the log records besides the instance and solution.
pub struct LogHeader<'a> {
    pub map_file: &'a Path,
    pub seed:     u64,
    pub short:    bool,
}

pub fn write_result_log<W: Write>(
    mut out: W,
    ins: &Instance<'_>,
    solution: &Solution,
    stats: &SolutionStats,
    header: &LogHeader<'_>,
) -> OutputResult<()> {
    let map_name = header
        .map_file
        .file_name()
        .map_or_else(|| header.map_file.to_string_lossy(), |n| n.to_string_lossy());

    writeln!(out, "agents={}", stats.agents)?;
    writeln!(out, "map_file={map_name}")?;
    writeln!(out, "solver=planner")?;
    writeln!(out, "solved={}", u8::from(stats.solved))?;
    writeln!(out, "soc={}", stats.soc)?;
    writeln!(out, "soc_lb={}", stats.soc_lb)?;
    writeln!(out, "makespan={}", stats.makespan)?;
    writeln!(out, "makespan_lb={}", stats.makespan_lb)?;
    writeln!(out, "sum_of_loss={}", stats.sum_of_loss)?;
    writeln!(out, "sum_of_loss_lb={}", stats.soc_lb)?;
    writeln!(out, "comp_time={}", stats.comp_time_ms)?;
    writeln!(out, "seed={}", header.seed)?;
    if header.short {
        return Ok(out.flush()?);
    }

    write!(out, "starts=")?;
    write_coords(&mut out, ins.graph, &ins.starts)?;
    write!(out, "\ngoals=")?;
    write_coords(&mut out, ins.graph, &ins.goals)?;
    writeln!(out, "\nsolution=")?;
    for (t, config) in solution.iter().enumerate() {
        write!(out, "{t}:")?;
        write_coords(&mut out, ins.graph, config)?;
        writeln!(out)?;
    }
    Ok(out.flush()?)
}

/// [`write_result_log`] into a new file at `path`.
pub fn save_result_log(
    path: &Path,
    ins: &Instance<'_>,
    solution: &Solution,
    stats: &SolutionStats,
    header: &LogHeader<'_>,
) -> OutputResult<()> {
    let out = BufWriter::new(File::create(path)?);
    write_result_log(out, ins, solution, stats, header)?;
    log::info!("result log written to {}", path.display());
    Ok(())
}

fn write_coords<W: Write>(out: &mut W, graph: &Graph, config: &Configuration) -> OutputResult<()> {
    for (_, v) in config.iter() {
        let (x, y) = graph.xy(v);
        write!(out, "({x},{y}),")?;
    }
    Ok(())
}
