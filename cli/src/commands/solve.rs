use std::path::PathBuf;

use anyhow::{bail, Result};

use mapf_core::GoalCondition;
use mapf_graph::load_map;
use mapf_instance::load_scenario;
use mapf_output::{check_feasibility, save_result_log, LogHeader, SolutionStats};
use mapf_planner::solve_portfolio;

use super::{resident_mib, PlannerArgs};

#[derive(clap::Args, Debug)]
pub struct Solve {
    #[command(flatten)]
    planner: PlannerArgs,

    /// Path to the MovingAI scenario file.
    #[arg(short = 'i', long)]
    scen: PathBuf,

    /// Number of agents (first N scenario rows).
    #[arg(short = 'N', long = "num")]
    agents: usize,

    /// Result log path.
    #[arg(short, long, default_value = "result.txt")]
    output: PathBuf,

    /// Omit starts, goals and the solution from the result log.
    #[arg(long, default_value_t = false)]
    log_short: bool,
}

impl Solve {
    pub fn run(self) -> Result<()> {
        let config = self.planner.config()?;
        let graph = load_map(&self.planner.map, false)?;
        let ins = load_scenario(&graph, &self.scen, self.agents)?;

        let deadline = config.make_deadline();
        let report = solve_portfolio(&ins, deadline, &config);
        let comp_time_ms = deadline.elapsed_ms();

        if !report.is_solved() {
            log::warn!("failed to solve: {}", report.status);
        }
        if let Err(e) = check_feasibility(&ins, &report.solution, GoalCondition::AllAgents) {
            bail!("planner returned an infeasible solution: {e}");
        }

        let stats = SolutionStats::compute(&ins, &report.solution, comp_time_ms);
        println!("{stats}");
        log::info!("memory: {:.1} MiB resident", resident_mib());

        let header = LogHeader { map_file: &self.planner.map, seed: config.seed, short: self.log_short };
        save_result_log(&self.output, &ins, &report.solution, &stats, &header)?;
        Ok(())
    }
}
