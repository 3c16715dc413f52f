use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use mapf_core::{Configuration, GoalCondition, Solution};
use mapf_graph::load_map;
use mapf_instance::Instance;
use mapf_output::{append_row, check_feasibility, save_result_log, LifelongRow, LogHeader, SolutionStats};
use mapf_planner::PlanReport;
use mapf_warehouse::{run_lifelong, CacheKind, EpisodeObserver, WarehouseConfig};

use super::{resident_mib, PlannerArgs};

#[derive(clap::Args, Debug)]
pub struct Lifelong {
    #[command(flatten)]
    planner: PlannerArgs,

    /// Cache policy: none, lru, fifo or random.
    #[arg(long, default_value = "none")]
    cache: CacheKind,

    /// Deliveries to complete.
    #[arg(long, default_value_t = 100)]
    ngoals: usize,

    /// Distinct shelves allowed per request window.
    #[arg(long = "goals-k", default_value_t = 10)]
    goals_k: usize,

    /// Request window length.
    #[arg(long = "goals-m", default_value_t = 100)]
    goals_m: usize,

    #[arg(long, default_value_t = 10)]
    nagents: usize,

    /// Result log of the last episode.
    #[arg(long, default_value = "./result/step_result.txt")]
    output_step_result: PathBuf,

    /// CSV file collecting one row per run.
    #[arg(long, default_value = "./result/result.csv")]
    output_csv_result: PathBuf,

    #[arg(long, default_value_t = false)]
    log_short: bool,
}

/// Keeps the last episode for the step result log.
#[derive(Default)]
struct LastEpisode {
    starts:   Configuration,
    goals:    Configuration,
    solution: Solution,
    comp_ms:  f64,
}

impl EpisodeObserver for LastEpisode {
    fn on_episode(&mut self, episode: usize, ins: &Instance<'_>, report: &PlanReport) {
        log::info!(
            "episode {episode}: {} after {} iterations, {} frames",
            report.status,
            report.stats.loop_count,
            report.solution.len(),
        );
        self.starts = ins.starts.clone();
        self.goals = ins.goals.clone();
        self.solution = report.solution.clone();
        self.comp_ms = report.stats.elapsed_ms;
    }
}

impl Lifelong {
    pub fn run(self) -> Result<()> {
        let planner = self.planner.config()?;
        let config = WarehouseConfig {
            cache:   self.cache,
            ngoals:  self.ngoals,
            goals_k: self.goals_k,
            goals_m: self.goals_m,
            nagents: self.nagents,
            seed:    planner.seed,
        };
        let graph = load_map(&self.planner.map, config.cache.is_enabled())?;

        let mut last = LastEpisode::default();
        let report = run_lifelong(&graph, &config, &planner, &mut last)?;

        let ins = Instance::with_shared_goals(&graph, last.starts, last.goals)?;
        if let Err(e) = check_feasibility(&ins, &last.solution, GoalCondition::AnyAgent) {
            bail!("planner returned an infeasible episode: {e}");
        }
        let stats = SolutionStats::compute(&ins, &last.solution, last.comp_ms);
        log::info!("memory: {:.1} MiB resident", resident_mib());

        println!(
            "{} | steps: {}  delivered: {}/{}  cache hit rate: {:.3}  time: {:.1}ms",
            if report.completed { "completed" } else { "stopped" },
            report.total_steps,
            report.delivered,
            config.ngoals,
            report.cache_hit_rate,
            report.comp_time_ms,
        );

        for path in [&self.output_step_result, &self.output_csv_result] {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            }
        }
        let header = LogHeader { map_file: &self.planner.map, seed: config.seed, short: self.log_short };
        save_result_log(&self.output_step_result, &ins, &last.solution, &stats, &header)?;

        let map_name = self
            .planner
            .map
            .file_name()
            .map_or_else(|| self.planner.map.display().to_string(), |n| n.to_string_lossy().into_owned());
        append_row(&self.output_csv_result, &LifelongRow::from_report(&map_name, &config, &report))?;
        Ok(())
    }
}
