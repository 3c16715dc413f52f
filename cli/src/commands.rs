use std::path::PathBuf;

use mapf_core::PlannerConfig;

mod lifelong;
pub use lifelong::*;

mod solve;
pub use solve::*;

/// All CLI commands available in this binary.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Solve one MAPF instance from a map and a scenario.
    #[command(alias = "s")]
    Solve(Solve),

    /// Run life-long warehouse delivery episodes.
    #[command(alias = "l")]
    Lifelong(Lifelong),
}

impl Command {
    pub fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Solve(args) => args.run(),
            Command::Lifelong(args) => args.run(),
        }
    }
}

/// Resident set size in MiB, 0 when the platform does not report it.
fn resident_mib() -> f64 {
    memory_stats::memory_stats()
        .map(|s| s.physical_mem as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0)
}

/// Planner flags shared by both commands.
#[derive(clap::Args, Debug)]
pub struct PlannerArgs {
    /// Master RNG seed.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Time limit per planning call, in seconds.
    #[arg(short = 't', long = "time-limit-sec", default_value_t = 10)]
    time_limit_sec: u64,

    /// Shuffle candidates and break PIBT ties at random.
    #[arg(long, default_value_t = false)]
    randomize: bool,

    /// Independent restarts raced against the same deadline.
    #[arg(long, default_value_t = 1)]
    restarts: usize,

    /// Worker threads for restarts (default: all cores).
    #[arg(long)]
    threads: Option<usize>,

    /// Path to the map file.
    #[arg(short, long)]
    map: PathBuf,
}

impl PlannerArgs {
    fn config(&self) -> anyhow::Result<PlannerConfig> {
        let config = PlannerConfig {
            time_limit_ms: Some(self.time_limit_sec.saturating_mul(1000)),
            seed: self.seed,
            randomize: self.randomize,
            restarts: self.restarts,
            num_threads: self.threads,
            ..PlannerConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}
