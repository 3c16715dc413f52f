//! Independent randomised restarts.
//!
//! Restart `r` gets its own planner seeded with
//! [`PlannerRng::for_restart`]`(seed, r)`.  Restart 0 keeps the configured
//! behaviour (deterministic unless `randomize` is set); later restarts are
//! always randomised, otherwise they would repeat restart 0 exactly.
//!
//! With the `parallel` feature the restarts run on a Rayon pool sized by
//! `num_threads`.  Either way the winner is the lowest-index solved run, so
//! the result does not depend on thread scheduling.

use mapf_core::{Deadline, PlannerConfig, PlannerRng};
use mapf_instance::Instance;

use crate::planner::{PlanReport, Planner};

/// Run `config.restarts` planners sharing one deadline.
pub fn solve_portfolio(ins: &Instance<'_>, deadline: Deadline, config: &PlannerConfig) -> PlanReport {
    let restarts = config.restarts.max(1);
    let run_one = |r: usize| {
        let rng = (config.randomize || r > 0).then(|| PlannerRng::for_restart(config.seed, r as u64));
        Planner::with_rng(ins, deadline, config.goal, rng).run()
    };

    let reports = run_all(restarts, config.num_threads, run_one);
    pick_winner(reports)
}

#[cfg(not(feature = "parallel"))]
fn run_all<F>(restarts: usize, _num_threads: Option<usize>, run_one: F) -> Vec<PlanReport>
where
    F: Fn(usize) -> PlanReport,
{
    let mut reports = Vec::with_capacity(restarts);
    for r in 0..restarts {
        let report = run_one(r);
        let solved = report.is_solved();
        reports.push(report);
        // Later restarts cannot beat an earlier solved one.
        if solved {
            break;
        }
    }
    reports
}

#[cfg(feature = "parallel")]
fn run_all<F>(restarts: usize, num_threads: Option<usize>, run_one: F) -> Vec<PlanReport>
where
    F: Fn(usize) -> PlanReport + Sync,
{
    use rayon::prelude::*;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = num_threads {
        builder = builder.num_threads(n);
    }
    match builder.build() {
        Ok(pool) => pool.install(|| (0..restarts).into_par_iter().map(&run_one).collect()),
        Err(e) => {
            log::warn!("thread pool unavailable ({e}); running restarts sequentially");
            (0..restarts).map(run_one).collect()
        }
    }
}

fn pick_winner(mut reports: Vec<PlanReport>) -> PlanReport {
    let winner = reports.iter().position(PlanReport::is_solved).unwrap_or(0);
    log::debug!("portfolio: {} runs, winner #{winner}", reports.len());
    reports.swap_remove(winner)
}
