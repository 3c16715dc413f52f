//! Summary rows for one-shot and life-long runs.

use std::fmt;

use serde::Serialize;

use mapf_core::Solution;
use mapf_instance::Instance;
use mapf_planner::DistTable;
use mapf_warehouse::{LifelongReport, WarehouseConfig};

use crate::metrics;

/// Costs and bounds of one solved (or failed) instance.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SolutionStats {
    pub agents:         usize,
    pub solved:         bool,
    pub makespan:       usize,
    pub makespan_lb:    u32,
    pub soc:            usize,
    pub soc_lb:         u64,
    pub sum_of_loss:    usize,
    pub comp_time_ms:   f64,
}

impl SolutionStats {
    /// Empty `solution` means unsolved; bounds are still computed.
    pub fn compute(ins: &Instance<'_>, solution: &Solution, comp_time_ms: f64) -> Self {
        let mut dist = DistTable::new(ins.graph, &ins.goals);
        Self {
            agents: ins.num_agents(),
            solved: !solution.is_empty(),
            makespan: metrics::makespan(solution),
            makespan_lb: metrics::makespan_lower_bound(ins, &mut dist),
            soc: metrics::sum_of_costs(solution),
            soc_lb: metrics::sum_of_costs_lower_bound(ins, &mut dist),
            sum_of_loss: metrics::sum_of_loss(solution),
            comp_time_ms,
        }
    }

    /// `value / lb` rounded up to two decimals; 0 for a zero bound.
    fn ratio(value: f64, lb: f64) -> f64 {
        if lb == 0.0 { 0.0 } else { (value / lb * 100.0).ceil() / 100.0 }
    }
}

impl fmt::Display for SolutionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.solved {
            return write!(f, "failed: {:.1}ms", self.comp_time_ms);
        }
        let soc_lb = self.soc_lb as f64;
        write!(
            f,
            "solved: {:.1}ms  makespan: {} (lb={}, ub={})  sum_of_costs: {} (lb={}, ub={})  \
             sum_of_loss: {} (lb={}, ub={})",
            self.comp_time_ms,
            self.makespan,
            self.makespan_lb,
            Self::ratio(self.makespan as f64, f64::from(self.makespan_lb)),
            self.soc,
            self.soc_lb,
            Self::ratio(self.soc as f64, soc_lb),
            self.sum_of_loss,
            self.soc_lb,
            Self::ratio(self.sum_of_loss as f64, soc_lb),
        )
    }
}

/// One CSV line per life-long run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LifelongRow {
    pub map_name:       String,
    pub cache:          String,
    pub nagents:        usize,
    pub ngoals:         usize,
    pub goals_k:        usize,
    pub goals_m:        usize,
    pub seed:           u64,
    pub completed:      bool,
    pub total_steps:    usize,
    pub delivered:      usize,
    pub cache_hit_rate: f64,
    pub comp_time_ms:   f64,
    pub p0:             u64,
    pub p25:            u64,
    pub p50:            u64,
    pub p75:            u64,
    pub p90:            u64,
    pub p95:            u64,
    pub p99:            u64,
    pub p100:           u64,
}

impl LifelongRow {
    pub fn from_report(map_name: &str, config: &WarehouseConfig, report: &LifelongReport) -> Self {
        let p = metrics::percentiles(&report.delivery_steps);
        let get = |i: usize| p.get(i).copied().unwrap_or(0);
        Self {
            map_name:       map_name.to_string(),
            cache:          config.cache.to_string(),
            nagents:        config.nagents,
            ngoals:         config.ngoals,
            goals_k:        config.goals_k,
            goals_m:        config.goals_m,
            seed:           config.seed,
            completed:      report.completed,
            total_steps:    report.total_steps,
            delivered:      report.delivered,
            cache_hit_rate: report.cache_hit_rate,
            comp_time_ms:   report.comp_time_ms,
            p0:             get(0),
            p25:            get(1),
            p50:            get(2),
            p75:            get(3),
            p90:            get(4),
            p95:            get(5),
            p99:            get(6),
            p100:           get(7),
        }
    }
}
