//! Unit tests for mapf-output.

#[cfg(test)]
mod helpers {
    use mapf_core::{Configuration, Solution, VertexId};
    use mapf_graph::{Graph, GridBuilder};

    /// 3×1 corridor: vertices 0 – 1 – 2.
    pub fn corridor() -> Graph {
        GridBuilder::new(3, 1).unwrap().build(false)
    }

    pub fn frames(rows: &[&[u32]]) -> Solution {
        rows.iter()
            .map(|r| Configuration::new(r.iter().map(|&v| VertexId(v)).collect()))
            .collect()
    }
}

// ── Feasibility ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod feasibility {
    use mapf_core::{AgentId, Configuration, GoalCondition, Solution, VertexId};
    use mapf_graph::GridBuilder;
    use mapf_instance::Instance;

    use super::helpers::{corridor, frames};
    use crate::{check_feasibility, is_feasible_solution, Infeasibility};

    fn cfg(v: &[u32]) -> Configuration {
        Configuration::new(v.iter().map(|&x| VertexId(x)).collect())
    }

    #[test]
    fn empty_solution_is_feasible() {
        let g = corridor();
        let ins = Instance::new(&g, cfg(&[0]), cfg(&[2])).unwrap();
        assert_eq!(check_feasibility(&ins, &Solution::new(), GoalCondition::AllAgents), Ok(()));
    }

    #[test]
    fn straight_walk_is_feasible() {
        let g = corridor();
        let ins = Instance::new(&g, cfg(&[0]), cfg(&[2])).unwrap();
        let sol = frames(&[&[0], &[1], &[2]]);
        assert!(is_feasible_solution(&ins, &sol, GoalCondition::AllAgents));
    }

    #[test]
    fn detects_each_violation() {
        let g = corridor();
        let ins = Instance::new(&g, cfg(&[0]), cfg(&[2])).unwrap();
        let all = GoalCondition::AllAgents;

        assert_eq!(
            check_feasibility(&ins, &frames(&[&[1], &[2]]), all),
            Err(Infeasibility::WrongStart)
        );
        assert_eq!(
            check_feasibility(&ins, &frames(&[&[0], &[1]]), all),
            Err(Infeasibility::GoalNotReached)
        );
        assert_eq!(
            check_feasibility(&ins, &frames(&[&[0], &[2]]), all),
            Err(Infeasibility::InvalidMove { agent: AgentId(0), t: 1 })
        );
    }

    #[test]
    fn detects_conflicts() {
        let g = corridor();
        let all = GoalCondition::AllAgents;

        let ins = Instance::new(&g, cfg(&[0, 1]), cfg(&[1, 0])).unwrap();
        assert_eq!(
            check_feasibility(&ins, &frames(&[&[0, 1], &[1, 0]]), all),
            Err(Infeasibility::SwapConflict { a: AgentId(0), b: AgentId(1), t: 1 })
        );

        let ins = Instance::new(&g, cfg(&[0, 2]), cfg(&[1, 2])).unwrap();
        assert_eq!(
            check_feasibility(&ins, &frames(&[&[0, 2], &[1, 1], &[1, 2]]), all),
            Err(Infeasibility::VertexConflict { a: AgentId(0), b: AgentId(1), t: 1 })
        );
    }

    #[test]
    fn any_agent_accepts_partial_arrival() {
        let g = GridBuilder::new(4, 1).unwrap().build(false);
        let ins = Instance::new(&g, cfg(&[0, 3]), cfg(&[1, 0])).unwrap();
        let sol = frames(&[&[0, 3], &[1, 2]]);
        assert_eq!(check_feasibility(&ins, &sol, GoalCondition::AnyAgent), Ok(()));
        assert_eq!(
            check_feasibility(&ins, &sol, GoalCondition::AllAgents),
            Err(Infeasibility::GoalNotReached)
        );
    }
}

// ── Metrics ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod metrics {
    use mapf_core::{AgentId, Configuration, Solution, VertexId};
    use mapf_graph::GridBuilder;
    use mapf_instance::Instance;
    use mapf_planner::DistTable;

    use super::helpers::frames;
    use crate::{
        makespan, makespan_lower_bound, path_cost, percentiles, sum_of_costs,
        sum_of_costs_lower_bound, sum_of_loss,
    };

    #[test]
    fn costs_ignore_trailing_waits() {
        // Agent 0 arrives at t=2, agent 1 waits at the start then arrives at t=3.
        let sol = frames(&[&[0, 5], &[1, 5], &[2, 4], &[2, 3]]);
        assert_eq!(makespan(&sol), 3);
        assert_eq!(path_cost(&sol, AgentId(0)), 2);
        assert_eq!(path_cost(&sol, AgentId(1)), 3);
        assert_eq!(sum_of_costs(&sol), 5);
    }

    #[test]
    fn loss_skips_resting_steps() {
        // Agent 0 leaves its final vertex and comes back: every step but the
        // last rest counts.
        let sol = frames(&[&[1], &[2], &[1], &[1]]);
        assert_eq!(path_cost(&sol, AgentId(0)), 2);
        assert_eq!(sum_of_loss(&sol), 2);

        // Waiting away from the final vertex counts as loss.
        let sol = frames(&[&[0], &[0], &[1]]);
        assert_eq!(sum_of_loss(&sol), 2);
    }

    #[test]
    fn empty_solution_costs_nothing() {
        let sol = Solution::new();
        assert_eq!(makespan(&sol), 0);
        assert_eq!(sum_of_costs(&sol), 0);
        assert_eq!(sum_of_loss(&sol), 0);
    }

    #[test]
    fn lower_bounds_from_distances() {
        let g = GridBuilder::new(5, 1).unwrap().build(false);
        let starts = Configuration::new(vec![VertexId(0), VertexId(4)]);
        let goals = Configuration::new(vec![VertexId(3), VertexId(2)]);
        let ins = Instance::new(&g, starts, goals).unwrap();
        let mut dist = DistTable::new(&g, &ins.goals);
        assert_eq!(makespan_lower_bound(&ins, &mut dist), 3);
        assert_eq!(sum_of_costs_lower_bound(&ins, &mut dist), 5);
    }

    #[test]
    fn nearest_rank_percentiles() {
        let samples: Vec<u64> = (1..=10).collect();
        assert_eq!(percentiles(&samples), vec![1, 3, 6, 8, 10, 10, 10, 10]);
        assert_eq!(percentiles(&[7]), vec![7; 8]);
        assert!(percentiles(&[]).is_empty());
    }
}

// ── Stats & result log ────────────────────────────────────────────────────────

#[cfg(test)]
mod result_log {
    use std::path::Path;

    use mapf_core::{Configuration, VertexId};
    use mapf_graph::GridBuilder;
    use mapf_instance::Instance;

    use super::helpers::frames;
    use crate::{save_result_log, write_result_log, LogHeader, SolutionStats};

    fn render(short: bool) -> String {
        // 3×2 grid, vertex = y * 3 + x.
        let g = GridBuilder::new(3, 2).unwrap().build(false);
        let ins = Instance::new(
            &g,
            Configuration::new(vec![VertexId(0)]),
            Configuration::new(vec![VertexId(5)]),
        )
        .unwrap();
        let sol = frames(&[&[0], &[1], &[2], &[5]]);
        let stats = SolutionStats::compute(&ins, &sol, 1.5);
        let header = LogHeader { map_file: Path::new("maps/tiny.map"), seed: 4, short };
        let mut buf = Vec::new();
        write_result_log(&mut buf, &ins, &sol, &stats, &header).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn stats_of_a_walk() {
        let g = GridBuilder::new(3, 2).unwrap().build(false);
        let ins = Instance::new(
            &g,
            Configuration::new(vec![VertexId(0)]),
            Configuration::new(vec![VertexId(5)]),
        )
        .unwrap();
        let stats = SolutionStats::compute(&ins, &frames(&[&[0], &[1], &[2], &[5]]), 0.0);
        assert!(stats.solved);
        assert_eq!((stats.makespan, stats.makespan_lb), (3, 3));
        assert_eq!((stats.soc, stats.soc_lb, stats.sum_of_loss), (3, 3, 3));
        assert!(stats.to_string().starts_with("solved"));

        let failed = SolutionStats::compute(&ins, &Vec::new(), 2.0);
        assert!(!failed.solved);
        assert_eq!(failed.soc_lb, 3);
    }

    #[test]
    fn full_log_layout() {
        let text = render(false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "agents=1");
        assert_eq!(lines[1], "map_file=tiny.map");
        assert_eq!(lines[2], "solver=planner");
        assert_eq!(lines[3], "solved=1");
        assert_eq!(lines[4], "soc=3");
        assert_eq!(lines[5], "soc_lb=3");
        assert_eq!(lines[6], "makespan=3");
        assert_eq!(lines[7], "makespan_lb=3");
        assert_eq!(lines[8], "sum_of_loss=3");
        assert_eq!(lines[9], "sum_of_loss_lb=3");
        assert_eq!(lines[10], "comp_time=1.5");
        assert_eq!(lines[11], "seed=4");
        assert_eq!(lines[12], "starts=(0,0),");
        assert_eq!(lines[13], "goals=(2,1),");
        assert_eq!(lines[14], "solution=");
        assert_eq!(&lines[15..], ["0:(0,0),", "1:(1,0),", "2:(2,0),", "3:(2,1),"]);
    }

    #[test]
    fn short_log_stops_after_seed() {
        let text = render(true);
        assert_eq!(text.lines().count(), 12);
        assert_eq!(text.lines().last(), Some("seed=4"));
    }

    #[test]
    fn saves_to_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("result.txt");
        let g = GridBuilder::new(2, 1).unwrap().build(false);
        let ins = Instance::new(
            &g,
            Configuration::new(vec![VertexId(0)]),
            Configuration::new(vec![VertexId(1)]),
        )
        .unwrap();
        let sol = frames(&[&[0], &[1]]);
        let stats = SolutionStats::compute(&ins, &sol, 0.0);
        let header = LogHeader { map_file: Path::new("two.map"), seed: 0, short: true };
        save_result_log(&path, &ins, &sol, &stats, &header).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("agents=1\nmap_file=two.map\n"));
    }
}

// ── CSV rows ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_rows {
    use mapf_warehouse::{CacheKind, LifelongReport, WarehouseConfig};
    use mapf_planner::PlanStatus;

    use crate::{append_row, LifelongRow};

    fn row() -> LifelongRow {
        let config = WarehouseConfig {
            cache:   CacheKind::Lru,
            ngoals:  4,
            goals_k: 2,
            goals_m: 3,
            nagents: 2,
            seed:    1,
        };
        let report = LifelongReport {
            completed:       true,
            last_status:     PlanStatus::Solved,
            episodes:        3,
            total_steps:     9,
            delivered:       4,
            cache_hit_rate:  0.5,
            delivery_steps:  vec![4, 2, 8, 6],
            episode_lengths: vec![3, 3, 3],
            solution:        Vec::new(),
            comp_time_ms:    1.0,
        };
        LifelongRow::from_report("warehouse.map", &config, &report)
    }

    #[test]
    fn row_carries_percentiles() {
        let r = row();
        assert_eq!(r.cache, "LRU");
        assert_eq!((r.p0, r.p25, r.p50, r.p75, r.p100), (2, 4, 6, 8, 8));
    }

    #[test]
    fn header_written_once() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("result.csv");
        append_row(&path, &row()).unwrap();
        append_row(&path, &row()).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers[0], "map_name");
        assert_eq!(headers.last().map(String::as_str), Some("p100"));
        let rows: Vec<_> = rdr.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "warehouse.map");
    }
}
