//! Solution checks and cost metrics.
//!
//! All metrics treat an empty solution as cost 0.  Per-agent costs ignore
//! trailing waits on the agent's final vertex.

use mapf_core::{AgentId, GoalCondition, Solution};
use mapf_instance::Instance;
use mapf_planner::DistTable;

use crate::Infeasibility;

/// Percentiles reported for life-long delivery times.
pub const PERCENTILES: [u32; 8] = [0, 25, 50, 75, 90, 95, 99, 100];

// ── Feasibility ───────────────────────────────────────────────────────────────

/// Check endpoints, moves and conflicts.  Empty solutions are feasible.
pub fn check_feasibility(
    ins: &Instance<'_>,
    solution: &Solution,
    goal: GoalCondition,
) -> Result<(), Infeasibility> {
    let (Some(first), Some(last)) = (solution.first(), solution.last()) else {
        return Ok(());
    };
    let n = ins.num_agents();

    if *first != ins.starts {
        return Err(Infeasibility::WrongStart);
    }
    if !ins.is_goal(last, goal) {
        return Err(Infeasibility::GoalNotReached);
    }

    for (t, frame) in solution.iter().enumerate() {
        if frame.len() != n {
            return Err(Infeasibility::WrongWidth { t, found: frame.len(), expected: n });
        }
        if t == 0 {
            continue;
        }
        let prev = &solution[t - 1];
        for i in AgentId::range(n) {
            let (from_i, to_i) = (prev[i], frame[i]);
            if from_i != to_i && !ins.graph.is_adjacent(from_i, to_i) {
                return Err(Infeasibility::InvalidMove { agent: i, t });
            }
            for j in AgentId::range(n).skip(i.index() + 1) {
                let (from_j, to_j) = (prev[j], frame[j]);
                if to_i == to_j {
                    return Err(Infeasibility::VertexConflict { a: i, b: j, t });
                }
                if to_j == from_i && from_j == to_i {
                    return Err(Infeasibility::SwapConflict { a: i, b: j, t });
                }
            }
        }
    }
    Ok(())
}

/// [`check_feasibility`] as a flag; the violation is logged.
pub fn is_feasible_solution(ins: &Instance<'_>, solution: &Solution, goal: GoalCondition) -> bool {
    match check_feasibility(ins, solution, goal) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("infeasible solution: {e}");
            false
        }
    }
}

// ── Costs ─────────────────────────────────────────────────────────────────────

pub fn makespan(solution: &Solution) -> usize {
    solution.len().saturating_sub(1)
}

/// Time of the agent's last arrival at its final vertex.
pub fn path_cost(solution: &Solution, agent: AgentId) -> usize {
    let Some(last) = solution.last() else { return 0 };
    let g = last[agent];
    let mut c = solution.len();
    while c > 0 && solution[c - 1][agent] == g {
        c -= 1;
    }
    c
}

pub fn sum_of_costs(solution: &Solution) -> usize {
    let n = solution.first().map_or(0, |c| c.len());
    AgentId::range(n).map(|i| path_cost(solution, i)).sum()
}

/// Transitions where the agent is not resting on its final vertex.
pub fn sum_of_loss(solution: &Solution) -> usize {
    let Some(last) = solution.last() else { return 0 };
    let mut c = 0;
    for (i, g) in last.iter() {
        c += solution
            .windows(2)
            .filter(|w| w[0][i] != g || w[1][i] != g)
            .count();
    }
    c
}

// ── Lower bounds ──────────────────────────────────────────────────────────────

/// Largest start-to-goal distance.
pub fn makespan_lower_bound(ins: &Instance<'_>, dist: &mut DistTable<'_>) -> u32 {
    ins.agents().map(|i| dist.get(i, ins.starts[i])).max().unwrap_or(0)
}

/// Sum of start-to-goal distances.  Also the lower bound for sum of loss.
pub fn sum_of_costs_lower_bound(ins: &Instance<'_>, dist: &mut DistTable<'_>) -> u64 {
    ins.agents().map(|i| u64::from(dist.get(i, ins.starts[i]))).sum()
}

// ── Percentiles ───────────────────────────────────────────────────────────────

/// Nearest-rank values at [`PERCENTILES`]; empty for no samples.
pub fn percentiles(samples: &[u64]) -> Vec<u64> {
    if samples.is_empty() {
        return Vec::new();
    }
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    PERCENTILES
        .iter()
        .map(|&p| sorted[(p as usize * n / 100).min(n - 1)])
        .collect()
}
