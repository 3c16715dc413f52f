//! The LaCAM outer loop.

use std::fmt;

use rustc_hash::FxHashMap;

use mapf_core::{
    AgentId, Configuration, Deadline, GoalCondition, PlannerConfig, PlannerRng, Solution, VertexId,
};
use mapf_instance::Instance;

use crate::constraint::{ConstraintArena, ConstraintId};
use crate::dist_table::DistTable;
use crate::node::{SearchNode, SearchNodeId};
use crate::pibt::StepResolver;

// ── Reports ───────────────────────────────────────────────────────────────────

/// How a planning call ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlanStatus {
    /// The goal test held for the top of the stack.
    Solved,
    /// The frontier emptied: no solution from this start.
    Exhausted,
    /// The deadline passed first.
    Expired,
    /// Rejected before search: some start cannot reach its goal.
    Unreachable,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlanStatus::Solved      => "solved",
            PlanStatus::Exhausted   => "exhausted",
            PlanStatus::Expired     => "expired",
            PlanStatus::Unreachable => "unreachable",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, Default)]
pub struct SearchStats {
    /// Outer-loop iterations.
    pub loop_count: u64,
    /// Constrained PIBT calls that produced a configuration.
    pub resolved:   u64,
    /// Resolutions that hit another explored node, which was pushed again.
    pub merged:     u64,
    /// Resolutions that reproduced the node being expanded.
    pub revisited:  u64,
    /// Distinct configurations discovered.
    pub explored:   usize,
    pub elapsed_ms: f64,
}

#[derive(Clone, Debug)]
pub struct PlanReport {
    pub status:   PlanStatus,
    /// Empty unless `status == Solved`.
    pub solution: Solution,
    pub stats:    SearchStats,
}

impl PlanReport {
    pub fn is_solved(&self) -> bool {
        self.status == PlanStatus::Solved
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

/// One planning episode over a frozen instance.
///
/// All scratch state is owned here and dropped with the planner, so
/// independent planners can run on different threads.
pub struct Planner<'a, 'g> {
    ins:         &'a Instance<'g>,
    deadline:    Deadline,
    goal:        GoalCondition,
    resolver:    StepResolver<'g>,
    constraints: ConstraintArena,
    nodes:       Vec<SearchNode>,
    explored:    FxHashMap<Configuration, SearchNodeId>,
    open:        Vec<SearchNodeId>,
}

impl<'a, 'g> Planner<'a, 'g> {
    pub fn new(ins: &'a Instance<'g>, deadline: Deadline, config: &PlannerConfig) -> Self {
        let rng = config.effective_seed().map(PlannerRng::new);
        Self::with_rng(ins, deadline, config.goal, rng)
    }

    /// Planner with an explicit RNG; `None` means deterministic search.
    pub fn with_rng(
        ins: &'a Instance<'g>,
        deadline: Deadline,
        goal: GoalCondition,
        rng: Option<PlannerRng>,
    ) -> Self {
        let dist = DistTable::new(ins.graph, &ins.goals);
        Self {
            ins,
            deadline,
            goal,
            resolver:    StepResolver::new(ins.graph, dist, ins.num_agents(), rng),
            constraints: ConstraintArena::new(),
            nodes:       Vec::new(),
            explored:    FxHashMap::default(),
            open:        Vec::new(),
        }
    }

    /// Search until solved, exhausted, or out of time.
    pub fn run(mut self) -> PlanReport {
        log::info!(
            "start search: {} agents, {} vertices, elapsed {:.1}ms",
            self.ins.num_agents(),
            self.ins.graph.size(),
            self.deadline.elapsed_ms(),
        );

        if let Some(agent) = self.unreachable_agent() {
            log::info!("{agent} cannot reach its goal; skipping search");
            return self.report(PlanStatus::Unreachable, Solution::new(), SearchStats::default());
        }

        let root = SearchNode::root(
            self.ins.starts.clone(),
            self.resolver.dist_mut(),
            &mut self.constraints,
        );
        self.insert(root);

        let n = self.ins.num_agents();
        let mut forced: Vec<(AgentId, VertexId)> = Vec::with_capacity(n);
        let mut stats = SearchStats::default();

        let status = loop {
            let Some(&top) = self.open.last() else {
                break PlanStatus::Exhausted;
            };
            if self.deadline.is_expired() {
                break PlanStatus::Expired;
            }
            stats.loop_count += 1;

            if self.ins.is_goal(&self.nodes[top.index()].config, self.goal) {
                break PlanStatus::Solved;
            }

            // Low-level search for `top` is over; keep it in `explored`.
            let Some(m) = self.nodes[top.index()].pending.pop_front() else {
                self.open.pop();
                continue;
            };

            let depth = self.constraints.depth(m);
            if depth < n {
                self.expand_constraint(top, m, depth);
            }

            self.constraints.collect_into(m, &mut forced);
            let node = &self.nodes[top.index()];
            let Some(next) = self.resolver.resolve(&node.config, &node.order, &forced) else {
                continue;
            };
            stats.resolved += 1;

            if let Some(&known) = self.explored.get(&next) {
                if known == top {
                    stats.revisited += 1;
                } else {
                    stats.merged += 1;
                    self.open.push(known);
                }
                continue;
            }

            let child = SearchNode::child(
                next,
                (top, &self.nodes[top.index()]),
                self.resolver.dist_mut(),
                &mut self.constraints,
            );
            self.insert(child);
        };

        let solution = match status {
            PlanStatus::Solved => self.backtrack(),
            _ => Solution::new(),
        };
        self.report(status, solution, stats)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Queue one child constraint per move of the next agent in `top`'s order.
    fn expand_constraint(&mut self, top: SearchNodeId, m: ConstraintId, depth: usize) {
        let node = &self.nodes[top.index()];
        let who = node.order[depth];
        let here = node.config.get(who);

        let mut moves: Vec<VertexId> = self.ins.graph.neighbors(here).to_vec();
        moves.push(here);
        match self.resolver.rng.as_mut() {
            Some(rng) => rng.shuffle(&mut moves),
            None => {
                let dist = &mut self.resolver.dist;
                moves.sort_by_cached_key(|&u| dist.get(who, u));
            }
        }

        for u in moves {
            let c = self.constraints.child(m, who, u);
            self.nodes[top.index()].pending.push_back(c);
        }
    }

    fn insert(&mut self, node: SearchNode) {
        let id = SearchNodeId::from_index(self.nodes.len());
        self.explored.insert(node.config.clone(), id);
        self.nodes.push(node);
        self.open.push(id);
    }

    /// Under `AllAgents` one stranded agent dooms the search; under
    /// `AnyAgent` only all of them do.
    fn unreachable_agent(&mut self) -> Option<AgentId> {
        let dist = self.resolver.dist_mut();
        let mut stranded = self
            .ins
            .starts
            .iter()
            .filter(|&(agent, v)| dist.is_unreachable(agent, v))
            .map(|(agent, _)| agent);
        match self.goal {
            GoalCondition::AllAgents => stranded.next(),
            GoalCondition::AnyAgent => {
                let first = stranded.next()?;
                let count = 1 + stranded.count();
                (count == self.ins.num_agents()).then_some(first)
            }
        }
    }

    /// Start-to-goal configurations along parent links from the top node.
    fn backtrack(&self) -> Solution {
        let mut solution = Solution::new();
        let mut cur = self.open.last().copied();
        while let Some(id) = cur {
            let node = &self.nodes[id.index()];
            solution.push(node.config.clone());
            cur = node.parent;
        }
        solution.reverse();
        solution
    }

    fn report(&self, status: PlanStatus, solution: Solution, mut stats: SearchStats) -> PlanReport {
        stats.explored = self.explored.len();
        stats.elapsed_ms = self.deadline.elapsed_ms();
        log::info!(
            "search {status}: elapsed {:.1}ms, expanded {}, explored {}, merged {}",
            stats.elapsed_ms,
            stats.loop_count,
            stats.explored,
            stats.merged,
        );
        PlanReport { status, solution, stats }
    }
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Plan `ins` within `deadline`.
///
/// `seed = None` searches deterministically; `Some(seed)` randomises
/// tie-breaking.  The result is empty when no solution was found.
pub fn solve(ins: &Instance<'_>, deadline: Deadline, seed: Option<u64>) -> Solution {
    let rng = seed.map(PlannerRng::new);
    Planner::with_rng(ins, deadline, GoalCondition::AllAgents, rng).run().solution
}
