//! Single-step configuration generator (PIBT).
//!
//! # One call of [`StepResolver::resolve`]
//!
//! ```text
//! ① reset     — occupied_now ← current configuration, occupied_next ← ∅
//! ② replay    — apply forced (agent, vertex) pairs in order; reject on a
//!               vertex conflict or a swap between two forced agents
//! ③ complete  — for each agent in priority order without a next vertex,
//!               assign(agent, None)
//! ```
//!
//! `assign(a, from)` walks `a`'s candidates (neighbors plus "stay", sorted by
//! goal distance plus tie-breaker).  Claiming a vertex held by an agent with
//! no next vertex yet recurses into that occupant, which inherits `a`'s
//! priority.  An agent that runs out of candidates stays put and reports
//! failure so its caller tries the next candidate.
//!
//! Each agent is assigned at most once per call, so the recursion depth is
//! bounded by the agent count.

use mapf_core::{AgentId, Configuration, PlannerRng, VertexId};
use mapf_graph::Graph;

use crate::dist_table::DistTable;

pub struct StepResolver<'g> {
    graph: &'g Graph,
    pub(crate) dist: DistTable<'g>,
    /// `Some` randomises tie-breakers and low-level candidate order.
    pub(crate) rng:  Option<PlannerRng>,

    // ── Per-agent scratch ─────────────────────────────────────────────────
    v_now:      Vec<VertexId>,
    v_next:     Vec<VertexId>,
    candidates: Vec<Vec<VertexId>>,

    // ── Per-vertex scratch ────────────────────────────────────────────────
    occupied_now:  Vec<AgentId>,
    occupied_next: Vec<AgentId>,
    score:         Vec<f32>,
}

impl<'g> StepResolver<'g> {
    pub fn new(graph: &'g Graph, dist: DistTable<'g>, num_agents: usize, rng: Option<PlannerRng>) -> Self {
        Self {
            graph,
            dist,
            rng,
            v_now:         vec![VertexId::INVALID; num_agents],
            v_next:        vec![VertexId::INVALID; num_agents],
            candidates:    vec![Vec::with_capacity(5); num_agents],
            occupied_now:  vec![AgentId::INVALID; graph.size()],
            occupied_next: vec![AgentId::INVALID; graph.size()],
            score:         vec![0.0; graph.size()],
        }
    }

    pub fn dist_mut(&mut self) -> &mut DistTable<'g> {
        &mut self.dist
    }

    /// Complete `forced` into a conflict-free successor of `config`, planning
    /// free agents in `order`.  `None` if no such configuration is found.
    pub fn resolve(
        &mut self,
        config: &Configuration,
        order: &[AgentId],
        forced: &[(AgentId, VertexId)],
    ) -> Option<Configuration> {
        self.reset(config);

        for &(agent, at) in forced {
            // vertex conflict
            if self.occupied_next[at.index()] != AgentId::INVALID {
                return None;
            }
            // swap conflict between forced agents
            let from = config.get(agent);
            let into_from = self.occupied_next[from.index()];
            let at_now = self.occupied_now[at.index()];
            if into_from != AgentId::INVALID && into_from == at_now {
                return None;
            }
            self.v_next[agent.index()] = at;
            self.occupied_next[at.index()] = agent;
        }

        for &agent in order {
            if self.v_next[agent.index()] == VertexId::INVALID && !self.assign(agent, None) {
                return None;
            }
        }

        Some(Configuration::new(self.v_next.clone()))
    }

    /// Clear the entries of the previous call and load `config`.
    fn reset(&mut self, config: &Configuration) {
        for (agent, v) in config.iter() {
            let i = agent.index();
            let prev_now = self.v_now[i];
            if prev_now != VertexId::INVALID && self.occupied_now[prev_now.index()] == agent {
                self.occupied_now[prev_now.index()] = AgentId::INVALID;
            }
            let prev_next = self.v_next[i];
            if prev_next != VertexId::INVALID {
                self.occupied_next[prev_next.index()] = AgentId::INVALID;
                self.v_next[i] = VertexId::INVALID;
            }
            self.v_now[i] = v;
            self.occupied_now[v.index()] = agent;
        }
    }

    fn assign(&mut self, ai: AgentId, from: Option<AgentId>) -> bool {
        let i = ai.index();
        let mut cands = std::mem::take(&mut self.candidates[i]);
        self.fill_candidates(ai, &mut cands);
        let ok = self.try_candidates(ai, from, &cands);
        self.candidates[i] = cands;
        ok
    }

    /// Neighbors plus "stay", cheapest goal distance first.
    fn fill_candidates(&mut self, ai: AgentId, cands: &mut Vec<VertexId>) {
        let here = self.v_now[ai.index()];
        cands.clear();
        cands.extend_from_slice(self.graph.neighbors(here));
        cands.push(here);

        for &u in cands.iter() {
            let tie = self.rng.as_mut().map_or(0.0, PlannerRng::unit_f32);
            self.score[u.index()] = self.dist.get(ai, u) as f32 + tie;
        }
        let score = &self.score;
        cands.sort_by(|a, b| score[a.index()].total_cmp(&score[b.index()]));
    }

    fn try_candidates(&mut self, ai: AgentId, from: Option<AgentId>, cands: &[VertexId]) -> bool {
        let here = self.v_now[ai.index()];

        for &u in cands {
            // vertex conflict
            if self.occupied_next[u.index()] != AgentId::INVALID {
                continue;
            }
            // swap with the agent that pushed us here
            if let Some(aj) = from {
                if u == self.v_now[aj.index()] {
                    continue;
                }
            }
            // swap with an occupant already moving into our vertex
            let ak = self.occupied_now[u.index()];
            if ak != AgentId::INVALID && self.v_next[ak.index()] == here {
                continue;
            }

            self.occupied_next[u.index()] = ai;
            self.v_next[ai.index()] = u;

            if ak == AgentId::INVALID || u == here {
                return true;
            }

            // priority inheritance; on failure `ak` stays on `u`, taking the
            // claim back
            if self.v_next[ak.index()] == VertexId::INVALID && !self.assign(ak, Some(ai)) {
                continue;
            }
            return true;
        }

        self.occupied_next[here.index()] = ai;
        self.v_next[ai.index()] = here;
        false
    }
}
