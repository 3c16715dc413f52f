//! Lazily evaluated goal distances.
//!
//! One breadth-first search per agent, rooted at the agent's goal and
//! resumed on demand: a query for an unknown vertex keeps popping that
//! agent's frontier until the vertex is dequeued or the frontier runs dry.
//! Entries never change once written, so repeated queries are `O(1)`.

use std::collections::VecDeque;

use mapf_core::{AgentId, Configuration, VertexId};
use mapf_graph::Graph;

/// Per-agent hop distances to the goal.
///
/// Unknown and unreachable entries hold [`unreachable`](Self::unreachable),
/// which equals the vertex count.
pub struct DistTable<'g> {
    graph: &'g Graph,
    /// Sentinel, `|V|`.
    k:     u32,
    table: Vec<Vec<u32>>,
    open:  Vec<VecDeque<VertexId>>,
}

impl<'g> DistTable<'g> {
    pub fn new(graph: &'g Graph, goals: &Configuration) -> Self {
        let k = graph.size() as u32;
        let mut table = vec![vec![k; graph.size()]; goals.len()];
        let mut open = Vec::with_capacity(goals.len());
        for (agent, goal) in goals.iter() {
            table[agent.index()][goal.index()] = 0;
            open.push(VecDeque::from([goal]));
        }
        Self { graph, k, table, open }
    }

    /// The "no path" value.
    #[inline]
    pub fn unreachable(&self) -> u32 {
        self.k
    }

    /// Hop distance from `v` to `agent`'s goal, or [`unreachable`](Self::unreachable).
    pub fn get(&mut self, agent: AgentId, v: VertexId) -> u32 {
        let i = agent.index();
        let known = self.table[i][v.index()];
        if known < self.k {
            return known;
        }

        let row = &mut self.table[i];
        let open = &mut self.open[i];
        while let Some(n) = open.pop_front() {
            let d_n = row[n.index()];
            for &m in self.graph.neighbors(n) {
                if d_n + 1 >= row[m.index()] {
                    continue;
                }
                row[m.index()] = d_n + 1;
                open.push_back(m);
            }
            if n == v {
                return d_n;
            }
        }
        self.k
    }

    /// `true` when `v` cannot reach `agent`'s goal.
    pub fn is_unreachable(&mut self, agent: AgentId, v: VertexId) -> bool {
        self.get(agent, v) >= self.k
    }
}
