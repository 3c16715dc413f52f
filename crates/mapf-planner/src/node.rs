//! High-level search nodes.
//!
//! # Priorities
//!
//! | Node     | `priorities[i]`                                              |
//! |----------|--------------------------------------------------------------|
//! | root     | `dist(i, start_i) / N`                                       |
//! | non-root | `parent[i] + 1` while `i` is off its goal, else `fract(parent[i])` |
//!
//! Agents that keep being delayed climb above everyone else, which is what
//! prevents livelock.  On arrival the integer part is dropped and the
//! fractional residue keeps ties between settled agents stable.
//!
//! `order` lists agents by descending priority (stable on ties).  It fixes
//! both which agent the low-level search constrains next and the PIBT
//! planning order.

use std::collections::VecDeque;

use mapf_core::{AgentId, Configuration};

use crate::constraint::{ConstraintArena, ConstraintId};
use crate::dist_table::DistTable;

/// Index into the planner's node arena.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct SearchNodeId(u32);

impl SearchNodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(i: usize) -> Self {
        SearchNodeId(i as u32)
    }
}

pub struct SearchNode {
    pub config:     Configuration,
    pub parent:     Option<SearchNodeId>,
    pub depth:      usize,
    pub priorities: Vec<f32>,
    pub order:      Vec<AgentId>,
    /// Unexplored low-level constraints, FIFO.
    pub pending:    VecDeque<ConstraintId>,
}

impl SearchNode {
    /// Node for the start configuration.
    pub fn root(config: Configuration, dist: &mut DistTable<'_>, arena: &mut ConstraintArena) -> Self {
        let priorities = root_priorities(&config, dist);
        Self::with_priorities(config, None, 0, priorities, arena)
    }

    /// Node reached from `parent` in one step.
    pub fn child(
        config: Configuration,
        parent: (SearchNodeId, &SearchNode),
        dist: &mut DistTable<'_>,
        arena: &mut ConstraintArena,
    ) -> Self {
        let (parent_id, parent) = parent;
        let priorities = inherit_priorities(&parent.priorities, &config, dist);
        Self::with_priorities(config, Some(parent_id), parent.depth + 1, priorities, arena)
    }

    fn with_priorities(
        config: Configuration,
        parent: Option<SearchNodeId>,
        depth: usize,
        priorities: Vec<f32>,
        arena: &mut ConstraintArena,
    ) -> Self {
        let order = order_by_priority(&priorities);
        Self {
            config,
            parent,
            depth,
            priorities,
            order,
            pending: VecDeque::from([arena.root()]),
        }
    }

    /// Low-level search for this node is finished.
    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }
}

// ── Priority rules ────────────────────────────────────────────────────────────

pub fn root_priorities(config: &Configuration, dist: &mut DistTable<'_>) -> Vec<f32> {
    let n = config.len() as f32;
    config
        .iter()
        .map(|(agent, v)| dist.get(agent, v) as f32 / n)
        .collect()
}

pub fn inherit_priorities(parent: &[f32], config: &Configuration, dist: &mut DistTable<'_>) -> Vec<f32> {
    config
        .iter()
        .map(|(agent, v)| {
            let p = parent[agent.index()];
            if dist.get(agent, v) != 0 { p + 1.0 } else { p.fract() }
        })
        .collect()
}

pub fn order_by_priority(priorities: &[f32]) -> Vec<AgentId> {
    let mut order: Vec<AgentId> = AgentId::range(priorities.len()).collect();
    order.sort_by(|a, b| priorities[b.index()].total_cmp(&priorities[a.index()]));
    order
}
