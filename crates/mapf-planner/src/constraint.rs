//! Low-level constraint tree.
//!
//! A constraint node pins one agent to one vertex in the next configuration
//! and points at its parent; walking up to the root yields the full list of
//! forced `(agent, vertex)` pairs, oldest first.  Nodes are immutable once
//! pushed and live in a flat arena that is dropped with the planner.

use mapf_core::{AgentId, VertexId};

/// Index into a [`ConstraintArena`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ConstraintId(u32);

impl ConstraintId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub struct ConstraintNode {
    pub parent: Option<ConstraintId>,
    /// Meaningless on a root.
    pub who:    AgentId,
    pub at:     VertexId,
    /// Number of forced pairs, 0 for a root.
    pub depth:  u32,
}

#[derive(Default)]
pub struct ConstraintArena {
    nodes: Vec<ConstraintNode>,
}

impl ConstraintArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A fresh unconstrained node.
    pub fn root(&mut self) -> ConstraintId {
        self.push(ConstraintNode {
            parent: None,
            who:    AgentId::INVALID,
            at:     VertexId::INVALID,
            depth:  0,
        })
    }

    /// Extend `parent` by forcing `who` onto `at`.
    pub fn child(&mut self, parent: ConstraintId, who: AgentId, at: VertexId) -> ConstraintId {
        let depth = self.nodes[parent.index()].depth + 1;
        self.push(ConstraintNode { parent: Some(parent), who, at, depth })
    }

    #[inline]
    pub fn get(&self, id: ConstraintId) -> &ConstraintNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn depth(&self, id: ConstraintId) -> usize {
        self.nodes[id.index()].depth as usize
    }

    /// Write the forced pairs of `id` into `out`, in the order they were
    /// added.
    pub fn collect_into(&self, id: ConstraintId, out: &mut Vec<(AgentId, VertexId)>) {
        out.clear();
        let mut cur = id;
        loop {
            let node = &self.nodes[cur.index()];
            let Some(parent) = node.parent else { break };
            out.push((node.who, node.at));
            cur = parent;
        }
        out.reverse();
    }

    fn push(&mut self, node: ConstraintNode) -> ConstraintId {
        let id = ConstraintId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}
