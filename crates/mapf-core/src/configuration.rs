//! Joint agent placements.
//!
//! A [`Configuration`] assigns one vertex to every agent; index `i` holds the
//! vertex of `AgentId(i)`.  It serves both as a search state (hashed into the
//! planner's explored set) and as one frame of a [`Solution`].

use std::fmt;
use std::ops::Index;

use rustc_hash::FxHashMap;

use crate::{AgentId, MapfError, MapfResult, VertexId};

/// One simultaneous assignment of all agents to vertices.
///
/// While valid, all entries are distinct.  The type itself does not enforce
/// that; instances and the planner do.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration(pub Vec<VertexId>);

/// A plan: consecutive configurations, one per time step.  Empty on failure.
pub type Solution = Vec<Configuration>;

impl Configuration {
    pub fn new(vertices: Vec<VertexId>) -> Self {
        Self(vertices)
    }

    /// Number of agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Vertex held by `agent`.
    #[inline]
    pub fn get(&self, agent: AgentId) -> VertexId {
        self.0[agent.index()]
    }

    #[inline]
    pub fn set(&mut self, agent: AgentId, v: VertexId) {
        self.0[agent.index()] = v;
    }

    pub fn as_slice(&self) -> &[VertexId] {
        &self.0
    }

    /// `(AgentId, VertexId)` pairs in agent order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, VertexId)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(i, &v)| (AgentId(i as u32), v))
    }

    /// `true` if at least one agent holds the same vertex in both
    /// configurations.
    pub fn reaches_any(&self, other: &Configuration) -> bool {
        self.0.iter().zip(&other.0).any(|(a, b)| a == b)
    }

    /// Fail on the first vertex id outside `0..vertex_count`.
    pub fn check_bounds(&self, vertex_count: usize) -> MapfResult<()> {
        match self.iter().find(|(_, v)| v.index() >= vertex_count) {
            None => Ok(()),
            Some((agent, vertex)) => Err(MapfError::VertexOutOfRange { agent, vertex, vertex_count }),
        }
    }

    /// Lowest agent whose vertex is already held, paired with that vertex's
    /// first holder.  Linear in the number of agents.
    pub fn first_duplicate(&self) -> Option<(AgentId, AgentId)> {
        let mut holder: FxHashMap<VertexId, AgentId> =
            FxHashMap::with_capacity_and_hasher(self.0.len(), Default::default());
        for (agent, v) in self.iter() {
            if let Some(&first) = holder.get(&v) {
                return Some((first, agent));
            }
            holder.insert(v, agent);
        }
        None
    }
}

impl Index<AgentId> for Configuration {
    type Output = VertexId;

    #[inline]
    fn index(&self, agent: AgentId) -> &VertexId {
        &self.0[agent.index()]
    }
}

impl From<Vec<VertexId>> for Configuration {
    fn from(v: Vec<VertexId>) -> Self {
        Self(v)
    }
}

impl FromIterator<VertexId> for Configuration {
    fn from_iter<T: IntoIterator<Item = VertexId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (k, v) in self.0.iter().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v.0)?;
        }
        write!(f, "]")
    }
}
