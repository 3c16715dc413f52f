//! One planning problem: a graph plus start and goal configurations.
//!
//! Every constructor validates its input, so planners can assume
//!
//! - `starts.len() == goals.len()`,
//! - every vertex id is in range for the graph,
//! - starts are pairwise distinct, and
//! - goals are pairwise distinct (except via [`Instance::with_shared_goals`]).

use mapf_core::{AgentId, Configuration, GoalCondition, PlannerRng, VertexId};
use mapf_graph::Graph;

use crate::{InstanceError, InstanceResult};

#[derive(Clone)]
pub struct Instance<'g> {
    pub graph:  &'g Graph,
    pub starts: Configuration,
    pub goals:  Configuration,
}

impl<'g> Instance<'g> {
    /// One-shot instance: distinct starts and distinct goals.
    pub fn new(graph: &'g Graph, starts: Configuration, goals: Configuration) -> InstanceResult<Self> {
        let ins = Self::with_shared_goals(graph, starts, goals)?;
        if let Some((first, second)) = ins.goals.first_duplicate() {
            return Err(InstanceError::DuplicateGoal { first, second });
        }
        Ok(ins)
    }

    /// Instance whose goals may coincide, as in life-long episodes where
    /// several agents head for the same port or shelf.
    pub fn with_shared_goals(
        graph: &'g Graph,
        starts: Configuration,
        goals: Configuration,
    ) -> InstanceResult<Self> {
        if starts.len() != goals.len() {
            return Err(InstanceError::LengthMismatch { starts: starts.len(), goals: goals.len() });
        }
        starts.check_bounds(graph.size())?;
        goals.check_bounds(graph.size())?;
        if let Some((first, second)) = starts.first_duplicate() {
            return Err(InstanceError::DuplicateStart { first, second });
        }
        Ok(Self { graph, starts, goals })
    }

    /// Build from `(x, y)` grid cells.
    pub fn from_cells(
        graph: &'g Graph,
        starts: &[(u32, u32)],
        goals: &[(u32, u32)],
    ) -> InstanceResult<Self> {
        let lookup = |&(x, y): &(u32, u32)| {
            graph.vertex_at(x, y).ok_or(InstanceError::BlockedCell { x, y })
        };
        let starts = starts.iter().map(lookup).collect::<InstanceResult<Vec<_>>>()?;
        let goals = goals.iter().map(lookup).collect::<InstanceResult<Vec<_>>>()?;
        Self::new(graph, starts.into(), goals.into())
    }

    /// `n` agents with uniformly random distinct starts and distinct goals.
    pub fn random(graph: &'g Graph, n: usize, rng: &mut PlannerRng) -> InstanceResult<Self> {
        let starts = Self::random_vertices(graph, n, rng)?;
        let goals = Self::random_vertices(graph, n, rng)?;
        Self::new(graph, starts, goals)
    }

    /// `n` distinct vertices drawn uniformly.
    pub fn random_vertices(
        graph: &Graph,
        n: usize,
        rng: &mut PlannerRng,
    ) -> InstanceResult<Configuration> {
        if n > graph.size() {
            return Err(InstanceError::NotEnoughAgents { requested: n, available: graph.size() });
        }
        let mut all: Vec<VertexId> = graph.vertices().collect();
        rng.shuffle(&mut all);
        all.truncate(n);
        Ok(all.into())
    }

    #[inline]
    pub fn num_agents(&self) -> usize {
        self.starts.len()
    }

    pub fn agents(&self) -> impl Iterator<Item = AgentId> {
        AgentId::range(self.num_agents())
    }

    /// Goal test for a configuration under `cond`.
    pub fn is_goal(&self, config: &Configuration, cond: GoalCondition) -> bool {
        match cond {
            GoalCondition::AllAgents => *config == self.goals,
            GoalCondition::AnyAgent => config.reaches_any(&self.goals),
        }
    }
}
