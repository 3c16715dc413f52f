//! Life-long warehouse episodes.
//!
//! # Episode loop
//!
//! ```text
//! loop until ngoals cargo delivered:
//!   ① plan    — instance from current starts/goals (goals may coincide),
//!               solved with GoalCondition::AnyAgent
//!   ② append  — episode frames join the life-long solution
//!   ③ update  — every agent advances its task state from where it stopped
//! ```
//!
//! # Task states
//!
//! | State            | Goal          | On arrival                                 | En route                       |
//! |------------------|---------------|--------------------------------------------|--------------------------------|
//! | `ToWarehouse`    | shelf         | reserve a cache block → `ToCacheInsert`, else `ToPortUncached` | cache hit → `ToCacheHit` |
//! | `ToCacheHit`     | cache block   | release fetch lock → `ToPortCached`        |                                |
//! | `ToCacheInsert`  | cache block   | commit cargo → `ToPortCached`              |                                |
//! | `ToPortUncached` | port          | deliver, next request                      | free block → `ToCacheInsert`   |
//! | `ToPortCached`   | port          | deliver, next request                      |                                |
//!
//! A new request becomes `ToCacheHit` on a cache hit and `ToWarehouse`
//! otherwise.  Without a cache every query misses.

use mapf_core::{
    AgentId, Configuration, Deadline, GoalCondition, PlannerConfig, PlannerRng, Solution, VertexId,
};
use mapf_graph::Graph;
use mapf_instance::Instance;
use mapf_planner::{PlanStatus, Planner};

use crate::cache::{Cache, CacheKind};
use crate::goals::GoalGenerator;
use crate::observer::EpisodeObserver;
use crate::{WarehouseError, WarehouseResult};

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WarehouseConfig {
    pub cache:   CacheKind,
    /// Deliveries to complete before stopping.
    pub ngoals:  usize,
    /// Distinct shelves allowed per request window.
    pub goals_k: usize,
    /// Request window length.
    pub goals_m: usize,
    pub nagents: usize,
    pub seed:    u64,
}

impl WarehouseConfig {
    pub fn validate(&self) -> WarehouseResult<()> {
        if self.goals_k == 0 || self.goals_m == 0 {
            return Err(WarehouseError::Config("goals_k and goals_m must be at least 1".into()));
        }
        if self.nagents == 0 {
            return Err(WarehouseError::Config("nagents must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            cache:   CacheKind::None,
            ngoals:  100,
            goals_k: 10,
            goals_m: 100,
            nagents: 10,
            seed:    0,
        }
    }
}

// ── Task state ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    ToWarehouse,
    ToCacheHit,
    ToCacheInsert,
    ToPortUncached,
    ToPortCached,
}

// ── Warehouse ─────────────────────────────────────────────────────────────────

pub struct Warehouse<'g> {
    graph:     &'g Graph,
    cache:     Option<Cache>,
    generator: GoalGenerator,
    port:      VertexId,

    pub starts: Configuration,
    pub goals:  Configuration,

    // ── Per-agent task state ──────────────────────────────────────────────
    cargo:  Vec<VertexId>,
    status: Vec<TaskStatus>,
    /// Steps spent on the current request.
    steps:  Vec<u64>,

    // ── Statistics ────────────────────────────────────────────────────────
    /// Steps per completed delivery, in completion order.
    pub delivery_steps: Vec<u64>,
    pub cache_access:   u64,
    pub cache_hit:      u64,
    ngoals:             usize,
}

impl<'g> Warehouse<'g> {
    /// Random distinct starts; every agent starts heading for its first
    /// request's shelf.
    pub fn new(graph: &'g Graph, config: &WarehouseConfig) -> WarehouseResult<Self> {
        config.validate()?;
        let port = *graph.unloading_ports.first().ok_or(WarehouseError::NoUnloadingPort)?;
        if graph.cargo_vertices.is_empty() {
            return Err(WarehouseError::NoCargo);
        }

        let mut rng = PlannerRng::new(config.seed);
        let cache = match config.cache {
            CacheKind::None => None,
            kind => Some(Cache::new(kind, &graph.cache_blocks, rng.child(1))?),
        };
        let mut generator = GoalGenerator::new(
            graph.cargo_vertices.clone(),
            config.goals_m,
            config.goals_k,
            config.ngoals,
            rng.child(2),
        );
        let starts = Instance::random_vertices(graph, config.nagents, &mut rng)?;

        let mut cargo = Vec::with_capacity(config.nagents);
        for _ in 0..config.nagents {
            cargo.push(generator.next_goal().ok_or(WarehouseError::NoCargo)?);
        }
        log::info!(
            "warehouse: {} agents, {} requests, cache {}, port {}",
            config.nagents,
            config.ngoals,
            config.cache,
            port,
        );

        Ok(Self {
            graph,
            cache,
            generator,
            port,
            starts,
            goals: Configuration::new(cargo.clone()),
            cargo,
            status: vec![TaskStatus::ToWarehouse; config.nagents],
            steps: vec![0; config.nagents],
            delivery_steps: Vec::new(),
            cache_access: 0,
            cache_hit: 0,
            ngoals: config.ngoals,
        })
    }

    pub fn delivered(&self) -> usize {
        self.delivery_steps.len()
    }

    pub fn is_done(&self) -> bool {
        self.delivered() >= self.ngoals
    }

    pub fn status(&self, agent: AgentId) -> TaskStatus {
        self.status[agent.index()]
    }

    pub fn cargo(&self, agent: AgentId) -> VertexId {
        self.cargo[agent.index()]
    }

    pub fn cache(&self) -> Option<&Cache> {
        self.cache.as_ref()
    }

    /// `cache_hit / cache_access`, 0 before any access.
    pub fn cache_hit_rate(&self) -> f64 {
        if self.cache_access == 0 {
            0.0
        } else {
            self.cache_hit as f64 / self.cache_access as f64
        }
    }

    /// Planning problem for the next episode.
    pub fn instance(&self) -> WarehouseResult<Instance<'g>> {
        Ok(Instance::with_shared_goals(self.graph, self.starts.clone(), self.goals.clone())?)
    }

    /// Advance every agent's task from the last frame of `episode`.
    /// Returns the number of deliveries completed.
    pub fn apply_episode(&mut self, episode: &Solution) -> WarehouseResult<usize> {
        let Some(last) = episode.last() else { return Ok(0) };
        let step = (episode.len() - 1) as u64;
        let mut delivered = 0;

        for (agent, v) in last.iter() {
            let j = agent.index();
            self.steps[j] += step;
            let reached = v == self.goals[agent];
            if self.advance(agent, reached)? {
                delivered += 1;
            }
        }

        self.starts = last.clone();
        log::debug!("episode of {step} steps: {delivered} deliveries, {} total", self.delivered());
        Ok(delivered)
    }

    /// One state transition for `agent`.  `true` on a counted delivery.
    fn advance(&mut self, agent: AgentId, reached: bool) -> WarehouseResult<bool> {
        let j = agent.index();
        let cargo = self.cargo[j];
        let from = self.status[j];

        let (status, goal) = match (from, reached) {
            (TaskStatus::ToWarehouse, true) => match self.cache.as_mut().and_then(|c| c.try_insert_cache(cargo)) {
                Some(block) => (TaskStatus::ToCacheInsert, block),
                None => (TaskStatus::ToPortUncached, self.port),
            },
            (TaskStatus::ToWarehouse, false) => match self.cache.as_mut().and_then(|c| c.try_cache_cargo(cargo)) {
                Some(block) => {
                    self.cache_access += 1;
                    self.cache_hit += 1;
                    (TaskStatus::ToCacheHit, block)
                }
                None => return Ok(false),
            },
            (TaskStatus::ToCacheHit, true) => {
                if let Some(cache) = self.cache.as_mut() {
                    cache.update_cargo_from_cache(cargo, self.goals[agent])?;
                }
                (TaskStatus::ToPortCached, self.port)
            }
            (TaskStatus::ToCacheInsert, true) => {
                if let Some(cache) = self.cache.as_mut() {
                    cache.update_cargo_into_cache(cargo, self.goals[agent])?;
                }
                (TaskStatus::ToPortCached, self.port)
            }
            (TaskStatus::ToPortUncached, false) => match self.cache.as_mut().and_then(|c| c.try_insert_cache(cargo)) {
                Some(block) => (TaskStatus::ToCacheInsert, block),
                None => return Ok(false),
            },
            (TaskStatus::ToPortUncached | TaskStatus::ToPortCached, true) => {
                return self.deliver(agent);
            }
            (TaskStatus::ToCacheHit | TaskStatus::ToCacheInsert | TaskStatus::ToPortCached, false) => {
                return Ok(false);
            }
        };

        log::debug!("{agent}: {from:?} -> {status:?}, goal {goal}");
        self.status[j] = status;
        self.goals.set(agent, goal);
        Ok(false)
    }

    /// Record a delivery and hand `agent` its next request.
    fn deliver(&mut self, agent: AgentId) -> WarehouseResult<bool> {
        let j = agent.index();
        let counted = !self.is_done();
        if counted {
            self.delivery_steps.push(self.steps[j]);
            self.steps[j] = 0;
        }
        log::debug!("{agent} delivered cargo {}", self.cargo[j]);

        let next = self.generator.next_goal().ok_or(WarehouseError::NoCargo)?;
        self.cargo[j] = next;

        let hit = self.cache.as_mut().and_then(|c| c.try_cache_cargo(next));
        if self.cache.is_some() {
            self.cache_access += 1;
        }
        let (status, goal) = match hit {
            Some(block) => {
                self.cache_hit += 1;
                (TaskStatus::ToCacheHit, block)
            }
            None => (TaskStatus::ToWarehouse, next),
        };
        self.status[j] = status;
        self.goals.set(agent, goal);
        Ok(counted)
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct LifelongReport {
    /// `false` if an episode failed before all requests were delivered.
    pub completed:       bool,
    /// Status of the last episode.
    pub last_status:     PlanStatus,
    pub episodes:        usize,
    pub total_steps:     usize,
    pub delivered:       usize,
    pub cache_hit_rate:  f64,
    pub delivery_steps:  Vec<u64>,
    pub episode_lengths: Vec<usize>,
    /// All episodes joined; frame `t` is global time step `t`.
    pub solution:        Solution,
    pub comp_time_ms:    f64,
}

/// Run episodes until `config.ngoals` deliveries or a failed episode.
pub fn run_lifelong<O: EpisodeObserver>(
    graph: &Graph,
    config: &WarehouseConfig,
    planner: &PlannerConfig,
    observer: &mut O,
) -> WarehouseResult<LifelongReport> {
    let mut warehouse = Warehouse::new(graph, config)?;
    let planner = PlannerConfig { goal: GoalCondition::AnyAgent, ..planner.clone() };
    let clock = Deadline::unbounded();

    let mut solution: Solution = vec![warehouse.starts.clone()];
    let mut episode_lengths = Vec::new();
    let mut last_status = PlanStatus::Solved;
    let mut episode = 0;

    while !warehouse.is_done() {
        let ins = warehouse.instance()?;
        let report = Planner::new(&ins, planner.make_deadline(), &planner).run();
        observer.on_episode(episode, &ins, &report);
        last_status = report.status;
        episode += 1;

        if !report.is_solved() {
            log::warn!("episode {episode} ended {}; stopping", report.status);
            break;
        }

        episode_lengths.push(report.solution.len() - 1);
        solution.extend(report.solution.iter().skip(1).cloned());
        warehouse.apply_episode(&report.solution)?;
    }

    observer.on_finish(episode, warehouse.delivered());
    let report = LifelongReport {
        completed: warehouse.is_done(),
        last_status,
        episodes: episode,
        total_steps: solution.len() - 1,
        delivered: warehouse.delivered(),
        cache_hit_rate: warehouse.cache_hit_rate(),
        delivery_steps: warehouse.delivery_steps.clone(),
        episode_lengths,
        solution,
        comp_time_ms: clock.elapsed_ms(),
    };
    log::info!(
        "life-long run: {} episodes, {} steps, {} delivered, hit rate {:.3}, {:.1}ms",
        report.episodes,
        report.total_steps,
        report.delivered,
        report.cache_hit_rate,
        report.comp_time_ms,
    );
    Ok(report)
}
