//! Wall-clock budget and planner configuration.
//!
//! # Design
//!
//! Planning is anytime: the outer search loop polls a [`Deadline`] once per
//! iteration and gives up when it has expired.  The deadline is the only
//! cancellation mechanism; nothing inside a single PIBT step checks it.
//!
//! A deadline without a limit never expires, which is what tests and
//! exhaustive runs use.

use std::fmt;
use std::time::{Duration, Instant};

use crate::{MapfError, MapfResult};

// ── Deadline ──────────────────────────────────────────────────────────────────

/// Start instant plus an optional time limit.
///
/// `Deadline` is cheap to copy and holds no heap data, so independent
/// planner instances can each take their own copy.
#[derive(Copy, Clone, Debug)]
pub struct Deadline {
    start: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    /// Start the clock now with an optional limit.
    pub fn new(limit: Option<Duration>) -> Self {
        Self { start: Instant::now(), limit }
    }

    /// Start the clock now with a limit in milliseconds.
    pub fn from_millis(limit_ms: u64) -> Self {
        Self::new(Some(Duration::from_millis(limit_ms)))
    }

    /// A deadline that never expires.
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1_000.0
    }

    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    /// `true` once strictly more than the limit has elapsed.
    #[inline]
    pub fn is_expired(&self) -> bool {
        match self.limit {
            None => false,
            Some(limit) => self.elapsed() > limit,
        }
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.limit {
            Some(limit) => write!(f, "{:.1}ms / {}ms", self.elapsed_ms(), limit.as_millis()),
            None => write!(f, "{:.1}ms / unbounded", self.elapsed_ms()),
        }
    }
}

// ── GoalCondition ─────────────────────────────────────────────────────────────

/// When a configuration counts as "goal reached".
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GoalCondition {
    /// Every agent stands on its own goal (one-shot MAPF).
    #[default]
    AllAgents,
    /// At least one agent stands on its goal (one life-long episode).
    AnyAgent,
}

// ── PlannerConfig ─────────────────────────────────────────────────────────────

/// Top-level planner configuration.
///
/// Typically filled from command-line flags by the application crate and
/// passed to the planner.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    /// Wall-clock budget per planning call.  `None` searches until solved or
    /// exhausted.
    pub time_limit_ms: Option<u64>,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Shuffle low-level candidates and draw fresh PIBT tie-breakers.  When
    /// `false` the search is fully deterministic and ignores `seed`.
    pub randomize: bool,

    /// Goal test applied to the top of the search stack.
    pub goal: GoalCondition,

    /// Number of independent randomised runs in a portfolio solve.  `1`
    /// means a single planner.
    pub restarts: usize,

    /// Worker thread count passed to Rayon for portfolio solves.  `None`
    /// uses all logical cores.
    pub num_threads: Option<usize>,
}

impl PlannerConfig {
    /// Start a [`Deadline`] for one planning call.
    pub fn make_deadline(&self) -> Deadline {
        Deadline::new(self.time_limit_ms.map(Duration::from_millis))
    }

    /// Reject settings the planner cannot honour.
    pub fn validate(&self) -> MapfResult<()> {
        if self.restarts == 0 {
            return Err(MapfError::Config("restarts must be at least 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(MapfError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }

    /// The seed handed to the planner, or `None` for deterministic search.
    pub fn effective_seed(&self) -> Option<u64> {
        self.randomize.then_some(self.seed)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: Some(10_000),
            seed:          0,
            randomize:     false,
            goal:          GoalCondition::AllAgents,
            restarts:      1,
            num_threads:   None,
        }
    }
}
