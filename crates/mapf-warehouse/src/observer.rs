//! Episode observer for progress reporting and data collection.

use mapf_instance::Instance;
use mapf_planner::PlanReport;

/// Callbacks invoked by [`run_lifelong`][crate::run_lifelong] after each
/// planning episode.
///
/// All methods have default no-op implementations.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl EpisodeObserver for Progress {
///     fn on_episode(&mut self, episode: usize, _ins: &Instance<'_>, report: &PlanReport) {
///         println!("episode {episode}: {} frames", report.solution.len());
///     }
/// }
/// ```
pub trait EpisodeObserver {
    /// `ins` is the episode's instance, before task states advance.
    fn on_episode(&mut self, _episode: usize, _ins: &Instance<'_>, _report: &PlanReport) {}

    /// Called once after the last episode, with the number of deliveries.
    fn on_finish(&mut self, _episodes: usize, _delivered: usize) {}
}

/// An [`EpisodeObserver`] that does nothing.
pub struct NoopObserver;

impl EpisodeObserver for NoopObserver {}
