//! `mapf-output` — solution checks, metrics and result writers.
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`metrics`]    | feasibility, costs, lower bounds, percentiles          |
//! | [`stats`]      | `SolutionStats`, `LifelongRow`                         |
//! | [`result_log`] | plain-text result log (`agents=…`, `solution=…`)       |
//! | [`csv`]        | `CsvAppender` for life-long result rows                |
//!
//! # Usage
//!
//! ```rust,ignore
//! use mapf_output::{save_result_log, LogHeader, SolutionStats};
//!
//! let stats = SolutionStats::compute(&ins, &report.solution, report.stats.elapsed_ms);
//! let header = LogHeader { map_file: &map_path, seed, short: false };
//! save_result_log(Path::new("result.txt"), &ins, &report.solution, &stats, &header)?;
//! ```

pub mod csv;
pub mod error;
pub mod result_log;
pub mod metrics;
pub mod stats;

#[cfg(test)]
mod tests;

pub use self::csv::{append_row, CsvAppender};
pub use error::{Infeasibility, OutputError, OutputResult};
pub use result_log::{save_result_log, write_result_log, LogHeader};
pub use metrics::{
    check_feasibility, is_feasible_solution, makespan, makespan_lower_bound, path_cost,
    percentiles, sum_of_costs, sum_of_costs_lower_bound, sum_of_loss, PERCENTILES,
};
pub use stats::{LifelongRow, SolutionStats};
