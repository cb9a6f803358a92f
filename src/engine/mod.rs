//! Probability engine — scoreline grid, outcome aggregation, fair odds.
//!
//! Pure and synchronous: no I/O and no shared state, so handlers call it
//! directly from async context.

pub mod poisson;
pub mod odds;

pub use odds::{round4, to_fair_odds};
pub use poisson::{build_outcome_summary, poisson_pmf, DEFAULT_MAX_GOALS, MAX_GOALS_LIMIT};
