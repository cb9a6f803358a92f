//! Poisson Odds API — match-outcome probabilities and fair odds.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod engine;
pub mod api;
