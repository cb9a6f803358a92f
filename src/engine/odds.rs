//! Probability → fair decimal odds conversion and output rounding.

use crate::types::{FairOdds, OutcomeSummary};

/// Floor applied to probabilities before inversion.
pub const MIN_PROBABILITY: f64 = 1e-12;

/// Round to 4 decimal places for reporting.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Fair (margin-free) decimal odds for a probability, rounded to 4 dp.
pub fn to_fair_odds(probability: f64) -> f64 {
    round4(1.0 / probability.max(MIN_PROBABILITY))
}

impl FairOdds {
    /// Odds for the three outcomes, taken from full-precision probabilities.
    pub fn from_summary(summary: &OutcomeSummary) -> Self {
        Self {
            home: to_fair_odds(summary.home),
            draw: to_fair_odds(summary.draw),
            away: to_fair_odds(summary.away),
        }
    }
}
