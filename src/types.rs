//! Core domain types shared across the engine and the HTTP layer.
//!
//! Everything here is built fresh per request and never mutated after
//! construction.

use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Goal rates
// ---------------------------------------------------------------------------

/// Which side of the fixture a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => write!(f, "home"),
            Side::Away => write!(f, "away"),
        }
    }
}

/// Expected goals (λ) for both sides of a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchRates {
    pub home: f64,
    pub away: f64,
}

impl MatchRates {
    pub fn new(home: f64, away: f64) -> Self {
        Self { home, away }
    }

    /// Default rates when the caller supplies none: the home side gets the
    /// base rate scaled by the home-advantage multiplier.
    pub fn from_defaults(base_rate: f64, home_advantage: f64) -> Self {
        Self {
            home: base_rate * home_advantage,
            away: base_rate,
        }
    }
}

// ---------------------------------------------------------------------------
// Scoreline grid
// ---------------------------------------------------------------------------

/// Joint probability of one exact scoreline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreCell {
    pub h: u32,
    pub a: u32,
    pub p: f64,
}

/// Truncated joint distribution over `[0, max_goals]²`, enumerated with
/// home goals ascending, then away goals ascending.
#[derive(Debug, Clone)]
pub struct ScorelineGrid {
    max_goals: u32,
    cells: Vec<ScoreCell>,
}

impl ScorelineGrid {
    pub(crate) fn from_cells(max_goals: u32, cells: Vec<ScoreCell>) -> Self {
        debug_assert_eq!(cells.len(), ((max_goals as usize) + 1).pow(2));
        Self { max_goals, cells }
    }

    pub fn max_goals(&self) -> u32 {
        self.max_goals
    }

    pub fn cells(&self) -> &[ScoreCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Full-precision aggregate of a scoreline grid.
///
/// `home`, `draw` and `away` are renormalized to sum to one. `over25` and
/// `btts` are measured on the truncated grid and left as-is, so they
/// under-count the mass beyond the cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeSummary {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
    pub over25: f64,
    pub btts: f64,
    /// Up to ten most likely scorelines, most likely first.
    pub top_scores: Vec<ScoreCell>,
}

/// Decimal odds with no margin applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FairOdds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Inputs the engine refuses to model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OddsError {
    #[error("maxGoals must be non-negative, got {0}")]
    NegativeMaxGoals(i64),

    #[error("maxGoals must be at most {limit}, got {value}")]
    MaxGoalsTooLarge { value: i64, limit: u32 },

    #[error("Invalid {side} goal rate: {value} (must be a finite, non-negative number)")]
    InvalidRate { side: Side, value: f64 },

    #[error("Scoreline grid holds no probability mass (captured {captured}); goal rates too large for the cutoff")]
    DegenerateGrid { captured: f64 },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rates_apply_home_advantage() {
        let rates = MatchRates::from_defaults(1.35, 1.10);
        assert!((rates.home - 1.485).abs() < 1e-12);
        assert!((rates.away - 1.35).abs() < 1e-12);
    }

    #[test]
    fn test_side_display() {
        assert_eq!(format!("{}", Side::Home), "home");
        assert_eq!(format!("{}", Side::Away), "away");
    }

    #[test]
    fn test_score_cell_serializes() {
        let cell = ScoreCell { h: 2, a: 1, p: 0.25 };
        let json = serde_json::to_value(cell).unwrap();
        assert_eq!(json, serde_json::json!({"h": 2, "a": 1, "p": 0.25}));
    }

    #[test]
    fn test_error_messages() {
        let err = OddsError::InvalidRate { side: Side::Away, value: -0.5 };
        assert!(err.to_string().contains("away goal rate: -0.5"));

        let err = OddsError::MaxGoalsTooLarge { value: 500, limit: 100 };
        assert_eq!(err.to_string(), "maxGoals must be at most 100, got 500");

        let err = OddsError::DegenerateGrid { captured: 0.0 };
        assert!(err.to_string().contains("no probability mass"));

        assert_eq!(
            OddsError::NegativeMaxGoals(-1).to_string(),
            "maxGoals must be non-negative, got -1"
        );
    }
}
