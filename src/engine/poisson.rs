//! Independent Poisson scoreline model.
//!
//! Builds the truncated joint distribution of home/away goals and folds it
//! into 1X2, over 2.5 and both-teams-to-score probabilities.

use tracing::debug;

use crate::types::{MatchRates, OddsError, OutcomeSummary, ScoreCell, ScorelineGrid, Side};

/// Largest accepted cutoff. Grid work is quadratic in this value.
pub const MAX_GOALS_LIMIT: u32 = 100;

/// Cutoff used when a request does not specify one.
pub const DEFAULT_MAX_GOALS: i64 = 7;

/// Number of scorelines reported in `top_scores`.
pub const TOP_SCORES: usize = 10;

/// Goals needed for the over 2.5 market to pay out.
const OVER_25_THRESHOLD: u32 = 3;

// ---------------------------------------------------------------------------
// Probability mass
// ---------------------------------------------------------------------------

/// P(X = k) for X ~ Poisson(λ).
///
/// Evaluated in log space so large `k` does not overflow the factorial.
/// `lambda` must be finite and non-negative; callers validate it first.
pub fn poisson_pmf(k: u32, lambda: f64) -> f64 {
    if lambda == 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    let ln_factorial: f64 = (2..=k).map(|i| (i as f64).ln()).sum();
    (-lambda + k as f64 * lambda.ln() - ln_factorial).exp()
}

fn pmf_table(lambda: f64, max_goals: u32) -> Vec<f64> {
    (0..=max_goals).map(|k| poisson_pmf(k, lambda)).collect()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a requested cutoff and narrow it to the grid's index type.
pub fn validate_max_goals(max_goals: i64) -> Result<u32, OddsError> {
    if max_goals < 0 {
        return Err(OddsError::NegativeMaxGoals(max_goals));
    }
    if max_goals > MAX_GOALS_LIMIT as i64 {
        return Err(OddsError::MaxGoalsTooLarge {
            value: max_goals,
            limit: MAX_GOALS_LIMIT,
        });
    }
    Ok(max_goals as u32)
}

fn validate_rate(side: Side, value: f64) -> Result<(), OddsError> {
    if !value.is_finite() || value < 0.0 {
        return Err(OddsError::InvalidRate { side, value });
    }
    Ok(())
}

/// Reject rates the model cannot represent.
pub fn validate_rates(rates: &MatchRates) -> Result<(), OddsError> {
    validate_rate(Side::Home, rates.home)?;
    validate_rate(Side::Away, rates.away)
}

// ---------------------------------------------------------------------------
// Grid + aggregation
// ---------------------------------------------------------------------------

/// Enumerate every scoreline in `[0, max_goals]²`, assuming the two sides
/// score independently.
pub fn build_grid(rates: &MatchRates, max_goals: u32) -> ScorelineGrid {
    let home = pmf_table(rates.home, max_goals);
    let away = pmf_table(rates.away, max_goals);

    let mut cells = Vec::with_capacity(home.len() * away.len());
    for (h, p_h) in home.iter().enumerate() {
        for (a, p_a) in away.iter().enumerate() {
            cells.push(ScoreCell {
                h: h as u32,
                a: a as u32,
                p: p_h * p_a,
            });
        }
    }
    ScorelineGrid::from_cells(max_goals, cells)
}

/// Fold a grid into market probabilities.
///
/// Fails when every cell underflows to zero, since the 1X2 split cannot be
/// renormalized.
pub fn summarize(grid: &ScorelineGrid) -> Result<OutcomeSummary, OddsError> {
    let mut p_home = 0.0;
    let mut p_draw = 0.0;
    let mut p_away = 0.0;
    let mut p_over = 0.0;
    let mut p_btts = 0.0;

    for cell in grid.cells() {
        if cell.h > cell.a {
            p_home += cell.p;
        } else if cell.h == cell.a {
            p_draw += cell.p;
        } else {
            p_away += cell.p;
        }
        if cell.h + cell.a >= OVER_25_THRESHOLD {
            p_over += cell.p;
        }
        if cell.h > 0 && cell.a > 0 {
            p_btts += cell.p;
        }
    }

    // Mass beyond the cutoff is dropped, so the 1X2 sum sits slightly below 1.
    let total = p_home + p_draw + p_away;
    debug!(
        max_goals = grid.max_goals(),
        cells = grid.len(),
        captured_mass = total,
        "Scoreline grid aggregated"
    );
    if !(total > 0.0 && total.is_finite()) {
        return Err(OddsError::DegenerateGrid { captured: total });
    }

    let mut top_scores = grid.cells().to_vec();
    // sort_by is stable: ties keep enumeration order.
    top_scores.sort_by(|x, y| y.p.total_cmp(&x.p));
    top_scores.truncate(TOP_SCORES);

    Ok(OutcomeSummary {
        home: p_home / total,
        draw: p_draw / total,
        away: p_away / total,
        over25: p_over,
        btts: p_btts,
        top_scores,
    })
}

/// Validate inputs, build the grid and aggregate it.
pub fn build_outcome_summary(
    rates: &MatchRates,
    max_goals: i64,
) -> Result<OutcomeSummary, OddsError> {
    let max_goals = validate_max_goals(max_goals)?;
    validate_rates(rates)?;
    summarize(&build_grid(rates, max_goals))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
