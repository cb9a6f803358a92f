//! API route handlers, request/response types and error mapping.
//!
//! All endpoints return JSON. Configuration is shared via `Arc<AppConfig>`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::auth::{api_key_from_headers, check_api_key};
use crate::config::AppConfig;
use crate::engine::{self, round4, DEFAULT_MAX_GOALS};
use crate::types::{FairOdds, MatchRates, OddsError, OutcomeSummary, ScoreCell};

pub type AppState = Arc<AppConfig>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

fn default_max_goals() -> i64 {
    DEFAULT_MAX_GOALS
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub home: String,
    pub away: String,
    #[serde(default = "default_max_goals")]
    pub max_goals: i64,
    /// Explicit home goal rate; falls back to the configured default.
    #[serde(default)]
    pub lambda_home: Option<f64>,
    /// Explicit away goal rate; falls back to the configured default.
    #[serde(default)]
    pub lambda_away: Option<f64>,
}

impl PredictRequest {
    /// Resolve the two goal rates, filling gaps from the default policy.
    pub fn rates(&self, config: &AppConfig) -> MatchRates {
        let defaults = config.model.default_rates();
        MatchRates::new(
            self.lambda_home.unwrap_or(defaults.home),
            self.lambda_away.unwrap_or(defaults.away),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Probabilities {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtraMarkets {
    pub over25: f64,
    pub btts_yes: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub home: String,
    pub away: String,
    pub probabilities: Probabilities,
    pub fair_odds: FairOdds,
    pub extra: ExtraMarkets,
    pub top_scores: Vec<ScoreCell>,
}

impl PredictResponse {
    /// Shape an engine summary for the wire. Probabilities are rounded here
    /// and nowhere earlier.
    pub fn from_summary(home: String, away: String, summary: OutcomeSummary) -> Self {
        Self {
            home,
            away,
            probabilities: Probabilities {
                home: round4(summary.home),
                draw: round4(summary.draw),
                away: round4(summary.away),
            },
            fair_odds: FairOdds::from_summary(&summary),
            extra: ExtraMarkets {
                over25: round4(summary.over25),
                btts_yes: round4(summary.btts),
            },
            top_scores: summary.top_scores,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

pub const UNAUTHORIZED_DETAIL: &str = "Invalid or missing API key";

/// Failures surfaced to HTTP callers as `{"detail": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid or missing API key")]
    Unauthorized,

    #[error("{0}")]
    InvalidBody(String),

    #[error(transparent)]
    Domain(#[from] OddsError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidBody(_) | ApiError::Domain(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /healthz
pub async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// POST /v1/predict
///
/// The API key is checked before the body is looked at, so an
/// unauthenticated caller always gets 401.
pub async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let auth = check_api_key(api_key_from_headers(&headers), &state.api_keys);
    if !auth.is_granted() {
        warn!(result = ?auth, "Rejected predict request");
        return Err(ApiError::Unauthorized);
    }

    let Json(req) = payload?;
    let rates = req.rates(&state);
    let request_id = Uuid::new_v4();

    info!(
        %request_id,
        home = %req.home,
        away = %req.away,
        lambda_home = rates.home,
        lambda_away = rates.away,
        max_goals = req.max_goals,
        "Predict request"
    );

    let summary = engine::build_outcome_summary(&rates, req.max_goals).map_err(|e| {
        warn!(%request_id, error = %e, "Predict request rejected");
        ApiError::from(e)
    })?;

    Ok(Json(PredictResponse::from_summary(req.home, req.away, summary)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
