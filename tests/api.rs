//! HTTP contract tests driven through the full router.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use poisson_odds::api::build_router;
use poisson_odds::config::{ApiKeys, AppConfig};

const KEY: &str = "test-key-1";

fn app() -> Router {
    build_router(Arc::new(AppConfig {
        api_keys: ApiKeys::parse(&format!("{KEY}, test-key-2")),
        ..Default::default()
    }))
}

fn predict_request(key: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/v1/predict")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(key) = key {
        builder = builder.header("X-API-Key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_healthz_needs_no_key() {
    let req = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
    let (status, json) = send(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"ok": true}));
}

#[tokio::test]
async fn test_missing_key_is_401() {
    let (status, json) = send(app(), predict_request(None, r#"{"home":"A","away":"B"}"#)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json, json!({"detail": "Invalid or missing API key"}));
}

#[tokio::test]
async fn test_wrong_key_is_401() {
    let (status, json) =
        send(app(), predict_request(Some("nope"), r#"{"home":"A","away":"B"}"#)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["detail"], "Invalid or missing API key");
}

#[tokio::test]
async fn test_padded_key_is_401() {
    let padded = format!(" {KEY} ");
    let (status, _) = send(
        app(),
        predict_request(Some(&padded), r#"{"home":"A","away":"B"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_checked_before_body() {
    let (status, _) = send(app(), predict_request(None, "not json")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_predict_default_fixture() {
    let (status, json) = send(
        app(),
        predict_request(Some("test-key-2"), r#"{"home":"Rapid","away":"Dinamo"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(json["home"], "Rapid");
    assert_eq!(json["away"], "Dinamo");
    assert_eq!(
        json["probabilities"],
        json!({"home": 0.4052, "draw": 0.2504, "away": 0.3444})
    );
    assert_eq!(
        json["fair_odds"],
        json!({"home": 2.468, "draw": 3.9933, "away": 2.9036})
    );
    assert_eq!(json["extra"], json!({"over25": 0.5386, "btts_yes": 0.5728}));

    let top = json["top_scores"].as_array().unwrap();
    assert_eq!(top.len(), 10);
    assert_eq!(top[0]["h"], 1);
    assert_eq!(top[0]["a"], 1);
    assert!((top[0]["p"].as_f64().unwrap() - 0.117_716).abs() < 1e-6);
}

#[tokio::test]
async fn test_predict_zero_cutoff() {
    let (status, json) = send(
        app(),
        predict_request(Some(KEY), r#"{"home":"A","away":"B","maxGoals":0}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["probabilities"],
        json!({"home": 0.0, "draw": 1.0, "away": 0.0})
    );
    assert_eq!(json["fair_odds"]["draw"], 1.0);
    let top = json["top_scores"].as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!((top[0]["h"].as_u64(), top[0]["a"].as_u64()), (Some(0), Some(0)));
}

#[tokio::test]
async fn test_predict_explicit_equal_rates_symmetric() {
    let (status, json) = send(
        app(),
        predict_request(
            Some(KEY),
            r#"{"home":"A","away":"B","lambdaHome":1.2,"lambdaAway":1.2}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["probabilities"]["home"], json["probabilities"]["away"]);
    assert_eq!(json["fair_odds"]["home"], json["fair_odds"]["away"]);
}

#[tokio::test]
async fn test_negative_max_goals_is_422() {
    let (status, json) = send(
        app(),
        predict_request(Some(KEY), r#"{"home":"A","away":"B","maxGoals":-1}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].as_str().unwrap().contains("maxGoals"));
}

#[tokio::test]
async fn test_oversized_max_goals_is_422() {
    let (status, _) = send(
        app(),
        predict_request(Some(KEY), r#"{"home":"A","away":"B","maxGoals":5000}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_negative_rate_is_422() {
    let (status, json) = send(
        app(),
        predict_request(Some(KEY), r#"{"home":"A","away":"B","lambdaAway":-0.5}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].as_str().unwrap().contains("away goal rate"));
}

#[tokio::test]
async fn test_rate_too_large_for_grid_is_422() {
    let (status, json) = send(
        app(),
        predict_request(Some(KEY), r#"{"home":"A","away":"B","lambdaHome":800}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].as_str().unwrap().contains("no probability mass"));
    assert!(json.get("probabilities").is_none());
}

#[tokio::test]
async fn test_missing_field_is_422() {
    let (status, json) =
        send(app(), predict_request(Some(KEY), r#"{"home":"A"}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn test_malformed_json_is_422() {
    let (status, _) = send(app(), predict_request(Some(KEY), "{not json")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_wrong_type_is_422() {
    let (status, _) = send(
        app(),
        predict_request(Some(KEY), r#"{"home":"A","away":"B","maxGoals":"seven"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
