//! HTTP integration tests against the synthetic data source.
//!
//! These exercise the full router without a database: a seeded
//! `SyntheticSource` backs every request, so responses are deterministic
//! and carry the degraded marker.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use community_pulse_api::app::create_app;
use community_pulse_api::config::Config;
use persistence::sources::SyntheticSource;

fn test_app() -> Router {
    let config = Config::load_for_test(&[]).expect("test config");
    let source = Arc::new(SyntheticSource::new(42));
    create_app(config, source, true)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    // Rejections produced before a handler runs (e.g. a malformed path
    // parameter) carry plain-text bodies.
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_reports_synthetic_degraded() {
    let (status, body) = get_json(test_app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["source"]["kind"], "synthetic");
    assert_eq!(body["source"]["degraded"], true);
}

#[tokio::test]
async fn test_liveness_and_readiness() {
    let (status, body) = get_json(test_app(), "/api/health/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");

    let (status, body) = get_json(test_app(), "/api/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_platform_analytics_shape() {
    let (status, body) = get_json(test_app(), "/api/v1/analytics/platform?window=7d").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"], "7d");
    assert_eq!(body["degraded"], true);

    let top = body["top_growing_communities"].as_array().unwrap();
    assert!(top.len() <= 10);
    // Ordered by lifetime size, descending.
    for pair in top.windows(2) {
        assert!(pair[0]["member_count"].as_i64() >= pair[1]["member_count"].as_i64());
    }

    let rate = body["referrals"]["success_rate"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&rate));
}

#[tokio::test]
async fn test_platform_unknown_window_falls_back_to_30d() {
    let (status, body) = get_json(test_app(), "/api/v1/analytics/platform?window=1y").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"], "30d");
}

#[tokio::test]
async fn test_platform_growth_series_is_sparse_and_sorted() {
    let (status, body) = get_json(test_app(), "/api/v1/analytics/platform?window=30d").await;
    assert_eq!(status, StatusCode::OK);
    let series = body["growth_series"].as_array().unwrap();
    assert!(!series.is_empty());
    for pair in series.windows(2) {
        assert!(pair[0]["date"].as_str() < pair[1]["date"].as_str());
        assert!(pair[0]["new_members"].as_i64().unwrap() > 0);
    }
}

#[tokio::test]
async fn test_community_analytics_for_known_community() {
    let app = test_app();
    let (_, board) = get_json(test_app(), "/api/v1/leaderboard?page_size=1").await;
    let id = board["rows"][0]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/communities/{}/analytics?window=90d", id);
    let (status, body) = get_json(app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"], "90d");
    assert_eq!(body["community"]["id"], id.as_str());
    assert_eq!(body["degraded"], true);

    let segmentation = &body["member_segmentation"];
    let total = segmentation["total_members"].as_i64().unwrap();
    for bucket in [
        "new_members",
        "active_members",
        "event_participants",
        "dormant_members",
    ] {
        let pct = segmentation[bucket]["percentage"].as_f64().unwrap();
        assert!(pct.is_finite());
        assert!(segmentation[bucket]["count"].as_i64().unwrap() <= total);
    }

    let recent = body["recent_members"].as_array().unwrap();
    assert!(recent.len() <= 10);
}

#[tokio::test]
async fn test_community_analytics_unknown_community_is_404() {
    let uri = "/api/v1/communities/00000000-0000-0000-0000-00000000beef/analytics";
    let (status, body) = get_json(test_app(), uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_community_analytics_malformed_id_is_client_error() {
    let (status, _) = get_json(test_app(), "/api/v1/communities/not-a-uuid/analytics").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_leaderboard_defaults() {
    let (status, body) = get_json(test_app(), "/api/v1/leaderboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 15);
    assert_eq!(body["degraded"], true);

    let rows = body["rows"].as_array().unwrap();
    assert!(!rows.is_empty());
    // Default sort: total_score descending, contiguous 1-based ranks.
    for (index, row) in rows.iter().enumerate() {
        assert_eq!(row["rank"].as_u64().unwrap(), index as u64 + 1);
    }
    for pair in rows.windows(2) {
        assert!(pair[0]["total_score"].as_f64() >= pair[1]["total_score"].as_f64());
    }
}

#[tokio::test]
async fn test_leaderboard_search_is_case_insensitive() {
    let (status, body) = get_json(test_app(), "/api/v1/leaderboard?search=RUST").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["rows"].as_array().unwrap();
    assert!(!rows.is_empty());
    for row in rows {
        let name = row["name"].as_str().unwrap().to_lowercase();
        assert!(name.contains("rust"));
    }
}

#[tokio::test]
async fn test_leaderboard_page_past_end_is_empty() {
    let (status, body) = get_json(test_app(), "/api/v1/leaderboard?page=999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 999);
    assert!(body["rows"].as_array().unwrap().is_empty());
    assert!(body["total_items"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_leaderboard_rejects_out_of_range_page_size() {
    let (status, body) = get_json(test_app(), "/api/v1/leaderboard?page_size=500").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_leaderboard_sort_by_name_ascending() {
    let (status, body) =
        get_json(test_app(), "/api/v1/leaderboard?sort=name&order=asc&page_size=100").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["rows"].as_array().unwrap();
    for pair in rows.windows(2) {
        let a = pair[0]["name"].as_str().unwrap().to_lowercase();
        let b = pair[1]["name"].as_str().unwrap().to_lowercase();
        assert!(a <= b);
    }
}

#[tokio::test]
async fn test_request_id_header_round_trip() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health/live")
                .header("X-Request-ID", "itest-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "itest-123"
    );
}
