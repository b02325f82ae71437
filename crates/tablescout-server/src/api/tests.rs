use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;
use tablescout_core::Restaurant;
use tablescout_search::{MemoryStore, SearchEngine, SearchSettings};
use tower::ServiceExt;

use super::*;

fn restaurant(
    id: i64,
    name: &str,
    latitude: f64,
    longitude: f64,
    platforms: &[&str],
) -> Restaurant {
    Restaurant {
        id,
        name: name.to_string(),
        cuisine_type: Some("thai".to_string()),
        rating: Some(4.5),
        latitude,
        longitude,
        address: None,
        platforms: platforms.iter().map(ToString::to_string).collect(),
    }
}

/// Two restaurants within 1 km of the Bangkok test center, the rest 3-9 km out.
fn bangkok_store() -> MemoryStore {
    MemoryStore::new(vec![
        restaurant(1, "Jay Fai", 13.7525, 100.5047, &["internal"]),
        restaurant(2, "Thipsamai", 13.7529, 100.5048, &["grab"]),
        restaurant(3, "Somtum Der", 13.7286, 100.5341, &["grab", "lineman"]),
        restaurant(4, "Krua Apsorn", 13.7900, 100.5200, &["internal"]),
        restaurant(5, "Err", 13.7000, 100.4700, &[]),
    ])
}

fn app_with(auth: AuthState, rate_limit: RateLimitState) -> Router {
    let engine = SearchEngine::new(Arc::new(bangkok_store()), SearchSettings::default());
    let state = AppState {
        engine: Arc::new(engine),
        pool: None,
    };
    build_app(state, auth, rate_limit)
}

fn app() -> Router {
    app_with(AuthState::disabled(), default_rate_limit_state())
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

#[test]
fn normalize_limit_applies_defaults_and_bounds() {
    assert_eq!(normalize_limit(None), 50);
    assert_eq!(normalize_limit(Some(0)), 1);
    assert_eq!(normalize_limit(Some(-4)), 1);
    assert_eq!(normalize_limit(Some(1_000)), 200);
    assert_eq!(normalize_limit(Some(25)), 25);
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("validation_error", StatusCode::BAD_REQUEST),
        ("unauthorized", StatusCode::UNAUTHORIZED),
        ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
        ("upstream_error", StatusCode::BAD_GATEWAY),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "message").into_response();
        assert_eq!(response.status(), status, "code {code}");
    }
}

#[tokio::test]
async fn health_reports_disabled_database_for_memory_store() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["database"], "disabled");
}

#[tokio::test]
async fn realtime_search_expands_and_reports_zones() {
    let body = serde_json::json!({
        "latitude": 13.7563,
        "longitude": 100.5018,
        "initial_radius": 2,
        "max_radius": 10,
        "min_results": 3,
        "buffer_zones": true,
        "user_id": "u-1",
        "session_id": "s-1",
        "follow_user_location": true
    });
    let response = app()
        .oneshot(post_json("/restaurants/search/realtime", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);

    let data = &json["data"];
    let params = &data["search_params"];
    assert!(params["search_attempts"].as_u64().expect("attempts") > 1);
    let final_radius = params["final_radius_km"].as_f64().expect("final radius");
    assert!((2.0..=10.0).contains(&final_radius));
    assert!(params.get("effective_radius_km").is_none());

    let total = data["total"].as_u64().expect("total");
    assert!(total >= 3);
    let zones = &data["buffer_zones"];
    let zone_sum = zones["inner_zone"]["count"].as_u64().expect("inner")
        + zones["middle_zone"]["count"].as_u64().expect("middle")
        + zones["outer_zone"]["count"].as_u64().expect("outer");
    assert_eq!(zone_sum, total);
    assert!(data.get("core_buffer_distribution").is_none());

    let first = &data["restaurants"][0];
    assert_eq!(first["name"], "Thipsamai");
    assert!(first["distance_km"].is_number());
}

#[tokio::test]
async fn realtime_search_with_buffer_reports_distribution() {
    let body = serde_json::json!({
        "latitude": 13.7563,
        "longitude": 100.5018,
        "initial_radius": 1,
        "max_radius": 1,
        "min_results": 0,
        "buffer_radius_adjustment": 4.5
    });
    let response = app()
        .oneshot(post_json("/restaurants/search/realtime", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let data = &json["data"];
    assert_eq!(data["search_params"]["search_attempts"], 1);
    assert_eq!(data["search_params"]["buffer_radius_km"], 4.5);
    assert_eq!(data["search_params"]["effective_radius_km"], 5.5);

    let split = &data["core_buffer_distribution"];
    assert_eq!(split["core_results"], 2);
    assert_eq!(split["buffer_results"], 2);
    assert_eq!(data["total"], 4);
}

#[tokio::test]
async fn realtime_search_rejects_inverted_radii() {
    let body = serde_json::json!({
        "latitude": 13.7563,
        "longitude": 100.5018,
        "initial_radius": 8,
        "max_radius": 4,
        "min_results": 3
    });
    let response = app()
        .oneshot(post_json("/restaurants/search/realtime", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "validation_error");
    assert!(json["error"].as_str().expect("message").contains("initial_radius"));
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/restaurants/nearby")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-request-id", "req-malformed")
                .body(Body::from("{\"latitude\": 13.75,"))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["x-request-id"], "req-malformed");
    let json = json_body(response).await;
    assert_eq!(json["code"], "validation_error");
    assert_eq!(json["meta"]["request_id"], "req-malformed");
}

#[tokio::test]
async fn nearby_with_zero_buffer_has_no_buffer_results() {
    let body = serde_json::json!({
        "latitude": 13.7563,
        "longitude": 100.5018,
        "radius": 5,
        "buffer_radius": 0,
        "real_time": true
    });
    let response = app()
        .oneshot(post_json("/restaurants/nearby", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let data = &json["data"];
    assert_eq!(data["search_params"]["real_time"], true);
    assert_eq!(data["search_params"]["effective_radius_km"], 5.0);
    assert_eq!(data["distribution"]["buffer_zone_results"], 0);
    assert_eq!(data["distribution"]["core_radius_results"], data["total"]);
    assert_eq!(json["platforms_searched"], serde_json::json!(["internal"]));
}

#[tokio::test]
async fn nearby_filters_platforms_and_echoes_them() {
    let body = serde_json::json!({
        "latitude": 13.7563,
        "longitude": 100.5018,
        "radius": 10,
        "platforms": ["Grab"]
    });
    let response = app()
        .oneshot(post_json("/restaurants/nearby", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let names: Vec<&str> = json["data"]["restaurants"]
        .as_array()
        .expect("restaurants")
        .iter()
        .filter_map(|r| r["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Thipsamai", "Somtum Der"]);
    assert_eq!(json["platforms_searched"], serde_json::json!(["grab"]));
    assert!(json["data"].get("distribution").is_none());
}

#[tokio::test]
async fn search_routes_require_bearer_token_when_enabled() {
    let auth = AuthState::from_keys("secret-key", false).expect("auth");
    let body = serde_json::json!({
        "latitude": 13.7563,
        "longitude": 100.5018,
        "radius": 5
    });

    let response = app_with(auth.clone(), default_rate_limit_state())
        .oneshot(post_json("/restaurants/nearby", &body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let minted = response.headers()["x-request-id"]
        .to_str()
        .expect("request id")
        .to_string();
    let json = json_body(response).await;
    assert_eq!(json["code"], "unauthorized");
    assert_eq!(json["meta"]["request_id"], minted.as_str());

    let mut request = post_json("/restaurants/nearby", &body);
    request.headers_mut().insert(
        header::AUTHORIZATION,
        "Bearer secret-key".parse().expect("header"),
    );
    let response = app_with(auth, default_rate_limit_state())
        .oneshot(request)
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn search_routes_are_rate_limited() {
    let app = app_with(
        AuthState::disabled(),
        RateLimitState::new(1, Duration::from_secs(60)),
    );
    let body = serde_json::json!({
        "latitude": 13.7563,
        "longitude": 100.5018,
        "radius": 5
    });

    let first = app
        .clone()
        .oneshot(post_json("/restaurants/nearby", &body))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(post_json("/restaurants/nearby", &body))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}
