//! End-to-end tests for the REST API: routes, envelope shape, status codes.

mod support;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use gymlog_rust::http::{create_router, AppState};
use gymlog_rust::models::NewSet;

use support::{dropset_set, normal_set, seeded_repo, superset_set, USER_ID};

fn app() -> Router {
    create_router(AppState::new(seeded_repo()))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn to_json(set: &NewSet) -> Value {
    serde_json::to_value(set).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_reports_connected() {
    let (status, body) = send(app(), get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_create_set_returns_201_with_envelope() {
    let (status, body) = send(app(), json_request("POST", "/sets", to_json(&normal_set()))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Set created successfully");
    assert_eq!(body["data"]["user_id"], USER_ID);
    assert_eq!(body["data"]["completed"], true);
    assert!(body["data"]["id"].is_i64());
}

#[tokio::test]
async fn test_create_invalid_set_returns_400_with_violations() {
    let mut set = normal_set();
    set.reps.primary = 0;

    let (status, body) = send(app(), json_request("POST", "/sets", to_json(&set))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["errors"], json!(["Primary reps must be positive"]));
}

#[tokio::test]
async fn test_create_with_unknown_exercise_returns_400() {
    let mut set = normal_set();
    set.exercise_id = 999;

    let (status, body) = send(app(), json_request("POST", "/sets", to_json(&set))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Referenced exercise does not exist");
}

#[tokio::test]
async fn test_create_with_unknown_set_type_returns_enveloped_400() {
    let mut payload = to_json(&normal_set());
    payload["set_type"] = json!("giant");

    let (status, body) = send(app(), json_request("POST", "/sets", payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], Value::Null);
    assert!(body["message"].as_str().unwrap().contains("giant"));
}

#[tokio::test]
async fn test_create_with_malformed_json_returns_enveloped_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/sets")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_get_set_with_malformed_id_returns_enveloped_400() {
    let (status, body) = send(app(), get_request("/sets/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid set ID: abc");
}

#[tokio::test]
async fn test_get_missing_set_returns_404() {
    let (status, body) = send(app(), get_request("/sets/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Set not found");
}

#[tokio::test]
async fn test_get_set_resolves_exercise_references() {
    let app = app();
    let (_, created) = send(
        app.clone(),
        json_request("POST", "/sets", to_json(&superset_set())),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(app, get_request(&format!("/sets/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["exercise"]["name"], "Bench Press");
    assert_eq!(body["data"]["superset_exercise"]["name"], "Cable Fly");
}

#[tokio::test]
async fn test_update_with_empty_body_returns_400() {
    let app = app();
    let (_, created) = send(
        app.clone(),
        json_request("POST", "/sets", to_json(&normal_set())),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(app, json_request("PUT", &format!("/sets/{}", id), json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"], json!(["No fields to update"]));
}

#[tokio::test]
async fn test_update_applies_fields_and_returns_envelope() {
    let app = app();
    let (_, created) = send(
        app.clone(),
        json_request("POST", "/sets", to_json(&normal_set())),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        app,
        json_request(
            "PUT",
            &format!("/sets/{}", id),
            json!({"weight": {"primary": 110.0}, "note": "new PR"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Set updated successfully");
    assert_eq!(body["data"]["weight"]["primary"], 110.0);
    assert_eq!(body["data"]["note"], "new PR");
}

#[tokio::test]
async fn test_update_clears_superset_fields_with_nulls() {
    let app = app();
    let (_, created) = send(
        app.clone(),
        json_request("POST", "/sets", to_json(&superset_set())),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        app,
        json_request(
            "PUT",
            &format!("/sets/{}", id),
            json!({
                "set_type": "normal",
                "superset_exercise_id": null,
                "weight": {"primary": 50.0},
                "reps": {"primary": 10}
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["set_type"], "normal");
    assert!(body["data"].get("superset_exercise_id").is_none());
}

#[tokio::test]
async fn test_update_missing_set_returns_404() {
    let (status, body) = send(
        app(),
        json_request("PUT", "/sets/999", json!({"set_number": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Set not found");
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let app = app();
    let (_, created) = send(
        app.clone(),
        json_request("POST", "/sets", to_json(&normal_set())),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        app.clone(),
        Request::builder()
            .method("DELETE")
            .uri(format!("/sets/{}", id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Set deleted successfully");

    let (status, _) = send(
        app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/sets/{}", id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_create_with_empty_array_returns_400() {
    let (status, body) = send(
        app(),
        json_request("POST", "/sets/bulk", json!({"sets": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Sets array is required and cannot be empty");
}

#[tokio::test]
async fn test_bulk_create_reports_partial_success() {
    let mut invalid = normal_set();
    invalid.weight.primary = -5.0;
    let payload = json!({"sets": [to_json(&normal_set()), to_json(&invalid), to_json(&dropset_set())]});

    let (status, body) = send(app(), json_request("POST", "/sets/bulk", payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "2 sets created successfully, 1 failed");
    assert_eq!(body["data"]["created"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["errors"][0]["index"], 1);
}

#[tokio::test]
async fn test_bulk_create_with_no_successes_returns_400() {
    let mut invalid = normal_set();
    invalid.set_number = 0;
    let payload = json!({"sets": [to_json(&invalid)]});

    let (status, body) = send(app(), json_request("POST", "/sets/bulk", payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "0 sets created successfully, 1 failed");
}

#[tokio::test]
async fn test_user_list_echoes_pagination() {
    let app = app();
    for _ in 0..3 {
        send(
            app.clone(),
            json_request("POST", "/sets", to_json(&normal_set())),
        )
        .await;
    }

    let (status, body) = send(app, get_request("/sets/user/1?limit=2&offset=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Sets retrieved successfully");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"], json!({"limit": 2, "offset": 1, "count": 2}));
}

#[tokio::test]
async fn test_user_list_with_malformed_limit_returns_400() {
    let (status, body) = send(app(), get_request("/sets/user/1?limit=lots")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid limit: lots");
}

#[tokio::test]
async fn test_session_list_is_ordered_and_counted() {
    let app = app();
    for set_number in [2, 1] {
        let mut set = normal_set();
        set.workout_session_id = Some(9);
        set.set_number = set_number;
        send(app.clone(), json_request("POST", "/sets", to_json(&set))).await;
    }

    let (status, body) = send(app, get_request("/sets/session/9")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["set_number"], 1);
    assert_eq!(body["data"][1]["set_number"], 2);
}

#[tokio::test]
async fn test_stats_endpoint_echoes_period_days() {
    let app = app();
    send(
        app.clone(),
        json_request("POST", "/sets", to_json(&normal_set())),
    )
    .await;

    let (status, body) = send(app, get_request("/sets/user/1/stats?days=7")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Workout statistics retrieved successfully");
    assert_eq!(body["data"]["period_days"], 7);
    assert_eq!(body["data"]["total_sets"], 1);
    assert_eq!(body["data"]["total_volume_lifted"], 1000.0);
}

#[tokio::test]
async fn test_stats_endpoint_defaults_to_30_days() {
    let (status, body) = send(app(), get_request("/sets/user/1/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["period_days"], 30);
    assert_eq!(body["data"]["total_sets"], 0);
}
