// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end planner session flow over HTTP.
//!
//! Uses the offline mock database: everything except save works without a
//! backend, and a failed save must leave the in-memory session intact.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn send(
    app: &Router,
    token: &str,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json");

    let request = match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Open a session and configure the example 08:00-10:00 hour grid with one
/// catalog activity.
async fn open_example_session(app: &Router, token: &str) {
    let (status, _) = send(app, token, Method::POST, "/api/planner/session", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, view) = send(
        app,
        token,
        Method::PUT,
        "/api/planner/session/grid",
        Some(json!({
            "start_hour": 8,
            "end_hour": 10,
            "block": 60,
            "include_weekends": false,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["slots"], json!(["08:00", "09:00"]));
    assert_eq!(view["days"].as_array().unwrap().len(), 5);

    let (status, _) = send(
        app,
        token,
        Method::POST,
        "/api/planner/session/activities",
        Some(json!({ "category": "HIGH LIFE TIME (HLV)", "name": "Gym" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_full_assignment_flow() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);

    open_example_session(&app, &token).await;

    // Cell click
    let (status, view) = send(
        &app,
        &token,
        Method::POST,
        "/api/planner/session/cell",
        Some(json!({ "time": "08:00", "day": "Monday" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["selection"]["state"], "CellSelected");

    // Activity select
    let (status, view) = send(
        &app,
        &token,
        Method::POST,
        "/api/planner/session/activity",
        Some(json!({ "category": "HIGH LIFE TIME (HLV)", "name": "Gym" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["selection"]["state"], "ActivitySelected");

    // Duration select commits and returns to idle
    let (status, view) = send(
        &app,
        &token,
        Method::POST,
        "/api/planner/session/duration",
        Some(json!({ "duration_minutes": 60 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["selection"]["state"], "Idle");
    assert_eq!(view["schedule"]["08:00"]["Monday"]["activity"], "Gym");
    assert_eq!(
        view["schedule"]["08:00"]["Monday"]["category"],
        "HIGH LIFE TIME (HLV)"
    );
    assert!(view["schedule"]["09:00"].is_null());

    // Productivity summary reflects exactly one HLV cell
    assert_eq!(view["summary"]["counts"]["HLV"], 1);
    assert_eq!(view["summary"]["counts"]["HDV"], 0);
    assert_eq!(view["summary"]["counts"]["LDV"], 0);
    assert_eq!(view["summary"]["counts"]["ZV"], 0);
    assert_eq!(view["summary"]["total_hours"], 1.0);
    assert_eq!(view["summary"]["score"], 4.0);
}

#[tokio::test]
async fn test_cancel_leaves_schedule_untouched() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-2", &state.config.jwt_signing_key);

    open_example_session(&app, &token).await;

    send(
        &app,
        &token,
        Method::POST,
        "/api/planner/session/cell",
        Some(json!({ "time": "09:00", "day": "Friday" })),
    )
    .await;

    let (status, view) = send(
        &app,
        &token,
        Method::POST,
        "/api/planner/session/cancel",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["selection"]["state"], "Idle");
    assert_eq!(view["schedule"], json!({}));
}

#[tokio::test]
async fn test_out_of_order_events_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-3", &state.config.jwt_signing_key);

    open_example_session(&app, &token).await;

    // Duration before any selection
    let (status, body) = send(
        &app,
        &token,
        Method::POST,
        "/api/planner/session/duration",
        Some(json!({ "duration_minutes": 60 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    // Clicking a cell that is not on the grid
    let (status, _) = send(
        &app,
        &token,
        Method::POST,
        "/api/planner/session/cell",
        Some(json!({ "time": "23:00", "day": "Monday" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Weekend day while weekends are excluded
    let (status, _) = send(
        &app,
        &token,
        Method::POST,
        "/api/planner/session/cell",
        Some(json!({ "time": "08:00", "day": "Saturday" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overwrite_and_clipping_through_api() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-4", &state.config.jwt_signing_key);

    open_example_session(&app, &token).await;
    send(
        &app,
        &token,
        Method::POST,
        "/api/planner/session/activities",
        Some(json!({ "category": "ZERO VALUE (ZV)", "name": "Scrolling" })),
    )
    .await;

    // 4-hour Gym assignment starting at the last slot clips to one cell
    for (endpoint, body) in [
        ("cell", json!({ "time": "09:00", "day": "Monday" })),
        (
            "activity",
            json!({ "category": "HIGH LIFE TIME (HLV)", "name": "Gym" }),
        ),
        ("duration", json!({ "duration_minutes": 240 })),
    ] {
        let uri = format!("/api/planner/session/{}", endpoint);
        let (status, _) = send(&app, &token, Method::POST, &uri, Some(body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, view) = send(&app, &token, Method::GET, "/api/planner/session", None).await;
    assert_eq!(view["schedule"]["09:00"]["Monday"]["activity"], "Gym");
    assert_eq!(view["summary"]["counts"]["HLV"], 1);

    // Re-committing a different activity overwrites entirely
    for (endpoint, body) in [
        ("cell", json!({ "time": "09:00", "day": "Monday" })),
        (
            "activity",
            json!({ "category": "ZERO VALUE (ZV)", "name": "Scrolling" }),
        ),
        ("duration", json!({ "duration_minutes": 60 })),
    ] {
        let uri = format!("/api/planner/session/{}", endpoint);
        let (status, _) = send(&app, &token, Method::POST, &uri, Some(body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, view) = send(&app, &token, Method::GET, "/api/planner/session", None).await;
    assert_eq!(view["schedule"]["09:00"]["Monday"]["activity"], "Scrolling");
    assert_eq!(
        view["schedule"]["09:00"]["Monday"]["category"],
        "ZERO VALUE (ZV)"
    );
    assert_eq!(view["summary"]["counts"]["HLV"], 0);
    assert_eq!(view["summary"]["counts"]["ZV"], 1);
}

#[tokio::test]
async fn test_failed_save_leaves_session_intact() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-5", &state.config.jwt_signing_key);

    open_example_session(&app, &token).await;

    for (endpoint, body) in [
        ("cell", json!({ "time": "08:00", "day": "Monday" })),
        (
            "activity",
            json!({ "category": "HIGH LIFE TIME (HLV)", "name": "Gym" }),
        ),
        ("duration", json!({ "duration_minutes": 120 })),
    ] {
        let uri = format!("/api/planner/session/{}", endpoint);
        send(&app, &token, Method::POST, &uri, Some(body)).await;
    }

    // The mock db is offline: save must fail as a database error...
    let (status, body) = send(
        &app,
        &token,
        Method::POST,
        "/api/planner/session/save",
        Some(json!({ "title": "Week 1" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "database_error");

    // ...and the in-memory session survives for a retry
    let (status, view) = send(&app, &token, Method::GET, "/api/planner/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["title"], "Week 1");
    assert_eq!(view["schedule"]["08:00"]["Monday"]["activity"], "Gym");
    assert_eq!(view["schedule"]["09:00"]["Monday"]["activity"], "Gym");
}

#[tokio::test]
async fn test_save_without_title_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-6", &state.config.jwt_signing_key);

    open_example_session(&app, &token).await;

    let (status, body) = send(
        &app,
        &token,
        Method::POST,
        "/api/planner/session/save",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_session_is_per_user() {
    let (app, state) = common::create_test_app();
    let token_a = common::create_test_jwt("user-a", &state.config.jwt_signing_key);
    let token_b = common::create_test_jwt("user-b", &state.config.jwt_signing_key);

    open_example_session(&app, &token_a).await;

    // User B has no session yet
    let (status, body) = send(&app, &token_b, Method::GET, "/api/planner/session", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}
