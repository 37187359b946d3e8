// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Input validation tests for the entry and overview endpoints.
//!
//! Every rejection here happens before the database is touched, so the
//! offline test app answers with the validation status rather than 500.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;

fn bearer(state: &liftsync::AppState) -> String {
    format!(
        "Bearer {}",
        common::create_test_jwt(common::TEST_UID, &state.config.jwt_signing_key)
    )
}

async fn post_entry(body: serde_json::Value) -> axum::response::Response {
    let (app, state) = common::create_test_app();

    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/entries")
            .header(header::AUTHORIZATION, bearer(&state))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_blank_exercise_name_rejected() {
    let response = post_entry(json!({ "exercise": "", "weight": 50, "sets": 3, "reps": 10 })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "bad_request");
    assert_eq!(body["details"], "Exercise name is required");
}

#[tokio::test]
async fn test_whitespace_exercise_name_rejected() {
    let response = post_entry(json!({ "exercise": "   \t", "weight": 50 })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_exercise_name_rejected() {
    let response = post_entry(json!({ "weight": 50, "sets": 3, "reps": 10 })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overlong_exercise_name_rejected() {
    let response = post_entry(json!({ "exercise": "x".repeat(101) })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_negative_weight_rejected() {
    let response = post_entry(json!({ "exercise": "Squat", "weight": -10 })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["details"], "Weight must be a non-negative number");
}

#[tokio::test]
async fn test_negative_sets_rejected_by_extractor() {
    let response = post_entry(json!({ "exercise": "Squat", "sets": -1 })).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_valid_entry_reaches_database() {
    let response = post_entry(json!({ "exercise": "Squat", "weight": null, "sets": 3 })).await;

    // Validation passed; the offline database then fails the write.
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_overlong_filter_rejected() {
    let (app, state) = common::create_test_app();
    let query = "a".repeat(101);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/exercises?q={}", query))
                .header(header::AUTHORIZATION, bearer(&state))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overlong_entry_id_rejected() {
    let (app, state) = common::create_test_app();
    let entry_id = "x".repeat(200);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/entries/{}", entry_id))
                .header(header::AUTHORIZATION, bearer(&state))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
