// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entry route tests against the Firestore emulator.
//!
//! These drive the full router with a real database so that ownership
//! checks and change notifications run. Each test uses fresh user IDs.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use liftsync::services::SnapshotEvent;
use liftsync::AppState;
use serde_json::{json, Value};
use tokio::sync::broadcast::error::TryRecvError;
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app_with_db, create_test_jwt, test_db, unique_uid};

fn bearer(state: &AppState, uid: &str) -> String {
    format!("Bearer {}", create_test_jwt(uid, &state.config.jwt_signing_key))
}

async fn create_entry(app: &Router, state: &AppState, uid: &str, body: Value) -> Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/entries")
                .header(header::AUTHORIZATION, bearer(state, uid))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn send(
    app: &Router,
    state: &AppState,
    uid: &str,
    method: &str,
    uri: &str,
) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, bearer(state, uid))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_entry_notifies_owner() {
    require_emulator!();

    let (app, state) = create_test_app_with_db(test_db().await);
    let uid = unique_uid("lifter");
    let mut changes = state.snapshots.subscribe(&uid);

    let created = create_entry(
        &app,
        &state,
        &uid,
        json!({ "exercise": "  Squat ", "weight": 100, "sets": 5, "reps": 5 }),
    )
    .await;

    assert_eq!(created["exercise"], "Squat");
    assert_eq!(created["volume"], 2500.0);
    assert!(created["created_at"].is_string());
    assert_eq!(changes.try_recv(), Ok(SnapshotEvent::Created));

    let stored = state
        .db
        .get_entry(created["id"].as_str().unwrap())
        .await
        .unwrap()
        .expect("Entry not stored");
    assert_eq!(stored.owner_id, uid);
}

#[tokio::test]
async fn test_delete_foreign_entry_is_not_found() {
    require_emulator!();

    let (app, state) = create_test_app_with_db(test_db().await);
    let alice = unique_uid("alice");
    let bob = unique_uid("bob");

    let created = create_entry(
        &app,
        &state,
        &alice,
        json!({ "exercise": "Row", "weight": 60 }),
    )
    .await;
    let entry_id = created["id"].as_str().unwrap();

    let mut alice_changes = state.snapshots.subscribe(&alice);
    let mut bob_changes = state.snapshots.subscribe(&bob);

    let uri = format!("/api/entries/{}", entry_id);
    let response = send(&app, &state, &bob, "DELETE", &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Same response as an entry that never existed.
    let missing = send(&app, &state, &bob, "DELETE", "/api/entries/does-not-exist").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    assert!(state.db.get_entry(entry_id).await.unwrap().is_some());
    assert_eq!(alice_changes.try_recv(), Err(TryRecvError::Empty));
    assert_eq!(bob_changes.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn test_delete_entry_keeps_siblings() {
    require_emulator!();

    let (app, state) = create_test_app_with_db(test_db().await);
    let uid = unique_uid("lifter");

    let first = create_entry(&app, &state, &uid, json!({ "exercise": "Squat", "weight": 90 })).await;
    let second = create_entry(&app, &state, &uid, json!({ "exercise": "Squat", "weight": 100 })).await;

    let mut changes = state.snapshots.subscribe(&uid);

    let response = send(
        &app,
        &state,
        &uid,
        "DELETE",
        &format!("/api/entries/{}", second["id"].as_str().unwrap()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(changes.try_recv(), Ok(SnapshotEvent::Deleted));

    let response = send(&app, &state, &uid, "GET", "/api/exercises").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["total_entries"], 1);
    let exercises = body["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 1);
    assert_eq!(exercises[0]["name"], "Squat");
    assert_eq!(exercises[0]["entry_count"], 1);
    assert_eq!(exercises[0]["latest"]["id"], first["id"]);
    assert!(exercises[0]["progress"].is_null());
}

#[tokio::test]
async fn test_exercises_grouped_and_filtered() {
    require_emulator!();

    let (app, state) = create_test_app_with_db(test_db().await);
    let uid = unique_uid("lifter");

    create_entry(&app, &state, &uid, json!({ "exercise": "Squat", "weight": 90 })).await;
    create_entry(&app, &state, &uid, json!({ "exercise": "Squat", "weight": 100 })).await;
    create_entry(&app, &state, &uid, json!({ "exercise": "Row", "weight": 40 })).await;

    let response = send(&app, &state, &uid, "GET", "/api/exercises").await;
    let body = body_json(response).await;
    let names: Vec<&str> = body["exercises"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Row", "Squat"]);
    assert_eq!(body["exercises"][1]["progress"]["delta"], 10.0);
    assert_eq!(body["exercises"][1]["progress"]["percent"], 11.1);

    let response = send(&app, &state, &uid, "GET", "/api/exercises?q=SQ").await;
    let body = body_json(response).await;
    assert_eq!(body["total_entries"], 3);
    assert_eq!(body["query"], "SQ");
    assert_eq!(body["exercises"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_account_removes_all_entries() {
    require_emulator!();

    let (app, state) = create_test_app_with_db(test_db().await);
    let uid = unique_uid("lifter");
    let other = unique_uid("other");

    for exercise in ["Squat", "Bench Press", "Deadlift"] {
        create_entry(&app, &state, &uid, json!({ "exercise": exercise, "weight": 50 })).await;
    }
    create_entry(&app, &state, &other, json!({ "exercise": "Squat", "weight": 70 })).await;

    let mut changes = state.snapshots.subscribe(&uid);

    let response = send(&app, &state, &uid, "DELETE", "/api/account").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["deleted_entries"], 3);
    assert_eq!(changes.try_recv(), Ok(SnapshotEvent::Deleted));

    let response = send(&app, &state, &uid, "GET", "/api/entries").await;
    let body = body_json(response).await;
    assert_eq!(body["total"], 0);

    assert_eq!(state.db.list_entries_for_owner(&other).await.unwrap().len(), 1);
}
