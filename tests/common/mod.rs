// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use liftsync::config::Config;
use liftsync::db::FirestoreDb;
use liftsync::middleware::auth::create_jwt;
use liftsync::routes::create_router;
use liftsync::services::{IdentityService, SnapshotHub, StaticAccount};
use liftsync::AppState;
use std::sync::Arc;

/// Account known to the offline identity service.
#[allow(dead_code)]
pub const TEST_EMAIL: &str = "lifter@example.com";
#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "correct horse";
#[allow(dead_code)]
pub const TEST_UID: &str = "test-uid-1";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_frontend_url("http://localhost:5173")
}

/// Same as `create_test_app` but with a specific frontend URL.
#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (axum::Router, Arc<AppState>) {
    build_app(frontend_url, FirestoreDb::new_mock())
}

/// Test app backed by a real database (the emulator).
#[allow(dead_code)]
pub fn create_test_app_with_db(db: FirestoreDb) -> (axum::Router, Arc<AppState>) {
    build_app("http://localhost:5173", db)
}

#[allow(dead_code)]
fn build_app(frontend_url: &str, db: FirestoreDb) -> (axum::Router, Arc<AppState>) {
    let config = Config {
        frontend_url: frontend_url.to_string(),
        ..Config::default()
    };

    let identity = IdentityService::new_with_static_accounts(vec![StaticAccount {
        email: TEST_EMAIL.to_string(),
        password: TEST_PASSWORD.to_string(),
        uid: TEST_UID.to_string(),
    }]);

    let state = Arc::new(AppState {
        config,
        db,
        identity,
        snapshots: SnapshotHub::new(),
    });

    (create_router(state.clone()), state)
}

/// Create a session token the auth middleware accepts.
#[allow(dead_code)]
pub fn create_test_jwt(uid: &str, signing_key: &[u8]) -> String {
    create_jwt(uid, Some(TEST_EMAIL), signing_key).expect("Failed to create JWT")
}

/// Generate a unique user ID for test isolation.
#[allow(dead_code)]
pub fn unique_uid(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
