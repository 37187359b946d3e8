// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{EntryView, ExerciseSummary, NewEntry};
use crate::services::aggregator;
use crate::services::snapshots::SnapshotEvent;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Longest accepted filter string (characters).
pub const MAX_QUERY_LEN: usize = 100;
/// Longest accepted entry ID in a path.
const MAX_ENTRY_ID_LEN: usize = 128;
/// Random bytes per generated entry ID (hex-encoded to 20 chars).
const ENTRY_ID_BYTES: usize = 10;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/entries", get(list_entries).post(create_entry))
        .route("/api/entries/{id}", delete(delete_entry))
        .route("/api/exercises", get(get_exercises))
        .route("/api/account", delete(delete_account))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeResponse {
    pub uid: String,
    pub email: Option<String>,
}

/// Get the signed-in user.
async fn get_me(Extension(user): Extension<AuthUser>) -> Json<MeResponse> {
    Json(MeResponse {
        uid: user.uid,
        email: user.email,
    })
}

// ─── Entries ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EntriesResponse {
    /// Newest first
    pub entries: Vec<EntryView>,
    pub total: u32,
}

/// List all of the user's entries, newest first.
async fn list_entries(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<EntriesResponse>> {
    let mut entries = state.db.list_entries_for_owner(&user.uid).await?;
    aggregator::sort_newest_first(&mut entries);

    tracing::debug!(uid = %user.uid, count = entries.len(), "Listing entries");

    Ok(Json(EntriesResponse {
        total: aggregator::saturating_count(entries.len()),
        entries: entries.iter().map(EntryView::from).collect(),
    }))
}

/// Record a new exercise.
async fn create_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<NewEntry>,
) -> Result<(StatusCode, Json<EntryView>)> {
    let entry = request.into_entry(generate_entry_id()?, &user.uid, chrono::Utc::now())?;

    state.db.create_entry(&entry).await?;
    state.snapshots.notify(&user.uid, SnapshotEvent::Created);

    tracing::info!(
        uid = %user.uid,
        entry_id = %entry.id,
        exercise = %entry.exercise,
        "Entry created"
    );

    Ok((StatusCode::CREATED, Json(EntryView::from(&entry))))
}

/// Delete one of the user's entries.
///
/// Entries owned by someone else are reported as not found.
async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(entry_id): Path<String>,
) -> Result<StatusCode> {
    validate_entry_id(&entry_id)?;

    let not_found = || AppError::NotFound(format!("Entry {} not found", entry_id));

    let entry = state.db.get_entry(&entry_id).await?.ok_or_else(not_found)?;
    if entry.owner_id != user.uid {
        tracing::warn!(
            uid = %user.uid,
            entry_id = %entry_id,
            "Attempt to delete another user's entry"
        );
        return Err(not_found());
    }

    state.db.delete_entry(&entry_id).await?;
    state.snapshots.notify(&user.uid, SnapshotEvent::Deleted);

    tracing::info!(uid = %user.uid, entry_id = %entry_id, "Entry deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn validate_entry_id(entry_id: &str) -> Result<()> {
    if entry_id.is_empty() || entry_id.len() > MAX_ENTRY_ID_LEN || entry_id.contains('/') {
        return Err(AppError::BadRequest("Invalid entry id".to_string()));
    }
    Ok(())
}

/// Generate a random 20-character document ID.
fn generate_entry_id() -> Result<String> {
    let mut bytes = [0u8; ENTRY_ID_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;
    Ok(hex::encode(bytes))
}

// ─── Exercise Overview ───────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ExercisesQuery {
    /// Case-insensitive substring filter on exercise names
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExercisesResponse {
    /// Most recently trained exercise first
    pub exercises: Vec<ExerciseSummary>,
    /// Entries across all exercises, before filtering
    pub total_entries: u32,
    pub query: Option<String>,
}

/// Reject filter strings that are too long to be a real exercise name.
pub fn validate_query(query: Option<&str>) -> Result<()> {
    match query {
        Some(q) if q.chars().count() > MAX_QUERY_LEN => Err(AppError::BadRequest(format!(
            "Filter must be at most {} characters",
            MAX_QUERY_LEN
        ))),
        _ => Ok(()),
    }
}

/// Load the user's entries and build the grouped overview.
pub async fn load_overview(
    state: &AppState,
    uid: &str,
    query: Option<&str>,
) -> Result<ExercisesResponse> {
    let entries = state.db.list_entries_for_owner(uid).await?;
    let total_entries = aggregator::saturating_count(entries.len());

    Ok(ExercisesResponse {
        exercises: aggregator::overview(entries, query),
        total_entries,
        query: query.map(str::to_string),
    })
}

/// Get entries grouped by exercise with progress indicators.
async fn get_exercises(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ExercisesQuery>,
) -> Result<Json<ExercisesResponse>> {
    validate_query(params.q.as_deref())?;

    tracing::debug!(uid = %user.uid, query = ?params.q, "Fetching exercise overview");

    Ok(Json(
        load_overview(&state, &user.uid, params.q.as_deref()).await?,
    ))
}

// ─── Account Data Deletion ───────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub deleted_entries: u32,
}

/// Delete every entry the user has recorded.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteAccountResponse>> {
    tracing::info!(uid = %user.uid, "User-initiated data deletion");

    let deleted = state.db.delete_entries_for_owner(&user.uid).await?;
    state.snapshots.notify(&user.uid, SnapshotEvent::Deleted);

    Ok(Json(DeleteAccountResponse {
        success: true,
        deleted_entries: aggregator::saturating_count(deleted),
    }))
}
