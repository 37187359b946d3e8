// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout entry model for storage and API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::AppError;

/// Maximum accepted length of an exercise name (characters).
pub const MAX_EXERCISE_NAME_LEN: usize = 100;

/// Stored workout entry in Firestore.
///
/// Numeric fields default to zero and the timestamp to `None` so that
/// documents written by older clients still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Entry ID (also used as document ID)
    pub id: String,
    /// User ID of the owner
    pub owner_id: String,
    /// Exercise name, matched exactly when grouping
    pub exercise: String,
    /// Weight in kilograms
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: u32,
    /// When the entry was written (assigned by the server)
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request body for creating an entry.
///
/// Blank numeric inputs arrive as `null` or are omitted entirely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEntry {
    #[serde(default)]
    pub exercise: String,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
}

impl NewEntry {
    /// Validate the request and build the entry to store.
    pub fn into_entry(
        self,
        id: String,
        owner_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Entry, AppError> {
        let exercise = self.exercise.trim();
        if exercise.is_empty() {
            return Err(AppError::BadRequest(
                "Exercise name is required".to_string(),
            ));
        }
        if exercise.chars().count() > MAX_EXERCISE_NAME_LEN {
            return Err(AppError::BadRequest(format!(
                "Exercise name must be at most {} characters",
                MAX_EXERCISE_NAME_LEN
            )));
        }

        let weight = self.weight.unwrap_or(0.0);
        if !weight.is_finite() || weight < 0.0 {
            return Err(AppError::BadRequest(
                "Weight must be a non-negative number".to_string(),
            ));
        }

        Ok(Entry {
            id,
            owner_id: owner_id.to_string(),
            exercise: exercise.to_string(),
            weight,
            sets: self.sets.unwrap_or(0),
            reps: self.reps.unwrap_or(0),
            created_at: Some(now),
        })
    }
}

/// Entry as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EntryView {
    pub id: String,
    pub exercise: String,
    pub weight: f64,
    pub sets: u32,
    pub reps: u32,
    /// weight × sets × reps, absent when any factor is zero
    pub volume: Option<f64>,
    pub created_at: Option<String>,
}

impl From<&Entry> for EntryView {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id.clone(),
            exercise: entry.exercise.clone(),
            weight: entry.weight,
            sets: entry.sets,
            reps: entry.reps,
            volume: crate::services::aggregator::compute_volume(entry),
            created_at: entry
                .created_at
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}
