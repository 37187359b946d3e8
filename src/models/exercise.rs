// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Derived per-exercise views (never stored).

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::entry::EntryView;

/// Weight change between the two most recent entries of an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Progress {
    /// newest − second newest (kg), rounded to one decimal
    pub delta: f64,
    /// Change relative to the second newest, rounded to one decimal
    pub percent: f64,
}

/// One exercise as shown in the overview.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExerciseSummary {
    pub name: String,
    pub entry_count: u32,
    pub latest: EntryView,
    /// Full history, newest first
    pub entries: Vec<EntryView>,
    /// Absent when there is nothing to compare
    pub progress: Option<Progress>,
}
