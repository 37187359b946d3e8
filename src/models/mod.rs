// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod entry;
pub mod exercise;

pub use entry::{Entry, EntryView, NewEntry};
pub use exercise::{ExerciseSummary, Progress};
