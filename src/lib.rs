// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! LiftSync: workout logging backend
//!
//! Records exercises per user in Firestore and serves them grouped by
//! exercise, newest first, with a progress indicator comparing the two most
//! recent weights.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::{IdentityService, SnapshotHub};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub identity: IdentityService,
    pub snapshots: SnapshotHub,
}
