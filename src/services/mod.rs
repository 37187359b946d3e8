// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod aggregator;
pub mod identity;
pub mod snapshots;

pub use identity::{IdentityService, SignedInUser, StaticAccount};
pub use snapshots::{SnapshotEvent, SnapshotHub};
