// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-owner change notifications for live entry streams.
//!
//! Events carry no payload. A listener reacts by reloading the owner's full
//! entry set and recomputing its overview from scratch.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of each owner's channel. A lagging listener only needs to know
/// that something changed, so a small buffer is enough.
const CHANNEL_CAPACITY: usize = 16;

/// Why an owner's entry set changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotEvent {
    Created,
    Deleted,
}

/// Fan-out of change notifications keyed by owner ID.
#[derive(Clone, Default)]
pub struct SnapshotHub {
    channels: Arc<DashMap<String, broadcast::Sender<SnapshotEvent>>>,
}

impl SnapshotHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to changes of one owner's entries.
    pub fn subscribe(&self, owner_id: &str) -> broadcast::Receiver<SnapshotEvent> {
        self.channels
            .entry(owner_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Tell every listener of `owner_id` that its entries changed.
    ///
    /// Returns the number of listeners notified.
    pub fn notify(&self, owner_id: &str, event: SnapshotEvent) -> usize {
        let Some(sender) = self.channels.get(owner_id) else {
            return 0;
        };

        // Err only means nobody is listening right now.
        let delivered = sender.send(event).unwrap_or(0);
        tracing::debug!(owner_id, ?event, delivered, "Snapshot change notified");
        delivered
    }

    /// Drop the owner's channel once its last listener is gone.
    pub fn prune(&self, owner_id: &str) {
        self.channels
            .remove_if(owner_id, |_, sender| sender.receiver_count() == 0);
    }

    /// Number of owners with an open channel.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
