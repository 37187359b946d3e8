//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// Workout entries (keyed by entry id)
    pub const ENTRIES: &str = "entries";
}
