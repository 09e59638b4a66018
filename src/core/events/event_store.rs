use async_trait::async_trait;

use super::event_models::{EventRecord, LiveEventRow};
use crate::core::records::{RecordStore, StoreError};

/// The `events` table, plus the two column-scoped writes the push callbacks use.
///
/// A full `upsert` rewrites the notified flags with whatever the caller read
/// earlier. The gateway callbacks run next to the sync loop, so they only use
/// the writes below, which never touch the loop-owned columns of an existing
/// row.
#[async_trait]
pub trait EventStore: RecordStore<EventRecord> {
    /// Insert `record` unless a row with its id exists. Returns whether a row
    /// was inserted; an existing row is left exactly as it was.
    async fn insert_if_absent(&self, record: &EventRecord) -> Result<bool, StoreError>;

    /// Overwrite the live-derived columns of the row `id`. A missing row is
    /// not an error.
    async fn update_live_columns(&self, id: &str, row: &LiveEventRow) -> Result<(), StoreError>;
}
