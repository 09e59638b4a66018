// In-memory implementation of `RecordStore`.
//
// Behaves like a remote table with last-write-wins upserts, which is all the
// core services rely on. Used by the core tests in place of Supabase.

use crate::core::events::{EventRecord, EventStore, LiveEventRow};
use crate::core::records::{Record, RecordStore, StoreError};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// A table of `R` rows keyed by their natural id.
pub struct InMemoryRecordStore<R: Record> {
    rows: DashMap<String, R>,
}

impl<R: Record> InMemoryRecordStore<R> {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    /// Start from existing rows, as if a previous run had written them.
    pub fn with_records(records: Vec<R>) -> Self {
        let store = Self::new();
        for record in records {
            store.rows.insert(record.id().to_string(), record);
        }
        store
    }
}

impl<R: Record> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for InMemoryRecordStore<R> {
    async fn upsert(&self, record: &R) -> Result<R, StoreError> {
        record.validate()?;
        self.rows.insert(record.id().to_string(), record.clone());
        Ok(record.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<R>, StoreError> {
        Ok(self.rows.get(id).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.rows.remove(id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<R>, StoreError> {
        Ok(self.rows.iter().map(|entry| entry.value().clone()).collect())
    }
}

#[async_trait]
impl EventStore for InMemoryRecordStore<EventRecord> {
    async fn insert_if_absent(&self, record: &EventRecord) -> Result<bool, StoreError> {
        record.validate()?;
        match self.rows.entry(record.id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(true)
            }
        }
    }

    async fn update_live_columns(&self, id: &str, row: &LiveEventRow) -> Result<(), StoreError> {
        if let Some(mut existing) = self.rows.get_mut(id) {
            existing.apply_row(row.clone());
        }
        Ok(())
    }
}
