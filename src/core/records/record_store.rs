use async_trait::async_trait;
use thiserror::Error;

use super::record_models::{Record, ValidationError};

/// Errors raised by a record store. The sync loop treats every one of them as
/// "abort this cycle", never as "retry immediately".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid record: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Store returned no rows for an upsert")]
    EmptyResponse,

    #[error("Store configuration error: {0}")]
    Config(String),
}

/// Port for one remote table of `R` rows.
///
/// Implementations are expected to give last-write-wins semantics: `upsert`
/// may be applied repeatedly with the same record.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Insert or overwrite the row and return the stored copy, which may carry
    /// server-side defaults the input did not have.
    async fn upsert(&self, record: &R) -> Result<R, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<R>, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Every row in the table. There is no pagination contract.
    async fn list(&self) -> Result<Vec<R>, StoreError>;
}
