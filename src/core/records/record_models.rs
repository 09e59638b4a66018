// Shared building blocks for everything we keep in the remote tables.
//
// Every table row is keyed by an external, platform-issued id (never a
// store-generated surrogate), so the `Record` trait only needs to expose that
// id and a validation hook.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Raised when a record or a platform object does not satisfy the data model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Unsupported value `{value}` for field `{field}`")]
    UnsupportedValue { field: &'static str, value: String },
}

/// A row in one of the remote tables.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The natural key of the row.
    fn id(&self) -> &str;

    /// Check the invariants serde cannot express.
    fn validate(&self) -> Result<(), ValidationError> {
        if self.id().trim().is_empty() {
            return Err(ValidationError::MissingField("id"));
        }
        Ok(())
    }
}

/// Current unix timestamp in seconds.
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
