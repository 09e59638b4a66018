pub mod record_models;
pub mod record_store;

pub use record_models::{current_timestamp, Record, ValidationError};
pub use record_store::{RecordStore, StoreError};
