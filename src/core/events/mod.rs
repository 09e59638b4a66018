pub mod event_models;
pub mod event_platform;
pub mod event_store;
pub mod event_sync_service;

pub use event_models::{EntityType, EventRecord, EventStatus, LeadTime, LiveEvent, LiveEventRow};
pub use event_platform::{EventPlatform, PlatformError, Reminder};
pub use event_store::EventStore;
pub use event_sync_service::{EventSyncService, PushOutcome};
