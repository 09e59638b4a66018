// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "records/mod.rs"]
pub mod records;

#[path = "events/mod.rs"]
pub mod events;

#[path = "notifications/mod.rs"]
pub mod notifications;

#[path = "scheduling/periodic_task.rs"]
pub mod scheduling;
