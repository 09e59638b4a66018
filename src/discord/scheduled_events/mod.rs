// Scheduled-event glue between serenity and the core sync service.
// - `mapping.rs` turns serenity events into validated `LiveEvent`s.
// - `platform.rs` implements `EventPlatform` on top of the HTTP client.
// - `handlers.rs` reacts to gateway callbacks right away.
// - `sync_task.rs` runs the periodic reconciliation.

pub mod handlers;
pub mod mapping;
pub mod platform;
pub mod reminder_embeds;
pub mod sync_task;
