// Discord layer - commands, gateway handlers and the platform adapter.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "scheduled_events/mod.rs"]
pub mod scheduled_events;

// Re-export command types for convenience
pub use commands::notifications::{Data, Error};
