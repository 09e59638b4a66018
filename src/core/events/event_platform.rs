use async_trait::async_trait;
use thiserror::Error;

use super::event_models::{EventRecord, LeadTime, LiveEvent};

/// Errors raised by the chat platform adapter.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Community {0} could not be resolved")]
    CommunityNotFound(u64),

    #[error("Invalid platform id: {0}")]
    InvalidId(String),

    #[error("Member {member_id} cannot receive direct messages: {reason}")]
    Unreachable { member_id: String, reason: String },

    #[error("Platform request failed: {0}")]
    Request(String),
}

/// Everything the Discord layer needs to render one reminder.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub lead: LeadTime,
    pub event_id: String,
    pub event_name: String,
    pub description: String,
    pub location: String,
    pub start_time: i64,
    pub discord_link: String,
}

impl Reminder {
    pub fn for_event(record: &EventRecord, lead: LeadTime) -> Self {
        Self {
            lead,
            event_id: record.id.clone(),
            event_name: record.name.clone(),
            description: record.description.clone(),
            location: record.location.clone(),
            start_time: record.start_time,
            discord_link: record.discord_link.clone(),
        }
    }
}

/// The live platform as seen by the sync loop: the target community's
/// scheduled events plus the two side effects the loop may cause.
#[async_trait]
pub trait EventPlatform: Send + Sync {
    /// Every scheduled event currently reported for the target community.
    async fn live_events(&self) -> Result<Vec<LiveEvent>, PlatformError>;

    /// Resolve a DM channel for the member and deliver the reminder.
    async fn send_reminder(&self, member_id: &str, reminder: &Reminder)
        -> Result<(), PlatformError>;

    /// Ask the platform to move the event to its started state.
    async fn start_event(&self, event_id: &str) -> Result<(), PlatformError>;
}
