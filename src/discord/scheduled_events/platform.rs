use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use tracing::warn;

use super::mapping::to_live_event;
use super::reminder_embeds::reminder_message;
use crate::core::events::{EventPlatform, LiveEvent, PlatformError, Reminder};

/// `EventPlatform` backed by the Discord HTTP API.
pub struct SerenityPlatform {
    http: Arc<serenity::Http>,
    guild_id: serenity::GuildId,
}

impl SerenityPlatform {
    pub fn new(http: Arc<serenity::Http>, guild_id: u64) -> Self {
        Self {
            http,
            guild_id: serenity::GuildId::new(guild_id),
        }
    }
}

#[async_trait]
impl EventPlatform for SerenityPlatform {
    async fn live_events(&self) -> Result<Vec<LiveEvent>, PlatformError> {
        let events = self
            .guild_id
            .scheduled_events(&self.http, true)
            .await
            .map_err(|e| {
                http_error(self.guild_id.get(), Call::ListEvents, http_status(&e), e.to_string())
            })?;

        Ok(events
            .iter()
            .filter_map(|event| match to_live_event(event) {
                Ok(live) => Some(live),
                Err(e) => {
                    warn!("Skipping scheduled event {}: {}", event.id, e);
                    None
                }
            })
            .collect())
    }

    async fn send_reminder(
        &self,
        member_id: &str,
        reminder: &Reminder,
    ) -> Result<(), PlatformError> {
        let user_id = serenity::UserId::new(parse_snowflake(member_id)?);

        let channel = user_id
            .create_dm_channel(&self.http)
            .await
            .map_err(|e| PlatformError::Unreachable {
                member_id: member_id.to_string(),
                reason: e.to_string(),
            })?;

        channel
            .id
            .send_message(&self.http, reminder_message(reminder))
            .await
            .map_err(|e| PlatformError::Request(e.to_string()))?;

        Ok(())
    }

    async fn start_event(&self, event_id: &str) -> Result<(), PlatformError> {
        let event_id = serenity::ScheduledEventId::new(parse_snowflake(event_id)?);
        let builder =
            serenity::EditScheduledEvent::new().status(serenity::ScheduledEventStatus::Active);

        self.guild_id
            .edit_scheduled_event(&self.http, event_id, builder)
            .await
            .map_err(|e| {
                http_error(self.guild_id.get(), Call::StartEvent, http_status(&e), e.to_string())
            })?;

        Ok(())
    }
}

/// Parse a stored Discord id. Discord ids are never zero.
pub fn parse_snowflake(raw: &str) -> Result<u64, PlatformError> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id != 0 => Ok(id),
        _ => Err(PlatformError::InvalidId(raw.to_string())),
    }
}

/// The Discord calls whose failures we classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    ListEvents,
    StartEvent,
}

/// Only the guild-level listing tells us the guild itself is gone or hidden.
/// A 404 on a single event just means that event was deleted.
fn http_error(guild_id: u64, call: Call, status: Option<u16>, reason: String) -> PlatformError {
    match (call, status) {
        (Call::ListEvents, Some(403) | Some(404)) => PlatformError::CommunityNotFound(guild_id),
        _ => PlatformError::Request(reason),
    }
}

fn http_status(err: &serenity::Error) -> Option<u16> {
    match err {
        serenity::Error::Http(http) => http.status_code().map(|code| code.as_u16()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflakes_must_be_positive_integers() {
        assert_eq!(parse_snowflake("123456789012345678").unwrap(), 123456789012345678);
        assert_eq!(parse_snowflake(" 42 ").unwrap(), 42);

        for bad in ["", "0", "-1", "abc", "12.5"] {
            assert!(
                matches!(parse_snowflake(bad), Err(PlatformError::InvalidId(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn missing_guild_is_reported_only_for_the_listing() {
        for status in [403, 404] {
            assert!(matches!(
                http_error(42, Call::ListEvents, Some(status), "gone".into()),
                PlatformError::CommunityNotFound(42)
            ));
        }
        assert!(matches!(
            http_error(42, Call::ListEvents, Some(500), "boom".into()),
            PlatformError::Request(_)
        ));
    }

    #[test]
    fn deleted_events_fail_to_start_as_plain_requests() {
        let err = http_error(42, Call::StartEvent, Some(404), "Unknown Guild Scheduled Event".into());

        match err {
            PlatformError::Request(reason) => assert_eq!(reason, "Unknown Guild Scheduled Event"),
            other => panic!("expected a request error, got {other:?}"),
        }
        assert!(matches!(
            http_error(42, Call::StartEvent, Some(403), "Missing Permissions".into()),
            PlatformError::Request(_)
        ));
    }

    #[test]
    fn non_http_errors_have_no_status() {
        let err = serenity::Error::Other("boom");
        assert_eq!(http_status(&err), None);
    }
}
