use crate::core::events::{EntityType, EventStatus, LiveEvent};
use crate::core::records::ValidationError;
use poise::serenity_prelude as serenity;

/// Convert a serenity scheduled event into the core's `LiveEvent`.
///
/// Missing free-text fields become empty strings; unknown entity types or
/// statuses are rejected rather than guessed.
pub fn to_live_event(event: &serenity::ScheduledEvent) -> Result<LiveEvent, ValidationError> {
    LiveEvent {
        id: event.id.to_string(),
        guild_id: event.guild_id.get(),
        name: event.name.clone(),
        description: event.description.clone().unwrap_or_default(),
        entity_type: entity_type(event.kind)?,
        entity_id: event.channel_id.map(|id| id.get()),
        start_time: event.start_time.unix_timestamp(),
        end_time: event.end_time.map(|t| t.unix_timestamp()),
        status: status(event.status)?,
        user_count: event.user_count.unwrap_or(0),
        location: event
            .metadata
            .as_ref()
            .and_then(|m| m.location.clone())
            .unwrap_or_default(),
    }
    .validated()
}

fn entity_type(kind: serenity::ScheduledEventType) -> Result<EntityType, ValidationError> {
    match kind {
        serenity::ScheduledEventType::StageInstance => Ok(EntityType::Stage),
        serenity::ScheduledEventType::Voice => Ok(EntityType::Voice),
        serenity::ScheduledEventType::External => Ok(EntityType::External),
        other => Err(ValidationError::UnsupportedValue {
            field: "entity_type",
            value: format!("{:?}", other),
        }),
    }
}

fn status(status: serenity::ScheduledEventStatus) -> Result<EventStatus, ValidationError> {
    match status {
        serenity::ScheduledEventStatus::Scheduled => Ok(EventStatus::Scheduled),
        serenity::ScheduledEventStatus::Active => Ok(EventStatus::Active),
        serenity::ScheduledEventStatus::Completed => Ok(EventStatus::Completed),
        serenity::ScheduledEventStatus::Canceled => Ok(EventStatus::Cancelled),
        other => Err(ValidationError::UnsupportedValue {
            field: "status",
            value: format!("{:?}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Gateway payload for a scheduled event, in Discord's wire format.
    fn payload() -> serde_json::Value {
        serde_json::json!({
            "id": "1100000000000000001",
            "guild_id": "42",
            "channel_id": "77",
            "creator_id": "5",
            "name": "Game night",
            "description": null,
            "scheduled_start_time": "2023-11-14T22:13:20+00:00",
            "scheduled_end_time": null,
            "privacy_level": 2,
            "status": 1,
            "entity_type": 2,
            "entity_id": null,
            "entity_metadata": null,
            "user_count": null,
            "image": null
        })
    }

    fn scheduled_event(payload: serde_json::Value) -> serenity::ScheduledEvent {
        serde_json::from_value(payload).unwrap()
    }

    #[test]
    fn voice_events_map_every_field() {
        let live = to_live_event(&scheduled_event(payload())).unwrap();

        assert_eq!(
            live,
            LiveEvent {
                id: "1100000000000000001".into(),
                guild_id: 42,
                name: "Game night".into(),
                description: String::new(),
                entity_type: EntityType::Voice,
                entity_id: Some(77),
                start_time: 1_700_000_000,
                end_time: None,
                status: EventStatus::Scheduled,
                user_count: 0,
                location: String::new(),
            }
        );
        assert_eq!(
            live.discord_link(),
            "https://discord.com/events/42/1100000000000000001"
        );
    }

    #[test]
    fn external_events_carry_their_location() {
        let mut payload = payload();
        payload["channel_id"] = serde_json::Value::Null;
        payload["entity_type"] = 3.into();
        payload["status"] = 2.into();
        payload["description"] = "Bring snacks".into();
        payload["scheduled_end_time"] = "2023-11-15T00:13:20+00:00".into();
        payload["entity_metadata"] = serde_json::json!({ "location": "Town hall" });
        payload["user_count"] = 12.into();

        let live = to_live_event(&scheduled_event(payload)).unwrap();

        assert_eq!(live.entity_type, EntityType::External);
        assert_eq!(live.entity_id, None);
        assert_eq!(live.status, EventStatus::Active);
        assert_eq!(live.description, "Bring snacks");
        assert_eq!(live.end_time, Some(1_700_007_200));
        assert_eq!(live.location, "Town hall");
        assert_eq!(live.user_count, 12);
    }

    #[test]
    fn nameless_events_are_rejected() {
        let mut payload = payload();
        payload["name"] = "  ".into();

        assert_eq!(
            to_live_event(&scheduled_event(payload)),
            Err(ValidationError::MissingField("name"))
        );
    }

    #[test]
    fn known_entity_types_map_one_to_one() {
        assert_eq!(
            entity_type(serenity::ScheduledEventType::StageInstance),
            Ok(EntityType::Stage)
        );
        assert_eq!(
            entity_type(serenity::ScheduledEventType::Voice),
            Ok(EntityType::Voice)
        );
        assert_eq!(
            entity_type(serenity::ScheduledEventType::External),
            Ok(EntityType::External)
        );
    }

    #[test]
    fn unknown_values_are_validation_errors() {
        let err = entity_type(serenity::ScheduledEventType::Unknown(9)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnsupportedValue { field: "entity_type", .. }
        ));

        let err = status(serenity::ScheduledEventStatus::Unknown(9)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnsupportedValue { field: "status", .. }
        ));
    }

    #[test]
    fn canceled_is_stored_as_cancelled() {
        assert_eq!(
            status(serenity::ScheduledEventStatus::Canceled),
            Ok(EventStatus::Cancelled)
        );
    }
}
