use crate::core::events::PushOutcome;
use crate::core::records::current_timestamp;
use crate::discord::Data;
use anyhow::Result;
use poise::serenity_prelude::{self as serenity, Context};

use super::mapping::to_live_event;
use super::reminder_embeds::greeting_message;

/// Mirror a created or edited scheduled event without waiting for the next cycle.
pub async fn handle_event_upsert(data: &Data, event: &serenity::ScheduledEvent) -> Result<()> {
    if event.guild_id.get() != data.guild_id {
        return Ok(());
    }

    let live = to_live_event(event)?;
    match data
        .event_sync
        .record_live_event(&live, current_timestamp())
        .await?
    {
        PushOutcome::Created => {
            tracing::info!(event_id = %live.id, name = %live.name, "Mirrored new scheduled event")
        }
        PushOutcome::Updated => {
            tracing::info!(event_id = %live.id, name = %live.name, "Refreshed scheduled event")
        }
    }
    Ok(())
}

/// Drop the mirror of a deleted scheduled event.
pub async fn handle_event_delete(data: &Data, event: &serenity::ScheduledEvent) -> Result<()> {
    if event.guild_id.get() != data.guild_id {
        return Ok(());
    }

    data.event_sync.remove_event(&event.id.to_string()).await?;
    tracing::info!(event_id = %event.id, "Removed scheduled event mirror");
    Ok(())
}

/// Greet a new member of the target guild with a short DM on how reminders work.
pub async fn handle_member_join(
    ctx: &Context,
    data: &Data,
    member: &serenity::Member,
) -> Result<()> {
    if !data.greet_new_members || member.user.bot || member.guild_id.get() != data.guild_id {
        return Ok(());
    }

    // Members with closed DMs are common, not worth more than a debug line.
    if let Err(e) = member.user.direct_message(&ctx.http, greeting_message()).await {
        tracing::debug!(member_id = %member.user.id, "Could not greet new member: {}", e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::{EventRecord, EventSyncService};
    use crate::core::notifications::NotificationService;
    use crate::infra::supabase::SupabaseTable;
    use std::sync::Arc;

    const GUILD: u64 = 42;

    /// Shared data whose tables point at a closed port: any store call fails.
    fn data_without_store() -> Data {
        let events =
            SupabaseTable::<EventRecord>::new("http://127.0.0.1:1", "key", "events").unwrap();
        let users = events.sibling("http://127.0.0.1:1", "users");
        Data {
            event_sync: Arc::new(EventSyncService::new(events, users.clone())),
            notifications: Arc::new(NotificationService::new(users)),
            guild_id: GUILD,
            greet_new_members: true,
        }
    }

    fn scheduled_event(guild_id: u64) -> serenity::ScheduledEvent {
        serde_json::from_value(serde_json::json!({
            "id": "900",
            "guild_id": guild_id.to_string(),
            "channel_id": "77",
            "creator_id": null,
            "name": "Game night",
            "description": "",
            "scheduled_start_time": "2023-11-14T22:13:20+00:00",
            "scheduled_end_time": null,
            "privacy_level": 2,
            "status": 1,
            "entity_type": 2,
            "entity_id": null,
            "entity_metadata": null,
            "user_count": 3,
            "image": null
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn other_guilds_are_ignored_before_touching_the_store() {
        let data = data_without_store();
        let event = scheduled_event(GUILD + 1);

        assert!(handle_event_upsert(&data, &event).await.is_ok());
        assert!(handle_event_delete(&data, &event).await.is_ok());
    }

    #[tokio::test]
    async fn target_guild_events_reach_the_store() {
        let data = data_without_store();
        let event = scheduled_event(GUILD);

        assert!(handle_event_upsert(&data, &event).await.is_err());
        assert!(handle_event_delete(&data, &event).await.is_err());
    }
}
