// Discord commands for reminder preferences.
//
// **Notice the pattern:**
// 1. Extract the member id and the requested change from Discord types
// 2. Call the core notification service
// 3. Format the reply
//
// Replies are ephemeral: preferences are nobody else's business.

use std::sync::Arc;

use crate::core::events::{EventRecord, EventSyncService, LeadTime};
use crate::core::notifications::{FlagChange, NotificationPreferences, NotificationService};
use crate::core::records::current_timestamp;
use crate::infra::supabase::SupabaseTable;
use poise::serenity_prelude as serenity;

/// Manage your event reminder settings.
#[poise::command(
    slash_command,
    guild_only,
    subcommands("hour_before", "day_before", "status"),
    subcommand_required
)]
pub async fn notifications(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Toggle notifications 1 hour before the event.
#[poise::command(slash_command, guild_only, ephemeral)]
pub async fn hour_before(
    ctx: Context<'_>,
    #[description = "Whether to enable notifications"] on: Option<Switch>,
) -> Result<(), Error> {
    change_preference(ctx, LeadTime::HourBefore, on).await
}

/// Toggle notifications 1 day before the event.
#[poise::command(slash_command, guild_only, ephemeral)]
pub async fn day_before(
    ctx: Context<'_>,
    #[description = "Whether to enable notifications"] on: Option<Switch>,
) -> Result<(), Error> {
    change_preference(ctx, LeadTime::DayBefore, on).await
}

/// Show which event reminders you receive.
#[poise::command(slash_command, guild_only, ephemeral)]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    let member_id = ctx.author().id.to_string();
    let prefs = ctx
        .data()
        .notifications
        .get_or_create(&member_id, current_timestamp())
        .await?;

    let embed = serenity::CreateEmbed::new()
        .title("Your event reminders")
        .color(serenity::Colour::BLURPLE)
        .field("1 day before", on_off(prefs.is_ping_day_before), true)
        .field("1 hour before", on_off(prefs.is_ping_hour_before), true)
        .footer(serenity::CreateEmbedFooter::new(
            "Change them with /notifications day_before or /notifications hour_before",
        ));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Shared logic for the two toggle commands.
async fn change_preference(
    ctx: Context<'_>,
    lead: LeadTime,
    on: Option<Switch>,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let member_id = ctx.author().id.to_string();
    let prefs = ctx
        .data()
        .notifications
        .update(&member_id, lead, flag_change(on), current_timestamp())
        .await?;

    ctx.say(confirmation(lead, prefs.wants(lead))).await?;
    Ok(())
}

/// Explicit choice for the toggle commands. Leaving it out flips the setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum Switch {
    #[name = "on"]
    On,
    #[name = "off"]
    Off,
}

fn flag_change(on: Option<Switch>) -> FlagChange {
    match on {
        Some(Switch::On) => FlagChange::On,
        Some(Switch::Off) => FlagChange::Off,
        None => FlagChange::Toggle,
    }
}

fn confirmation(lead: LeadTime, enabled: bool) -> String {
    let which = match lead {
        LeadTime::DayBefore => "Day before",
        LeadTime::HourBefore => "Hour before",
    };
    format!("{} notifications {}", which, if enabled { "enabled" } else { "disabled" })
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "✅ On"
    } else {
        "❌ Off"
    }
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

pub type EventTable = SupabaseTable<EventRecord>;
pub type UserTable = SupabaseTable<NotificationPreferences>;

/// Data that's shared across all commands and gateway handlers.
pub struct Data {
    pub event_sync: Arc<EventSyncService<EventTable, UserTable>>,
    pub notifications: Arc<NotificationService<UserTable>>,
    /// The one guild whose events we mirror.
    pub guild_id: u64,
    pub greet_new_members: bool,
}
