use crate::core::events::Reminder;
use poise::serenity_prelude as serenity;

/// Discord caps embed descriptions at 4096 characters.
const MAX_DESCRIPTION_CHARS: usize = 4000;

/// Build the DM sent to a member when an event is coming up.
pub fn reminder_message(reminder: &Reminder) -> serenity::CreateMessage {
    let mut embed = serenity::CreateEmbed::new()
        .title(reminder_title(reminder))
        .url(reminder.discord_link.clone())
        .color(serenity::Colour::from_rgb(88, 101, 242))
        .field("Starts", discord_time(reminder.start_time), false)
        .footer(serenity::CreateEmbedFooter::new(
            "Use /notifications to change which reminders you get",
        ))
        .timestamp(serenity::Timestamp::now());

    if !reminder.description.is_empty() {
        embed = embed.description(truncate(&reminder.description, MAX_DESCRIPTION_CHARS));
    }
    if !reminder.location.is_empty() {
        embed = embed.field("Location", reminder.location.clone(), true);
    }

    serenity::CreateMessage::new()
        .content(reminder.discord_link.clone())
        .embed(embed)
}

/// Welcome DM for members who just joined the target guild.
pub fn greeting_message() -> serenity::CreateMessage {
    let embed = serenity::CreateEmbed::new()
        .title("👋 Welcome!")
        .description(
            "I can remind you before community events start.\n\n\
             • `/notifications day_before` for a reminder 24 hours ahead\n\
             • `/notifications hour_before` for a reminder 1 hour ahead\n\
             • `/notifications status` to see what you receive",
        )
        .color(serenity::Colour::from_rgb(67, 181, 129));

    serenity::CreateMessage::new().embed(embed)
}

fn reminder_title(reminder: &Reminder) -> String {
    format!("⏰ {} starts in {}", reminder.event_name, reminder.lead.label())
}

/// Absolute and relative timestamps, rendered in each reader's own timezone.
fn discord_time(unix: i64) -> String {
    format!("<t:{0}:F> (<t:{0}:R>)", unix)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
