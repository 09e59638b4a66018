// This is the entry point of the event reminder bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (Supabase tables)
// - `discord/` = Discord-specific adapters (commands, gateway events, DMs)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Start the reconciliation loop once the gateway is ready

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;
mod settings;

use std::sync::Arc;

use crate::core::events::{EventPlatform, EventRecord, EventSyncService};
use crate::core::notifications::{NotificationPreferences, NotificationService};
use crate::discord::scheduled_events::{handlers, platform::SerenityPlatform, sync_task};
use crate::discord::{Data, Error};
use crate::infra::supabase::SupabaseTable;
use crate::settings::Settings;
use poise::serenity_prelude as serenity;
use tracing_subscriber::EnvFilter;

/// Event handler for non-command Discord events.
/// Scheduled event callbacks keep the mirror fresh between sync cycles.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::GuildScheduledEventCreate { event } => {
            if let Err(e) = handlers::handle_event_upsert(data, event).await {
                tracing::error!("Error mirroring created event {}: {}", event.id, e);
            }
        }
        serenity::FullEvent::GuildScheduledEventUpdate { event } => {
            if let Err(e) = handlers::handle_event_upsert(data, event).await {
                tracing::error!("Error mirroring updated event {}: {}", event.id, e);
            }
        }
        serenity::FullEvent::GuildScheduledEventDelete { event } => {
            if let Err(e) = handlers::handle_event_delete(data, event).await {
                tracing::error!("Error removing deleted event {}: {}", event.id, e);
            }
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            if let Err(e) = handlers::handle_member_join(ctx, data, new_member).await {
                tracing::error!("Error handling member join: {}", e);
            }
        }

        _ => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // RUST_LOG wins; otherwise info and up
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!(?settings, "Loaded settings");

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    let events_table: SupabaseTable<EventRecord> = match SupabaseTable::new(
        &settings.supabase_api_url,
        &settings.supabase_api_key,
        &settings.events_table,
    ) {
        Ok(table) => table,
        Err(e) => {
            tracing::error!("Failed to create Supabase client: {}", e);
            std::process::exit(1);
        }
    };
    let users_table: SupabaseTable<NotificationPreferences> =
        events_table.sibling(&settings.supabase_api_url, &settings.users_table);
    tracing::info!(
        events = events_table.table(),
        users = users_table.table(),
        "Using Supabase tables"
    );

    let event_sync = Arc::new(EventSyncService::new(events_table, users_table.clone()));
    let notifications = Arc::new(NotificationService::new(users_table));

    // Create the data structure that will be shared across all commands
    let data = Data {
        event_sync: Arc::clone(&event_sync),
        notifications,
        guild_id: settings.guild_id,
        greet_new_members: settings.greet_new_members,
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_SCHEDULED_EVENTS
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let guild_id = settings.guild_id;
    let sync_interval = settings.sync_interval;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![discord::commands::notifications::notifications()],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| {
                Box::pin(async move {
                    if let Err(e) = poise::builtins::on_error(error).await {
                        tracing::error!("Error while handling command error: {}", e);
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("Connected as {}", ready.user.name);

                // Guild registration shows up immediately, unlike global commands.
                poise::builtins::register_in_guild(
                    ctx,
                    &framework.options().commands,
                    serenity::GuildId::new(guild_id),
                )
                .await?;
                tracing::info!(guild_id, "Commands registered");

                let platform: Arc<dyn EventPlatform> =
                    Arc::new(SerenityPlatform::new(ctx.http.clone(), guild_id));
                sync_task::start(event_sync, platform, sync_interval);

                Ok(data)
            })
        })
        .build();

    let client = serenity::ClientBuilder::new(&settings.discord_token, intents)
        .framework(framework)
        .await;

    let mut client = match client {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Error creating client: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = client.start().await {
        tracing::error!("Error running bot: {}", e);
        std::process::exit(1);
    }
}
