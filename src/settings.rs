// Runtime configuration, read from the environment (a `.env` file is loaded
// first when present).
//
// | Variable                   | Required | Default  |
// |----------------------------|----------|----------|
// | DISCORD_TOKEN              | yes      |          |
// | DISCORD_GUILD_ID           | yes      |          |
// | SUPABASE_API_URL           | yes      |          |
// | SUPABASE_API_KEY           | yes      |          |
// | EVENTS_TABLE               | no       | events   |
// | USERS_TABLE                | no       | users    |
// | EVENT_SYNC_INTERVAL_SECS   | no       | 300      |
// | GREET_NEW_MEMBERS          | no       | true     |
//
// EVENTS_TABLE must name its one-hour flag column `already_notified_1_hour`.
// Rows are still read from the older `already_notified_1_hours` spelling, but
// writes use the new name, so rename the column before pointing the bot at an
// older table:
//
//     alter table events
//         rename column already_notified_1_hours to already_notified_1_hour;

use std::time::Duration;

use thiserror::Error;

const DEFAULT_SYNC_INTERVAL_SECS: u64 = 5 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Missing {0} environment variable")]
    Missing(&'static str),

    #[error("Invalid value `{value}` for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Clone)]
pub struct Settings {
    pub discord_token: String,
    pub guild_id: u64,
    pub supabase_api_url: String,
    pub supabase_api_key: String,
    pub events_table: String,
    pub users_table: String,
    pub sync_interval: Duration,
    pub greet_new_members: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(SettingsError::Missing(key))
        };
        let optional = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let guild_raw = required("DISCORD_GUILD_ID")?;
        let guild_id = guild_raw
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .ok_or(SettingsError::Invalid {
                key: "DISCORD_GUILD_ID",
                value: guild_raw.clone(),
                reason: "expected a non-zero numeric id",
            })?;

        let sync_interval = match optional("EVENT_SYNC_INTERVAL_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(SettingsError::Invalid {
                        key: "EVENT_SYNC_INTERVAL_SECS",
                        value: raw,
                        reason: "expected a positive number of seconds",
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
        };

        let greet_new_members = match optional("GREET_NEW_MEMBERS") {
            Some(raw) => parse_flag(&raw).ok_or(SettingsError::Invalid {
                key: "GREET_NEW_MEMBERS",
                value: raw.clone(),
                reason: "expected true/false",
            })?,
            None => true,
        };

        Ok(Self {
            discord_token: required("DISCORD_TOKEN")?,
            guild_id,
            supabase_api_url: required("SUPABASE_API_URL")?,
            supabase_api_key: required("SUPABASE_API_KEY")?,
            events_table: optional("EVENTS_TABLE").unwrap_or_else(|| "events".to_string()),
            users_table: optional("USERS_TABLE").unwrap_or_else(|| "users".to_string()),
            sync_interval,
            greet_new_members,
        })
    }
}

// Keep the credentials out of log lines.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("discord_token", &"<redacted>")
            .field("guild_id", &self.guild_id)
            .field("supabase_api_url", &self.supabase_api_url)
            .field("supabase_api_key", &"<redacted>")
            .field("events_table", &self.events_table)
            .field("users_table", &self.users_table)
            .field("sync_interval", &self.sync_interval)
            .field("greet_new_members", &self.greet_new_members)
            .finish()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
