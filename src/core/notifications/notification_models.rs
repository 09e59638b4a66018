use serde::{Deserialize, Serialize};

use crate::core::events::LeadTime;
use crate::core::records::{current_timestamp, Record};

/// A member's reminder opt-ins (`users` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub id: String,
    #[serde(default)]
    pub is_ping_hour_before: bool,
    #[serde(default)]
    pub is_ping_day_before: bool,
    #[serde(default = "current_timestamp")]
    pub created_at: i64,
}

impl NotificationPreferences {
    /// Defaults for a member we have never seen: no reminders at all.
    pub fn new(member_id: impl Into<String>, now: i64) -> Self {
        Self {
            id: member_id.into(),
            is_ping_hour_before: false,
            is_ping_day_before: false,
            created_at: now,
        }
    }

    pub fn wants(&self, lead: LeadTime) -> bool {
        match lead {
            LeadTime::DayBefore => self.is_ping_day_before,
            LeadTime::HourBefore => self.is_ping_hour_before,
        }
    }

    pub fn set(&mut self, lead: LeadTime, enabled: bool) {
        match lead {
            LeadTime::DayBefore => self.is_ping_day_before = enabled,
            LeadTime::HourBefore => self.is_ping_hour_before = enabled,
        }
    }
}

impl Record for NotificationPreferences {
    fn id(&self) -> &str {
        &self.id
    }
}

/// The tri-state input of the toggle commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagChange {
    On,
    Off,
    /// No explicit choice: flip the current value.
    Toggle,
}

impl FlagChange {
    pub fn apply(self, current: bool) -> bool {
        match self {
            FlagChange::On => true,
            FlagChange::Off => false,
            FlagChange::Toggle => !current,
        }
    }
}
