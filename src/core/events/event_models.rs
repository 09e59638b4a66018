// Event domain models.
//
// Two views of the same scheduled event live here:
// - `LiveEvent` is what the platform reports right now (ground truth).
// - `EventRecord` is the mirrored row in the `events` table. It carries the
//   two "already notified" flags, which have no live counterpart.
//
// Nothing in this file knows about serenity; the Discord layer builds
// `LiveEvent`s and the core only ever sees these types.

use serde::{Deserialize, Serialize};

use crate::core::records::{current_timestamp, Record, ValidationError};

const EVENT_LINK_BASE: &str = "https://discord.com/events";

/// What kind of venue the event takes place in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    #[serde(rename = "stage_instance")]
    Stage,
    Voice,
    External,
}

/// Lifecycle state of a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Scheduled,
    Active,
    Completed,
    Cancelled,
}

impl EventStatus {
    /// Finished or called-off events never get reminders.
    pub fn accepts_reminders(self) -> bool {
        matches!(self, EventStatus::Scheduled | EventStatus::Active)
    }
}

/// The two fixed reminder lead times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadTime {
    DayBefore,
    HourBefore,
}

impl LeadTime {
    /// Checked in this order every cycle, so the 24-hour reminder always goes
    /// out before the 1-hour one.
    pub const ALL: [LeadTime; 2] = [LeadTime::DayBefore, LeadTime::HourBefore];

    pub fn seconds(self) -> i64 {
        match self {
            LeadTime::DayBefore => 24 * 60 * 60,
            LeadTime::HourBefore => 60 * 60,
        }
    }

    /// Human wording used in replies and reminder titles.
    pub fn label(self) -> &'static str {
        match self {
            LeadTime::DayBefore => "24 hours",
            LeadTime::HourBefore => "1 hour",
        }
    }
}

impl std::fmt::Display for LeadTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadTime::DayBefore => write!(f, "day_before"),
            LeadTime::HourBefore => write!(f, "hour_before"),
        }
    }
}

/// A scheduled event as currently reported by the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveEvent {
    pub id: String,
    pub guild_id: u64,
    pub name: String,
    pub description: String,
    pub entity_type: EntityType,
    /// Venue channel, when the event is bound to one.
    pub entity_id: Option<u64>,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub status: EventStatus,
    pub user_count: u64,
    pub location: String,
}

impl LiveEvent {
    /// Reject events missing the fields every record needs.
    pub fn validated(self) -> Result<Self, ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField("id"));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        Ok(self)
    }

    pub fn discord_link(&self) -> String {
        event_link(self.guild_id, &self.id)
    }
}

/// Deterministic public URL for a guild scheduled event.
pub fn event_link(guild_id: u64, event_id: &str) -> String {
    format!("{EVENT_LINK_BASE}/{guild_id}/{event_id}")
}

/// The persisted mirror of a scheduled event (`events` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub entity_type: EntityType,
    #[serde(default)]
    pub entity_id: Option<u64>,
    pub start_time: i64,
    #[serde(default)]
    pub end_time: Option<i64>,
    pub status: EventStatus,
    #[serde(default)]
    pub user_count: u64,
    #[serde(default)]
    pub location: String,
    pub discord_link: String,
    #[serde(default)]
    pub already_notified_24_hours: bool,
    #[serde(default, alias = "already_notified_1_hours")]
    pub already_notified_1_hour: bool,
    #[serde(default = "current_timestamp")]
    pub created_at: i64,
}

/// The live-derived columns of an `events` row, without the id.
///
/// The notified flags and `created_at` belong to the sync loop and are not
/// part of this row. Writing it never touches them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveEventRow {
    pub name: String,
    pub description: String,
    pub entity_type: EntityType,
    pub entity_id: Option<u64>,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub status: EventStatus,
    pub user_count: u64,
    pub location: String,
    pub discord_link: String,
}

impl From<&LiveEvent> for LiveEventRow {
    fn from(live: &LiveEvent) -> Self {
        Self {
            name: live.name.clone(),
            description: live.description.clone(),
            entity_type: live.entity_type,
            entity_id: live.entity_id,
            start_time: live.start_time,
            end_time: live.end_time,
            status: live.status,
            user_count: live.user_count,
            location: live.location.clone(),
            discord_link: live.discord_link(),
        }
    }
}

impl EventRecord {
    /// First sighting of a live event: nothing has been sent for it yet.
    pub fn from_live(live: &LiveEvent, now: i64) -> Self {
        Self {
            id: live.id.clone(),
            name: live.name.clone(),
            description: live.description.clone(),
            entity_type: live.entity_type,
            entity_id: live.entity_id,
            start_time: live.start_time,
            end_time: live.end_time,
            status: live.status,
            user_count: live.user_count,
            location: live.location.clone(),
            discord_link: live.discord_link(),
            already_notified_24_hours: false,
            already_notified_1_hour: false,
            created_at: now,
        }
    }

    /// Overwrite every live-derived field. The notified flags and `created_at`
    /// belong to the persisted copy only and are left alone.
    pub fn apply_live(&mut self, live: &LiveEvent) {
        self.apply_row(LiveEventRow::from(live));
    }

    pub fn apply_row(&mut self, row: LiveEventRow) {
        self.name = row.name;
        self.description = row.description;
        self.entity_type = row.entity_type;
        self.entity_id = row.entity_id;
        self.start_time = row.start_time;
        self.end_time = row.end_time;
        self.status = row.status;
        self.user_count = row.user_count;
        self.location = row.location;
        self.discord_link = row.discord_link;
    }

    pub fn is_notified(&self, lead: LeadTime) -> bool {
        match lead {
            LeadTime::DayBefore => self.already_notified_24_hours,
            LeadTime::HourBefore => self.already_notified_1_hour,
        }
    }

    /// Flags only ever go from false to true.
    pub fn mark_notified(&mut self, lead: LeadTime) {
        match lead {
            LeadTime::DayBefore => self.already_notified_24_hours = true,
            LeadTime::HourBefore => self.already_notified_1_hour = true,
        }
    }

    pub fn reminder_due(&self, lead: LeadTime, now: i64) -> bool {
        !self.is_notified(lead)
            && self.status.accepts_reminders()
            && self.start_time - now <= lead.seconds()
    }

    pub fn should_start(&self, now: i64) -> bool {
        self.status == EventStatus::Scheduled && self.start_time <= now
    }
}

impl Record for EventRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField("id"));
        }
        if self.discord_link.is_empty() {
            return Err(ValidationError::MissingField("discord_link"));
        }
        Ok(())
    }
}
