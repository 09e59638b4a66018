// The event sync service mirrors the platform's scheduled events into the
// `events` table and sends the one-time reminders.
//
// A reconciliation cycle is:
// 1. fetch live events and persisted events
// 2. merge live fields into the persisted copies and upsert every one of them
// 3. re-read events and member preferences
// 4. per persisted event: send due reminders, start events that are due
//
// The service has no Discord or HTTP types in it. The platform and both
// tables are injected, so the whole loop runs against fakes in the tests below.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::event_models::{EventRecord, LeadTime, LiveEvent, LiveEventRow};
use super::event_platform::{EventPlatform, PlatformError, Reminder};
use super::event_store::EventStore;
use crate::core::notifications::NotificationPreferences;
use crate::core::records::{RecordStore, StoreError};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl SyncError {
    /// The target community could not be resolved, so the cycle never started.
    pub fn is_community_missing(&self) -> bool {
        matches!(self, SyncError::Platform(PlatformError::CommunityNotFound(_)))
    }
}

/// Outcome of one reminder fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderBatch {
    pub event_id: String,
    pub lead: LeadTime,
    pub delivered: usize,
    pub failed: usize,
}

/// Whether a pushed event was new to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Created,
    Updated,
}

/// What a reconciliation cycle did, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub created: usize,
    pub updated: usize,
    pub orphaned: Vec<String>,
    pub reminders: Vec<ReminderBatch>,
    pub started: Vec<String>,
}

pub struct EventSyncService<E, U>
where
    E: EventStore,
    U: RecordStore<NotificationPreferences>,
{
    events: E,
    users: U,
}

impl<E, U> EventSyncService<E, U>
where
    E: EventStore,
    U: RecordStore<NotificationPreferences>,
{
    pub fn new(events: E, users: U) -> Self {
        Self { events, users }
    }

    /// Run one full reconciliation cycle at time `now` (unix seconds).
    ///
    /// Any store failure aborts the rest of the cycle. Reminder flags are
    /// persisted before the fan-out starts, so an aborted cycle can miss
    /// reminders but never repeats one.
    pub async fn run_cycle<P>(&self, platform: &P, now: i64) -> Result<CycleReport, SyncError>
    where
        P: EventPlatform + ?Sized,
    {
        let mut report = CycleReport::default();

        let live_events = platform.live_events().await?;
        let persisted = self.events.list().await?;
        tracing::debug!(
            live = live_events.len(),
            persisted = persisted.len(),
            "Fetched events"
        );
        if live_events.is_empty() {
            tracing::debug!("No scheduled events found");
        }

        let mut persisted_by_id: HashMap<String, EventRecord> = persisted
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();

        // Unconditional overwrite: the push handlers may have written the same
        // rows a moment ago, and upsert is safe to repeat.
        for live in &live_events {
            let record = match persisted_by_id.remove(&live.id) {
                Some(mut existing) => {
                    existing.apply_live(live);
                    report.updated += 1;
                    existing
                }
                None => {
                    tracing::info!(event_id = %live.id, name = %live.name, "Found new event to add");
                    report.created += 1;
                    EventRecord::from_live(live, now)
                }
            };
            self.events.upsert(&record).await?;
        }

        let persisted = self.events.list().await?;
        let users = self.users.list().await?;
        let live_ids: HashSet<&str> = live_events.iter().map(|e| e.id.as_str()).collect();

        for mut record in persisted {
            if !live_ids.contains(record.id.as_str()) {
                tracing::warn!(
                    event_id = %record.id,
                    name = %record.name,
                    "Orphaned event record has no live event, leaving it for manual cleanup"
                );
                report.orphaned.push(record.id);
                continue;
            }

            for lead in LeadTime::ALL {
                if !record.reminder_due(lead, now) {
                    continue;
                }

                record.mark_notified(lead);
                self.events.upsert(&record).await?;

                let batch = self.deliver(platform, &record, lead, &users).await;
                report.reminders.push(batch);
            }

            if record.should_start(now) {
                match platform.start_event(&record.id).await {
                    Ok(()) => {
                        tracing::info!(event_id = %record.id, name = %record.name, "Started event");
                        report.started.push(record.id.clone());
                    }
                    Err(e) => {
                        tracing::warn!(event_id = %record.id, error = %e, "Failed to start event");
                    }
                }
            }
        }

        Ok(report)
    }

    /// Fan a reminder out to every subscribed member. One failed delivery
    /// never stops the rest of the batch.
    async fn deliver<P>(
        &self,
        platform: &P,
        record: &EventRecord,
        lead: LeadTime,
        users: &[NotificationPreferences],
    ) -> ReminderBatch
    where
        P: EventPlatform + ?Sized,
    {
        let reminder = Reminder::for_event(record, lead);
        let mut batch = ReminderBatch {
            event_id: record.id.clone(),
            lead,
            delivered: 0,
            failed: 0,
        };

        for user in users.iter().filter(|u| u.wants(lead)) {
            match platform.send_reminder(&user.id, &reminder).await {
                Ok(()) => batch.delivered += 1,
                Err(e) => {
                    batch.failed += 1;
                    tracing::warn!(
                        member_id = %user.id,
                        event_id = %record.id,
                        lead = %lead,
                        error = %e,
                        "Failed to deliver reminder"
                    );
                }
            }
        }

        tracing::info!(
            event_id = %record.id,
            lead = %lead,
            delivered = batch.delivered,
            failed = batch.failed,
            "Reminder batch sent"
        );
        batch
    }

    /// Mirror a single live event right away (create/update callbacks).
    ///
    /// Runs concurrently with `run_cycle`, so it never rewrites the notified
    /// flags or `created_at` of a row that already exists.
    pub async fn record_live_event(
        &self,
        live: &LiveEvent,
        now: i64,
    ) -> Result<PushOutcome, SyncError> {
        if self
            .events
            .insert_if_absent(&EventRecord::from_live(live, now))
            .await?
        {
            return Ok(PushOutcome::Created);
        }

        self.events
            .update_live_columns(&live.id, &LiveEventRow::from(live))
            .await?;
        Ok(PushOutcome::Updated)
    }

    /// Drop the mirror of an event the platform reported as removed.
    pub async fn remove_event(&self, event_id: &str) -> Result<(), SyncError> {
        self.events.delete(event_id).await?;
        Ok(())
    }
}
