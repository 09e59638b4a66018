// Business logic behind the `/notifications` commands.
//
// The Discord layer extracts the member id and the requested change, calls in
// here, and only formats the reply.

use thiserror::Error;

use super::notification_models::{FlagChange, NotificationPreferences};
use crate::core::events::LeadTime;
use crate::core::records::{RecordStore, StoreError};

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub struct NotificationService<S: RecordStore<NotificationPreferences>> {
    store: S,
}

impl<S: RecordStore<NotificationPreferences>> NotificationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored preferences, if the member ever changed them.
    pub async fn preferences(
        &self,
        member_id: &str,
    ) -> Result<Option<NotificationPreferences>, NotificationError> {
        Ok(self.store.get(member_id).await?)
    }

    /// Stored preferences or fresh defaults. Defaults are not persisted here.
    pub async fn get_or_create(
        &self,
        member_id: &str,
        now: i64,
    ) -> Result<NotificationPreferences, NotificationError> {
        Ok(self
            .preferences(member_id)
            .await?
            .unwrap_or_else(|| NotificationPreferences::new(member_id, now)))
    }

    /// Apply a change to one of the two flags and persist the result.
    pub async fn update(
        &self,
        member_id: &str,
        lead: LeadTime,
        change: FlagChange,
        now: i64,
    ) -> Result<NotificationPreferences, NotificationError> {
        let mut prefs = self.get_or_create(member_id, now).await?;
        prefs.set(lead, change.apply(prefs.wants(lead)));

        let stored = self.store.upsert(&prefs).await?;
        tracing::info!(
            member_id,
            lead = %lead,
            enabled = stored.wants(lead),
            "Notification preference updated"
        );
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryRecordStore;

    fn make_service() -> NotificationService<InMemoryRecordStore<NotificationPreferences>> {
        NotificationService::new(InMemoryRecordStore::new())
    }

    #[tokio::test]
    async fn unknown_members_get_defaults_without_a_write() {
        let service = make_service();

        let prefs = service.get_or_create("55", 10).await.unwrap();
        assert_eq!(prefs, NotificationPreferences::new("55", 10));
        assert!(service.preferences("55").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn toggle_flips_and_persists() {
        let service = make_service();

        let prefs = service
            .update("55", LeadTime::HourBefore, FlagChange::Toggle, 10)
            .await
            .unwrap();
        assert!(prefs.is_ping_hour_before);
        assert!(!prefs.is_ping_day_before);

        let prefs = service
            .update("55", LeadTime::HourBefore, FlagChange::Toggle, 20)
            .await
            .unwrap();
        assert!(!prefs.is_ping_hour_before);
        // created once, on the first write
        assert_eq!(prefs.created_at, 10);
    }

    #[tokio::test]
    async fn explicit_values_are_idempotent() {
        let service = make_service();

        for _ in 0..2 {
            let prefs = service
                .update("55", LeadTime::DayBefore, FlagChange::On, 10)
                .await
                .unwrap();
            assert!(prefs.is_ping_day_before);
        }

        let prefs = service
            .update("55", LeadTime::DayBefore, FlagChange::Off, 10)
            .await
            .unwrap();
        assert!(!prefs.is_ping_day_before);

        let stored = service.preferences("55").await.unwrap().unwrap();
        assert_eq!(stored, prefs);
    }
}
