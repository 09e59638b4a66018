use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::core::events::{EventPlatform, EventSyncService};
use crate::core::records::current_timestamp;
use crate::core::scheduling::spawn_periodic;
use crate::discord::commands::notifications::{EventTable, UserTable};

/// Start the background reconciliation loop.
pub fn start(
    sync: Arc<EventSyncService<EventTable, UserTable>>,
    platform: Arc<dyn EventPlatform>,
    interval: Duration,
) -> JoinHandle<()> {
    spawn_periodic("event_sync", interval, move || {
        let sync = Arc::clone(&sync);
        let platform = Arc::clone(&platform);
        async move { run_once(&sync, platform.as_ref()).await }
    })
}

async fn run_once(sync: &EventSyncService<EventTable, UserTable>, platform: &dyn EventPlatform) {
    match sync.run_cycle(platform, current_timestamp()).await {
        Ok(report) => {
            let sent: usize = report.reminders.iter().map(|b| b.delivered).sum();
            let failed: usize = report.reminders.iter().map(|b| b.failed).sum();
            tracing::info!(
                created = report.created,
                updated = report.updated,
                orphaned = report.orphaned.len(),
                reminders_sent = sent,
                reminders_failed = failed,
                started = report.started.len(),
                "Event sync cycle finished"
            );
        }
        Err(e) if e.is_community_missing() => {
            tracing::warn!("Event sync skipped: {}", e);
        }
        Err(e) => {
            tracing::error!("Event sync cycle failed: {}", e);
        }
    }
}
