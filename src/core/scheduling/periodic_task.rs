// Background jobs that repeat on a fixed period.
//
// Each job is a plain closure producing one unit of work. The first run
// happens right away, later runs follow the period, and a run that overshoots
// pushes the next one back instead of triggering a burst of catch-up runs.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawn `job` to run every `period`, forever.
pub fn spawn_periodic<F, Fut>(name: &'static str, period: Duration, mut job: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    // tokio panics on a zero period
    let period = period.max(Duration::from_secs(1));

    tokio::spawn(async move {
        tracing::info!(task = name, period_secs = period.as_secs(), "Running periodic task");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            tracing::debug!(task = name, "Periodic task tick");
            job().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn runs_immediately_then_on_the_period() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);

        let handle = spawn_periodic("test", Duration::from_secs(10), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn independent_jobs_keep_their_own_cadence() {
        let fast = Arc::new(AtomicUsize::new(0));
        let slow = Arc::new(AtomicUsize::new(0));

        let fast_counter = Arc::clone(&fast);
        let fast_handle = spawn_periodic("fast", Duration::from_secs(5), move || {
            let counter = Arc::clone(&fast_counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        let slow_counter = Arc::clone(&slow);
        let slow_handle = spawn_periodic("slow", Duration::from_secs(60), move || {
            let counter = Arc::clone(&slow_counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(31)).await;

        // runs at 0, 5, 10, ..., 30
        assert_eq!(fast.load(Ordering::SeqCst), 7);
        assert_eq!(slow.load(Ordering::SeqCst), 1);

        fast_handle.abort();
        slow_handle.abort();
    }
}
