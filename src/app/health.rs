use super::Action;
use crate::backend::FleetBackend;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

pub const HEALTH_CHECK_FAILURE: &str = "Failed to health check drones";

/// Ping the backend every `period` until the receiver goes away.
///
/// Only failures are reported, and only as an error message; the monitor never
/// touches drone state or the busy indicator. The first check runs one full
/// period after start.
pub fn spawn_health_monitor(
    backend: Arc<dyn FleetBackend>,
    period: Duration,
    action_tx: mpsc::UnboundedSender<Action>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let Some(start) = Instant::now().checked_add(period) else {
            warn!(?period, "health check period out of range, monitor disabled");
            return;
        };
        let mut ticker = interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match backend.health_check().await {
                Ok(()) => debug!("backend healthy"),
                Err(e) => {
                    warn!("health check failed: {}", e);
                    if action_tx
                        .send(Action::HealthCheckFailed(HEALTH_CHECK_FAILURE.to_string()))
                        .is_err()
                    {
                        break;
                    }
                }
            }
            if action_tx.is_closed() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::MockBackend;
    use crate::backend::HEALTH_CHECK;

    #[tokio::test(start_paused = true)]
    async fn test_first_check_waits_one_period() {
        let backend = Arc::new(MockBackend::new());
        backend.fail(HEALTH_CHECK);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let start = Instant::now();

        let handle = spawn_health_monitor(backend.clone(), Duration::from_secs(60), tx);

        let action = rx.recv().await.unwrap();
        assert_eq!(action, Action::HealthCheckFailed(HEALTH_CHECK_FAILURE.to_string()));
        assert!(start.elapsed() >= Duration::from_secs(60));

        let _ = rx.recv().await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(120));
        assert_eq!(backend.calls(), vec![HEALTH_CHECK, HEALTH_CHECK]);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_healthy_backend_reports_nothing() {
        let backend = Arc::new(MockBackend::new());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = spawn_health_monitor(backend.clone(), Duration::from_secs(60), tx);

        let waited = tokio::time::timeout(Duration::from_secs(185), rx.recv()).await;
        assert!(waited.is_err());
        assert_eq!(backend.calls().len(), 3);

        handle.abort();
    }

    #[tokio::test]
    async fn test_out_of_range_period_exits_quietly() {
        let backend = Arc::new(MockBackend::new());
        let (tx, _rx) = mpsc::unbounded_channel();

        let handle = spawn_health_monitor(backend.clone(), Duration::MAX, tx);

        handle.await.unwrap();
        assert!(backend.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_receiver_dropped() {
        let backend = Arc::new(MockBackend::new());
        backend.fail(HEALTH_CHECK);
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let handle = spawn_health_monitor(backend, Duration::from_secs(1), tx);
        handle.await.unwrap();
    }
}
