use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant};

use crate::logic::formatting::RELATIVE_TIME_REFRESH_SECS;

/// Periodic clock for relative-time labels
///
/// Sends the current time every period while running. The task is aborted by
/// `stop()` or when the ticker is dropped, whichever comes first.
pub struct RelativeTimeTicker {
    handle: Option<JoinHandle<()>>,
}

impl RelativeTimeTicker {
    /// Start ticking every 15 seconds
    pub fn start() -> (Self, mpsc::UnboundedReceiver<DateTime<Utc>>) {
        Self::with_period(Duration::from_secs(RELATIVE_TIME_REFRESH_SECS))
    }

    pub fn with_period(period: Duration) -> (Self, mpsc::UnboundedReceiver<DateTime<Utc>>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                if tx.send(Utc::now()).is_err() {
                    break;
                }
            }
        });

        (
            Self {
                handle: Some(handle),
            },
            rx,
        )
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the timer (safe to call more than once)
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("Relative time ticker stopped");
        }
    }
}

impl Drop for RelativeTimeTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
