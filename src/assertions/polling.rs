//! Poll-until-condition-or-deadline primitives.
//!
//! The loop samples the condition, then sleeps for the poll interval, and
//! stops at the first true sample or once the deadline has passed. A sample
//! is always taken at or just before the deadline, so a condition that turns
//! true late in the window is still seen.

use crate::ui::surface::{Locator, UiSurface};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Deadline used when `start + timeout` does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Result of a bounded wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Found { elapsed: Duration },
    TimedOut { elapsed: Duration },
}

impl WaitOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, WaitOutcome::Found { .. })
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            WaitOutcome::Found { elapsed } | WaitOutcome::TimedOut { elapsed } => *elapsed,
        }
    }
}

/// Sample `condition` every `interval` until it holds or `timeout` elapses
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut condition: F) -> WaitOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = Instant::now();
    let deadline = start
        .checked_add(timeout)
        .unwrap_or_else(|| start + FAR_FUTURE);
    let mut samples: u32 = 0;

    loop {
        samples += 1;
        if condition().await {
            trace!(samples, elapsed = ?start.elapsed(), "Condition met");
            return WaitOutcome::Found {
                elapsed: start.elapsed(),
            };
        }

        let now = Instant::now();
        if now >= deadline {
            trace!(samples, "Condition not met before deadline");
            return WaitOutcome::TimedOut {
                elapsed: start.elapsed(),
            };
        }

        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}

/// Wait for an element to become visible; `true` if it did within `timeout`
pub async fn wait_visible<S>(surface: &S, locator: &Locator, timeout: Duration, interval: Duration) -> bool
where
    S: UiSurface + ?Sized,
{
    poll_until(timeout, interval, move || surface.is_visible(locator))
        .await
        .is_found()
}
