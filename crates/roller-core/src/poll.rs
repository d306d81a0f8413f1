//! Poll-until-predicate-or-deadline primitive.
//!
//! All waiting in this crate goes through [`poll_until`] rather than ad hoc
//! sleep loops. The probe runs immediately, then at a fixed interval; a
//! probe that succeeds on the first call incurs no sleep at all. Driven by
//! `tokio::time`, so tests can run under paused time.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};

/// Cadence for a poll loop: probe every `interval`, give up once
/// `deadline` has elapsed.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub deadline: Duration,
}

/// How a poll loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The probe produced a value before the deadline.
    Completed(T),
    /// The deadline elapsed with no value. Whether that is fatal is the
    /// caller's decision.
    DeadlineExceeded,
}

impl<T> PollOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Run `probe` until it yields a value or `config.deadline` elapses.
///
/// Probe errors propagate immediately. The final probe runs at the
/// deadline itself, so a predicate that becomes true exactly on time is
/// still observed.
pub async fn poll_until<T, E, F, Fut>(
    config: PollConfig,
    mut probe: F,
) -> Result<PollOutcome<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let start = Instant::now();
    loop {
        if let Some(value) = probe().await? {
            return Ok(PollOutcome::Completed(value));
        }
        if start.elapsed() >= config.deadline {
            return Ok(PollOutcome::DeadlineExceeded);
        }
        sleep(config.interval).await;
    }
}
