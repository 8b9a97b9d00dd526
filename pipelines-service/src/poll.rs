//! Bounded, cancellable polling
//!
//! Repeats a check at a fixed interval until it yields a value. The loop can
//! be capped by attempts and by a deadline, and stopped from outside through a
//! [`CancelHandle`].

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant};
use tracing::debug;

use crate::error::{PipelineError, Result};

/// Default wait between two poll attempts
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polling limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Wait before each attempt
    pub interval: Duration,
    /// Give up after this many attempts
    pub max_attempts: Option<u32>,
    /// Give up once this much time has passed
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
            timeout: None,
        }
    }
}

/// Cancels the poll loops holding the matching [`CancelToken`]
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.0.send(true);
    }
}

/// Observes cancellation requests
#[derive(Debug, Clone)]
pub struct CancelToken(watch::Receiver<bool>);

impl CancelToken {
    /// A token that is never cancelled
    pub fn never() -> Self {
        let (_, rx) = watch::channel(false);
        Self(rx)
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once cancellation is requested
    ///
    /// Never resolves when the handle was dropped without cancelling.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.0.borrow_and_update() {
                return;
            }
            if self.0.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Create a linked cancel handle and token
pub fn cancellation() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle(tx), CancelToken(rx))
}

/// Runs a check until it produces a value
#[derive(Debug, Clone, Default)]
pub struct Poller {
    config: PollConfig,
}

impl Poller {
    pub fn new(config: PollConfig) -> Self {
        Self { config }
    }

    /// Poll `check` until it returns `Ok(Some(_))`
    ///
    /// Each attempt waits one interval first. `Ok(None)` means "not done
    /// yet"; an `Err` ends the loop immediately and is returned as is.
    ///
    /// # Errors
    /// - `Cancelled` if the token fires while waiting or checking
    /// - `PollTimedOut` once `max_attempts` or `timeout` is exhausted
    pub async fn poll_until<T, F, Fut>(&self, cancel: &mut CancelToken, mut check: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let deadline = self.config.timeout.map(|t| Instant::now() + t);
        let mut attempt = 0u32;

        loop {
            if cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }

            let wake_at = match deadline {
                Some(deadline) => (Instant::now() + self.config.interval).min(deadline),
                None => Instant::now() + self.config.interval,
            };

            tokio::select! {
                _ = time::sleep_until(wake_at) => {}
                _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
            }

            attempt += 1;
            debug!("Poll attempt {}", attempt);

            let outcome = tokio::select! {
                outcome = check(attempt) => outcome?,
                _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
            };

            if let Some(value) = outcome {
                return Ok(value);
            }

            let out_of_attempts = self
                .config
                .max_attempts
                .is_some_and(|max| attempt >= max);
            let out_of_time = deadline.is_some_and(|d| Instant::now() >= d);

            if out_of_attempts || out_of_time {
                return Err(PipelineError::PollTimedOut { attempts: attempt });
            }
        }
    }
}
