//! Polling waits.
//!
//! Every interaction in the suite auto-waits: the element is polled until it
//! is visible, the toast until it shows, the spinner until it is gone. All of
//! those go through [`poll_until`].

use crate::locator::{LocatorOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
use crate::result::{E2eError, E2eResult};
use std::future::Future;
use std::time::{Duration, Instant};

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl From<&LocatorOptions> for WaitOptions {
    #[allow(clippy::cast_possible_truncation)]
    fn from(options: &LocatorOptions) -> Self {
        Self {
            timeout_ms: options.timeout.as_millis() as u64,
            poll_interval_ms: options.poll_interval.as_millis() as u64,
        }
    }
}

/// Outcome of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// What was awaited
    pub waited_for: String,
}

impl WaitResult {
    /// Create a success result
    #[must_use]
    pub fn success(elapsed: Duration, waited_for: impl Into<String>) -> Self {
        Self {
            elapsed,
            waited_for: waited_for.into(),
        }
    }
}

/// Poll `probe` until it yields `true` or the timeout expires.
///
/// The probe always runs at least once. Script errors are treated as "not yet"
/// because the page may be between documents; every other error is returned
/// immediately.
pub async fn poll_until<F, Fut>(
    what: &str,
    options: &WaitOptions,
    mut probe: F,
) -> E2eResult<WaitResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<bool>>,
{
    let start = Instant::now();
    loop {
        match probe().await {
            Ok(true) => return Ok(WaitResult::success(start.elapsed(), what)),
            Ok(false) => {}
            Err(E2eError::Script { message }) => {
                tracing::trace!(what, %message, "probe failed, retrying");
            }
            Err(e) => return Err(e),
        }
        if start.elapsed() >= options.timeout() {
            return Err(E2eError::Timeout {
                what: what.to_string(),
                ms: options.timeout_ms,
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}
