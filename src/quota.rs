use std::{fmt, time::Duration};

use tracing::warn;

/// Advisory request throttle shared by every remote call site of one run.
///
/// The gate counts successful dispatches; once the ceiling is reached the
/// next caller blocks for a full cooldown window, after which the counter
/// resets and the triggering call proceeds (and counts as 1). Failures of
/// the wrapped operation are reported to the caller as `None` and do not
/// consume quota.
///
/// Single-threaded by contract: the counter is plain state and the
/// ceiling check is not atomic with the increment. A parallel dispatcher
/// must replace this with an atomically-updated counter before reuse.
pub struct QuotaGate {
    request_count: u32,
    max_requests: u32,
    cooldown: Duration,
    sleeper: Box<dyn FnMut(Duration)>,
}

impl QuotaGate {
    /// Gate with the given ceiling and cooldown, sleeping on the calling
    /// thread when the ceiling trips.
    pub fn new(max_requests: u32, cooldown: Duration) -> Self {
        Self::with_sleeper(max_requests, cooldown, Box::new(std::thread::sleep))
    }

    /// Gate with an injected sleeper. Lets tests observe the cooldown
    /// transition without blocking.
    pub fn with_sleeper(
        max_requests: u32,
        cooldown: Duration,
        sleeper: Box<dyn FnMut(Duration)>,
    ) -> Self {
        Self {
            request_count: 0,
            max_requests,
            cooldown,
            sleeper,
        }
    }

    /// Successful dispatches since the last reset.
    pub fn count(&self) -> u32 {
        self.request_count
    }

    /// Run a remote operation under the quota policy.
    ///
    /// Returns `Some(value)` on success, `None` when the wrapped
    /// operation fails (the failure is logged, not propagated).
    pub fn call<T, E>(&mut self, op: impl FnOnce() -> Result<T, E>) -> Option<T>
    where
        E: fmt::Display,
    {
        if self.request_count >= self.max_requests {
            warn!(
                max_requests = self.max_requests,
                cooldown_secs = self.cooldown.as_secs(),
                "request ceiling reached, entering cooldown"
            );
            (self.sleeper)(self.cooldown);
            self.request_count = 0;
        }

        match op() {
            Ok(value) => {
                self.request_count += 1;
                Some(value)
            }
            Err(err) => {
                warn!(error = %err, "remote call failed");
                None
            }
        }
    }
}

impl fmt::Debug for QuotaGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuotaGate")
            .field("request_count", &self.request_count)
            .field("max_requests", &self.max_requests)
            .field("cooldown", &self.cooldown)
            .finish_non_exhaustive()
    }
}
