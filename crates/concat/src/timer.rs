//! Adaptive idle sleeper
//!
//! Workers poll their slot maps for timed-out entries whenever the input
//! channel goes quiet. The sleeper starts responsive and relaxes under
//! sustained idleness, so an idle worker costs a wakeup every half second
//! instead of a ticker.

use std::time::Duration;

/// Configuration for the adaptive sleeper
#[derive(Debug, Clone)]
pub struct TimerConfig {
    /// Wait after a record was recently seen
    pub initial_wait: Duration,

    /// Ceiling the wait relaxes towards while idle
    pub max_wait: Duration,

    /// Pending entries idle longer than this are flushed
    pub concat_timeout: Duration,

    /// Consecutive empty sleeps before the wait doubles
    pub n_waits_to_double: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            initial_wait: Duration::from_millis(20),
            max_wait: Duration::from_millis(500),
            concat_timeout: Duration::from_secs(5),
            n_waits_to_double: 2,
        }
    }
}

impl TimerConfig {
    /// Set the initial wait
    pub fn with_initial_wait(mut self, wait: Duration) -> Self {
        self.initial_wait = wait;
        self
    }

    /// Set the wait ceiling
    pub fn with_max_wait(mut self, wait: Duration) -> Self {
        self.max_wait = wait;
        self
    }

    /// Set the pending-entry flush deadline
    pub fn with_concat_timeout(mut self, timeout: Duration) -> Self {
        self.concat_timeout = timeout;
        self
    }

    /// Set how many empty sleeps double the wait
    pub fn with_n_waits_to_double(mut self, n: u32) -> Self {
        self.n_waits_to_double = n.max(1);
        self
    }
}

/// Exponentially backed-off sleeper for the idle branch
#[derive(Debug)]
pub struct BackoffTimer {
    config: TimerConfig,
    current_wait: Duration,
    n_waits: u32,
}

impl BackoffTimer {
    /// Create a sleeper at its initial wait
    pub fn new(config: TimerConfig) -> Self {
        let current_wait = config.initial_wait;
        Self {
            config,
            current_wait,
            n_waits: 0,
        }
    }

    /// Snap back to the initial wait
    ///
    /// Called on every record admission: traffic means the worker should
    /// poll responsively again.
    pub fn reset(&mut self) {
        self.current_wait = self.config.initial_wait;
        self.n_waits = 0;
    }

    /// Sleep for the current wait, then relax it
    ///
    /// Every `n_waits_to_double` completed sleeps the wait doubles,
    /// clamped to `max_wait`. A sleep cancelled mid-flight (a record
    /// arrived) does not count.
    pub async fn sleep(&mut self) {
        tokio::time::sleep(self.current_wait).await;

        self.n_waits += 1;
        if self.n_waits >= self.config.n_waits_to_double {
            self.current_wait = (self.current_wait * 2).min(self.config.max_wait);
            self.n_waits = 0;
        }
    }

    /// The wait the next sleep will use
    pub fn current_wait(&self) -> Duration {
        self.current_wait
    }

    /// The flush deadline for pending entries
    pub fn concat_timeout(&self) -> Duration {
        self.config.concat_timeout
    }
}
