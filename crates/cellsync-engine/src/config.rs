use std::time::Duration;

use crate::{
    SolverError,
    deduction::{self, BoxedDeduction},
};

/// Settings for an [`Engine`](crate::Engine).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use cellsync_engine::{EngineConfig, deduction};
///
/// let config = EngineConfig::default()
///     .with_deductions(deduction::basic_deductions())
///     .with_barrier_timeout(Duration::from_secs(5))
///     .with_history(true);
///
/// assert_eq!(config.deductions().len(), 2);
/// assert!(config.records_history());
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    relay_capacity: usize,
    inbox_capacity: usize,
    barrier_timeout: Duration,
    deductions: Vec<BoxedDeduction>,
    record_history: bool,
    record_changes: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            relay_capacity: Self::DEFAULT_RELAY_CAPACITY,
            inbox_capacity: Self::DEFAULT_INBOX_CAPACITY,
            barrier_timeout: Self::DEFAULT_BARRIER_TIMEOUT,
            deductions: deduction::all_deductions(),
            record_history: false,
            record_changes: false,
        }
    }
}

impl EngineConfig {
    /// Default number of requests the relay can hold.
    ///
    /// A fully given grid stages 1620 peer eliminations in its first round.
    pub const DEFAULT_RELAY_CAPACITY: usize = 4096;

    /// Default capacity of each cell actor's inbox.
    pub const DEFAULT_INBOX_CAPACITY: usize = 64;

    /// Default time the coordinator waits for a barrier to complete.
    pub const DEFAULT_BARRIER_TIMEOUT: Duration = Duration::from_secs(30);

    /// Sets the relay capacity.
    #[must_use]
    pub fn with_relay_capacity(mut self, capacity: usize) -> Self {
        self.relay_capacity = capacity;
        self
    }

    /// Sets the inbox capacity of every cell actor.
    #[must_use]
    pub fn with_inbox_capacity(mut self, capacity: usize) -> Self {
        self.inbox_capacity = capacity;
        self
    }

    /// Sets the barrier timeout.
    #[must_use]
    pub fn with_barrier_timeout(mut self, timeout: Duration) -> Self {
        self.barrier_timeout = timeout;
        self
    }

    /// Sets the deductions run during each analysis phase.
    #[must_use]
    pub fn with_deductions(mut self, deductions: Vec<BoxedDeduction>) -> Self {
        self.deductions = deductions;
        self
    }

    /// Enables recording a board snapshot after every commit.
    #[must_use]
    pub fn with_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    /// Enables recording every cell state change.
    #[must_use]
    pub fn with_change_log(mut self, enabled: bool) -> Self {
        self.record_changes = enabled;
        self
    }

    /// Returns the relay capacity.
    #[must_use]
    pub fn relay_capacity(&self) -> usize {
        self.relay_capacity
    }

    /// Returns the inbox capacity.
    #[must_use]
    pub fn inbox_capacity(&self) -> usize {
        self.inbox_capacity
    }

    /// Returns the barrier timeout.
    #[must_use]
    pub fn barrier_timeout(&self) -> Duration {
        self.barrier_timeout
    }

    /// Returns the configured deductions.
    #[must_use]
    pub fn deductions(&self) -> &[BoxedDeduction] {
        &self.deductions
    }

    /// Returns `true` if board history is recorded.
    #[must_use]
    pub fn records_history(&self) -> bool {
        self.record_history
    }

    /// Returns `true` if the change log is recorded.
    #[must_use]
    pub fn records_changes(&self) -> bool {
        self.record_changes
    }

    /// Checks that the configuration can run a solve.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidConfig`] if a capacity is zero.
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.relay_capacity == 0 {
            return Err(SolverError::InvalidConfig {
                reason: "relay capacity must be at least 1",
            });
        }
        if self.inbox_capacity == 0 {
            return Err(SolverError::InvalidConfig {
                reason: "inbox capacity must be at least 1",
            });
        }
        Ok(())
    }
}
