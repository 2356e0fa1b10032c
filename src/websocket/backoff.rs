//! Reconnect backoff: a pure delay function plus the attempt counter.
//!
//! Delay for the n-th scheduled reconnect (0-based `attempt`) is
//! `base_delay * 2^attempt`. With the defaults this yields
//! 5s, 10s, 20s, 40s, 80s and then nothing.

use std::time::Duration;

/// Delay schedule and attempt cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    base_delay: Duration,
    max_attempts: u32,
}

impl ReconnectPolicy {
    pub fn new(base_delay: Duration, max_attempts: u32) -> Self {
        Self {
            base_delay,
            max_attempts,
        }
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the reconnect scheduled while the counter equals `attempt`.
    ///
    /// Saturates instead of overflowing for large attempt numbers.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        1u32.checked_shl(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }

    /// Whether a reconnect may still be scheduled with `attempts` already used.
    pub fn allows(&self, attempts: u32) -> bool {
        attempts < self.max_attempts
    }
}

/// Attempt counter driven by the client state machine.
///
/// Resets to zero on open, on manual disconnect, and on explicit reset;
/// grows by exactly one per scheduled reconnect and never past the cap.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: ReconnectPolicy,
    attempts: u32,
}

impl Backoff {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
        }
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    /// Reconnects scheduled since the last reset.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_exhausted(&self) -> bool {
        !self.policy.allows(self.attempts)
    }

    /// Claim the next reconnect slot.
    ///
    /// Returns the delay to wait and bumps the counter, or `None` once
    /// the cap is reached (counter left untouched).
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.is_exhausted() {
            return None;
        }
        let delay = self.policy.delay_for(self.attempts);
        self.attempts += 1;
        Some(delay)
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}
