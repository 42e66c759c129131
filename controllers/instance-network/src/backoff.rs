//! # Fibonacci Backoff
//!
//! Provides a Fibonacci-based backoff for re-reading an instance whose
//! declared networks have not reported addresses yet. It grows more slowly
//! than exponential backoff, which suits the few seconds Compute usually
//! needs to attach a network.
//!
//! Sequence with the defaults: 2s, 2s, 4s, 6s, 10s, 16s, 26s, 30s (max).

use std::time::Duration;

/// Fibonacci backoff calculator
///
/// Each backoff is the sum of the previous two, capped at `max_seconds`.
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    /// Previous backoff value in seconds
    prev_seconds: u64,
    /// Current backoff value in seconds
    current_seconds: u64,
    /// Maximum backoff value in seconds
    max_seconds: u64,
}

impl FibonacciBackoff {
    /// Create a new Fibonacci backoff with minimum and maximum values in seconds
    ///
    /// # Arguments
    ///
    /// * `min_seconds` - Used for the first two values (typically 2)
    /// * `max_seconds` - Caps the sequence (typically 30)
    #[must_use]
    pub fn new(min_seconds: u64, max_seconds: u64) -> Self {
        Self {
            prev_seconds: 0,
            current_seconds: min_seconds,
            max_seconds,
        }
    }

    /// Get the next backoff duration in seconds and advance the sequence
    pub fn next_backoff_seconds(&mut self) -> u64 {
        let result = self.current_seconds;

        let next = self.prev_seconds + self.current_seconds;
        self.prev_seconds = self.current_seconds;
        self.current_seconds = std::cmp::min(next, self.max_seconds);

        result
    }

    /// Get the next backoff duration as a `Duration` and advance the sequence
    #[must_use]
    pub fn next_backoff(&mut self) -> Duration {
        Duration::from_secs(self.next_backoff_seconds())
    }
}

impl Default for FibonacciBackoff {
    fn default() -> Self {
        Self::new(2, 30)
    }
}
