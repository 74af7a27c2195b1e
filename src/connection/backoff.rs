// src/connection/backoff.rs

//! Reconnect pacing: bounded exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Fraction of the base delay used as the jitter range.
const JITTER_FRACTION: f64 = 0.25;

/// Tracks the delay before the next connect attempt. The delay doubles on
/// every consecutive failure up to a cap and resets on success, replacing
/// the retry-every-tick behavior of the original component.
#[derive(Debug)]
pub struct ReconnectBackoff {
    initial: Duration,
    max: Duration,
    next: Duration,
}

impl ReconnectBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            next: initial,
        }
    }

    /// Returns the delay to wait before the next attempt and doubles the
    /// stored delay, up to the cap. A random jitter of up to 25% is added
    /// so a fleet of clients does not reconnect in lockstep.
    pub fn next_delay(&mut self) -> Duration {
        let base = self.next;
        self.next = (self.next * 2).min(self.max);
        let jitter = base.mul_f64(rand::thread_rng().gen_range(0.0..JITTER_FRACTION));
        base + jitter
    }

    /// Restores the initial delay; called after a successful connect.
    pub fn reset(&mut self) {
        self.next = self.initial;
    }
}
