//! Exponential reconnect backoff with jitter and a bounded attempt budget.
//!
//! Delay for attempt `n` (0-based) is `base · 2ⁿ`, capped at `max`, then
//! spread by ±`jitter_percent` (capped at 100) so that a fleet of watches
//! losing the same phone does not retry in lockstep.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::RetryPolicy;

pub struct Backoff {
    policy: RetryPolicy,
    attempt: u8,
    rng: StdRng,
}

impl Backoff {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempt: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic jitter for tests and simulations.
    pub fn with_seed(policy: RetryPolicy, seed: u64) -> Self {
        Self {
            policy,
            attempt: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Retries handed out since the last reset.
    pub fn attempts(&self) -> u8 {
        self.attempt
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.policy.max_attempts
    }

    /// Delay before the next retry, or `None` once the budget is spent.
    pub fn next_delay_ms(&mut self) -> Option<u32> {
        if self.is_exhausted() {
            return None;
        }
        let shift = u32::from(self.attempt).min(31);
        let nominal = u64::from(self.policy.base_delay_ms)
            .saturating_mul(1u64 << shift)
            .min(u64::from(self.policy.max_delay_ms));
        let jitter = u64::from(self.policy.jitter_percent.min(100));
        let spread = nominal * jitter / 100;
        let jittered = if spread == 0 {
            nominal
        } else {
            nominal - spread + self.rng.gen_range(0..=2 * spread)
        };
        self.attempt += 1;
        Some(jittered.clamp(1, u64::from(u32::MAX)) as u32)
    }

    /// Restore the full budget (after a successful connection).
    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}
