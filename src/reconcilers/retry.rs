// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Exponential backoff for optimistic-concurrency retries.
//!
//! A status write that loses the race against another writer is retried after
//! a short, growing, jittered delay. The number of retries is bounded so a
//! persistently contended record surfaces as an error instead of spinning.

use rand::Rng;
use std::time::Duration;

/// Initial retry interval (10ms)
const CONFLICT_INITIAL_INTERVAL_MILLIS: u64 = 10;

/// Maximum interval between retries (1 second)
const CONFLICT_MAX_INTERVAL_MILLIS: u64 = 1_000;

/// Maximum number of retries after the first attempt
const CONFLICT_MAX_RETRIES: u32 = 5;

/// Backoff multiplier (exponential growth factor)
const BACKOFF_MULTIPLIER: f64 = 2.0;

/// Randomization factor to prevent thundering herd (±10%)
const RANDOMIZATION_FACTOR: f64 = 0.1;

/// Simple exponential backoff implementation.
///
/// Provides exponential backoff with randomization (jitter) to prevent thundering herd.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    /// Current interval duration
    pub current_interval: Duration,
    /// Initial interval duration
    pub initial_interval: Duration,
    /// Maximum interval duration
    pub max_interval: Duration,
    /// Maximum number of intervals handed out
    pub max_retries: u32,
    /// Backoff multiplier (typically 2.0 for doubling)
    pub multiplier: f64,
    /// Randomization factor (e.g., 0.1 for ±10%)
    pub randomization_factor: f64,
    retries: u32,
}

impl ExponentialBackoff {
    /// Create a new exponential backoff with specified parameters.
    #[must_use]
    pub fn new(
        initial_interval: Duration,
        max_interval: Duration,
        max_retries: u32,
        multiplier: f64,
        randomization_factor: f64,
    ) -> Self {
        Self {
            current_interval: initial_interval,
            initial_interval,
            max_interval,
            max_retries,
            multiplier,
            randomization_factor,
            retries: 0,
        }
    }

    /// Get the next backoff interval, or None once `max_retries` were handed out.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if self.retries >= self.max_retries {
            return None;
        }
        self.retries += 1;

        let interval = self.current_interval;
        let jittered = self.apply_jitter(interval);

        let next = interval.as_secs_f64() * self.multiplier;
        self.current_interval = Duration::from_secs_f64(next).min(self.max_interval);

        Some(jittered)
    }

    /// Number of intervals handed out so far.
    #[cfg(test)]
    #[must_use]
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Start over from the initial interval.
    #[cfg(test)]
    pub fn reset(&mut self) {
        self.current_interval = self.initial_interval;
        self.retries = 0;
    }

    /// Apply randomization (jitter) to an interval.
    fn apply_jitter(&self, interval: Duration) -> Duration {
        if self.randomization_factor == 0.0 {
            return interval;
        }

        let secs = interval.as_secs_f64();
        let delta = secs * self.randomization_factor;
        let min = secs - delta;
        let max = secs + delta;

        let jittered = rand::rng().random_range(min..=max);

        Duration::from_secs_f64(jittered.max(0.0))
    }
}

/// Create the backoff used when a status write hits a 409 conflict.
///
/// # Configuration
///
/// - **Initial interval**: 10ms
/// - **Max interval**: 1 second
/// - **Max retries**: 5
/// - **Multiplier**: 2.0 (exponential growth)
/// - **Randomization**: ±10% (prevents thundering herd)
///
/// # Retry Schedule
///
/// With these settings, retries occur at approximately:
///
/// 1. 10ms
/// 2. 20ms
/// 3. 40ms
/// 4. 80ms
/// 5. 160ms
#[must_use]
pub fn conflict_backoff() -> ExponentialBackoff {
    ExponentialBackoff::new(
        Duration::from_millis(CONFLICT_INITIAL_INTERVAL_MILLIS),
        Duration::from_millis(CONFLICT_MAX_INTERVAL_MILLIS),
        CONFLICT_MAX_RETRIES,
        BACKOFF_MULTIPLIER,
        RANDOMIZATION_FACTOR,
    )
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
