// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `retry.rs`

#[cfg(test)]
mod tests {
    use super::super::{conflict_backoff, ExponentialBackoff};
    use std::time::Duration;

    /// Test that backoff configuration has expected values
    #[test]
    fn test_conflict_backoff_configuration() {
        let backoff = conflict_backoff();

        assert_eq!(
            backoff.initial_interval,
            Duration::from_millis(10),
            "Initial interval should be 10ms"
        );
        assert_eq!(
            backoff.max_interval,
            Duration::from_secs(1),
            "Max interval should be 1 second"
        );
        assert_eq!(backoff.max_retries, 5, "At most 5 retries");

        #[allow(clippy::float_cmp)]
        {
            assert_eq!(backoff.multiplier, 2.0);
            assert_eq!(backoff.randomization_factor, 0.1);
        }
    }

    /// Test that the backoff stops after `max_retries` intervals
    #[test]
    fn test_backoff_is_bounded() {
        let mut backoff = conflict_backoff();

        for _ in 0..5 {
            assert!(backoff.next_backoff().is_some());
        }
        assert_eq!(backoff.retries(), 5);
        assert!(backoff.next_backoff().is_none());
        assert!(backoff.next_backoff().is_none());
    }

    /// Test exponential growth with jitter inside ±10%
    #[test]
    fn test_backoff_grows_with_jitter() {
        let mut backoff = conflict_backoff();

        let mut expected_ms = 10.0_f64;
        while let Some(interval) = backoff.next_backoff() {
            let ms = interval.as_secs_f64() * 1000.0;
            assert!(
                ms >= expected_ms * 0.9 - 1e-6 && ms <= expected_ms * 1.1 + 1e-6,
                "interval {ms}ms outside ±10% of {expected_ms}ms"
            );
            expected_ms *= 2.0;
        }
    }

    /// Test that the interval never exceeds the cap
    #[test]
    fn test_backoff_respects_max_interval() {
        let mut backoff = ExponentialBackoff::new(
            Duration::from_millis(400),
            Duration::from_secs(1),
            10,
            2.0,
            0.0,
        );

        let intervals: Vec<Duration> = std::iter::from_fn(|| backoff.next_backoff()).collect();
        assert_eq!(intervals.len(), 10);
        assert_eq!(intervals[0], Duration::from_millis(400));
        assert_eq!(intervals[1], Duration::from_millis(800));
        assert!(intervals[2..].iter().all(|d| *d == Duration::from_secs(1)));
    }

    /// Test that reset starts over
    #[test]
    fn test_backoff_reset() {
        let mut backoff =
            ExponentialBackoff::new(Duration::from_millis(10), Duration::from_secs(1), 2, 2.0, 0.0);

        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(10)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(20)));
        assert_eq!(backoff.next_backoff(), None);

        backoff.reset();
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(10)));
    }
}
