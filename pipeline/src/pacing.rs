//! Delay between consecutive external tool calls.
//!
//! The download and publish services rate-limit bursts, so the pipeline waits
//! a fixed interval after each artifact it processed.

use std::time::Duration;

/// Interval used when the settings file does not override it.
pub const DEFAULT_PACING: Duration = Duration::from_millis(500);

/// Blocks the current thread between artifacts.
#[cfg_attr(test, mockall::automock)]
pub trait Pacer {
    /// Wait for `interval`.
    fn pause(&self, interval: Duration);
}

/// [`Pacer`] that sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&self, interval: Duration) {
        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn default_interval_is_half_a_second() {
        assert_eq!(DEFAULT_PACING.as_millis(), 500);
    }

    #[test]
    fn thread_pacer_waits_at_least_the_interval() {
        let start = Instant::now();
        ThreadPacer.pause(Duration::from_millis(5));
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
