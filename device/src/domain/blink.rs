//! Blink patterns and rate scaling.

use embassy_time::Duration;

/// On and off time used while the button is first held down.
pub const BASE_INTERVAL: Duration = Duration::from_millis(500);

/// Shortest interval an accelerating blink will reach.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkPattern {
    Off,
    Blink { on: Duration, off: Duration },
}

impl BlinkPattern {
    /// Symmetric blink with equal on and off time.
    pub const fn steady(interval: Duration) -> Self {
        BlinkPattern::Blink {
            on: interval,
            off: interval,
        }
    }
}

/// Scale `base` down by the number of seconds the button has been held, so
/// the blink speeds up the longer it stays down. Holding for 2 s halves a
/// 500 ms interval to 250 ms.
pub fn accelerated_interval(base: Duration, held_for: Duration) -> Duration {
    let secs = held_for.as_micros() as f64 / 1_000_000.0;
    if secs <= 0.0 {
        return base;
    }
    let scaled = Duration::from_micros((base.as_micros() as f64 / secs) as u64);
    scaled.max(MIN_INTERVAL)
}
