//! Press/hold timing for a single button.

use crate::traits::button::Event;
use embassy_time::{Duration, Instant};

/// Shortest repeat period accepted for repeating hold events.
const MIN_REPEAT: Duration = Duration::from_millis(1);

/// Turns press and release edges into button events, adding `Held` once the
/// button has been down for the hold time, and again every hold time after
/// that when `repeat` is set.
///
/// Only one press is tracked at a time: a second press edge without a
/// release in between is ignored.
#[derive(Debug, Clone)]
pub struct HoldTracker {
    hold_time: Duration,
    repeat: bool,
    pressed_at: Option<Instant>,
    next_held: Option<Instant>,
}

impl HoldTracker {
    pub fn new(hold_time: Duration, repeat: bool) -> Self {
        Self {
            hold_time,
            repeat,
            pressed_at: None,
            next_held: None,
        }
    }

    pub fn hold_time(&self) -> Duration {
        self.hold_time
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }

    /// Time held so far, if pressed.
    pub fn held_for(&self, now: Instant) -> Option<Duration> {
        self.pressed_at
            .map(|at| now.checked_duration_since(at).unwrap_or(Duration::from_ticks(0)))
    }

    /// When the next `Held` event is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.next_held
    }

    pub fn press(&mut self, now: Instant) -> Option<Event> {
        if self.pressed_at.is_some() {
            return None;
        }
        self.pressed_at.replace(now);
        self.next_held.replace(now + self.hold_time);
        Some(Event::Pressed)
    }

    pub fn release(&mut self) -> Option<Event> {
        self.next_held.take();
        self.pressed_at.take().map(|_| Event::Released)
    }

    /// Feed an edge reported by the button driver.
    pub fn edge(&mut self, edge: Event, now: Instant) -> Option<Event> {
        match edge {
            Event::Pressed => self.press(now),
            Event::Released => self.release(),
            Event::Held { .. } => None,
        }
    }

    /// Produce the `Held` event if its deadline has passed.
    pub fn expire(&mut self, now: Instant) -> Option<Event> {
        let due = self.next_held?;
        if now < due {
            return None;
        }
        let held_for = self.held_for(now)?;

        self.next_held = if self.repeat {
            let period = self.hold_time.max(MIN_REPEAT);
            let mut next = due + period;
            // Skip periods that were missed entirely.
            while next <= now {
                next = next + period;
            }
            Some(next)
        } else {
            None
        };

        Some(Event::Held { held_for })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_duplicate_press_ignored() {
        let mut tracker = HoldTracker::new(Duration::from_secs(6), false);
        assert_eq!(Some(Event::Pressed), tracker.press(at(0)));
        assert_eq!(None, tracker.press(at(100)));
        assert_eq!(Some(at(6_000)), tracker.deadline());
    }

    #[test]
    fn test_release_without_press_ignored() {
        let mut tracker = HoldTracker::new(Duration::from_secs(6), false);
        assert_eq!(None, tracker.release());
        assert_eq!(None, tracker.edge(Event::Released, at(0)));
    }

    #[test]
    fn test_missed_periods_skipped() {
        let mut tracker = HoldTracker::new(Duration::from_secs(1), true);
        tracker.press(at(0));
        assert_eq!(
            Some(Event::Held {
                held_for: Duration::from_millis(3_500)
            }),
            tracker.expire(at(3_500))
        );
        assert_eq!(Some(at(4_000)), tracker.deadline());
    }
}
