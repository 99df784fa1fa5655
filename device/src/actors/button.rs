use crate::domain::hold::HoldTracker;
use crate::drivers::button::Button;
use crate::drivers::clock::SystemClock;
use crate::drivers::{ActiveLevel, ActiveLow};
use crate::traits::button::Event;
use crate::traits::clock::Clock;
use core::convert::Infallible;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

pub const EVENT_QUEUE_SIZE: usize = 8;

/// Queue between the button actor and whoever handles its events.
pub type EventQueue = Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_SIZE>;

/// Watches a button and publishes press, release and hold events.
pub struct HoldButton<P, C = SystemClock, A = ActiveLow>
where
    P: Wait + InputPin,
    C: Clock,
    A: ActiveLevel,
{
    button: Button<P, A>,
    tracker: HoldTracker,
    clock: C,
}

impl<P, A> HoldButton<P, SystemClock, A>
where
    P: Wait + InputPin,
    A: ActiveLevel,
{
    pub fn new(button: Button<P, A>, tracker: HoldTracker) -> Self {
        Self::with_clock(button, tracker, SystemClock)
    }
}

impl<P, C, A> HoldButton<P, C, A>
where
    P: Wait + InputPin,
    C: Clock,
    A: ActiveLevel,
{
    pub fn with_clock(button: Button<P, A>, tracker: HoldTracker, clock: C) -> Self {
        Self {
            button,
            tracker,
            clock,
        }
    }

    /// Run until the pin fails.
    pub async fn run(&mut self, events: &EventQueue) -> Result<Infallible, P::Error> {
        loop {
            let event = match self.tracker.deadline() {
                Some(deadline) => {
                    match select(self.button.wait_any(), self.clock.wait_until(deadline)).await {
                        Either::First(edge) => self.tracker.edge(edge?, self.clock.now()),
                        Either::Second(()) => self.tracker.expire(self.clock.now()),
                    }
                }
                None => {
                    let edge = self.button.wait_any().await?;
                    self.tracker.edge(edge, self.clock.now())
                }
            };

            if let Some(event) = event {
                log::debug!("Button {:?}", event);
                events.send(event).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{TestClock, TestPin};
    use core::future::Future;
    use core::pin::pin;
    use core::task::Context;
    use embassy_time::Duration;

    fn drain(events: &EventQueue) -> Vec<Event> {
        core::iter::from_fn(|| events.try_receive().ok()).collect()
    }

    #[test]
    fn test_short_press_then_hold() {
        let pin = TestPin::new(true);
        let clock = TestClock::new();
        let events = EventQueue::new();
        let mut button = HoldButton::with_clock(
            Button::<_, ActiveLow>::new(pin.clone()),
            HoldTracker::new(Duration::from_millis(100), false),
            clock.clone(),
        );

        let waker = futures::task::noop_waker_ref();
        let mut cx = Context::from_waker(waker);
        let mut run = pin!(button.run(&events));
        assert!(run.as_mut().poll(&mut cx).is_pending());

        pin.set_low();
        assert!(run.as_mut().poll(&mut cx).is_pending());
        clock.advance(Duration::from_millis(50));
        pin.set_high();
        assert!(run.as_mut().poll(&mut cx).is_pending());
        clock.advance(Duration::from_millis(200));
        assert!(run.as_mut().poll(&mut cx).is_pending());
        assert_eq!(vec![Event::Pressed, Event::Released], drain(&events));

        pin.set_low();
        assert!(run.as_mut().poll(&mut cx).is_pending());
        clock.advance(Duration::from_millis(99));
        assert!(run.as_mut().poll(&mut cx).is_pending());
        assert_eq!(vec![Event::Pressed], drain(&events));

        clock.advance(Duration::from_millis(1));
        assert!(run.as_mut().poll(&mut cx).is_pending());
        clock.advance(Duration::from_millis(500));
        assert!(run.as_mut().poll(&mut cx).is_pending());
        pin.set_high();
        assert!(run.as_mut().poll(&mut cx).is_pending());
        assert_eq!(
            vec![
                Event::Held {
                    held_for: Duration::from_millis(100)
                },
                Event::Released,
            ],
            drain(&events)
        );
    }

    #[test]
    fn test_repeats_while_held() {
        let pin = TestPin::new(true);
        let clock = TestClock::new();
        let events = EventQueue::new();
        let mut button = HoldButton::with_clock(
            Button::<_, ActiveLow>::new(pin.clone()),
            HoldTracker::new(Duration::from_millis(100), true),
            clock.clone(),
        );

        let waker = futures::task::noop_waker_ref();
        let mut cx = Context::from_waker(waker);
        let mut run = pin!(button.run(&events));
        pin.set_low();
        assert!(run.as_mut().poll(&mut cx).is_pending());
        for _ in 0..3 {
            clock.advance(Duration::from_millis(100));
            assert!(run.as_mut().poll(&mut cx).is_pending());
        }

        let held: Vec<_> = drain(&events)
            .into_iter()
            .filter_map(|e| match e {
                Event::Held { held_for } => Some(held_for.as_millis()),
                _ => None,
            })
            .collect();
        assert_eq!(vec![100, 200, 300], held);
    }
}
