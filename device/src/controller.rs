//! The hold-to-shutdown state machine.

use crate::actors::button::EventQueue;
use crate::traits::button::{dispatch, ButtonHandler};
use crate::traits::feedback::Feedback;
use crate::traits::power::PowerControl;
use core::convert::Infallible;
use embassy_time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Pressed,
    /// Shutdown was triggered. Nothing leaves this state.
    Held,
}

/// Drives feedback while the button is down and powers the host off once it
/// has been held for `shutdown_after`.
pub struct ShutdownController<F, P>
where
    F: Feedback,
    P: PowerControl,
{
    feedback: F,
    power: P,
    shutdown_after: Duration,
    state: State,
}

impl<F, P> ShutdownController<F, P>
where
    F: Feedback,
    P: PowerControl,
{
    pub fn new(feedback: F, power: P, shutdown_after: Duration) -> Self {
        Self {
            feedback,
            power,
            shutdown_after,
            state: State::Idle,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn power(&self) -> &P {
        &self.power
    }

    /// Handle events from the queue, one at a time, until feedback fails.
    pub async fn run(&mut self, events: &EventQueue) -> Result<Infallible, F::Error> {
        loop {
            let event = events.receive().await;
            dispatch(self, event).await?;
        }
    }
}

impl<F, P> ButtonHandler for ShutdownController<F, P>
where
    F: Feedback,
    P: PowerControl,
{
    type Error = F::Error;

    async fn on_pressed(&mut self) -> Result<(), Self::Error> {
        if self.state != State::Idle {
            return Ok(());
        }
        log::info!(
            "Button pressed, hold for {} ms to power off",
            self.shutdown_after.as_millis()
        );
        self.state = State::Pressed;
        self.feedback.attention().await
    }

    async fn on_released(&mut self) -> Result<(), Self::Error> {
        if self.state != State::Pressed {
            return Ok(());
        }
        log::info!("Button released, shutdown cancelled");
        self.state = State::Idle;
        self.feedback.cancel().await
    }

    async fn on_held(&mut self, held_for: Duration) -> Result<(), Self::Error> {
        if self.state != State::Pressed {
            return Ok(());
        }
        self.feedback.held(held_for).await?;
        if held_for < self.shutdown_after {
            return Ok(());
        }

        log::info!("Button held for {} ms, shutting down", held_for.as_millis());
        self.state = State::Held;
        let finale = self.feedback.finale().await;
        // Power-off goes ahead even if the finale could not be played.
        self.power.power_off();
        finale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{Entry, Journal, RecordingFeedback, RecordingPower};
    use crate::traits::button::Event;
    use futures::executor::block_on;

    fn controller(journal: &Journal) -> ShutdownController<RecordingFeedback, RecordingPower> {
        ShutdownController::new(
            RecordingFeedback::new(journal),
            RecordingPower::new(journal),
            Duration::from_secs(6),
        )
    }

    fn held(secs: u64) -> Event {
        Event::Held {
            held_for: Duration::from_secs(secs),
        }
    }

    #[test]
    fn test_hold_below_threshold_keeps_pressed() {
        let journal = Journal::new();
        let mut controller = controller(&journal);

        block_on(dispatch(&mut controller, Event::Pressed)).unwrap();
        block_on(dispatch(&mut controller, held(5))).unwrap();
        assert_eq!(State::Pressed, controller.state());
        assert_eq!(0, controller.power().count());
    }

    #[test]
    fn test_finale_runs_before_power_off() {
        let journal = Journal::new();
        let mut controller = controller(&journal);

        block_on(dispatch(&mut controller, Event::Pressed)).unwrap();
        block_on(dispatch(&mut controller, held(6))).unwrap();
        assert_eq!(State::Held, controller.state());
        assert_eq!(
            vec![
                Entry::Attention,
                Entry::Held(Duration::from_secs(6)),
                Entry::Finale,
                Entry::PowerOff,
            ],
            journal.entries()
        );
    }

    #[test]
    fn test_press_while_held_ignored() {
        let journal = Journal::new();
        let mut controller = controller(&journal);

        block_on(dispatch(&mut controller, Event::Pressed)).unwrap();
        block_on(dispatch(&mut controller, held(7))).unwrap();
        block_on(dispatch(&mut controller, Event::Released)).unwrap();
        block_on(dispatch(&mut controller, Event::Pressed)).unwrap();
        block_on(dispatch(&mut controller, held(7))).unwrap();
        assert_eq!(State::Held, controller.state());
        assert_eq!(1, controller.power().count());
    }

    #[test]
    fn test_power_off_despite_failed_finale() {
        let journal = Journal::new();
        let mut controller = ShutdownController::new(
            RecordingFeedback::new(&journal).failing_finale(),
            RecordingPower::new(&journal),
            Duration::from_secs(6),
        );

        block_on(dispatch(&mut controller, Event::Pressed)).unwrap();
        assert!(block_on(dispatch(&mut controller, held(6))).is_err());
        assert_eq!(1, controller.power().count());
    }
}
