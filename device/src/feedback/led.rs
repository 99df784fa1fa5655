use crate::actors::blinker::BlinkSignal;
use crate::domain::blink::{accelerated_interval, BlinkPattern, BASE_INTERVAL};
use crate::traits::feedback::Feedback;
use core::convert::Infallible;
use embassy_time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateMode {
    /// Keep blinking at the base interval until release or shutdown.
    Constant,
    /// Shorten the interval on every hold event, see [`accelerated_interval`].
    Accelerating,
}

/// Blinks an LED (or board of LEDs) through a [`Blinker`](crate::actors::blinker::Blinker).
pub struct LedFeedback<'a> {
    patterns: &'a BlinkSignal,
    mode: RateMode,
    base: Duration,
}

impl<'a> LedFeedback<'a> {
    pub fn new(patterns: &'a BlinkSignal, mode: RateMode) -> Self {
        Self {
            patterns,
            mode,
            base: BASE_INTERVAL,
        }
    }

    fn show(&self, pattern: BlinkPattern) {
        log::debug!("LED pattern {:?}", pattern);
        self.patterns.signal(pattern);
    }
}

impl Feedback for LedFeedback<'_> {
    type Error = Infallible;

    async fn attention(&mut self) -> Result<(), Self::Error> {
        self.show(BlinkPattern::steady(self.base));
        Ok(())
    }

    async fn cancel(&mut self) -> Result<(), Self::Error> {
        self.show(BlinkPattern::Off);
        Ok(())
    }

    async fn held(&mut self, held_for: Duration) -> Result<(), Self::Error> {
        if self.mode == RateMode::Accelerating {
            self.show(BlinkPattern::steady(accelerated_interval(self.base, held_for)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_constant_rate_ignores_hold() {
        let signal = BlinkSignal::new();
        let mut feedback = LedFeedback::new(&signal, RateMode::Constant);

        block_on(feedback.attention()).unwrap();
        assert_eq!(
            Some(BlinkPattern::steady(Duration::from_millis(500))),
            signal.try_take()
        );

        block_on(feedback.held(Duration::from_secs(6))).unwrap();
        assert_eq!(None, signal.try_take());

        block_on(feedback.cancel()).unwrap();
        assert_eq!(Some(BlinkPattern::Off), signal.try_take());
    }

    #[test]
    fn test_accelerating_rate() {
        let signal = BlinkSignal::new();
        let mut feedback = LedFeedback::new(&signal, RateMode::Accelerating);

        block_on(feedback.attention()).unwrap();
        block_on(feedback.held(Duration::from_secs(2))).unwrap();
        assert_eq!(
            Some(BlinkPattern::steady(Duration::from_millis(250))),
            signal.try_take()
        );

        block_on(feedback.held(Duration::from_secs(4))).unwrap();
        assert_eq!(
            Some(BlinkPattern::steady(Duration::from_millis(125))),
            signal.try_take()
        );
    }
}
