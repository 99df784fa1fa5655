use crate::domain::blink::BlinkPattern;
use crate::traits::led::Led;
use core::convert::Infallible;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

/// Latest pattern requested for a blinker. Newer patterns replace older ones.
pub type BlinkSignal = Signal<CriticalSectionRawMutex, BlinkPattern>;

/// Owns an LED and plays the most recent [`BlinkPattern`] on it.
pub struct Blinker<L, D>
where
    L: Led,
    D: DelayNs,
{
    led: L,
    delay: D,
}

impl<L, D> Blinker<L, D>
where
    L: Led,
    D: DelayNs,
{
    pub fn new(led: L, delay: D) -> Self {
        Self { led, delay }
    }

    pub fn led(&self) -> &L {
        &self.led
    }

    /// Run until the LED fails. Starts dark.
    pub async fn run(&mut self, patterns: &BlinkSignal) -> Result<Infallible, L::Error> {
        let mut pattern = BlinkPattern::Off;
        loop {
            pattern = match pattern {
                BlinkPattern::Off => {
                    self.led.off()?;
                    patterns.wait().await
                }
                BlinkPattern::Blink { on, off } => {
                    self.led.on()?;
                    match self.hold(on, patterns).await {
                        Some(next) => next,
                        None => {
                            self.led.off()?;
                            self.hold(off, patterns).await.unwrap_or(pattern)
                        }
                    }
                }
            };
        }
    }

    /// Keep the LED as it is for `duration`, unless a new pattern arrives.
    async fn hold(&mut self, duration: Duration, patterns: &BlinkSignal) -> Option<BlinkPattern> {
        let us = duration.as_micros().min(u32::MAX as u64) as u32;
        match select(patterns.wait(), self.delay.delay_us(us)).await {
            Either::First(next) => Some(next),
            Either::Second(()) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::led::GpioLed;
    use crate::testutil::{Entry, Journal, RecordingDelay, TestOutput};
    use core::future::Future;
    use core::pin::pin;
    use core::task::Context;

    #[test]
    fn test_blinks_until_off() {
        let journal = Journal::new();
        let pin = TestOutput::new();
        let signal = BlinkSignal::new();
        let led: GpioLed<TestOutput> = GpioLed::new(pin.clone());
        let mut blinker = Blinker::new(led, RecordingDelay::new(&journal).limit(3));

        signal.signal(BlinkPattern::Blink {
            on: Duration::from_millis(500),
            off: Duration::from_millis(300),
        });

        let waker = futures::task::noop_waker_ref();
        let mut cx = Context::from_waker(waker);
        let mut run = pin!(blinker.run(&signal));
        assert!(run.as_mut().poll(&mut cx).is_pending());

        // dark at start, then two on/off cycles with the fourth delay parked
        assert_eq!(vec![false, true, false, true, false], pin.history());
        assert_eq!(
            vec![
                Entry::Delay(Duration::from_millis(500)),
                Entry::Delay(Duration::from_millis(300)),
                Entry::Delay(Duration::from_millis(500)),
            ],
            journal.entries()
        );

        signal.signal(BlinkPattern::Off);
        assert!(run.as_mut().poll(&mut cx).is_pending());
        assert_eq!(vec![false, true, false, true, false, false], pin.history());
        assert!(!pin.is_set_high());
    }

    #[test]
    fn test_new_pattern_interrupts_interval() {
        let journal = Journal::new();
        let pin = TestOutput::new();
        let signal = BlinkSignal::new();
        let led: GpioLed<TestOutput> = GpioLed::new(pin.clone());
        let mut blinker = Blinker::new(led, RecordingDelay::new(&journal).limit(0));

        signal.signal(BlinkPattern::steady(Duration::from_millis(500)));
        let waker = futures::task::noop_waker_ref();
        let mut cx = Context::from_waker(waker);
        let mut run = pin!(blinker.run(&signal));
        assert!(run.as_mut().poll(&mut cx).is_pending());
        assert_eq!(vec![false, true], pin.history());

        signal.signal(BlinkPattern::steady(Duration::from_millis(250)));
        assert!(run.as_mut().poll(&mut cx).is_pending());
        // restarted with the LED lit for the new interval
        assert_eq!(vec![false, true, true], pin.history());
    }
}
