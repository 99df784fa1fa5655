use crate::drivers::{ActiveHigh, ActiveLevel};
use crate::traits::led::Led;
use core::marker::PhantomData;
use embedded_hal::digital::OutputPin;

pub struct GpioLed<P, A = ActiveHigh>
where
    P: OutputPin,
    A: ActiveLevel,
{
    pin: P,
    state: bool,
    _active: PhantomData<A>,
}

impl<P, A> GpioLed<P, A>
where
    P: OutputPin,
    A: ActiveLevel,
{
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            state: false,
            _active: PhantomData,
        }
    }

    fn set(&mut self, state: bool) -> Result<(), P::Error> {
        match state == A::ACTIVE_HIGH {
            true => self.pin.set_high(),
            false => self.pin.set_low(),
        }?;
        self.state = state;
        Ok(())
    }
}

impl<P, A> Led for GpioLed<P, A>
where
    P: OutputPin,
    A: ActiveLevel,
{
    type Error = P::Error;

    fn on(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.set(!self.state)
    }

    fn state(&self) -> bool {
        self.state
    }
}

impl<P, A> From<P> for GpioLed<P, A>
where
    P: OutputPin,
    A: ActiveLevel,
{
    fn from(pin: P) -> Self {
        Self::new(pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::ActiveLow;
    use crate::testutil::TestOutput;

    #[test]
    fn test_on_off_toggle() {
        let pin = TestOutput::new();
        let mut led: GpioLed<_> = GpioLed::new(pin.clone());
        assert!(!led.state());

        led.on().unwrap();
        assert!(led.state());
        assert!(pin.is_set_high());

        led.toggle().unwrap();
        assert!(!led.state());
        assert!(!pin.is_set_high());
    }

    #[test]
    fn test_active_low_inverts_pin() {
        let pin = TestOutput::new();
        let mut led: GpioLed<_, ActiveLow> = GpioLed::new(pin.clone());

        led.on().unwrap();
        assert!(led.state());
        assert!(!pin.is_set_high());

        led.off().unwrap();
        assert!(pin.is_set_high());
    }
}
