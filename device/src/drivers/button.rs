use super::{ActiveLevel, ActiveLow};
use crate::traits::button::Event;
use core::marker::PhantomData;
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

/// A push button on an edge-capable input pin.
///
/// Buttons default to [`ActiveLow`], which matches a switch to ground with a
/// pull-up on the pin.
pub struct Button<P, A = ActiveLow>
where
    P: Wait + InputPin,
    A: ActiveLevel,
{
    pin: P,
    _active: PhantomData<A>,
}

impl<P, A> Button<P, A>
where
    P: Wait + InputPin,
    A: ActiveLevel,
{
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            _active: PhantomData,
        }
    }

    pub fn is_pressed(&mut self) -> Result<bool, P::Error> {
        Ok(A::is_active(self.pin.is_high()?))
    }

    pub async fn wait_pressed(&mut self) -> Result<(), P::Error> {
        if A::ACTIVE_HIGH {
            self.pin.wait_for_high().await
        } else {
            self.pin.wait_for_low().await
        }
    }

    pub async fn wait_released(&mut self) -> Result<(), P::Error> {
        if A::ACTIVE_HIGH {
            self.pin.wait_for_low().await
        } else {
            self.pin.wait_for_high().await
        }
    }

    /// Wait for the next edge and report which way it went.
    pub async fn wait_any(&mut self) -> Result<Event, P::Error> {
        self.pin.wait_for_any_edge().await?;
        Ok(match self.is_pressed()? {
            true => Event::Pressed,
            false => Event::Released,
        })
    }
}

impl<P, A> From<P> for Button<P, A>
where
    P: Wait + InputPin,
    A: ActiveLevel,
{
    fn from(pin: P) -> Self {
        Self::new(pin)
    }
}
