use crate::traits::led::Led;

/// A fixed group of LEDs switched in unison.
pub struct LedBoard<L, const N: usize>
where
    L: Led,
{
    leds: [L; N],
}

impl<L, const N: usize> LedBoard<L, N>
where
    L: Led,
{
    pub fn new(leds: [L; N]) -> Self {
        Self { leds }
    }

    fn each<F>(&mut self, mut f: F) -> Result<(), L::Error>
    where
        F: FnMut(&mut L) -> Result<(), L::Error>,
    {
        for led in self.leds.iter_mut() {
            f(led)?;
        }
        Ok(())
    }
}

impl<L, const N: usize> Led for LedBoard<L, N>
where
    L: Led,
{
    type Error = L::Error;

    fn on(&mut self) -> Result<(), Self::Error> {
        self.each(|led| led.on())
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        self.each(|led| led.off())
    }

    // Toggle as a group so LEDs that drifted apart come back in step.
    fn toggle(&mut self) -> Result<(), Self::Error> {
        match self.state() {
            true => self.off(),
            false => self.on(),
        }
    }

    /// The board counts as lit if any of its LEDs is.
    fn state(&self) -> bool {
        self.leds.iter().any(|led| led.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::led::GpioLed;
    use crate::testutil::TestOutput;

    #[test]
    fn test_switches_all_leds() {
        let act = TestOutput::new();
        let power = TestOutput::new();
        let mut board: LedBoard<GpioLed<TestOutput>, 2> =
            LedBoard::new([GpioLed::new(act.clone()), GpioLed::new(power.clone())]);

        board.on().unwrap();
        assert!(board.state());
        assert!(act.is_set_high() && power.is_set_high());

        board.toggle().unwrap();
        assert!(!board.state());
        assert!(!act.is_set_high() && !power.is_set_high());
    }
}
