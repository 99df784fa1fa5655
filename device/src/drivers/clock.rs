use crate::traits::clock::Clock;
use embassy_time::{Instant, Timer};

/// The embassy time driver.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn wait_until(&mut self, deadline: Instant) {
        Timer::at(deadline).await
    }
}
