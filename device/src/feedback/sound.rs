use crate::traits::feedback::Feedback;
use crate::traits::sound::Sample;
use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

/// Time given to the finale sample to become audible before power-off.
pub const GRACE_TIME: Duration = Duration::from_secs(1);

/// How many extra times a clip of `length` must repeat to cover `hold_time`.
///
/// The count is not rounded or clamped: a clip longer than the hold time
/// yields a fraction below one.
pub fn loop_count(hold_time: Duration, length: Duration) -> f64 {
    if length.as_ticks() == 0 {
        return 0.0;
    }
    hold_time.as_micros() as f64 / length.as_micros() as f64
}

/// Plays a warning clip while the button is held and a finale clip once the
/// host is about to go down.
pub struct SoundFeedback<S, D>
where
    S: Sample,
    D: DelayNs,
{
    warning: S,
    finale: S,
    hold_time: Duration,
    grace: Duration,
    delay: D,
}

impl<S, D> SoundFeedback<S, D>
where
    S: Sample,
    D: DelayNs,
{
    pub fn new(warning: S, finale: S, hold_time: Duration, delay: D) -> Self {
        Self {
            warning,
            finale,
            hold_time,
            grace: GRACE_TIME,
            delay,
        }
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }
}

impl<S, D> Feedback for SoundFeedback<S, D>
where
    S: Sample,
    D: DelayNs,
{
    type Error = S::Error;

    async fn attention(&mut self) -> Result<(), Self::Error> {
        let loops = loop_count(self.hold_time, self.warning.length());
        self.warning.play(loops)
    }

    async fn cancel(&mut self) -> Result<(), Self::Error> {
        self.warning.stop()
    }

    async fn finale(&mut self) -> Result<(), Self::Error> {
        self.warning.stop()?;
        self.finale.play(0.0)?;
        let ms = self.grace.as_millis().min(u32::MAX as u64) as u32;
        self.delay.delay_ms(ms).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{Entry, Journal, RecordingDelay, RecordingSample};
    use futures::executor::block_on;

    fn feedback(journal: &Journal) -> SoundFeedback<RecordingSample, RecordingDelay> {
        SoundFeedback::new(
            RecordingSample::new("melting", Duration::from_secs(4), journal),
            RecordingSample::new("nohome", Duration::from_secs(3), journal),
            Duration::from_secs(10),
            RecordingDelay::new(journal),
        )
    }

    #[test]
    fn test_loop_count_is_not_rounded() {
        assert_eq!(2.5, loop_count(Duration::from_secs(10), Duration::from_secs(4)));
        assert_eq!(0.5, loop_count(Duration::from_secs(10), Duration::from_secs(20)));
    }

    #[test]
    fn test_attention_loops_over_hold() {
        let journal = Journal::new();
        let mut feedback = feedback(&journal);

        block_on(feedback.attention()).unwrap();
        block_on(feedback.cancel()).unwrap();
        assert_eq!(
            vec![Entry::Play("melting", 2.5), Entry::Stop("melting")],
            journal.entries()
        );
    }

    #[test]
    fn test_finale_waits_for_grace() {
        let journal = Journal::new();
        let mut feedback = feedback(&journal);

        block_on(feedback.finale()).unwrap();
        assert_eq!(
            vec![
                Entry::Stop("melting"),
                Entry::Play("nohome", 0.0),
                Entry::Delay(Duration::from_secs(1)),
            ],
            journal.entries()
        );
    }
}
