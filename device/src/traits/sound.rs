use embassy_time::Duration;

/// A preloaded audio asset.
pub trait Sample {
    type Error;

    /// Start playback. The clip plays once and is then repeated `loops` more
    /// times. A fractional part cuts the final repetition short.
    fn play(&mut self, loops: f64) -> Result<(), Self::Error>;

    fn stop(&mut self) -> Result<(), Self::Error>;

    fn length(&self) -> Duration;
}
