use embassy_time::Duration;

/// Output driven by the shutdown controller while the button is down.
#[allow(async_fn_in_trait)]
pub trait Feedback {
    type Error;

    /// The button went down.
    async fn attention(&mut self) -> Result<(), Self::Error>;

    /// The button came up before shutdown was triggered.
    async fn cancel(&mut self) -> Result<(), Self::Error>;

    /// A hold event arrived; called for every repeat while the button is down.
    async fn held(&mut self, _held_for: Duration) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Shutdown has been decided. Returns once the host may go down.
    async fn finale(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
