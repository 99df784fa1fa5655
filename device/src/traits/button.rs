use embassy_time::Duration;

/// Events published by a hold-tracking button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Pressed,
    Released,
    /// The button has stayed down for at least the configured hold time.
    /// `held_for` is measured from the press edge.
    Held { held_for: Duration },
}

/// One handler per event kind. Handlers are invoked serially by [`dispatch`].
#[allow(async_fn_in_trait)]
pub trait ButtonHandler {
    type Error;

    async fn on_pressed(&mut self) -> Result<(), Self::Error>;

    async fn on_released(&mut self) -> Result<(), Self::Error>;

    async fn on_held(&mut self, held_for: Duration) -> Result<(), Self::Error>;
}

/// Route a single event to the handler registered for its kind.
pub async fn dispatch<H: ButtonHandler>(handler: &mut H, event: Event) -> Result<(), H::Error> {
    match event {
        Event::Pressed => handler.on_pressed().await,
        Event::Released => handler.on_released().await,
        Event::Held { held_for } => handler.on_held(held_for).await,
    }
}
