use embassy_time::Instant;

/// Time source for actors that wait on absolute deadlines.
#[allow(async_fn_in_trait)]
pub trait Clock {
    fn now(&self) -> Instant;

    async fn wait_until(&mut self, deadline: Instant);
}
