//! Test doubles for pins, outputs and OS services.

use crate::traits::clock::Clock;
use crate::traits::feedback::Feedback;
use crate::traits::power::PowerControl;
use crate::traits::sound::Sample;
use core::convert::Infallible;
use core::future::poll_fn;
use core::task::{Poll, Waker};
use embassy_time::{Duration, Instant};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;
use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

/// Something observable that a test double did.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Attention,
    Cancel,
    Held(Duration),
    Finale,
    PowerOff,
    Play(&'static str, f64),
    Stop(&'static str),
    Delay(Duration),
}

/// Shared, ordered record of what the doubles did.
#[derive(Clone, Default)]
pub struct Journal {
    entries: Rc<RefCell<Vec<Entry>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: Entry) {
        self.entries.borrow_mut().push(entry);
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries.borrow().clone()
    }

    pub fn count(&self, entry: &Entry) -> usize {
        self.entries.borrow().iter().filter(|e| *e == entry).count()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

#[derive(Default)]
struct PinState {
    high: bool,
    edge: bool,
    waker: Option<Waker>,
}

/// An input pin whose level is set by the test.
#[derive(Clone, Default)]
pub struct TestPin {
    inner: Rc<RefCell<PinState>>,
}

impl TestPin {
    pub fn new(high: bool) -> Self {
        let pin = Self::default();
        pin.inner.borrow_mut().high = high;
        pin
    }

    pub fn set_high(&self) {
        self.set(true);
    }

    pub fn set_low(&self) {
        self.set(false);
    }

    fn set(&self, high: bool) {
        let mut state = self.inner.borrow_mut();
        if state.high != high {
            state.high = high;
            state.edge = true;
            if let Some(waker) = state.waker.take() {
                waker.wake();
            }
        }
    }

    async fn wait_until<F: Fn(&mut PinState) -> bool>(&self, ready: F) {
        poll_fn(|cx| {
            let mut state = self.inner.borrow_mut();
            if ready(&mut state) {
                Poll::Ready(())
            } else {
                state.waker.replace(cx.waker().clone());
                Poll::Pending
            }
        })
        .await
    }
}

impl ErrorType for TestPin {
    type Error = Infallible;
}

impl InputPin for TestPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.inner.borrow().high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.inner.borrow().high)
    }
}

impl Wait for TestPin {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        self.wait_until(|s| s.high).await;
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        self.wait_until(|s| !s.high).await;
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_until(|s| core::mem::take(&mut s.edge) && s.high).await;
        Ok(())
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_until(|s| core::mem::take(&mut s.edge) && !s.high).await;
        Ok(())
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_until(|s| core::mem::take(&mut s.edge)).await;
        Ok(())
    }
}

struct ClockState {
    now: Instant,
    waker: Option<Waker>,
}

/// A clock that only moves when the test advances it. Starts at zero.
#[derive(Clone)]
pub struct TestClock {
    inner: Rc<RefCell<ClockState>>,
}

impl TestClock {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ClockState {
                now: Instant::from_ticks(0),
                waker: None,
            })),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut state = self.inner.borrow_mut();
        state.now = state.now + by;
        if let Some(waker) = state.waker.take() {
            waker.wake();
        }
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.inner.borrow().now
    }

    async fn wait_until(&mut self, deadline: Instant) {
        poll_fn(|cx| {
            let mut state = self.inner.borrow_mut();
            if state.now >= deadline {
                Poll::Ready(())
            } else {
                state.waker.replace(cx.waker().clone());
                Poll::Pending
            }
        })
        .await
    }
}

/// An output pin remembering every level written to it.
#[derive(Clone, Default)]
pub struct TestOutput {
    history: Rc<RefCell<Vec<bool>>>,
}

impl TestOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set_high(&self) -> bool {
        self.history.borrow().last().copied().unwrap_or(false)
    }

    pub fn history(&self) -> Vec<bool> {
        self.history.borrow().clone()
    }
}

impl ErrorType for TestOutput {
    type Error = Infallible;
}

impl OutputPin for TestOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.history.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.history.borrow_mut().push(true);
        Ok(())
    }
}

/// Power control that only counts invocations.
pub struct RecordingPower {
    journal: Journal,
}

impl RecordingPower {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }

    pub fn count(&self) -> usize {
        self.journal.count(&Entry::PowerOff)
    }
}

impl PowerControl for RecordingPower {
    fn power_off(&mut self) {
        self.journal.record(Entry::PowerOff);
    }
}

/// A sample of fixed length that records play and stop calls.
pub struct RecordingSample {
    name: &'static str,
    length: Duration,
    playing: bool,
    journal: Journal,
}

impl RecordingSample {
    pub fn new(name: &'static str, length: Duration, journal: &Journal) -> Self {
        Self {
            name,
            length,
            playing: false,
            journal: journal.clone(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl Sample for RecordingSample {
    type Error = Infallible;

    fn play(&mut self, loops: f64) -> Result<(), Self::Error> {
        self.playing = true;
        self.journal.record(Entry::Play(self.name, loops));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.playing = false;
        self.journal.record(Entry::Stop(self.name));
        Ok(())
    }

    fn length(&self) -> Duration {
        self.length
    }
}

/// A delay that completes at once and records what it was asked for. With a
/// limit set, calls past the limit never complete.
pub struct RecordingDelay {
    journal: Journal,
    limit: Option<usize>,
    calls: usize,
}

impl RecordingDelay {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            limit: None,
            calls: 0,
        }
    }

    pub fn limit(mut self, calls: usize) -> Self {
        self.limit.replace(calls);
        self
    }

    async fn record(&mut self, duration: Duration) {
        let call = self.calls;
        self.calls += 1;
        if self.limit.map(|limit| call >= limit).unwrap_or(false) {
            core::future::pending::<()>().await;
        }
        self.journal.record(Entry::Delay(duration));
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(Duration::from_micros(ns as u64 / 1_000)).await
    }

    async fn delay_us(&mut self, us: u32) {
        self.record(Duration::from_micros(us as u64)).await
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(Duration::from_millis(ms as u64)).await
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct FinaleFailed;

/// Feedback that records which hooks the controller invoked.
pub struct RecordingFeedback {
    journal: Journal,
    fail_finale: bool,
}

impl RecordingFeedback {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail_finale: false,
        }
    }

    pub fn failing_finale(mut self) -> Self {
        self.fail_finale = true;
        self
    }
}

impl Feedback for RecordingFeedback {
    type Error = FinaleFailed;

    async fn attention(&mut self) -> Result<(), Self::Error> {
        self.journal.record(Entry::Attention);
        Ok(())
    }

    async fn cancel(&mut self) -> Result<(), Self::Error> {
        self.journal.record(Entry::Cancel);
        Ok(())
    }

    async fn held(&mut self, held_for: Duration) -> Result<(), Self::Error> {
        self.journal.record(Entry::Held(held_for));
        Ok(())
    }

    async fn finale(&mut self) -> Result<(), Self::Error> {
        self.journal.record(Entry::Finale);
        match self.fail_finale {
            true => Err(FinaleFailed),
            false => Ok(()),
        }
    }
}
