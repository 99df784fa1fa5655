//! GPIO pins exposed through the Linux sysfs interface.
//!
//! Inputs are watched by a dedicated poll thread that blocks on edge
//! interrupts and forwards level changes to async waiters through a signal.

use core::fmt;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use embedded_hal_async::digital::Wait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use sysfs_gpio::{Direction, Edge, Pin, PinPoller};

#[derive(Debug)]
pub enum GpioError {
    Sysfs(sysfs_gpio::Error),
    Io(std::io::Error),
    /// The poll thread watching an input exited.
    WatchStopped,
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpioError::Sysfs(e) => write!(f, "sysfs gpio: {}", e),
            GpioError::Io(e) => write!(f, "gpio i/o: {}", e),
            GpioError::WatchStopped => write!(f, "gpio input watch stopped"),
        }
    }
}

impl std::error::Error for GpioError {}

impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl From<sysfs_gpio::Error> for GpioError {
    fn from(error: sysfs_gpio::Error) -> Self {
        GpioError::Sysfs(error)
    }
}

impl From<std::io::Error> for GpioError {
    fn from(error: std::io::Error) -> Self {
        GpioError::Io(error)
    }
}

struct Watch {
    level: AtomicBool,
    stopped: AtomicBool,
    changed: Signal<CriticalSectionRawMutex, ()>,
}

impl Watch {
    fn level(&self) -> Result<bool, GpioError> {
        if self.stopped.load(Ordering::Acquire) {
            return Err(GpioError::WatchStopped);
        }
        Ok(self.level.load(Ordering::Acquire))
    }
}

/// An input pin exported with interrupts on both edges.
pub struct SysfsInput {
    number: u64,
    watch: Arc<Watch>,
    seen: bool,
}

impl SysfsInput {
    pub fn new(number: u64) -> Result<Self, GpioError> {
        let pin = Pin::new(number);
        pin.export()?;
        pin.set_direction(Direction::In)?;
        pin.set_edge(Edge::BothEdges)?;
        let poller = pin.get_poller()?;
        let level = pin.get_value()? != 0;

        let watch = Arc::new(Watch {
            level: AtomicBool::new(level),
            stopped: AtomicBool::new(false),
            changed: Signal::new(),
        });
        let watcher = watch.clone();
        thread::Builder::new()
            .name(format!("gpio{}-watch", number))
            .spawn(move || run_watch(number, poller, watcher))?;

        log::debug!("gpio{} exported as input, level {}", number, level as u8);
        Ok(Self {
            number,
            watch,
            seen: level,
        })
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    async fn wait_for_level(&mut self, high: bool) -> Result<(), GpioError> {
        loop {
            let level = self.watch.level()?;
            if level == high {
                self.seen = level;
                return Ok(());
            }
            self.watch.changed.wait().await;
        }
    }

    async fn wait_for_change(&mut self) -> Result<bool, GpioError> {
        loop {
            let level = self.watch.level()?;
            if level != self.seen {
                self.seen = level;
                return Ok(level);
            }
            self.watch.changed.wait().await;
        }
    }
}

fn run_watch(number: u64, mut poller: PinPoller, watch: Arc<Watch>) {
    loop {
        match poller.poll(-1) {
            Ok(Some(value)) => {
                watch.level.store(value != 0, Ordering::Release);
                watch.changed.signal(());
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("gpio{} watch failed: {}", number, e);
                watch.stopped.store(true, Ordering::Release);
                watch.changed.signal(());
                return;
            }
        }
    }
}

impl ErrorType for SysfsInput {
    type Error = GpioError;
}

impl InputPin for SysfsInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.watch.level()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.watch.level()?)
    }
}

impl Wait for SysfsInput {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        self.wait_for_level(true).await
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        self.wait_for_level(false).await
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        while !self.wait_for_change().await? {}
        Ok(())
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        while self.wait_for_change().await? {}
        Ok(())
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_change().await.map(|_| ())
    }
}

/// An output pin, driven low on export.
pub struct SysfsOutput {
    pin: Pin,
}

impl SysfsOutput {
    pub fn new(number: u64) -> Result<Self, GpioError> {
        let pin = Pin::new(number);
        pin.export()?;
        pin.set_direction(Direction::Low)?;
        log::debug!("gpio{} exported as output", number);
        Ok(Self { pin })
    }
}

impl ErrorType for SysfsOutput {
    type Error = GpioError;
}

impl OutputPin for SysfsOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(self.pin.set_value(0)?)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(self.pin.set_value(1)?)
    }
}
