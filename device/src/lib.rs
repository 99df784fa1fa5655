//! Hold-to-shutdown button controller for Linux single-board computers.
//!
//! A button held down for a threshold duration powers the host off, with LED
//! or audio feedback while it is held. The pieces follow an actor layout:
//!
//! * [`actors::HoldButton`] watches the button and publishes
//!   [`Event`]s on an [`actors::EventQueue`].
//! * [`ShutdownController`] takes events off the queue one at a time and
//!   drives a [`Feedback`] implementation, then [`PowerControl`].
//! * [`actors::Blinker`] plays [`BlinkPattern`]s on an LED or LED board.
//!
//! Each binary in `src/bin` wires these together for one variant on an
//! embassy std executor.

pub mod actors;
pub mod config;
pub mod controller;
pub mod domain;
pub mod drivers;
pub mod feedback;
pub mod runtime;
#[cfg(any(test, feature = "testutil"))]
pub mod testutil;
pub mod traits;

pub use controller::{ShutdownController, State};
pub use domain::blink::BlinkPattern;
pub use domain::hold::HoldTracker;
pub use traits::button::{ButtonHandler, Event};
pub use traits::feedback::Feedback;
pub use traits::power::PowerControl;
