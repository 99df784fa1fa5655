//! Feedback given to the person holding the button.

pub mod led;
pub mod sound;

pub use led::{LedFeedback, RateMode};
pub use sound::SoundFeedback;
