pub mod blinker;
pub mod button;

pub use blinker::{BlinkSignal, Blinker};
pub use button::{EventQueue, HoldButton};
