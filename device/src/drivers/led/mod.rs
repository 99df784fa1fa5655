pub mod board;
pub mod gpio;

pub use board::LedBoard;
pub use gpio::GpioLed;
