pub mod button;
pub mod clock;
pub mod feedback;
pub mod led;
pub mod power;
pub mod sound;
