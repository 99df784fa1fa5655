pub mod button;
pub mod clock;
pub mod led;
pub mod linux;
pub mod power;
pub mod sound;

pub trait ActiveLevel {
    /// Whether a high pin level means the input or output is active.
    const ACTIVE_HIGH: bool;

    fn is_active(high: bool) -> bool {
        high == Self::ACTIVE_HIGH
    }
}

/// Discriminator for inputs/outputs that are active on high state.
pub struct ActiveHigh;
impl ActiveLevel for ActiveHigh {
    const ACTIVE_HIGH: bool = true;
}

/// Discriminator for inputs/outputs that are active on low state.
pub struct ActiveLow;
impl ActiveLevel for ActiveLow {
    const ACTIVE_HIGH: bool = false;
}
