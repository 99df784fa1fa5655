pub mod blink;
pub mod hold;
