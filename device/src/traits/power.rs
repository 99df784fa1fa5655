/// Fire-and-forget power control. Implementations never report failure back
/// to the caller; once invoked the host is expected to go down.
pub trait PowerControl {
    fn power_off(&mut self);
}
