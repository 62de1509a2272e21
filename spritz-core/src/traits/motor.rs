//! Spray motor trait
//!
//! The pump is a brushed DC motor behind an H-bridge. Spraying only ever
//! drives it forward; reverse is never used.

/// Motor that pushes the spray valve
pub trait SprayMotor {
    /// Energize the motor in the forward direction
    fn forward(&mut self);

    /// De-energize the motor (both bridge inputs low)
    fn stop(&mut self);

    /// Check if the motor is currently energized
    fn is_running(&self) -> bool;

    /// Release the bridge inputs before deep sleep
    ///
    /// Must leave the motor de-energized. Defaults to [`stop`](Self::stop).
    fn disable(&mut self) {
        self.stop();
    }
}

impl<T: SprayMotor + ?Sized> SprayMotor for &mut T {
    fn forward(&mut self) {
        (**self).forward();
    }

    fn stop(&mut self) {
        (**self).stop();
    }

    fn is_running(&self) -> bool {
        (**self).is_running()
    }

    fn disable(&mut self) {
        (**self).disable();
    }
}
