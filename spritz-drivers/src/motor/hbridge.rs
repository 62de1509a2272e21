//! Brushed DC motor on a two-input H-bridge
//!
//! Works with the common two-pin bridges (L9110S, DRV8833, TB6612 in
//! IN/IN mode):
//!
//! | IN1 | IN2 | Motor   |
//! |-----|-----|---------|
//! | L   | L   | stopped |
//! | H   | L   | forward |
//!
//! Only forward is used; the valve spring returns the lever. Both inputs
//! high (brake) is never driven.

use spritz_core::traits::SprayMotor;
use spritz_hal::OutputPin;

/// Spray motor behind a two-input H-bridge
pub struct HBridgeMotor<IN1, IN2> {
    in1: IN1,
    in2: IN2,
    running: bool,
}

impl<IN1: OutputPin, IN2: OutputPin> HBridgeMotor<IN1, IN2> {
    /// Take both bridge inputs; the motor starts stopped
    pub fn new(in1: IN1, in2: IN2) -> Self {
        let mut motor = Self {
            in1,
            in2,
            running: false,
        };
        motor.stop();
        motor
    }

    /// Current (IN1, IN2) levels
    pub fn levels(&self) -> (bool, bool) {
        (self.in1.is_set_high(), self.in2.is_set_high())
    }

    /// Give the pins back
    pub fn release(self) -> (IN1, IN2) {
        (self.in1, self.in2)
    }
}

impl<IN1: OutputPin, IN2: OutputPin> SprayMotor for HBridgeMotor<IN1, IN2> {
    fn forward(&mut self) {
        // Low side first so both inputs are never high together
        self.in2.set_low();
        self.in1.set_high();
        self.running = true;
    }

    fn stop(&mut self) {
        self.in1.set_low();
        self.in2.set_low();
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn disable(&mut self) {
        self.stop();
        self.in1.disable();
        self.in2.disable();
    }
}
