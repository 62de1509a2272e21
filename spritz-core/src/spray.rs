//! Spray pulse sequencer
//!
//! Drives the motor through a fixed number of timed pulses:
//!
//! ```text
//! stop | fwd ON | stop | OFF | fwd ON | stop | OFF | fwd ON | stop
//! ```
//!
//! The OFF gap only separates pulses; there is never a trailing gap.
//! [`SpraySequencer::run_spray`] blocks for the whole sequence. Nothing can
//! interrupt or abort it, which is why the motor is forced to stop both
//! before the first pulse and after every pulse.

use embedded_hal::delay::DelayNs;

use crate::config::SprayProfile;
use crate::traits::{Quiesce, SprayMotor};

/// Result of one pulse sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SprayReport {
    /// Pulses delivered
    pub pulses: u8,
    /// Time spent blocked in delays (ms)
    pub duration_ms: u32,
}

impl SprayReport {
    /// A sequence always completes; there is no partial-failure path
    pub fn succeeded(&self) -> bool {
        true
    }
}

/// Timed pulse driver for the spray motor
pub struct SpraySequencer<M, D> {
    motor: M,
    delay: D,
    profile: SprayProfile,
    sprays: u32,
}

impl<M: SprayMotor, D: DelayNs> SpraySequencer<M, D> {
    /// Create a sequencer; the motor is stopped immediately
    pub fn new(mut motor: M, delay: D, profile: SprayProfile) -> Self {
        motor.stop();
        Self {
            motor,
            delay,
            profile,
            sprays: 0,
        }
    }

    /// Force the motor to the stopped state before pulsing
    ///
    /// Safe to call any number of times.
    pub fn start_spray(&mut self) {
        self.motor.stop();
    }

    /// Run the full pulse sequence, blocking until it is done
    pub fn run_spray(&mut self) -> SprayReport {
        let SprayProfile {
            pulse_count,
            on_ms,
            off_ms,
        } = self.profile;

        info!(
            "Spray: {} pulses, {}ms on / {}ms off",
            pulse_count, on_ms, off_ms
        );

        let mut duration_ms = 0u32;
        for i in 0..pulse_count {
            self.motor.forward();
            self.delay.delay_ms(on_ms);
            duration_ms = duration_ms.saturating_add(on_ms);

            self.motor.stop();

            if i + 1 < pulse_count {
                self.delay.delay_ms(off_ms);
                duration_ms = duration_ms.saturating_add(off_ms);
            }
        }

        self.sprays = self.sprays.wrapping_add(1);
        let report = SprayReport {
            pulses: pulse_count,
            duration_ms,
        };
        debug!("Spray done: {:?}", report);
        report
    }

    /// Select the pulse pattern for the next spray
    pub fn set_profile(&mut self, profile: SprayProfile) {
        self.profile = profile;
    }

    pub fn profile(&self) -> SprayProfile {
        self.profile
    }

    /// Sprays run since boot
    pub fn sprays(&self) -> u32 {
        self.sprays
    }

    pub fn motor(&self) -> &M {
        &self.motor
    }

    /// Give back the motor and delay
    pub fn release(self) -> (M, D) {
        (self.motor, self.delay)
    }
}

impl<M: SprayMotor, D: DelayNs> Quiesce for SpraySequencer<M, D> {
    fn quiesce(&mut self) {
        self.motor.disable();
    }
}
