//! GPIO pin abstractions
//!
//! Pin writes and reads are assumed to always succeed, so none of these
//! methods return a `Result`.

use crate::wake::{WakeReason, WakeSignal};

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Toggle the pin state
    fn toggle(&mut self) {
        let high = self.is_set_high();
        self.set_state(!high);
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }

    /// Stop driving the pin before deep sleep
    ///
    /// Boards that can tri-state the pin should override this. The default
    /// drives the pin low, which is safe for the motor lines.
    fn disable(&mut self) {
        self.set_low();
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Signal edge that fires a pin interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// High to low transition
    Falling,
    /// Low to high transition
    Rising,
    /// Either transition
    Change,
}

impl Edge {
    /// Check whether a level change from `was_high` to `is_high` matches
    pub fn matches(self, was_high: bool, is_high: bool) -> bool {
        match self {
            Edge::Falling => was_high && !is_high,
            Edge::Rising => !was_high && is_high,
            Edge::Change => was_high != is_high,
        }
    }
}

/// Input pin that can bring the processor out of sleep
///
/// While attached, a matching edge must raise `signal` with `reason` and do
/// nothing else. Implementations must make `detach_wake` idempotent.
pub trait WakePin: InputPin {
    /// Arm the pin interrupt for `edge`
    ///
    /// The level last returned by [`InputPin::is_high`] is the reference:
    /// if the pin has since moved in a way that matches `edge`, `signal` is
    /// raised at once, so an edge between the caller's sample and arming
    /// still wakes the processor.
    fn attach_wake(&mut self, edge: Edge, signal: &'static WakeSignal, reason: WakeReason);

    /// Disarm the pin interrupt
    fn detach_wake(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Latch {
        high: bool,
        writes: u8,
    }

    impl OutputPin for Latch {
        fn set_high(&mut self) {
            self.high = true;
            self.writes += 1;
        }

        fn set_low(&mut self) {
            self.high = false;
            self.writes += 1;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_output_defaults() {
        let mut pin = Latch {
            high: false,
            writes: 0,
        };

        pin.set_state(true);
        assert!(pin.is_set_high());

        pin.toggle();
        assert!(pin.is_set_low());

        pin.set_high();
        pin.disable();
        assert!(pin.is_set_low());
        assert_eq!(pin.writes, 4);
    }

    #[test]
    fn test_edge_matching() {
        assert!(Edge::Falling.matches(true, false));
        assert!(!Edge::Falling.matches(false, true));
        assert!(Edge::Rising.matches(false, true));
        assert!(!Edge::Rising.matches(true, true));
        assert!(Edge::Change.matches(true, false));
        assert!(Edge::Change.matches(false, true));
        assert!(!Edge::Change.matches(false, false));
    }
}
