//! Output shutdown before sleep

/// A group of output-driving pins that can be released for deep sleep
///
/// Implemented by every component that owns output pins so the power
/// manager can quiet them without knowing the wiring.
pub trait Quiesce {
    /// Stop driving all owned outputs
    fn quiesce(&mut self);
}

impl<T: Quiesce + ?Sized> Quiesce for &mut T {
    fn quiesce(&mut self) {
        (**self).quiesce();
    }
}

impl<A: Quiesce, B: Quiesce> Quiesce for (A, B) {
    fn quiesce(&mut self) {
        self.0.quiesce();
        self.1.quiesce();
    }
}

impl<T: Quiesce> Quiesce for Option<T> {
    fn quiesce(&mut self) {
        if let Some(inner) = self {
            inner.quiesce();
        }
    }
}
