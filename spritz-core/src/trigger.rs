//! Spray trigger policies
//!
//! A policy looks at one main-loop sample and decides whether a spray
//! should start. The state machine still has the last word: a policy is
//! only consulted when the current state allows spraying.

use crate::state::DeviceState;

/// Inputs seen by a trigger policy on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriggerContext {
    pub state: DeviceState,
    pub now_ms: u32,
    /// Debounced short press this tick
    pub button_pressed: bool,
    /// Current light level
    pub light_on: bool,
    /// Set on the tick the light went off; how long it had been on
    pub light_off_after_ms: Option<u32>,
}

/// Decides when a spray fires
pub trait SprayTrigger {
    /// Check whether to spray now
    ///
    /// Returning `true` commits the policy to that spray (lockouts start).
    fn should_spray(&mut self, ctx: &TriggerContext) -> bool;
}

impl<T: SprayTrigger + ?Sized> SprayTrigger for &mut T {
    fn should_spray(&mut self, ctx: &TriggerContext) -> bool {
        (**self).should_spray(ctx)
    }
}

/// Spray on every short button press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonPress;

impl SprayTrigger for ButtonPress {
    fn should_spray(&mut self, ctx: &TriggerContext) -> bool {
        ctx.button_pressed
    }
}

/// Spray after the room was used, or on demand
///
/// Fires when the light goes off after having been on for at least
/// `min_light_ms`, or on a short press. Never fires twice within
/// `lockout_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AfterUse {
    pub min_light_ms: u32,
    pub lockout_ms: u32,
    last_spray_ms: Option<u32>,
}

impl AfterUse {
    pub const fn new(min_light_ms: u32, lockout_ms: u32) -> Self {
        Self {
            min_light_ms,
            lockout_ms,
            last_spray_ms: None,
        }
    }

    fn locked_out(&self, now_ms: u32) -> bool {
        match self.last_spray_ms {
            Some(t) => now_ms.wrapping_sub(t) < self.lockout_ms,
            None => false,
        }
    }
}

impl SprayTrigger for AfterUse {
    fn should_spray(&mut self, ctx: &TriggerContext) -> bool {
        let used = matches!(ctx.light_off_after_ms, Some(ms) if ms >= self.min_light_ms);
        if !(used || ctx.button_pressed) {
            return false;
        }
        if self.locked_out(ctx.now_ms) {
            debug!("Spray suppressed by lockout");
            return false;
        }
        self.last_spray_ms = Some(ctx.now_ms);
        true
    }
}

/// Board-selectable policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerPolicy {
    ButtonPress(ButtonPress),
    AfterUse(AfterUse),
}

impl SprayTrigger for TriggerPolicy {
    fn should_spray(&mut self, ctx: &TriggerContext) -> bool {
        match self {
            TriggerPolicy::ButtonPress(p) => p.should_spray(ctx),
            TriggerPolicy::AfterUse(p) => p.should_spray(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(now_ms: u32) -> TriggerContext {
        TriggerContext {
            state: DeviceState::Idle,
            now_ms,
            button_pressed: false,
            light_on: false,
            light_off_after_ms: None,
        }
    }

    #[test]
    fn test_button_press_policy() {
        let mut policy = ButtonPress;
        assert!(!policy.should_spray(&ctx(0)));
        assert!(policy.should_spray(&TriggerContext {
            button_pressed: true,
            ..ctx(0)
        }));
        // Light going off means nothing to this policy
        assert!(!policy.should_spray(&TriggerContext {
            light_off_after_ms: Some(600_000),
            ..ctx(0)
        }));
    }

    #[test]
    fn test_after_use_needs_minimum_light_time() {
        let mut policy = AfterUse::new(60_000, 0);

        assert!(!policy.should_spray(&TriggerContext {
            light_off_after_ms: Some(59_999),
            ..ctx(100_000)
        }));
        assert!(!policy.should_spray(&TriggerContext {
            light_off_after_ms: None,
            ..ctx(100_000)
        }));
        assert!(policy.should_spray(&TriggerContext {
            light_off_after_ms: Some(60_000),
            ..ctx(100_000)
        }));
    }

    #[test]
    fn test_after_use_lockout() {
        let mut policy = AfterUse::new(1000, 30_000);
        let press = |now| TriggerContext {
            button_pressed: true,
            ..ctx(now)
        };

        assert!(policy.should_spray(&press(1000)));
        assert!(!policy.should_spray(&press(20_000)));
        assert!(!policy.should_spray(&TriggerContext {
            light_off_after_ms: Some(5000),
            ..ctx(30_999)
        }));
        assert!(policy.should_spray(&press(31_000)));
    }

    #[test]
    fn test_lockout_survives_clock_wrap() {
        let mut policy = AfterUse::new(0, 1000);
        let press = |now| TriggerContext {
            button_pressed: true,
            ..ctx(now)
        };

        assert!(policy.should_spray(&press(u32::MAX - 100)));
        assert!(!policy.should_spray(&press(500)));
        assert!(policy.should_spray(&press(900)));
    }

    #[test]
    fn test_policy_enum_dispatch() {
        let mut policy = TriggerPolicy::AfterUse(AfterUse::new(10, 0));
        assert!(policy.should_spray(&TriggerContext {
            light_off_after_ms: Some(10),
            ..ctx(0)
        }));

        let mut policy = TriggerPolicy::ButtonPress(ButtonPress);
        assert!(!policy.should_spray(&TriggerContext {
            light_off_after_ms: Some(10),
            ..ctx(0)
        }));
    }
}
