//! Input handling: button debouncing and light sensor edges
//!
//! Both trackers are sampled from the main loop with the loop's
//! millisecond clock and never touch hardware themselves. After a deep
//! sleep the caller marks them with `resync` so the first sample
//! reconciles with whatever happened while the clock was stopped.

use crate::config::ButtonConfig;

/// Debounced button gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Released before the long-press threshold
    Pressed,
    /// Held past the long-press threshold (reported once per hold)
    LongPress,
}

/// Debouncer with long-press detection
///
/// Works on the logical "pressed" level; the caller applies the pin
/// polarity (the reference board wires the button active-low).
#[derive(Debug, Clone)]
pub struct Button {
    config: ButtonConfig,
    /// Debounced level
    pressed: bool,
    /// Last raw level and when it was first seen
    raw: bool,
    raw_since_ms: u32,
    /// When the debounced press began
    press_start_ms: u32,
    long_reported: bool,
    synced: bool,
}

impl Button {
    pub fn new(config: ButtonConfig) -> Self {
        Self {
            config,
            pressed: false,
            raw: false,
            raw_since_ms: 0,
            press_start_ms: 0,
            long_reported: false,
            synced: false,
        }
    }

    /// Feed one raw sample
    pub fn sample(&mut self, raw_pressed: bool, now_ms: u32) -> Option<ButtonEvent> {
        if !self.synced {
            // A button still held after wake counts as a press from now
            self.synced = true;
            self.raw = raw_pressed;
            self.raw_since_ms = now_ms;
            self.pressed = raw_pressed;
            self.press_start_ms = now_ms;
            self.long_reported = false;
            return None;
        }

        if raw_pressed != self.raw {
            self.raw = raw_pressed;
            self.raw_since_ms = now_ms;
        }

        let stable = now_ms.wrapping_sub(self.raw_since_ms) >= self.config.debounce_ms;
        if stable && self.raw != self.pressed {
            self.pressed = self.raw;
            if self.pressed {
                self.press_start_ms = self.raw_since_ms;
                self.long_reported = false;
                trace!("Button down");
            } else {
                trace!("Button up");
                if !self.long_reported {
                    return Some(ButtonEvent::Pressed);
                }
            }
        }

        if self.pressed
            && !self.long_reported
            && now_ms.wrapping_sub(self.press_start_ms) >= self.config.long_press_ms
        {
            self.long_reported = true;
            return Some(ButtonEvent::LongPress);
        }

        None
    }

    /// Debounced level
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Adopt the next sample as the stable level
    pub fn resync(&mut self) {
        self.synced = false;
    }
}

/// Light sensor level change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightChange {
    On,
    /// `on_for_ms` is `None` when the on edge was never observed
    Off { on_for_ms: Option<u32> },
}

/// Edge detector for the digital light sensor
#[derive(Debug, Clone, Default)]
pub struct LightTracker {
    level: Option<bool>,
    on_since_ms: Option<u32>,
}

impl LightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample
    ///
    /// The first sample after creation or [`resync`](Self::resync) always
    /// reports the current level.
    pub fn sample(&mut self, is_on: bool, now_ms: u32) -> Option<LightChange> {
        if self.level == Some(is_on) {
            return None;
        }
        self.level = Some(is_on);

        if is_on {
            self.on_since_ms = Some(now_ms);
            Some(LightChange::On)
        } else {
            let on_for_ms = self.on_since_ms.take().map(|t| now_ms.wrapping_sub(t));
            Some(LightChange::Off { on_for_ms })
        }
    }

    /// Record a level that was already acted on, without reporting it
    pub fn assume(&mut self, is_on: bool, now_ms: u32) {
        if self.level == Some(is_on) {
            return;
        }
        self.level = Some(is_on);
        self.on_since_ms = if is_on { Some(now_ms) } else { None };
    }

    /// Last sampled level, `None` before the first sample
    pub fn level(&self) -> Option<bool> {
        self.level
    }

    /// Forget the last level so the next sample reconciles
    pub fn resync(&mut self) {
        self.level = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: ButtonConfig = ButtonConfig {
        debounce_ms: 30,
        long_press_ms: 1500,
    };

    /// Hold a raw level from `from` to `to` at 10ms resolution
    fn hold(button: &mut Button, pressed: bool, from: u32, to: u32) -> Option<ButtonEvent> {
        let mut found = None;
        let mut t = from;
        while t <= to {
            if let Some(ev) = button.sample(pressed, t) {
                assert!(found.is_none(), "more than one event in a hold");
                found = Some(ev);
            }
            t += 10;
        }
        found
    }

    fn synced_button() -> Button {
        let mut button = Button::new(CONFIG);
        assert_eq!(button.sample(false, 0), None);
        button
    }

    #[test]
    fn test_short_press() {
        let mut button = synced_button();

        assert_eq!(hold(&mut button, true, 100, 300), None);
        assert!(button.is_pressed());
        assert_eq!(hold(&mut button, false, 310, 400), Some(ButtonEvent::Pressed));
        assert!(!button.is_pressed());
    }

    #[test]
    fn test_bounce_is_filtered() {
        let mut button = synced_button();

        for t in (100..200).step_by(10) {
            assert_eq!(button.sample(t % 20 == 0, t), None);
        }
        assert!(!button.is_pressed());
        // Settles released: no press was ever registered
        assert_eq!(hold(&mut button, false, 200, 300), None);
    }

    #[test]
    fn test_long_press_reported_once() {
        let mut button = synced_button();

        assert_eq!(
            hold(&mut button, true, 100, 2000),
            Some(ButtonEvent::LongPress)
        );
        // No short press on release after a long press
        assert_eq!(hold(&mut button, false, 2010, 2100), None);
    }

    #[test]
    fn test_long_press_threshold_from_press_edge() {
        let mut button = synced_button();

        button.sample(true, 100);
        button.sample(true, 130);
        assert_eq!(button.sample(true, 1599), None);
        assert_eq!(button.sample(true, 1600), Some(ButtonEvent::LongPress));
    }

    #[test]
    fn test_resync_with_button_held() {
        let mut button = synced_button();
        button.resync();

        // Woken by the press itself: adopt it and report on release
        assert_eq!(button.sample(true, 5000), None);
        assert!(button.is_pressed());
        assert_eq!(hold(&mut button, false, 5100, 5200), Some(ButtonEvent::Pressed));
    }

    #[test]
    fn test_press_across_clock_wrap() {
        let mut button = Button::new(CONFIG);
        let start = u32::MAX - 100;
        button.sample(false, start);
        button.sample(true, start.wrapping_add(10));
        button.sample(true, start.wrapping_add(50));
        assert!(button.is_pressed());
        button.sample(false, start.wrapping_add(200));
        assert_eq!(
            button.sample(false, start.wrapping_add(240)),
            Some(ButtonEvent::Pressed)
        );
    }

    #[test]
    fn test_light_first_sample_reconciles() {
        let mut light = LightTracker::new();
        assert_eq!(light.level(), None);
        assert_eq!(
            light.sample(false, 0),
            Some(LightChange::Off { on_for_ms: None })
        );
        assert_eq!(light.sample(false, 10), None);

        let mut light = LightTracker::new();
        assert_eq!(light.sample(true, 0), Some(LightChange::On));
    }

    #[test]
    fn test_light_edges_carry_duration() {
        let mut light = LightTracker::new();
        light.sample(false, 0);

        assert_eq!(light.sample(true, 1000), Some(LightChange::On));
        assert_eq!(
            light.sample(false, 61_000),
            Some(LightChange::Off {
                on_for_ms: Some(60_000)
            })
        );
        // Each visit is timed from its own On edge
        assert_eq!(light.sample(true, 63_000), Some(LightChange::On));
        assert_eq!(
            light.sample(false, 63_500),
            Some(LightChange::Off {
                on_for_ms: Some(500)
            })
        );
    }

    #[test]
    fn test_light_resync_reports_again() {
        let mut light = LightTracker::new();
        light.sample(true, 0);
        light.resync();
        assert_eq!(light.sample(true, 100), Some(LightChange::On));
    }

    #[test]
    fn test_light_assume_is_silent() {
        let mut light = LightTracker::new();
        light.sample(false, 0);

        light.assume(true, 500);
        assert_eq!(light.sample(true, 600), None);
        assert_eq!(
            light.sample(false, 700),
            Some(LightChange::Off {
                on_for_ms: Some(200)
            })
        );

        light.assume(true, 800);
        light.assume(false, 850);
        assert_eq!(light.sample(false, 900), None);
    }
}
