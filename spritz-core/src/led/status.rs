//! Status patterns on top of the LED indicator
//!
//! Everything here is non-blocking: patterns advance from the main loop's
//! millisecond clock and only decide which [`RgbColor`] to show.

use spritz_hal::OutputPin;

use super::RgbColor;
use crate::battery::BatteryLevel;
use crate::config::{ActivityConfig, BlinkConfig, SprayMode};
use crate::state::DeviceState;
use crate::traits::Quiesce;

/// Half-period of the critical-battery flash (ms)
const CRITICAL_FLASH_MS: u32 = 500;

/// Color shown during blink confirmation
const CONFIRM_COLOR: RgbColor = RgbColor::WHITE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlinkPhase {
    Idle,
    On { since_ms: u32 },
    Off { since_ms: u32 },
}

/// Mode confirmation: N white blinks after a mode change
#[derive(Debug, Clone)]
pub struct BlinkConfirm {
    config: BlinkConfig,
    /// Blinks left including the current one
    remaining: u8,
    phase: BlinkPhase,
}

impl BlinkConfirm {
    pub fn new(config: BlinkConfig) -> Self {
        Self {
            config,
            remaining: 0,
            phase: BlinkPhase::Idle,
        }
    }

    /// Start `count` blinks; restarts a pattern already running
    pub fn start(&mut self, count: u8, now_ms: u32) {
        if count == 0 {
            self.cancel();
            return;
        }
        self.remaining = count;
        self.phase = BlinkPhase::On { since_ms: now_ms };
    }

    pub fn cancel(&mut self) {
        self.remaining = 0;
        self.phase = BlinkPhase::Idle;
    }

    pub fn is_active(&self) -> bool {
        self.phase != BlinkPhase::Idle
    }

    /// Advance the pattern
    ///
    /// Returns the color to show while running, `None` once finished.
    /// The off gap after the last blink is kept so consecutive patterns
    /// stay distinguishable.
    pub fn step(&mut self, now_ms: u32) -> Option<RgbColor> {
        match self.phase {
            BlinkPhase::Idle => None,
            BlinkPhase::On { since_ms } => {
                if now_ms.wrapping_sub(since_ms) >= self.config.on_ms {
                    self.phase = BlinkPhase::Off { since_ms: now_ms };
                    Some(RgbColor::OFF)
                } else {
                    Some(CONFIRM_COLOR)
                }
            }
            BlinkPhase::Off { since_ms } => {
                if now_ms.wrapping_sub(since_ms) < self.config.off_ms {
                    return Some(RgbColor::OFF);
                }
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.phase = BlinkPhase::Idle;
                    None
                } else {
                    self.phase = BlinkPhase::On { since_ms: now_ms };
                    Some(CONFIRM_COLOR)
                }
            }
        }
    }

    /// Blinks not yet completed
    pub fn remaining(&self) -> u8 {
        self.remaining
    }
}

/// Picks the status color from device state, spray mode and battery
#[derive(Debug, Clone)]
pub struct StatusIndicator {
    blink: BlinkConfirm,
    battery: BatteryLevel,
}

impl StatusIndicator {
    pub fn new(blink: BlinkConfig) -> Self {
        Self {
            blink: BlinkConfirm::new(blink),
            battery: BatteryLevel::default(),
        }
    }

    /// Color that identifies a spray mode
    pub fn mode_color(mode: SprayMode) -> RgbColor {
        match mode {
            SprayMode::Single => RgbColor::GREEN,
            SprayMode::Double => RgbColor::CYAN,
            SprayMode::Triple => RgbColor::BLUE,
        }
    }

    /// Blink `mode.count()` times to confirm a mode change
    pub fn start_blink_confirm(&mut self, mode: SprayMode, now_ms: u32) {
        self.blink.start(mode.count(), now_ms);
    }

    /// Check if a confirmation pattern is running
    pub fn is_blinking(&self) -> bool {
        self.blink.is_active()
    }

    /// Record the latest battery classification
    pub fn set_battery(&mut self, level: BatteryLevel) {
        self.battery = level;
    }

    pub fn battery(&self) -> BatteryLevel {
        self.battery
    }

    /// Color to display right now
    ///
    /// Priority: blink confirmation, spraying, critical battery flash,
    /// then the steady state color.
    pub fn color(&mut self, state: DeviceState, mode: SprayMode, now_ms: u32) -> RgbColor {
        if let Some(color) = self.blink.step(now_ms) {
            return color;
        }

        if state == DeviceState::Spraying {
            return RgbColor::MAGENTA;
        }

        match self.battery {
            BatteryLevel::Critical => {
                if (now_ms / CRITICAL_FLASH_MS) % 2 == 0 {
                    RgbColor::RED
                } else {
                    RgbColor::OFF
                }
            }
            BatteryLevel::Low if state == DeviceState::LightActive => RgbColor::YELLOW,
            _ => match state {
                DeviceState::LightActive => Self::mode_color(mode),
                _ => RgbColor::OFF,
            },
        }
    }
}

/// Single-color heartbeat LED, toggled while the device is awake
pub struct ActivityLed<P> {
    pin: P,
    config: ActivityConfig,
    last_toggle_ms: u32,
}

impl<P: OutputPin> ActivityLed<P> {
    pub fn new(mut pin: P, config: ActivityConfig) -> Self {
        pin.set_low();
        Self {
            pin,
            config,
            last_toggle_ms: 0,
        }
    }

    /// Toggle once per period; does nothing when disabled
    pub fn update(&mut self, now_ms: u32) {
        if !self.config.enabled {
            return;
        }
        if now_ms.wrapping_sub(self.last_toggle_ms) >= self.config.period_ms {
            self.pin.toggle();
            self.last_toggle_ms = now_ms;
        }
    }

    pub fn is_lit(&self) -> bool {
        self.pin.is_set_high()
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> Quiesce for ActivityLed<P> {
    fn quiesce(&mut self) {
        self.pin.disable();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockPin;

    const BLINK: BlinkConfig = BlinkConfig {
        on_ms: 100,
        off_ms: 100,
    };

    /// Run the pattern at 10ms resolution and count white phases
    fn count_blinks(blink: &mut BlinkConfirm, start_ms: u32) -> (u8, u32) {
        let mut blinks = 0;
        let mut last = RgbColor::OFF;
        let mut now = start_ms;
        while let Some(color) = blink.step(now) {
            if color == CONFIRM_COLOR && last != CONFIRM_COLOR {
                blinks += 1;
            }
            last = color;
            now += 10;
            assert!(now < start_ms + 10_000, "pattern never finished");
        }
        (blinks, now - start_ms)
    }

    #[test]
    fn test_blink_count_matches_mode() {
        for mode in [SprayMode::Single, SprayMode::Double, SprayMode::Triple] {
            let mut blink = BlinkConfirm::new(BLINK);
            blink.start(mode.count(), 1000);
            assert!(blink.is_active());

            let (blinks, elapsed) = count_blinks(&mut blink, 1000);
            assert_eq!(blinks, mode.count());
            assert!(!blink.is_active());
            assert_eq!(elapsed, mode.count() as u32 * 200);
        }
    }

    #[test]
    fn test_zero_blinks_is_noop() {
        let mut blink = BlinkConfirm::new(BLINK);
        blink.start(0, 0);
        assert!(!blink.is_active());
        assert_eq!(blink.step(0), None);
    }

    #[test]
    fn test_restart_replaces_pattern() {
        let mut blink = BlinkConfirm::new(BLINK);
        blink.start(3, 0);
        blink.step(150);
        blink.start(1, 200);
        assert_eq!(blink.remaining(), 1);
        let (blinks, _) = count_blinks(&mut blink, 200);
        assert_eq!(blinks, 1);
    }

    #[test]
    fn test_blink_survives_clock_wrap() {
        let mut blink = BlinkConfirm::new(BLINK);
        let start = u32::MAX - 50;
        blink.start(1, start);
        assert_eq!(blink.step(start.wrapping_add(20)), Some(CONFIRM_COLOR));
        assert_eq!(blink.step(start.wrapping_add(120)), Some(RgbColor::OFF));
        assert_eq!(blink.step(start.wrapping_add(230)), None);
    }

    #[test]
    fn test_mode_colors_are_distinct() {
        let single = StatusIndicator::mode_color(SprayMode::Single);
        let double = StatusIndicator::mode_color(SprayMode::Double);
        let triple = StatusIndicator::mode_color(SprayMode::Triple);
        assert_ne!(single, double);
        assert_ne!(double, triple);
        assert_ne!(single, triple);
    }

    #[test]
    fn test_status_priorities() {
        let mut status = StatusIndicator::new(BLINK);

        assert_eq!(
            status.color(DeviceState::Idle, SprayMode::Double, 0),
            RgbColor::OFF
        );
        assert_eq!(
            status.color(DeviceState::LightActive, SprayMode::Double, 0),
            RgbColor::CYAN
        );
        assert_eq!(
            status.color(DeviceState::Spraying, SprayMode::Double, 0),
            RgbColor::MAGENTA
        );

        status.start_blink_confirm(SprayMode::Single, 10);
        assert_eq!(
            status.color(DeviceState::Spraying, SprayMode::Single, 20),
            CONFIRM_COLOR
        );
    }

    #[test]
    fn test_battery_colors() {
        let mut status = StatusIndicator::new(BLINK);

        status.set_battery(BatteryLevel::Low);
        assert_eq!(
            status.color(DeviceState::LightActive, SprayMode::Triple, 0),
            RgbColor::YELLOW
        );
        assert_eq!(
            status.color(DeviceState::Idle, SprayMode::Triple, 0),
            RgbColor::OFF
        );

        status.set_battery(BatteryLevel::Critical);
        assert_eq!(
            status.color(DeviceState::Idle, SprayMode::Triple, 0),
            RgbColor::RED
        );
        assert_eq!(
            status.color(DeviceState::Idle, SprayMode::Triple, CRITICAL_FLASH_MS),
            RgbColor::OFF
        );
    }

    #[test]
    fn test_activity_led_toggles_per_period() {
        let config = ActivityConfig {
            enabled: true,
            period_ms: 1000,
        };
        let mut led = ActivityLed::new(MockPin::new(), config);
        assert!(!led.is_lit());

        led.update(500);
        assert!(!led.is_lit());
        led.update(1000);
        assert!(led.is_lit());
        led.update(1500);
        assert!(led.is_lit());
        led.update(2000);
        assert!(!led.is_lit());
    }

    #[test]
    fn test_activity_led_disabled() {
        let mut led = ActivityLed::new(MockPin::new(), ActivityConfig::DEFAULT);
        led.update(5000);
        assert!(!led.is_lit());

        led.quiesce();
        assert!(led.release().is_disabled());
    }
}
