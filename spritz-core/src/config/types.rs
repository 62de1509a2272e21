//! Configuration type definitions
//!
//! Everything here is fixed at build time. The firmware declares its
//! [`DeviceConfig`] as a `const` and validates it in a `const` block.

use spritz_hal::SleepMode;

use super::hardware::PinMap;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A spray preset has no pulses
    ZeroPulseCount,
    /// A spray preset has a zero-length motor pulse
    ZeroPulseDuration,
    /// Battery thresholds are not strictly descending
    BatteryThresholdOrder,
    /// Blink confirmation on or off time is zero
    ZeroBlinkDuration,
    /// Long-press threshold does not exceed the debounce time
    LongPressTooShort,
    /// Two functions share one GPIO
    PinConflict,
    /// A GPIO number the chip does not have
    InvalidPin,
}

/// Spray strength selected with a long button press
///
/// The discriminant is the number of confirmation blinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SprayMode {
    /// Light spray
    Single = 1,
    /// Medium spray
    Double = 2,
    /// Full spray
    #[default]
    Triple = 3,
}

impl SprayMode {
    /// Number of confirmation blinks for this mode
    pub const fn count(self) -> u8 {
        self as u8
    }

    /// Next mode in the long-press cycle
    pub const fn next(self) -> Self {
        match self {
            SprayMode::Single => SprayMode::Double,
            SprayMode::Double => SprayMode::Triple,
            SprayMode::Triple => SprayMode::Single,
        }
    }
}

/// Timed pulse pattern for one spray
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SprayProfile {
    /// Number of motor pulses (at least 1)
    pub pulse_count: u8,
    /// Motor-forward time per pulse (ms)
    pub on_ms: u32,
    /// Gap between consecutive pulses (ms), never applied after the last
    pub off_ms: u32,
}

impl SprayProfile {
    /// Create a profile
    pub const fn new(pulse_count: u8, on_ms: u32, off_ms: u32) -> Self {
        Self {
            pulse_count,
            on_ms,
            off_ms,
        }
    }

    /// Total blocking time of one spray (ms)
    pub const fn duration_ms(&self) -> u32 {
        if self.pulse_count == 0 {
            return 0;
        }
        let n = self.pulse_count as u32;
        n.saturating_mul(self.on_ms)
            .saturating_add((n - 1).saturating_mul(self.off_ms))
    }

    /// Check the profile can be run
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.pulse_count == 0 {
            return Err(ConfigError::ZeroPulseCount);
        }
        if self.on_ms == 0 {
            return Err(ConfigError::ZeroPulseDuration);
        }
        Ok(())
    }
}

impl Default for SprayProfile {
    fn default() -> Self {
        SprayPresets::DEFAULT.triple
    }
}

/// One spray profile per [`SprayMode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SprayPresets {
    pub single: SprayProfile,
    pub double: SprayProfile,
    pub triple: SprayProfile,
}

impl SprayPresets {
    /// Factory pulse timings
    pub const DEFAULT: Self = Self {
        single: SprayProfile::new(1, 200, 100),
        double: SprayProfile::new(2, 200, 100),
        triple: SprayProfile::new(3, 200, 100),
    };

    /// Profile for a mode
    pub const fn for_mode(&self, mode: SprayMode) -> SprayProfile {
        match mode {
            SprayMode::Single => self.single,
            SprayMode::Double => self.double,
            SprayMode::Triple => self.triple,
        }
    }

    /// Validate every preset
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if let Err(e) = self.single.validate() {
            return Err(e);
        }
        if let Err(e) = self.double.validate() {
            return Err(e);
        }
        self.triple.validate()
    }
}

impl Default for SprayPresets {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// RGB LED wiring convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedWiring {
    /// Shared anode to VCC: a channel lights when its pin is LOW
    #[default]
    CommonAnode,
    /// Shared cathode to GND: a channel lights when its pin is HIGH
    CommonCathode,
}

/// Sleep policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerConfig {
    /// Deep sleep allowed at all
    pub sleep_enabled: bool,
    /// Profile selected once at boot
    pub mode: SleepMode,
}

impl PowerConfig {
    pub const DEFAULT: Self = Self {
        sleep_enabled: true,
        mode: SleepMode::PowerDown,
    };
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Button timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// Minimum stable time before a level change is accepted (ms)
    pub debounce_ms: u32,
    /// Hold time that turns a press into a long press (ms)
    pub long_press_ms: u32,
}

impl ButtonConfig {
    pub const DEFAULT: Self = Self {
        debounce_ms: 30,
        long_press_ms: 1500,
    };
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Mode confirmation blink timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkConfig {
    pub on_ms: u32,
    pub off_ms: u32,
}

impl BlinkConfig {
    pub const DEFAULT: Self = Self {
        on_ms: 150,
        off_ms: 200,
    };
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Battery voltage thresholds (mV), strictly descending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryThresholds {
    /// At or above: full
    pub full_mv: u16,
    /// Below: low
    pub low_mv: u16,
    /// Below: critical
    pub critical_mv: u16,
}

impl BatteryThresholds {
    /// Single Li-ion cell
    pub const DEFAULT: Self = Self {
        full_mv: 3900,
        low_mv: 3500,
        critical_mv: 3300,
    };

    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.full_mv > self.low_mv && self.low_mv > self.critical_mv {
            Ok(())
        } else {
            Err(ConfigError::BatteryThresholdOrder)
        }
    }
}

impl Default for BatteryThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Optional heartbeat LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActivityConfig {
    pub enabled: bool,
    /// Toggle period while awake (ms)
    pub period_ms: u32,
}

impl ActivityConfig {
    pub const DEFAULT: Self = Self {
        enabled: false,
        period_ms: 1000,
    };
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete build-time device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    pub presets: SprayPresets,
    /// Mode active after boot
    pub default_mode: SprayMode,
    pub led_wiring: LedWiring,
    pub power: PowerConfig,
    pub button: ButtonConfig,
    pub blink: BlinkConfig,
    pub battery: BatteryThresholds,
    pub activity: ActivityConfig,
    pub pins: PinMap,
}

impl DeviceConfig {
    pub const DEFAULT: Self = Self {
        presets: SprayPresets::DEFAULT,
        default_mode: SprayMode::Triple,
        led_wiring: LedWiring::CommonAnode,
        power: PowerConfig::DEFAULT,
        button: ButtonConfig::DEFAULT,
        blink: BlinkConfig::DEFAULT,
        battery: BatteryThresholds::DEFAULT,
        activity: ActivityConfig::DEFAULT,
        pins: PinMap::DEFAULT,
    };

    /// Check the whole configuration
    ///
    /// `const` so boards can reject a bad configuration at compile time.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if let Err(e) = self.presets.validate() {
            return Err(e);
        }
        if let Err(e) = self.battery.validate() {
            return Err(e);
        }
        if self.blink.on_ms == 0 || self.blink.off_ms == 0 {
            return Err(ConfigError::ZeroBlinkDuration);
        }
        if self.button.long_press_ms <= self.button.debounce_ms {
            return Err(ConfigError::LongPressTooShort);
        }
        if self.pins.has_invalid_pin() {
            return Err(ConfigError::InvalidPin);
        }
        if self.pins.has_conflict() {
            return Err(ConfigError::PinConflict);
        }
        Ok(())
    }

    /// Profile for the given mode
    pub const fn profile(&self, mode: SprayMode) -> SprayProfile {
        self.presets.for_mode(mode)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
