//! Board definition: wiring, build-time settings and peripheral setup
//!
//! Edit the constants here and rebuild to customize a board. The whole
//! configuration is checked at compile time.

use embassy_rp::adc::{Adc, Blocking, Channel, Config as AdcConfig};
use embassy_rp::gpio::Pull;
use embassy_rp::Peripherals;
use embassy_time::Delay;
use spritz_core::config::{
    ActivityConfig, DeviceConfig, LedWiring, PinConfig, PinMap, PowerConfig,
};
use spritz_core::controller::{Board, Parts};
use spritz_core::trigger::{AfterUse, TriggerPolicy};
use spritz_drivers::motor::HBridgeMotor;
use spritz_drivers::sensor::{AdcReader, BatteryDivider};
use spritz_hal::SleepMode;
use spritz_hal_rp2040::{PinBank, PinError, RpInput, RpOutput, RpPower};

/// Main-loop period while awake (ms)
pub const LOOP_PERIOD_MS: u64 = 10;

/// Battery divider: 100k over 100k, 3.3V reference
const VREF_MV: u16 = 3300;
const DIVIDER_TOP_OHMS: u32 = 100_000;
const DIVIDER_BOTTOM_OHMS: u32 = 100_000;

/// Board configuration
pub const CONFIG: DeviceConfig = DeviceConfig {
    led_wiring: LedWiring::CommonAnode,
    power: PowerConfig {
        sleep_enabled: true,
        mode: SleepMode::PowerDown,
    },
    activity: ActivityConfig {
        enabled: true,
        period_ms: 1000,
    },
    pins: PinMap {
        // Pico on-board LED
        activity_led: Some(PinConfig::new(25)),
        ..PinMap::DEFAULT
    },
    ..DeviceConfig::DEFAULT
};

/// Spray once the room has been lit for a minute and goes dark again,
/// at most every ten minutes. The button always sprays.
pub const TRIGGER: TriggerPolicy = TriggerPolicy::AfterUse(AfterUse::new(60_000, 600_000));

const _: () = assert!(CONFIG.validate().is_ok(), "invalid board configuration");
const _: () = assert!(
    matches!(CONFIG.pins.battery_adc, Some(PinConfig { pin: 26, .. })),
    "battery divider must be on GPIO26"
);

/// Blocking ADC channel for the battery divider
pub struct BatteryAdc {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl AdcReader for BatteryAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.adc.blocking_read(&mut self.channel).map_err(|_| ())
    }
}

/// Concrete peripheral types of this board
pub struct RpBoard;

impl Board for RpBoard {
    type Button = RpInput;
    type Light = RpInput;
    type Motor = HBridgeMotor<RpOutput, RpOutput>;
    type Delay = Delay;
    type Red = RpOutput;
    type Green = RpOutput;
    type Blue = RpOutput;
    type Activity = RpOutput;
    type Battery = BatteryDivider<BatteryAdc>;
    type Power = RpPower;
}

/// Failure while claiming peripherals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError {
    Pin(PinError),
    /// Cortex-M core peripherals already taken
    CorePeripherals,
}

impl From<PinError> for BoardError {
    fn from(e: PinError) -> Self {
        BoardError::Pin(e)
    }
}

/// Claim and configure everything the controller drives
pub fn parts(p: Peripherals) -> Result<Parts<RpBoard>, BoardError> {
    let core = cortex_m::Peripherals::take().ok_or(BoardError::CorePeripherals)?;
    let pins = &CONFIG.pins;

    let mut bank = PinBank::new([
        p.PIN_0.into(),
        p.PIN_1.into(),
        p.PIN_2.into(),
        p.PIN_3.into(),
        p.PIN_4.into(),
        p.PIN_5.into(),
        p.PIN_6.into(),
        p.PIN_7.into(),
        p.PIN_8.into(),
        p.PIN_9.into(),
        p.PIN_10.into(),
        p.PIN_11.into(),
        p.PIN_12.into(),
        p.PIN_13.into(),
        p.PIN_14.into(),
        p.PIN_15.into(),
        p.PIN_16.into(),
        p.PIN_17.into(),
        p.PIN_18.into(),
        p.PIN_19.into(),
        p.PIN_20.into(),
        p.PIN_21.into(),
        p.PIN_22.into(),
        p.PIN_23.into(),
        p.PIN_24.into(),
        p.PIN_25.into(),
    ]);

    let led_off = CONFIG.led_wiring.level(spritz_core::led::LedColor::Off);
    let motor = HBridgeMotor::new(
        bank.output(pins.motor_in1, false)?,
        bank.output(pins.motor_in2, false)?,
    );
    let activity = match pins.activity_led {
        Some(pin) => Some(bank.output(pin, false)?),
        None => None,
    };

    let battery = pins.battery_adc.map(|_| {
        let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
        let channel = Channel::new_pin(p.PIN_26, Pull::None);
        BatteryDivider::new(
            BatteryAdc { adc, channel },
            VREF_MV,
            DIVIDER_TOP_OHMS,
            DIVIDER_BOTTOM_OHMS,
        )
    });

    Ok(Parts {
        button: bank.input(pins.button)?,
        light: bank.input(pins.light)?,
        motor,
        delay: Delay,
        red: bank.output(pins.led_red, led_off)?,
        green: bank.output(pins.led_green, led_off)?,
        blue: bank.output(pins.led_blue, led_off)?,
        activity,
        battery,
        power: RpPower::new(core.SCB),
    })
}
