//! Power/sleep manager
//!
//! Decides when the device may enter deep sleep and runs the sleep cycle:
//!
//! 1. arm the button (falling edge) and light sensor (either edge)
//! 2. release every output-driving pin
//! 3. switch the LED off
//! 4. sleep until a wake source fires
//! 5. disarm both wake sources
//!
//! Wake interrupts only raise the [`WakeSignal`]. Sensors are re-read by
//! the main loop once [`PowerManager::maybe_sleep`] returns.

use spritz_hal::{Edge, OutputPin, PowerDriver, SleepDuration, WakePin};
use spritz_hal::{WakeReason, WakeSignal};

use crate::config::PowerConfig;
use crate::led::LedIndicator;
use crate::state::DeviceState;
use crate::traits::Quiesce;

/// Edge on the button that wakes the device (press, active-low)
pub const BUTTON_WAKE_EDGE: Edge = Edge::Falling;

/// Edge on the light sensor that wakes the device
pub const LIGHT_WAKE_EDGE: Edge = Edge::Change;

/// Why a sleep request was not honored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SkipReason {
    /// Sleep disabled in the build configuration
    Disabled,
    /// Light input is on
    LightOn,
    /// Device state is not idle
    NotIdle,
}

/// Outcome of [`PowerManager::maybe_sleep`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepOutcome {
    /// Request ignored; nothing was touched
    Skipped(SkipReason),
    /// Slept and woke up
    Slept(WakeReason),
}

impl SleepOutcome {
    pub fn slept(&self) -> bool {
        matches!(self, SleepOutcome::Slept(_))
    }
}

/// Deep-sleep policy and sequencing
pub struct PowerManager<P> {
    driver: P,
    wake: &'static WakeSignal,
    config: PowerConfig,
    initialized: bool,
    sleep_cycles: u32,
}

impl<P: PowerDriver> PowerManager<P> {
    pub fn new(driver: P, wake: &'static WakeSignal, config: PowerConfig) -> Self {
        Self {
            driver,
            wake,
            config,
            initialized: false,
            sleep_cycles: 0,
        }
    }

    /// Select the sleep profile; boot-time only, later calls do nothing
    pub fn init_sleep_mode(&mut self) {
        if self.initialized {
            return;
        }
        self.driver.set_sleep_mode(self.config.mode);
        self.initialized = true;
        info!(
            "Sleep mode {:?} (enabled={})",
            self.config.mode, self.config.sleep_enabled
        );
    }

    /// Check whether a sleep request would be honored
    ///
    /// Evaluated fresh on every call; nothing is cached.
    pub fn eligibility(&self, is_light_on: bool, state: DeviceState) -> Result<(), SkipReason> {
        if !self.config.sleep_enabled {
            return Err(SkipReason::Disabled);
        }
        if is_light_on {
            return Err(SkipReason::LightOn);
        }
        if !state.sleep_allowed() {
            return Err(SkipReason::NotIdle);
        }
        Ok(())
    }

    /// Sleep if the light is off and the device is idle
    ///
    /// An ineligible request is a silent no-op. Otherwise this returns only
    /// after the button or light sensor has fired, with both wake sources
    /// disarmed again.
    #[allow(clippy::too_many_arguments)]
    pub fn maybe_sleep<BTN, LIGHT, O, R, G, B>(
        &mut self,
        is_light_on: bool,
        state: DeviceState,
        button: &mut BTN,
        light: &mut LIGHT,
        outputs: &mut O,
        led: &mut LedIndicator<R, G, B>,
    ) -> SleepOutcome
    where
        BTN: WakePin,
        LIGHT: WakePin,
        O: Quiesce,
        R: OutputPin,
        G: OutputPin,
        B: OutputPin,
    {
        if let Err(reason) = self.eligibility(is_light_on, state) {
            trace!("Sleep skipped: {:?}", reason);
            return SleepOutcome::Skipped(reason);
        }

        // A stale reason from a previous cycle must not end this sleep early
        self.wake.reset();

        button.attach_wake(BUTTON_WAKE_EDGE, self.wake, WakeReason::Button);
        light.attach_wake(LIGHT_WAKE_EDGE, self.wake, WakeReason::LightSensor);

        outputs.quiesce();
        led.off();

        info!("Entering deep sleep");
        let reason = self.driver.sleep(SleepDuration::Forever, self.wake);

        button.detach_wake();
        light.detach_wake();

        self.sleep_cycles = self.sleep_cycles.wrapping_add(1);
        info!("Woke up: {:?} (cycle {})", reason, self.sleep_cycles);
        SleepOutcome::Slept(reason)
    }

    /// Timed low-power nap without arming the wake pins
    pub fn nap(&mut self, ms: u32) -> WakeReason {
        trace!("Nap {}ms", ms);
        self.driver.sleep(SleepDuration::Millis(ms), self.wake)
    }

    /// Completed deep-sleep cycles since boot
    pub fn sleep_cycles(&self) -> u32 {
        self.sleep_cycles
    }

    pub fn config(&self) -> &PowerConfig {
        &self.config
    }

    pub fn driver(&self) -> &P {
        &self.driver
    }
}
