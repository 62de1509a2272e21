//! Main-loop controller
//!
//! [`Controller::tick`] is one iteration of the firmware loop:
//!
//! 1. sample the button and light sensor
//! 2. feed light edges to the state machine
//! 3. long press: cycle the spray mode and blink the new mode count
//! 4. ask the trigger policy; spray synchronously if it fires
//! 5. refresh the status LED
//! 6. offer deep sleep, unless a blink confirmation is still running or
//!    the button is held
//!
//! The controller owns every peripheral. The concrete types come from a
//! [`Board`] so the same loop runs on hardware and against test doubles.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use spritz_hal::{InputPin, OutputPin, PowerDriver, WakePin, WakeSignal};

use crate::battery::BatteryLevel;
use crate::config::{DeviceConfig, SprayMode};
use crate::input::{Button, ButtonEvent, LightChange, LightTracker};
use crate::led::{ActivityLed, LedIndicator, StatusIndicator};
use crate::power::{PowerManager, SleepOutcome};
use crate::spray::{SprayReport, SpraySequencer};
use crate::state::{DeviceState, Event, StateMachine};
use crate::traits::{BatterySensor, SprayMotor};
use crate::trigger::{SprayTrigger, TriggerContext};

/// Most state machine events one tick can produce
pub const MAX_TICK_EVENTS: usize = 4;

/// Peripheral types of a board
pub trait Board {
    type Button: WakePin;
    type Light: WakePin;
    type Motor: SprayMotor;
    type Delay: DelayNs;
    type Red: OutputPin;
    type Green: OutputPin;
    type Blue: OutputPin;
    type Activity: OutputPin;
    type Battery: BatterySensor;
    type Power: PowerDriver;
}

/// Peripherals handed to [`Controller::new`]
pub struct Parts<B: Board> {
    pub button: B::Button,
    pub light: B::Light,
    pub motor: B::Motor,
    pub delay: B::Delay,
    pub red: B::Red,
    pub green: B::Green,
    pub blue: B::Blue,
    pub activity: Option<B::Activity>,
    pub battery: Option<B::Battery>,
    pub power: B::Power,
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// State at the end of the tick
    pub state: DeviceState,
    pub mode: SprayMode,
    /// Events applied to the state machine, in order
    pub events: Vec<Event, MAX_TICK_EVENTS>,
    pub button: Option<ButtonEvent>,
    pub spray: Option<SprayReport>,
    /// `None` when sleep was not offered (blink running or button held)
    pub sleep: Option<SleepOutcome>,
}

/// Owns the peripherals and runs the device logic
pub struct Controller<B: Board, T> {
    config: DeviceConfig,
    button_pin: B::Button,
    light_pin: B::Light,
    sequencer: SpraySequencer<B::Motor, B::Delay>,
    led: LedIndicator<B::Red, B::Green, B::Blue>,
    activity: Option<ActivityLed<B::Activity>>,
    battery: Option<B::Battery>,
    power: PowerManager<B::Power>,
    machine: StateMachine,
    status: StatusIndicator,
    button: Button,
    light: LightTracker,
    trigger: T,
    mode: SprayMode,
    battery_due: bool,
}

impl<B: Board, T: SprayTrigger> Controller<B, T> {
    /// Take the peripherals and bring outputs to a safe state
    ///
    /// The motor is stopped, the LED is off and the sleep profile is
    /// selected before this returns.
    pub fn new(
        parts: Parts<B>,
        trigger: T,
        wake: &'static WakeSignal,
        config: DeviceConfig,
    ) -> Self {
        let mode = config.default_mode;
        let sequencer = SpraySequencer::new(parts.motor, parts.delay, config.profile(mode));
        let led = LedIndicator::new(parts.red, parts.green, parts.blue, config.led_wiring);
        let activity = parts
            .activity
            .map(|pin| ActivityLed::new(pin, config.activity));

        let mut power = PowerManager::new(parts.power, wake, config.power);
        power.init_sleep_mode();

        info!("Controller ready, mode {:?}", mode);

        Self {
            button_pin: parts.button,
            light_pin: parts.light,
            sequencer,
            led,
            activity,
            battery: parts.battery,
            power,
            machine: StateMachine::new(),
            status: StatusIndicator::new(config.blink),
            button: Button::new(config.button),
            light: LightTracker::new(),
            trigger,
            mode,
            battery_due: true,
            config,
        }
    }

    /// Run one main-loop iteration
    pub fn tick(&mut self, now_ms: u32) -> TickReport {
        let mut events = Vec::new();

        let pressed = self.button_asserted();
        let mut light_on = self.light_asserted();

        if self.battery_due {
            self.battery_due = false;
            self.refresh_battery();
        }

        // Light edges
        let mut light_off_after_ms = None;
        if let Some(change) = self.light.sample(light_on, now_ms) {
            let event = match change {
                LightChange::On => Event::LightOn,
                LightChange::Off { on_for_ms } => {
                    light_off_after_ms = on_for_ms;
                    Event::LightOff
                }
            };
            self.apply(event, &mut events);
        }

        // Button gestures
        let gesture = self.button.sample(pressed, now_ms);
        if gesture == Some(ButtonEvent::LongPress) {
            self.cycle_mode(now_ms);
        }

        // Spray
        let mut spray = None;
        let ctx = TriggerContext {
            state: self.machine.state(),
            now_ms,
            button_pressed: gesture == Some(ButtonEvent::Pressed),
            light_on,
            light_off_after_ms,
        };
        if ctx.state.spray_allowed() && self.trigger.should_spray(&ctx) {
            self.apply(Event::SprayTriggered, &mut events);
            self.show_status(now_ms);

            self.sequencer.start_spray();
            spray = Some(self.sequencer.run_spray());

            // The loop was blocked; the light may have changed meanwhile
            light_on = self.light_asserted();
            self.light.assume(light_on, now_ms);
            self.apply(Event::SprayFinished { light_on }, &mut events);
            self.battery_due = true;
        }

        self.show_status(now_ms);
        if let Some(activity) = self.activity.as_mut() {
            activity.update(now_ms);
        }

        // Sleep; a held button would lose its release edge
        let sleep = if self.status.is_blinking() || pressed || self.button.is_pressed() {
            None
        } else {
            let mut outputs = (&mut self.sequencer, &mut self.activity);
            let outcome = self.power.maybe_sleep(
                light_on,
                self.machine.state(),
                &mut self.button_pin,
                &mut self.light_pin,
                &mut outputs,
                &mut self.led,
            );
            if outcome.slept() {
                self.button.resync();
                self.light.resync();
                self.battery_due = true;
            }
            Some(outcome)
        };

        TickReport {
            state: self.machine.state(),
            mode: self.mode,
            events,
            button: gesture,
            spray,
            sleep,
        }
    }

    fn apply(&mut self, event: Event, events: &mut Vec<Event, MAX_TICK_EVENTS>) {
        self.machine.handle(event);
        if events.push(event).is_err() {
            warn!("Tick event log full, dropped {:?}", event);
        }
    }

    fn cycle_mode(&mut self, now_ms: u32) {
        self.mode = self.mode.next();
        self.sequencer.set_profile(self.config.profile(self.mode));
        self.status.start_blink_confirm(self.mode, now_ms);
        info!("Spray mode: {:?}", self.mode);
    }

    fn show_status(&mut self, now_ms: u32) {
        let color = self
            .status
            .color(self.machine.state(), self.mode, now_ms);
        if color != self.led.current() {
            self.led.show(color);
        }
    }

    fn refresh_battery(&mut self) {
        let Some(sensor) = self.battery.as_mut() else {
            return;
        };
        match sensor.read_millivolts() {
            Ok(mv) => {
                let level = BatteryLevel::from_millivolts(mv, &self.config.battery);
                if level != self.status.battery() {
                    if level.needs_attention() {
                        warn!("Battery {:?} ({}mV)", level, mv);
                    } else {
                        info!("Battery {:?} ({}mV)", level, mv);
                    }
                    self.status.set_battery(level);
                }
            }
            // Keep the previous level
            Err(e) => warn!("Battery read failed: {:?}", e),
        }
    }

    fn button_asserted(&self) -> bool {
        self.config.pins.button.is_asserted(self.button_pin.is_high())
    }

    fn light_asserted(&self) -> bool {
        self.config.pins.light.is_asserted(self.light_pin.is_high())
    }

    pub fn state(&self) -> DeviceState {
        self.machine.state()
    }

    pub fn mode(&self) -> SprayMode {
        self.mode
    }

    pub fn battery(&self) -> BatteryLevel {
        self.status.battery()
    }

    pub fn sprays(&self) -> u32 {
        self.sequencer.sprays()
    }

    pub fn sleep_cycles(&self) -> u32 {
        self.power.sleep_cycles()
    }

    pub fn led(&self) -> &LedIndicator<B::Red, B::Green, B::Blue> {
        &self.led
    }

    pub fn trigger(&self) -> &T {
        &self.trigger
    }
}
