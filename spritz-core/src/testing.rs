//! Recording test doubles for the hardware traits
//!
//! All doubles can share one [`Log`] so tests can assert on the exact
//! order of pin writes, motor commands, delays and sleep calls.

extern crate std;

use std::boxed::Box;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use spritz_hal::{Edge, InputPin, OutputPin, PowerDriver, SleepDuration, SleepMode, WakePin};
use spritz_hal::{WakeReason, WakeSignal};

use crate::traits::{BatterySensor, Quiesce, SensorError, SprayMotor};

/// One observable hardware interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwEvent {
    Write(&'static str, bool),
    Disable(&'static str),
    Attach(&'static str, Edge),
    Detach(&'static str),
    Forward,
    Stop,
    MotorDisable,
    Delay(u32),
    SleepMode(SleepMode),
    Sleep(SleepDuration),
}

/// Shared, ordered event log
#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<Vec<HwEvent>>>);

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: HwEvent) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<HwEvent> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn count(&self, pred: impl Fn(&HwEvent) -> bool) -> usize {
        self.0.borrow().iter().filter(|e| pred(e)).count()
    }

    /// Index of the first event matching `pred`
    pub fn position(&self, pred: impl Fn(&HwEvent) -> bool) -> Option<usize> {
        self.0.borrow().iter().position(|e| pred(e))
    }
}

/// Leak a fresh wake signal so it can be handed out as `&'static`
pub fn leak_signal() -> &'static WakeSignal {
    Box::leak(Box::new(WakeSignal::new()))
}

#[derive(Default)]
struct PinState {
    high: bool,
    disabled: bool,
    history: Vec<bool>,
}

/// Output pin double; clones share state
#[derive(Clone)]
pub struct MockPin {
    name: &'static str,
    log: Log,
    state: Rc<RefCell<PinState>>,
}

impl MockPin {
    pub fn new() -> Self {
        Self::named("pin", &Log::new())
    }

    pub fn named(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            state: Rc::default(),
        }
    }

    /// Every level written, oldest first
    pub fn history(&self) -> Vec<bool> {
        self.state.borrow().history.clone()
    }

    /// Released by `disable` and not written since
    pub fn is_disabled(&self) -> bool {
        self.state.borrow().disabled
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.set_state(true);
    }

    fn set_low(&mut self) {
        self.set_state(false);
    }

    fn set_state(&mut self, high: bool) {
        let mut state = self.state.borrow_mut();
        state.high = high;
        state.disabled = false;
        state.history.push(high);
        self.log.push(HwEvent::Write(self.name, high));
    }

    fn is_set_high(&self) -> bool {
        self.state.borrow().high
    }

    fn disable(&mut self) {
        self.state.borrow_mut().disabled = true;
        self.log.push(HwEvent::Disable(self.name));
    }
}

struct InputState {
    high: bool,
    /// Level returned by the last `is_high`
    last_read: bool,
    binding: Option<(Edge, &'static WakeSignal, WakeReason)>,
    attaches: u32,
    detaches: u32,
}

/// Input pin double with interrupt emulation; clones share state
#[derive(Clone)]
pub struct MockInput {
    name: &'static str,
    log: Log,
    state: Rc<RefCell<InputState>>,
}

impl MockInput {
    pub fn named(name: &'static str, high: bool, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            state: Rc::new(RefCell::new(InputState {
                high,
                last_read: high,
                binding: None,
                attaches: 0,
                detaches: 0,
            })),
        }
    }

    /// Drive the pin; an attached matching edge raises its wake signal
    pub fn set_level(&self, high: bool) {
        let mut state = self.state.borrow_mut();
        let was_high = state.high;
        state.high = high;
        if let Some((edge, signal, reason)) = state.binding {
            if edge.matches(was_high, high) {
                signal.raise(reason);
            }
        }
    }

    pub fn attached_edge(&self) -> Option<Edge> {
        self.state.borrow().binding.map(|(edge, _, _)| edge)
    }

    pub fn attach_count(&self) -> u32 {
        self.state.borrow().attaches
    }

    pub fn detach_count(&self) -> u32 {
        self.state.borrow().detaches
    }
}

impl InputPin for MockInput {
    fn is_high(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.last_read = state.high;
        state.high
    }
}

impl WakePin for MockInput {
    fn attach_wake(&mut self, edge: Edge, signal: &'static WakeSignal, reason: WakeReason) {
        let mut state = self.state.borrow_mut();
        state.binding = Some((edge, signal, reason));
        state.attaches += 1;
        self.log.push(HwEvent::Attach(self.name, edge));
        // Moved since the caller last looked
        if edge.matches(state.last_read, state.high) {
            signal.raise(reason);
        }
    }

    fn detach_wake(&mut self) {
        let mut state = self.state.borrow_mut();
        state.binding = None;
        state.detaches += 1;
        self.log.push(HwEvent::Detach(self.name));
    }
}

/// Spray motor double
#[derive(Clone)]
pub struct MockMotor {
    log: Log,
    running: Rc<Cell<bool>>,
}

impl MockMotor {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            running: Rc::default(),
        }
    }
}

impl SprayMotor for MockMotor {
    fn forward(&mut self) {
        self.running.set(true);
        self.log.push(HwEvent::Forward);
    }

    fn stop(&mut self) {
        self.running.set(false);
        self.log.push(HwEvent::Stop);
    }

    fn is_running(&self) -> bool {
        self.running.get()
    }

    fn disable(&mut self) {
        self.running.set(false);
        self.log.push(HwEvent::MotorDisable);
    }
}

impl Quiesce for MockMotor {
    fn quiesce(&mut self) {
        self.disable();
    }
}

/// Delay double: records the request and returns immediately
#[derive(Clone)]
pub struct MockDelay {
    log: Log,
    elapsed_ms: Rc<Cell<u64>>,
}

impl MockDelay {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            elapsed_ms: Rc::default(),
        }
    }

    /// Sum of all requested delays
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms.get()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms.set(self.elapsed_ms.get() + ms as u64);
        self.log.push(HwEvent::Delay(ms));
    }
}

/// Sleep driver double
///
/// `on_sleep` stands in for the outside world while the processor is
/// suspended, typically by toggling a [`MockInput`].
pub struct MockPower {
    log: Log,
    mode: Option<SleepMode>,
    on_sleep: Option<Box<dyn FnMut()>>,
}

impl MockPower {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            mode: None,
            on_sleep: None,
        }
    }

    pub fn with_wake(log: &Log, on_sleep: impl FnMut() + 'static) -> Self {
        Self {
            log: log.clone(),
            mode: None,
            on_sleep: Some(Box::new(on_sleep)),
        }
    }

    pub fn mode(&self) -> Option<SleepMode> {
        self.mode
    }
}

impl PowerDriver for MockPower {
    fn set_sleep_mode(&mut self, mode: SleepMode) {
        self.mode = Some(mode);
        self.log.push(HwEvent::SleepMode(mode));
    }

    fn sleep(&mut self, duration: SleepDuration, wake: &WakeSignal) -> WakeReason {
        self.log.push(HwEvent::Sleep(duration));
        if let Some(hook) = self.on_sleep.as_mut() {
            hook();
        }
        match duration {
            SleepDuration::Forever => wake
                .try_take()
                .expect("slept forever: no wake source fired"),
            SleepDuration::Millis(_) => wake.try_take().unwrap_or(WakeReason::Timer),
        }
    }
}

/// Battery sensor double
#[derive(Clone)]
pub struct MockBattery {
    reading: Rc<Cell<Result<u16, SensorError>>>,
}

impl MockBattery {
    pub fn new(mv: u16) -> Self {
        Self {
            reading: Rc::new(Cell::new(Ok(mv))),
        }
    }

    pub fn set(&self, reading: Result<u16, SensorError>) {
        self.reading.set(reading);
    }
}

impl BatterySensor for MockBattery {
    fn read_millivolts(&mut self) -> Result<u16, SensorError> {
        self.reading.get()
    }
}
