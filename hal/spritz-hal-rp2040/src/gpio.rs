//! GPIO adapters for the `spritz-hal` pin traits
//!
//! Outputs are built on [`Flex`] so they can be tri-stated before deep
//! sleep. Inputs implement [`WakePin`] through the IO_BANK0 edge latches:
//! arming a pin enables its edge interrupt for core 0, which is enough to
//! bring the core out of WFI. embassy-rp's own IO_IRQ_BANK0 handler masks
//! the interrupt again but leaves the raw latch set, and
//! [`service_wake_sources`] turns latched edges into wake signals.

use core::cell::{Cell, RefCell};

use embassy_rp::gpio::{AnyPin, Flex, Input, Level, Pull};
use embassy_rp::{pac, Peri};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use spritz_hal::{Edge, InputPin, OutputPin, WakePin, WakeReason, WakeSignal};

/// Pins that may be armed at the same time
const MAX_WAKE_SOURCES: usize = 4;

/// Push-pull output that can release the pin
pub struct RpOutput {
    pin: Flex<'static>,
    released: bool,
}

impl RpOutput {
    pub fn new(pin: Peri<'static, AnyPin>, initial_high: bool) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_level(Level::from(initial_high));
        pin.set_as_output();
        Self {
            pin,
            released: false,
        }
    }
}

impl OutputPin for RpOutput {
    fn set_high(&mut self) {
        self.set_state(true);
    }

    fn set_low(&mut self) {
        self.set_state(false);
    }

    fn set_state(&mut self, high: bool) {
        self.pin.set_level(Level::from(high));
        if self.released {
            self.pin.set_as_output();
            self.released = false;
        }
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }

    /// Float the pin; the next write drives it again
    fn disable(&mut self) {
        self.pin.set_low();
        self.pin.set_pull(Pull::None);
        self.pin.set_as_input();
        self.released = true;
    }
}

#[derive(Clone, Copy)]
struct WakeSource {
    pin: u8,
    edge: Edge,
    signal: &'static WakeSignal,
    reason: WakeReason,
}

static WAKE_SOURCES: Mutex<CriticalSectionRawMutex, RefCell<[Option<WakeSource>; MAX_WAKE_SOURCES]>> =
    Mutex::new(RefCell::new([None; MAX_WAKE_SOURCES]));

/// Digital input that can wake the core
pub struct RpInput {
    pin: Input<'static>,
    num: u8,
    /// Level returned by the last `is_high`
    last_read: Cell<bool>,
}

impl RpInput {
    pub fn new(pin: Peri<'static, AnyPin>, num: u8, pull_up: bool) -> Self {
        let pull = if pull_up { Pull::Up } else { Pull::None };
        let pin = Input::new(pin, pull);
        let last_read = Cell::new(pin.is_high());
        Self {
            pin,
            num,
            last_read,
        }
    }

    pub fn num(&self) -> u8 {
        self.num
    }
}

impl InputPin for RpInput {
    fn is_high(&self) -> bool {
        let high = self.pin.is_high();
        self.last_read.set(high);
        high
    }
}

impl WakePin for RpInput {
    fn attach_wake(&mut self, edge: Edge, signal: &'static WakeSignal, reason: WakeReason) {
        let source = WakeSource {
            pin: self.num,
            edge,
            signal,
            reason,
        };

        WAKE_SOURCES.lock(|sources| {
            let mut sources = sources.borrow_mut();
            let slot = sources
                .iter()
                .position(|s| matches!(s, Some(s) if s.pin == self.num))
                .or_else(|| sources.iter().position(Option::is_none));
            match slot {
                Some(i) => sources[i] = Some(source),
                None => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("No free wake slot for GPIO{}", self.num);
                    return;
                }
            }
            // Latched edges predate the caller's sample; the level check
            // below covers anything since
            clear_latch(self.num);
            set_edge_enable(self.num, Some(edge));

            let now_high = self.pin.is_high();
            if edge.matches(self.last_read.get(), now_high) {
                signal.raise(reason);
            }
        });
    }

    fn detach_wake(&mut self) {
        WAKE_SOURCES.lock(|sources| {
            for slot in sources.borrow_mut().iter_mut() {
                if matches!(slot, Some(s) if s.pin == self.num) {
                    *slot = None;
                }
            }
            set_edge_enable(self.num, None);
            clear_latch(self.num);
        });
    }
}

/// Raise the signal of every armed pin whose edge has latched
///
/// Returns `true` if anything was raised. Latches are cleared and the
/// interrupt re-enabled so a later edge still wakes the core.
pub fn service_wake_sources() -> bool {
    WAKE_SOURCES.lock(|sources| {
        let mut raised = false;
        for source in sources.borrow().iter().flatten() {
            if latched(source.pin, source.edge) {
                clear_latch(source.pin);
                source.signal.raise(source.reason);
                raised = true;
            }
            set_edge_enable(source.pin, Some(source.edge));
        }
        raised
    })
}

fn bank_index(pin: u8) -> (usize, usize) {
    (pin as usize / 8, pin as usize % 8)
}

fn latched(pin: u8, edge: Edge) -> bool {
    let (reg, idx) = bank_index(pin);
    let intr = pac::IO_BANK0.intr(reg).read();
    match edge {
        Edge::Falling => intr.edge_low(idx),
        Edge::Rising => intr.edge_high(idx),
        Edge::Change => intr.edge_low(idx) || intr.edge_high(idx),
    }
}

fn clear_latch(pin: u8) {
    let (reg, idx) = bank_index(pin);
    pac::IO_BANK0.intr(reg).write(|w| {
        w.set_edge_low(idx, true);
        w.set_edge_high(idx, true);
    });
}

/// Enable the core 0 edge interrupt for `edge`, or disable it with `None`
fn set_edge_enable(pin: u8, edge: Option<Edge>) {
    let (reg, idx) = bank_index(pin);
    let (low, high) = match edge {
        None => (false, false),
        Some(Edge::Falling) => (true, false),
        Some(Edge::Rising) => (false, true),
        Some(Edge::Change) => (true, true),
    };
    pac::IO_BANK0.int_proc(0).inte(reg).modify(|w| {
        w.set_edge_low(idx, low);
        w.set_edge_high(idx, high);
    });
}
