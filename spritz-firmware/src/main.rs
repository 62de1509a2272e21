//! Spritz - Auto-Spray Freshener Firmware
//!
//! Main firmware binary for RP2040-based spray dispensers. A single loop
//! samples the button and light sensor, fires the spray motor, drives the
//! status LED and puts the core to sleep whenever the room is dark and
//! nothing is happening.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::{Instant, Timer};
use spritz_core::controller::Controller;
use spritz_hal::WakeSignal;
use {defmt_rtt as _, panic_probe as _};

mod board;

/// Raised by the wake pins, consumed by the sleep driver
static WAKE: WakeSignal = WakeSignal::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Spritz firmware starting...");

    let p = embassy_rp::init(Default::default());

    let parts = match board::parts(p) {
        Ok(parts) => parts,
        Err(e) => {
            error!("Board setup failed: {:?}", e);
            loop {
                cortex_m::asm::wfi();
            }
        }
    };
    info!("Peripherals initialized");

    let mut controller = Controller::new(parts, board::TRIGGER, &WAKE, board::CONFIG);

    loop {
        let now_ms = Instant::now().as_millis() as u32;
        let report = controller.tick(now_ms);

        if let Some(spray) = report.spray {
            info!(
                "Sprayed {} pulses in {}ms (total {})",
                spray.pulses,
                spray.duration_ms,
                controller.sprays()
            );
        }
        trace!("Tick: {:?}", report);

        Timer::after_millis(board::LOOP_PERIOD_MS).await;
    }
}
