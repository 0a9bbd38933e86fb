//! Control loop task
//!
//! Owns the whole console link and polls it as fast as the executor
//! allows. Wheel edges are sampled, not interrupt driven, so the loop
//! must never block.

use defmt::*;
use embassy_futures::yield_now;
use embassy_rp::gpio::Output;
use embassy_rp::uart::BufferedUart;
use embassy_time::Delay;

use eosbox_core::ConsoleLink;
use eosbox_display::StatusDisplay;
use eosbox_drivers::{Hd44780, IndicatorPin, SlipSerial};

use crate::board::Board;

/// Character LCD on GPIO with embassy busy-wait delays
pub type Lcd = Hd44780<Output<'static>, Delay>;

/// The panel's console link as wired on the reference board
pub type Panel = ConsoleLink<
    Board,
    SlipSerial<BufferedUart>,
    StatusDisplay<Lcd>,
    IndicatorPin<Output<'static>>,
>;

#[embassy_executor::task]
pub async fn control_task(mut panel: Panel) {
    info!("Control task started");

    panel.start();
    info!("Announced to console, waiting for traffic");

    loop {
        panel.poll();
        yield_now().await;
    }
}
