//! eosbox - Console Panel Firmware
//!
//! Main firmware binary for the RP2040 pan/tilt panel. Two quadrature
//! wheels and three keys on GPIO, a 16x2 character LCD, and a SLIP-framed
//! OSC link to the console on UART0.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use eosbox_core::ConsoleLink;
use eosbox_display::StatusDisplay;
use eosbox_drivers::{Hd44780, IndicatorPin, PinBank, SlipSerial};

mod board;
mod config;
mod tasks;

use board::Board;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// UART buffers must live forever
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("eosbox firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::panel_config();
    info!(
        "Panel '{}': ping after {}ms, timeout after {}ms",
        config.box_name.as_str(),
        config.ping_after_idle_ms,
        config.timeout_after_idle_ms
    );

    // Console link on UART0 (115200 8N1 default)
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 1024]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let transport = SlipSerial::new(uart);
    info!("UART initialized for console link");

    // Wheels and keys
    let pins = config.pins;
    let inputs = PinBank::new([
        (pins.pan_a, Input::new(p.PIN_26, Pull::Up)),
        (pins.pan_b, Input::new(p.PIN_27, Pull::Up)),
        (pins.tilt_a, Input::new(p.PIN_28, Pull::Up)),
        (pins.tilt_b, Input::new(p.PIN_22, Pull::Up)),
        (pins.next, Input::new(p.PIN_8, Pull::Up)),
        (pins.last, Input::new(p.PIN_9, Pull::Up)),
        (pins.shift, Input::new(p.PIN_10, Pull::Up)),
    ]);
    let board = Board::new(inputs);

    // Character LCD
    let mut lcd = Hd44780::new(
        Output::new(p.PIN_16, Level::Low),
        Output::new(p.PIN_17, Level::Low),
        [
            Output::new(p.PIN_18, Level::Low),
            Output::new(p.PIN_19, Level::Low),
            Output::new(p.PIN_20, Level::Low),
            Output::new(p.PIN_21, Level::Low),
        ],
        Delay,
    );
    match lcd.init() {
        Ok(()) => info!("LCD initialized"),
        Err(e) => warn!("LCD init failed: {:?}", e),
    }
    let display = StatusDisplay::new(lcd, &config);

    let led = IndicatorPin::new(Output::new(p.PIN_25, Level::Low));

    let panel = ConsoleLink::new(config, board, transport, display, led);

    info!("Spawning tasks...");
    spawner.spawn(tasks::control_task(panel)).unwrap();

    info!("eosbox firmware running");
}
