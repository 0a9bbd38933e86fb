//! Reference board wiring
//!
//! RP2040 (Pico pinout):
//!
//! | Function | GPIO |
//! |---|---|
//! | Console UART TX / RX | 0 / 1 |
//! | NEXT / LAST / SHIFT keys | 8 / 9 / 10 |
//! | LCD RS / EN | 16 / 17 |
//! | LCD D4-D7 | 18-21 |
//! | Tilt wheel A / B | 28 / 22 |
//! | Pan wheel A / B | 26 / 27 |
//! | Status LED | 25 |
//!
//! Wheels and keys are active-low with internal pull-ups. The input
//! numbers match `PanelPins::default()`.

use embassy_rp::gpio::Input;
use embassy_time::Instant;

use eosbox_drivers::PinBank;
use eosbox_hal::{Level, MonotonicClock, PinId, PinSampler};

/// Number of sampled inputs: two wheels of two phases plus three keys
pub const INPUT_COUNT: usize = 7;

/// Sampled inputs plus the embassy time base
pub struct Board {
    inputs: PinBank<Input<'static>, INPUT_COUNT>,
}

impl Board {
    pub fn new(inputs: PinBank<Input<'static>, INPUT_COUNT>) -> Self {
        Self { inputs }
    }
}

impl PinSampler for Board {
    fn read_level(&mut self, pin: PinId) -> Level {
        self.inputs.read_level(pin)
    }
}

impl MonotonicClock for Board {
    fn now_ms(&mut self) -> u64 {
        Instant::now().as_millis()
    }
}
