//! HD44780 character LCD, 4-bit parallel interface
//!
//! Write-only wiring: RS, EN and D4-D7 on GPIO, R/W tied to ground. With
//! no busy flag to poll, every command is followed by its worst-case
//! execution time.

use eosbox_display::{DisplayBackend, DisplayError};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

// Instructions
const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x04;
const CMD_DISPLAY_CONTROL: u8 = 0x08;
const CMD_FUNCTION_SET: u8 = 0x20;
const CMD_SET_DDRAM_ADDR: u8 = 0x80;

// Flags
const ENTRY_INCREMENT: u8 = 0x02;
const DISPLAY_ON: u8 = 0x04;
const FUNCTION_2_LINES: u8 = 0x08;

/// DDRAM address of the first column of each row
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// HD44780 driver
pub struct Hd44780<P, D> {
    rs: P,
    en: P,
    /// D4, D5, D6, D7
    data: [P; 4],
    delay: D,
    cols: u8,
    rows: u8,
    ready: bool,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    /// Create a driver for a 16x2 module
    pub fn new(rs: P, en: P, data: [P; 4], delay: D) -> Self {
        Self::with_size(rs, en, data, delay, 16, 2)
    }

    /// Create a driver for a module of `cols` x `rows` characters
    pub fn with_size(rs: P, en: P, data: [P; 4], delay: D, cols: u8, rows: u8) -> Self {
        Self {
            rs,
            en,
            data,
            delay,
            cols,
            rows: rows.min(ROW_OFFSETS.len() as u8),
            ready: false,
        }
    }

    /// Run the power-on initialization sequence
    ///
    /// Brings the controller into 4-bit mode from any state, then turns
    /// the display on with the cursor hidden.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(50);
        pin(self.rs.set_low())?;
        pin(self.en.set_low())?;

        // Three times 8-bit mode, then switch to 4-bit
        self.write_nibble(0x03)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x03)?;
        self.delay.delay_us(150);
        self.write_nibble(0x03)?;
        self.delay.delay_us(150);
        self.write_nibble(0x02)?;

        let lines = if self.rows > 1 { FUNCTION_2_LINES } else { 0 };
        self.command(CMD_FUNCTION_SET | lines)?;
        self.command(CMD_DISPLAY_CONTROL | DISPLAY_ON)?;
        self.command(CMD_ENTRY_MODE | ENTRY_INCREMENT)?;
        self.ready = true;
        self.clear()
    }

    /// Release the pins and delay
    pub fn free(self) -> (P, P, [P; 4], D) {
        (self.rs, self.en, self.data, self.delay)
    }

    fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        self.command(CMD_SET_DDRAM_ADDR | (ROW_OFFSETS[row as usize] + col))
    }

    fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        pin(self.rs.set_low())?;
        self.write_byte(cmd)
    }

    fn write_char(&mut self, c: u8) -> Result<(), DisplayError> {
        pin(self.rs.set_high())?;
        self.write_byte(c)
    }

    fn write_byte(&mut self, value: u8) -> Result<(), DisplayError> {
        self.write_nibble(value >> 4)?;
        self.write_nibble(value & 0x0F)
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), DisplayError> {
        for (bit, line) in self.data.iter_mut().enumerate() {
            pin(line.set_state(((nibble >> bit) & 1 != 0).into()))?;
        }

        pin(self.en.set_high())?;
        self.delay.delay_us(1);
        pin(self.en.set_low())?;
        // Commands need >37us to settle
        self.delay.delay_us(50);
        Ok(())
    }
}

impl<P: OutputPin, D: DelayNs> DisplayBackend for Hd44780<P, D> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        if !self.ready {
            return Err(DisplayError::NotInitialized);
        }
        self.command(CMD_CLEAR)?;
        self.delay.delay_us(2000);
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        if !self.ready {
            return Err(DisplayError::NotInitialized);
        }
        if row >= self.rows || col >= self.cols {
            return Err(DisplayError::InvalidCoordinates);
        }

        self.set_cursor(row, col)?;
        let room = usize::from(self.cols - col);
        for c in text.chars().take(room) {
            // The character ROM only matches ASCII
            let code = if c.is_ascii() && !c.is_ascii_control() {
                c as u8
            } else {
                b'?'
            };
            self.write_char(code)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

fn pin<E>(result: Result<(), E>) -> Result<(), DisplayError> {
    result.map_err(|_| DisplayError::Communication)
}
