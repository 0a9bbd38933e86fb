//! GPIO pin abstractions
//!
//! Provides the output pin trait for the status indicator, plus the
//! sampler interface the control loop uses to read pins by identifier.

/// Logic level of a digital pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Level from a boolean (`true` = high)
    pub const fn from_bool(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }

    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    pub const fn is_low(self) -> bool {
        matches!(self, Level::Low)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        Level::from_bool(high)
    }
}

/// Board-level pin identifier
///
/// The number is whatever the board uses to name the pin (GPIO number on
/// the RP2040). It is only meaningful to the [`PinSampler`] it is handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u8);

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Toggle the pin state
    fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Reads digital levels by pin identifier
///
/// Reads are assumed side-effect free: sampling the same pin twice
/// without the outside world changing returns the same level.
pub trait PinSampler {
    /// Read the current level of `pin`
    fn read_level(&mut self, pin: PinId) -> Level;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeLed(bool);

    impl OutputPin for FakeLed {
        fn set_high(&mut self) {
            self.0 = true;
        }

        fn set_low(&mut self) {
            self.0 = false;
        }

        fn is_set_high(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_level_from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
        assert!(Level::Low.is_low());
        assert!(Level::High.is_high());
    }

    #[test]
    fn test_output_pin_defaults() {
        let mut led = FakeLed(false);
        led.toggle();
        assert!(led.is_set_high());
        led.set_state(false);
        assert!(led.is_set_low());
    }
}
