//! GPIO adapters
//!
//! Bridges `embedded-hal` digital pins to the panel's pin traits.

use eosbox_hal::{Level, OutputPin, PinId, PinSampler};
use embedded_hal::digital;

/// A fixed set of input pins addressed by [`PinId`]
///
/// Pins that are not in the bank, or that fail to read, sample as
/// [`Level::High`], which the panel treats as idle for every input.
pub struct PinBank<P, const N: usize> {
    pins: [(PinId, P); N],
}

impl<P: digital::InputPin, const N: usize> PinBank<P, N> {
    pub fn new(pins: [(PinId, P); N]) -> Self {
        Self { pins }
    }

    /// Whether `pin` is part of this bank
    pub fn contains(&self, pin: PinId) -> bool {
        self.pins.iter().any(|(id, _)| *id == pin)
    }
}

impl<P: digital::InputPin, const N: usize> PinSampler for PinBank<P, N> {
    fn read_level(&mut self, pin: PinId) -> Level {
        self.pins
            .iter_mut()
            .find(|(id, _)| *id == pin)
            .and_then(|(_, p)| p.is_high().ok())
            .map_or(Level::High, Level::from_bool)
    }
}

/// Status indicator (LED) on an `embedded-hal` output pin
pub struct IndicatorPin<P> {
    pin: P,
    lit: bool,
    /// If true, lit = pin LOW
    inverted: bool,
}

impl<P: digital::OutputPin> IndicatorPin<P> {
    /// Create an active-high indicator, initially dark
    pub fn new(pin: P) -> Self {
        Self::with_polarity(pin, false)
    }

    /// Create an indicator with the given polarity, initially dark
    pub fn with_polarity(pin: P, inverted: bool) -> Self {
        let mut indicator = Self {
            pin,
            lit: false,
            inverted,
        };
        indicator.drive();
        indicator
    }

    fn drive(&mut self) {
        // Pin errors leave the tracked state authoritative
        let _ = if self.lit != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }
}

impl<P: digital::OutputPin> OutputPin for IndicatorPin<P> {
    fn set_high(&mut self) {
        self.lit = true;
        self.drive();
    }

    fn set_low(&mut self) {
        self.lit = false;
        self.drive();
    }

    fn is_set_high(&self) -> bool {
        self.lit
    }
}
