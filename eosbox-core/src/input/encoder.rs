//! Quadrature wheel decoder
//!
//! Half-resolution decode: only edges on phase A produce a step, and the
//! step sign comes from whether A and B agreed before the edge. Phase B
//! edges are tracked but never counted, so a detent cycle yields two
//! steps rather than four.

use eosbox_hal::{Level, PinId, PinSampler};

use crate::config::Direction;

/// One rotary wheel
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Encoder {
    pin_a: PinId,
    pin_b: PinId,
    prev_a: Level,
    prev_b: Level,
    /// Sum of all signed steps since boot
    position: f32,
    direction: Direction,
}

impl Encoder {
    /// Create a decoder seeded with the current pin levels
    pub fn new(pin_a: PinId, pin_b: PinId, a: Level, b: Level, direction: Direction) -> Self {
        Self {
            pin_a,
            pin_b,
            prev_a: a,
            prev_b: b,
            position: 0.0,
            direction,
        }
    }

    /// Create a decoder and seed it from `sampler`
    pub fn with_sampler<S: PinSampler>(
        sampler: &mut S,
        pin_a: PinId,
        pin_b: PinId,
        direction: Direction,
    ) -> Self {
        let a = sampler.read_level(pin_a);
        let b = sampler.read_level(pin_b);
        Self::new(pin_a, pin_b, a, b, direction)
    }

    /// Decode one pair of samples into a step of -1, 0 or +1
    ///
    /// The previous levels are always replaced by `a` and `b`.
    pub fn decode(&mut self, a: Level, b: Level) -> i8 {
        let mut step = 0;
        if a != self.prev_a {
            step = if self.prev_a == self.prev_b { -1 } else { 1 };
            step = self.direction.apply(step);
            self.position += f32::from(step);
        }
        self.prev_a = a;
        self.prev_b = b;
        step
    }

    /// Sample both phases from `sampler` and decode them
    pub fn poll<S: PinSampler>(&mut self, sampler: &mut S) -> i8 {
        let a = sampler.read_level(self.pin_a);
        let b = sampler.read_level(self.pin_b);
        self.decode(a, b)
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pins(&self) -> (PinId, PinId) {
        (self.pin_a, self.pin_b)
    }

    /// Levels seen on the previous decode
    pub fn previous(&self) -> (Level, Level) {
        (self.prev_a, self.prev_b)
    }
}
