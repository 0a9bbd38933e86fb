//! Key edge detection
//!
//! Keys are active-low. This is plain edge latching with no hold window;
//! any filtering of contact bounce is left to the pin sampler.

use eosbox_hal::{Level, PinId};
use eosbox_protocol::KeyEdge;

/// Result of comparing a fresh sample with the latched level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    None,
    Pressed,
    Released,
}

impl Transition {
    /// Edge to report to the console, if any
    pub fn edge(self) -> Option<KeyEdge> {
        match self {
            Transition::None => None,
            Transition::Pressed => Some(KeyEdge::Down),
            Transition::Released => Some(KeyEdge::Up),
        }
    }
}

/// Classify a sample against the previously latched level
pub fn check_transition(level: Level, previous: Level) -> Transition {
    match (previous, level) {
        (Level::High, Level::Low) => Transition::Pressed,
        (Level::Low, Level::High) => Transition::Released,
        _ => Transition::None,
    }
}

/// A named key on one input pin
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Button {
    pin: PinId,
    name: &'static str,
    level: Level,
}

impl Button {
    /// Create a released key (pulled high)
    pub fn new(pin: PinId, name: &'static str) -> Self {
        Self {
            pin,
            name,
            level: Level::High,
        }
    }

    /// Latch a new sample, returning the transition it caused
    pub fn check(&mut self, level: Level) -> Transition {
        let transition = check_transition(level, self.level);
        self.level = level;
        transition
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn is_pressed(&self) -> bool {
        self.level.is_low()
    }
}
