//! Configuration type definitions

use eosbox_hal::PinId;
use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    BOX_NAME, PAN_DIR, PAN_SCALE, PING_AFTER_IDLE_INTERVAL_MS, TILT_DIR, TILT_SCALE,
    TIMEOUT_AFTER_IDLE_INTERVAL_MS, VERSION,
};

/// Maximum label length (box name, version)
pub const MAX_LABEL_LEN: usize = 16;

/// Wheel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    #[default]
    Forward,
    /// Invert the decoded step sign
    Reverse,
}

impl Direction {
    /// Apply this direction to a decoded step
    pub fn apply(self, step: i8) -> i8 {
        match self {
            Direction::Forward => step,
            Direction::Reverse => -step,
        }
    }
}

/// When a handshake query triggers the subscription sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HandshakePolicy {
    /// Subscribe only when the session enters Connected
    #[default]
    SubscribeOnTransition,
    /// Subscribe on every handshake query, even when already Connected
    SubscribeOnEveryQuery,
}

/// Per-wheel settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WheelConfig {
    pub direction: Direction,
    /// Ticks sent per decoded step
    pub scale: i32,
}

/// Board pin assignment
///
/// Numbers are RP2040 GPIO numbers on the reference board. Encoders and
/// keys are wired active-low with pull-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelPins {
    pub pan_a: PinId,
    pub pan_b: PinId,
    pub tilt_a: PinId,
    pub tilt_b: PinId,
    pub next: PinId,
    pub last: PinId,
    /// Held LOW selects fine wheel mode
    pub shift: PinId,
}

impl Default for PanelPins {
    fn default() -> Self {
        Self {
            pan_a: PinId(26),
            pan_b: PinId(27),
            tilt_a: PinId(28),
            tilt_b: PinId(22),
            next: PinId(8),
            last: PinId(9),
            shift: PinId(10),
        }
    }
}

/// Complete panel configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    pub pan: WheelConfig,
    pub tilt: WheelConfig,
    /// Idle time before a liveness ping (ms)
    pub ping_after_idle_ms: u64,
    /// Idle time before timing out the session (ms)
    pub timeout_after_idle_ms: u64,
    pub box_name: String<MAX_LABEL_LEN>,
    pub version: String<MAX_LABEL_LEN>,
    pub handshake_policy: HandshakePolicy,
    /// Wiring is fixed per board and not part of stored settings
    #[cfg_attr(feature = "serde", serde(skip))]
    pub pins: PanelPins,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            pan: WheelConfig {
                direction: PAN_DIR,
                scale: PAN_SCALE,
            },
            tilt: WheelConfig {
                direction: TILT_DIR,
                scale: TILT_SCALE,
            },
            ping_after_idle_ms: PING_AFTER_IDLE_INTERVAL_MS,
            timeout_after_idle_ms: TIMEOUT_AFTER_IDLE_INTERVAL_MS,
            box_name: label(BOX_NAME),
            version: label(VERSION),
            handshake_policy: HandshakePolicy::default(),
            pins: PanelPins::default(),
        }
    }
}

/// Copy `text` into a label, truncating at [`MAX_LABEL_LEN`]
pub fn label(text: &str) -> String<MAX_LABEL_LEN> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
