//! Panel configuration
//!
//! Compile-time defaults plus the [`PanelConfig`] structure that groups
//! them for the control loop.

pub mod types;

pub use types::*;

pub use eosbox_protocol::{HANDSHAKE_QUERY, HANDSHAKE_REPLY, MAX_DATAGRAM_SIZE};

/// Inbound silence before a liveness ping is sent
pub const PING_AFTER_IDLE_INTERVAL_MS: u64 = 2500;

/// Inbound silence before the session drops back to Disconnected
pub const TIMEOUT_AFTER_IDLE_INTERVAL_MS: u64 = 5000;

/// Wheel ticks sent per encoder step. 1 is the finest setting.
pub const PAN_SCALE: i32 = 1;
pub const TILT_SCALE: i32 = 1;

/// Flip these to mirror a wheel without rewiring it
pub const PAN_DIR: Direction = Direction::Forward;
pub const TILT_DIR: Direction = Direction::Forward;

/// Identity shown on the splash screen and used in pings
pub const BOX_NAME: &str = "box1";
pub const VERSION: &str = "2.0.0.1";

/// Suffix appended to the box name to form the ping token
pub const PING_TOKEN_SUFFIX: &str = "_hello";

/// Address root of the console's message family
pub const NAMESPACE: &str = "/eos";

/// Fractional digits shown for parameter values
pub const SIG_DIGITS: usize = 3;

/// Logical key names sent to the console
pub const NEXT_KEY: &str = "NEXT";
pub const LAST_KEY: &str = "LAST";
