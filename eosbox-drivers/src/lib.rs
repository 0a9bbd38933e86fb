//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the eosbox traits on
//! top of `embedded-hal` and `embedded-io`:
//!
//! - SLIP datagram transport over any byte port
//! - Input pin bank and status indicator
//! - HD44780 character LCD (4-bit parallel)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod gpio;
pub mod lcd;
pub mod transport;

pub use gpio::{IndicatorPin, PinBank};
pub use lcd::Hd44780;
pub use transport::SlipSerial;
