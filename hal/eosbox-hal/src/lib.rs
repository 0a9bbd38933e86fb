//! eosbox Hardware Abstraction Layer
//!
//! This crate defines the traits the panel logic uses to reach the
//! outside world. Board crates implement them on top of their chip HAL;
//! host tests implement them with in-memory mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  eosbox-core (decoders, session, loop)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  eosbox-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ eosbox-drivers│       │  test mocks   │
//! │ (embedded-hal)│       │   (host)      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Status indicator output
//! - [`gpio::PinSampler`] - Level sampling by pin identifier
//! - [`time::MonotonicClock`] - Millisecond time source
//! - [`transport::DatagramTransport`] - Framed serial link to the console

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod time;
pub mod transport;

// Re-export key traits at crate root for convenience
pub use gpio::{Level, OutputPin, PinId, PinSampler};
pub use time::MonotonicClock;
pub use transport::DatagramTransport;
