//! Board-agnostic core logic for the control panel
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Quadrature wheel decoding and key edge detection
//! - Session state machine with liveness ping and timeout
//! - The control loop engine tying inputs, link and display together
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod input;
pub mod link;
pub mod session;
pub mod traits;

pub use link::ConsoleLink;
