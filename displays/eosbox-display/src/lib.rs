//! Character display abstraction and status view for eosbox
//!
//! This crate provides:
//! - `DisplayBackend` trait for character displays (HD44780 LCD and friends)
//! - `Screen` buffer holding the text currently meant to be visible
//! - `StatusDisplay`, the control loop's display sink, which lays out
//!   the splash and parameter screens
//!
//! # Architecture
//!
//! The control loop only knows about `eosbox_core::traits::DisplaySink`.
//! `StatusDisplay` turns each `render` call into screen lines and pushes
//! them to whatever backend drives the glass.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod screen;
pub mod status;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
pub use status::StatusDisplay;
