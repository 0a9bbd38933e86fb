//! Collaborator traits
//!
//! These traits define the interface between the control loop and
//! the outside world beyond the HAL pin and transport traits.

pub mod display;

pub use display::DisplaySink;
