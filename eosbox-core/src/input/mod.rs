//! Panel inputs
//!
//! Pure decoders for the two wheels and the key pins. Callers sample
//! the pins once per control cycle and hand the levels in.

pub mod button;
pub mod encoder;

pub use button::{check_transition, Button, Transition};
pub use encoder::Encoder;
