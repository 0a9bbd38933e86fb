//! Display sink trait

use crate::session::SessionState;

/// Receives the visible status whenever it changes
///
/// Called only when something on screen changed. Implementations must
/// not block the control loop for long; any failure is theirs to absorb.
pub trait DisplaySink {
    fn render(&mut self, state: SessionState, pan: f32, tilt: f32);
}

impl<T: DisplaySink + ?Sized> DisplaySink for &mut T {
    fn render(&mut self, state: SessionState, pan: f32, tilt: f32) {
        (**self).render(state, pan, tilt)
    }
}
