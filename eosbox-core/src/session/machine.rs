//! Session state machine
//!
//! Connection status is a function of the current state and an event.
//! Side effects (subscribing, display refresh) are decided by the caller
//! from the before/after pair.

use super::events::Event;

/// Connection status with the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// No console heard from; splash screen shown
    #[default]
    Disconnected,
    /// Console is talking to us; parameter values shown
    Connected,
}

impl SessionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, SessionState::Connected)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use SessionState::*;

        match (self, event) {
            (_, HandshakeQuery) => Connected,
            (Disconnected, ConsoleTraffic) => Connected,
            (Connected, LivenessTimeout) => Disconnected,

            // Default: stay in current state
            _ => self,
        }
    }
}
