//! Events that trigger session transitions

/// Events that can trigger session transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// The console sent the handshake query
    HandshakeQuery,
    /// A message was routed into the console namespace
    ConsoleTraffic,
    /// No inbound traffic for the timeout interval
    LivenessTimeout,
}
