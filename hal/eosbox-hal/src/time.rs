//! Time source abstraction

/// Monotonic millisecond clock
///
/// Must never go backwards. The epoch is arbitrary (typically boot).
pub trait MonotonicClock {
    /// Milliseconds since the clock's epoch
    fn now_ms(&mut self) -> u64;
}
