//! Liveness tracking
//!
//! Counts idle time since the last inbound datagram. After the ping
//! interval a single ping goes out; after the timeout interval the
//! session is dropped and tracking stops until traffic resumes.

use crate::config::{PING_AFTER_IDLE_INTERVAL_MS, TIMEOUT_AFTER_IDLE_INTERVAL_MS};

/// What the control loop must do after a liveness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LivenessAction {
    /// Nothing to do
    Idle,
    /// Send one ping
    Ping,
    /// Console is gone; drop the session
    Timeout,
}

/// Idle timer with a one-shot ping per idle period
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LivenessTimer {
    /// Time of the last inbound datagram, `None` while tracking is off
    last_activity_ms: Option<u64>,
    ping_sent: bool,
    ping_after_ms: u64,
    timeout_after_ms: u64,
}

impl Default for LivenessTimer {
    fn default() -> Self {
        Self::new(PING_AFTER_IDLE_INTERVAL_MS, TIMEOUT_AFTER_IDLE_INTERVAL_MS)
    }
}

impl LivenessTimer {
    pub fn new(ping_after_ms: u64, timeout_after_ms: u64) -> Self {
        Self {
            last_activity_ms: None,
            ping_sent: false,
            ping_after_ms,
            timeout_after_ms,
        }
    }

    /// Record inbound traffic at `now_ms`, re-arming the ping
    pub fn traffic(&mut self, now_ms: u64) {
        self.last_activity_ms = Some(now_ms);
        self.ping_sent = false;
    }

    /// Check idle time at `now_ms`
    ///
    /// Timeout wins over ping when both thresholds are exceeded.
    pub fn check(&mut self, now_ms: u64) -> LivenessAction {
        let Some(last) = self.last_activity_ms else {
            return LivenessAction::Idle;
        };

        let idle = now_ms.saturating_sub(last);
        if idle > self.timeout_after_ms {
            self.last_activity_ms = None;
            self.ping_sent = false;
            LivenessAction::Timeout
        } else if idle > self.ping_after_ms && !self.ping_sent {
            self.ping_sent = true;
            LivenessAction::Ping
        } else {
            LivenessAction::Idle
        }
    }

    /// Whether idle time is being tracked
    pub fn is_armed(&self) -> bool {
        self.last_activity_ms.is_some()
    }

    pub fn last_activity(&self) -> Option<u64> {
        self.last_activity_ms
    }

    pub fn ping_sent(&self) -> bool {
        self.ping_sent
    }
}
