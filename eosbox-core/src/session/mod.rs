//! Console session
//!
//! [`Session`] is the single context object for connection status,
//! liveness bookkeeping, cached parameter values and the display dirty
//! flag. Its handlers never touch I/O; they return [`SessionEffects`]
//! telling the control loop what to send.

pub mod events;
pub mod liveness;
pub mod machine;

pub use events::Event;
pub use liveness::{LivenessAction, LivenessTimer};
pub use machine::SessionState;

use eosbox_protocol::{Axis, InboundMessage};

use crate::config::{HandshakePolicy, PanelConfig};

/// Last parameter values reported by the console
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParameterCache {
    pub pan: f32,
    pub tilt: f32,
}

impl ParameterCache {
    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Pan => self.pan,
            Axis::Tilt => self.tilt,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::Pan => self.pan = value,
            Axis::Tilt => self.tilt = value,
        }
    }
}

/// Outbound work requested by a session handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionEffects {
    /// Send the literal handshake reply
    pub reply_handshake: bool,
    /// Send the subscription sequence
    pub subscribe: bool,
    /// Send a liveness ping
    pub ping: bool,
    /// New status indicator level, if it changes
    pub indicator: Option<bool>,
}

/// Session context
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    state: SessionState,
    liveness: LivenessTimer,
    params: ParameterCache,
    dirty: bool,
    policy: HandshakePolicy,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&PanelConfig::default())
    }
}

impl Session {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            state: SessionState::Disconnected,
            liveness: LivenessTimer::new(config.ping_after_idle_ms, config.timeout_after_idle_ms),
            params: ParameterCache::default(),
            dirty: false,
            policy: config.handshake_policy,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn params(&self) -> &ParameterCache {
        &self.params
    }

    pub fn liveness(&self) -> &LivenessTimer {
        &self.liveness
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning whether it was set
    pub fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }

    /// Handle one complete inbound datagram received at `now_ms`
    ///
    /// Every datagram counts as traffic for liveness, including ones that
    /// fail to decode or belong to another namespace.
    pub fn on_datagram(&mut self, message: &InboundMessage, now_ms: u64) -> SessionEffects {
        let mut effects = SessionEffects::default();

        match message {
            InboundMessage::Handshake => {
                let entered = self.apply(Event::HandshakeQuery);
                effects.reply_handshake = true;
                if entered || self.policy == HandshakePolicy::SubscribeOnEveryQuery {
                    effects.subscribe = true;
                    effects.indicator = Some(true);
                    self.dirty = true;
                }
            }
            InboundMessage::Console(update) => {
                if self.apply(Event::ConsoleTraffic) {
                    effects.subscribe = true;
                    effects.indicator = Some(true);
                    self.dirty = true;
                }
                if let Some(update) = update {
                    self.params.set(update.axis, update.value);
                    self.dirty = true;
                }
            }
            InboundMessage::Foreign => {}
            InboundMessage::Malformed(_e) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("dropped malformed datagram: {}", _e);
            }
        }

        self.liveness.traffic(now_ms);
        effects
    }

    /// Record a datagram that was dropped before it could be classified
    pub fn on_discarded(&mut self, now_ms: u64) {
        self.liveness.traffic(now_ms);
    }

    /// Run the liveness check at `now_ms`
    pub fn check_liveness(&mut self, now_ms: u64) -> SessionEffects {
        let mut effects = SessionEffects::default();

        match self.liveness.check(now_ms) {
            LivenessAction::Idle => {}
            LivenessAction::Ping => {
                #[cfg(feature = "defmt")]
                defmt::debug!("console idle, sending ping");
                effects.ping = true;
            }
            LivenessAction::Timeout => {
                #[cfg(feature = "defmt")]
                defmt::info!("console timed out");
                self.apply(Event::LivenessTimeout);
                effects.indicator = Some(false);
                self.dirty = true;
            }
        }

        effects
    }

    /// Apply `event`, returning true if it moved the session into Connected
    fn apply(&mut self, event: Event) -> bool {
        let previous = self.state;
        self.state = previous.transition(event);

        if previous != self.state {
            #[cfg(feature = "defmt")]
            defmt::info!("session {} -> {} on {}", previous, self.state, event);
        }

        !previous.is_connected() && self.state.is_connected()
    }
}
