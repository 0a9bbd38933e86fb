//! Panel configuration compiled in from panel.toml

use eosbox_core::config::{label, Direction, HandshakePolicy, PanelConfig, WheelConfig};

mod generated {
    include!(concat!(env!("OUT_DIR"), "/panel_config.rs"));
}

use generated::*;

/// Build the runtime configuration from the validated build-time values
pub fn panel_config() -> PanelConfig {
    PanelConfig {
        pan: WheelConfig {
            direction: direction(PAN_REVERSE),
            scale: PAN_SCALE,
        },
        tilt: WheelConfig {
            direction: direction(TILT_REVERSE),
            scale: TILT_SCALE,
        },
        ping_after_idle_ms: PING_AFTER_IDLE_MS,
        timeout_after_idle_ms: TIMEOUT_AFTER_IDLE_MS,
        box_name: label(BOX_NAME),
        handshake_policy: if HANDSHAKE_EVERY_QUERY {
            HandshakePolicy::SubscribeOnEveryQuery
        } else {
            HandshakePolicy::SubscribeOnTransition
        },
        ..PanelConfig::default()
    }
}

fn direction(reverse: bool) -> Direction {
    if reverse {
        Direction::Reverse
    } else {
        Direction::Forward
    }
}
