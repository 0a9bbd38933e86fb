//! Console message profile
//!
//! Everything the panel sends and understands, expressed over
//! [`OscMessage`]. Addresses are built under a namespace root
//! (`/eos` on a stock console):
//!
//! | Direction | Address | Arguments |
//! |---|---|---|
//! | out | `<ns>/filter/add` | `s` patterns the panel wants to hear |
//! | out | `<ns>/subscribe/param/{pan,tilt}` | `i` 1 |
//! | out | `<ns>/wheel/{coarse,fine}/{pan,tilt}` | `f` ticks |
//! | out | `<ns>/key/<NAME>` | `i` 1 down, 0 up |
//! | out | `<ns>/ping` | `s` sender token |
//! | in | `<ns>/out/param/{pan,tilt}` | `f` (or `i`) value |
//!
//! The handshake is not an OSC packet: the console sends the bare query
//! string and expects the bare reply string back.

use core::fmt::Write;

use heapless::String;

use crate::osc::{OscArg, OscError, OscMessage, MAX_ADDRESS_LEN, MAX_STRING_LEN};

/// Literal query the console sends to open a session
pub const HANDSHAKE_QUERY: &str = "ETCOSC?";

/// Literal reply to [`HANDSHAKE_QUERY`]
pub const HANDSHAKE_REPLY: &str = "OK";

/// Argument value for a subscribe request
const SUBSCRIBE: i32 = 1;

/// Whether a raw datagram carries the handshake query anywhere inside it
pub fn is_handshake_query(datagram: &[u8]) -> bool {
    let query = HANDSHAKE_QUERY.as_bytes();
    datagram.windows(query.len()).any(|w| w == query)
}

/// Console parameter driven by a wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    Pan,
    Tilt,
}

impl Axis {
    /// All tracked parameters, in subscription order
    pub const ALL: [Axis; 2] = [Axis::Pan, Axis::Tilt];

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Pan => "pan",
            Axis::Tilt => "tilt",
        }
    }

    /// Path of the console's value report, relative to the namespace
    pub fn report_path(self) -> &'static str {
        match self {
            Axis::Pan => "/out/param/pan",
            Axis::Tilt => "/out/param/tilt",
        }
    }
}

/// Wheel resolution requested from the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WheelMode {
    Coarse,
    Fine,
}

impl WheelMode {
    pub fn as_str(self) -> &'static str {
        match self {
            WheelMode::Coarse => "coarse",
            WheelMode::Fine => "fine",
        }
    }
}

/// Key edge reported to the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(i32)]
pub enum KeyEdge {
    Up = 0,
    Down = 1,
}

/// Outbound request to the console
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleMessage<'a> {
    /// Ask the console to forward parameter reports and pings
    FilterAdd,
    /// Subscribe to value reports for one parameter
    Subscribe(Axis),
    /// Wheel motion in ticks (sign is direction)
    Wheel { mode: WheelMode, axis: Axis, ticks: f32 },
    /// Key press or release by logical key name
    Key { name: &'a str, edge: KeyEdge },
    /// Liveness probe tagged with a sender token
    Ping { token: &'a str },
}

impl ConsoleMessage<'_> {
    /// Build the addressed message under `namespace`
    pub fn to_message(&self, namespace: &str) -> Result<OscMessage, OscError> {
        let mut addr: String<MAX_ADDRESS_LEN> = String::new();
        let built = match self {
            ConsoleMessage::FilterAdd => write!(addr, "{}/filter/add", namespace),
            ConsoleMessage::Subscribe(axis) => {
                write!(addr, "{}/subscribe/param/{}", namespace, axis.as_str())
            }
            ConsoleMessage::Wheel { mode, axis, .. } => write!(
                addr,
                "{}/wheel/{}/{}",
                namespace,
                mode.as_str(),
                axis.as_str()
            ),
            ConsoleMessage::Key { name, .. } => write!(addr, "{}/key/{}", namespace, name),
            ConsoleMessage::Ping { .. } => write!(addr, "{}/ping", namespace),
        };
        built.map_err(|_| OscError::AddressTooLong)?;

        let msg = OscMessage::new(&addr)?;
        match *self {
            ConsoleMessage::FilterAdd => {
                let mut params: String<MAX_STRING_LEN> = String::new();
                write!(params, "{}/out/param/*", namespace).map_err(|_| OscError::StringTooLong)?;
                let mut ping: String<MAX_STRING_LEN> = String::new();
                write!(ping, "{}/out/ping", namespace).map_err(|_| OscError::StringTooLong)?;
                msg.with_arg(OscArg::Str(params))?
                    .with_arg(OscArg::Str(ping))
            }
            ConsoleMessage::Subscribe(_) => msg.with_arg(OscArg::Int(SUBSCRIBE)),
            ConsoleMessage::Wheel { ticks, .. } => msg.with_arg(OscArg::Float(ticks)),
            ConsoleMessage::Key { edge, .. } => msg.with_arg(OscArg::Int(edge as i32)),
            ConsoleMessage::Ping { token } => msg.with_arg(OscArg::string(token)?),
        }
    }
}

/// New value for a tracked parameter, reported by the console
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParamUpdate {
    pub axis: Axis,
    pub value: f32,
}

/// Classification of one inbound datagram
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InboundMessage {
    /// The bare handshake query
    Handshake,
    /// A message routed to the console namespace, with the parameter
    /// update it carried if any
    Console(Option<ParamUpdate>),
    /// A well-formed message outside the console namespace
    Foreign,
    /// Bytes that are neither the handshake nor a valid message
    Malformed(OscError),
}

impl InboundMessage {
    /// Classify a complete datagram
    ///
    /// The handshake check runs on the raw bytes before any decode.
    pub fn parse(datagram: &[u8], namespace: &str) -> Self {
        if is_handshake_query(datagram) {
            return InboundMessage::Handshake;
        }

        let msg = match OscMessage::decode(datagram) {
            Ok(msg) => msg,
            Err(e) => return InboundMessage::Malformed(e),
        };

        let Some(ns) = msg.match_at(namespace, 0) else {
            return InboundMessage::Foreign;
        };

        let update = Axis::ALL.into_iter().find_map(|axis| {
            msg.match_at(axis.report_path(), ns.offset)?;
            let value = msg.arg(0)?.as_f32()?;
            Some(ParamUpdate { axis, value })
        });

        InboundMessage::Console(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(msg: &OscMessage) -> heapless::Vec<u8, { crate::osc::MAX_MESSAGE_SIZE }> {
        msg.encode_to_vec().unwrap()
    }

    #[test]
    fn test_handshake_substring_match() {
        assert!(is_handshake_query(b"ETCOSC?"));
        assert!(is_handshake_query(b"xxETCOSC?\0"));
        assert!(!is_handshake_query(b"ETCOSC"));
        assert!(!is_handshake_query(b""));
    }

    #[test]
    fn test_filter_add() {
        let msg = ConsoleMessage::FilterAdd.to_message("/eos").unwrap();
        assert_eq!(msg.address(), "/eos/filter/add");
        assert_eq!(msg.arg(0).and_then(OscArg::as_str), Some("/eos/out/param/*"));
        assert_eq!(msg.arg(1).and_then(OscArg::as_str), Some("/eos/out/ping"));
    }

    #[test]
    fn test_subscribe() {
        let msg = ConsoleMessage::Subscribe(Axis::Tilt).to_message("/eos").unwrap();
        assert_eq!(msg.address(), "/eos/subscribe/param/tilt");
        assert_eq!(msg.args(), &[OscArg::Int(1)]);
    }

    #[test]
    fn test_wheel() {
        let msg = ConsoleMessage::Wheel {
            mode: WheelMode::Fine,
            axis: Axis::Pan,
            ticks: -3.0,
        }
        .to_message("/eos")
        .unwrap();
        assert_eq!(msg.address(), "/eos/wheel/fine/pan");
        assert_eq!(msg.args(), &[OscArg::Float(-3.0)]);
    }

    #[test]
    fn test_key_edges() {
        let down = ConsoleMessage::Key {
            name: "NEXT",
            edge: KeyEdge::Down,
        }
        .to_message("/eos")
        .unwrap();
        assert_eq!(down.address(), "/eos/key/NEXT");
        assert_eq!(down.args(), &[OscArg::Int(1)]);

        let up = ConsoleMessage::Key {
            name: "LAST",
            edge: KeyEdge::Up,
        }
        .to_message("/eos")
        .unwrap();
        assert_eq!(up.address(), "/eos/key/LAST");
        assert_eq!(up.args(), &[OscArg::Int(0)]);
    }

    #[test]
    fn test_ping() {
        let msg = ConsoleMessage::Ping { token: "box1_hello" }
            .to_message("/eos")
            .unwrap();
        assert_eq!(msg.address(), "/eos/ping");
        assert_eq!(msg.arg(0).and_then(OscArg::as_str), Some("box1_hello"));
    }

    #[test]
    fn test_key_name_too_long() {
        let name = "K".repeat(MAX_ADDRESS_LEN);
        let result = ConsoleMessage::Key {
            name: &name,
            edge: KeyEdge::Down,
        }
        .to_message("/eos");
        assert_eq!(result, Err(OscError::AddressTooLong));
    }

    #[test]
    fn test_parse_handshake() {
        assert_eq!(
            InboundMessage::parse(b"ETCOSC?", "/eos"),
            InboundMessage::Handshake
        );
    }

    #[test]
    fn test_parse_pan_update() {
        let msg = OscMessage::new("/eos/out/param/pan")
            .unwrap()
            .with_arg(OscArg::Float(12.25))
            .unwrap();
        assert_eq!(
            InboundMessage::parse(&encoded(&msg), "/eos"),
            InboundMessage::Console(Some(ParamUpdate {
                axis: Axis::Pan,
                value: 12.25
            }))
        );
    }

    #[test]
    fn test_parse_tilt_int_update() {
        let msg = OscMessage::new("/eos/out/param/tilt")
            .unwrap()
            .with_arg(OscArg::Int(-45))
            .unwrap();
        assert_eq!(
            InboundMessage::parse(&encoded(&msg), "/eos"),
            InboundMessage::Console(Some(ParamUpdate {
                axis: Axis::Tilt,
                value: -45.0
            }))
        );
    }

    #[test]
    fn test_parse_update_without_argument() {
        let msg = OscMessage::new("/eos/out/param/pan").unwrap();
        assert_eq!(
            InboundMessage::parse(&encoded(&msg), "/eos"),
            InboundMessage::Console(None)
        );
    }

    #[test]
    fn test_parse_other_console_message() {
        let msg = OscMessage::new("/eos/out/ping").unwrap();
        assert_eq!(
            InboundMessage::parse(&encoded(&msg), "/eos"),
            InboundMessage::Console(None)
        );
    }

    #[test]
    fn test_parse_foreign() {
        let msg = OscMessage::new("/cobalt/out/param/pan")
            .unwrap()
            .with_arg(OscArg::Float(1.0))
            .unwrap();
        assert_eq!(
            InboundMessage::parse(&encoded(&msg), "/eos"),
            InboundMessage::Foreign
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            InboundMessage::parse(b"garbage", "/eos"),
            InboundMessage::Malformed(_)
        ));
    }
}
