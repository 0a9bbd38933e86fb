//! Console Link Protocol
//!
//! This crate defines the wire protocol between the control panel and the
//! lighting console. The console speaks OSC (Open Sound Control) addressed
//! messages; on a serial link every OSC packet travels as one SLIP frame.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌─────┬──────────────────────────────────────────────┬─────┐
//! │ END │ OSC packet (SLIP-escaped)                    │ END │
//! │0xC0 │ address\0… │ ,tags\0… │ arg │ arg │ …        │0xC0 │
//! └─────┴──────────────────────────────────────────────┴─────┘
//! ```
//!
//! One exception: the console opens a session by sending the bare ASCII
//! query `ETCOSC?` inside a frame, which is answered with a bare `OK`.
//!
//! Modules:
//! - [`osc`]: addressed messages with typed arguments, encode and decode
//! - [`pattern`]: address pattern matching and prefix routing
//! - [`slip`]: datagram framing on the byte stream
//! - [`messages`]: the console profile (addresses, handshake, updates)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod messages;
pub mod osc;
pub mod pattern;
pub mod slip;

pub use messages::{
    is_handshake_query, Axis, ConsoleMessage, InboundMessage, KeyEdge, ParamUpdate, WheelMode,
    HANDSHAKE_QUERY, HANDSHAKE_REPLY,
};
pub use osc::{OscArg, OscError, OscMessage, MAX_MESSAGE_SIZE};
pub use pattern::{match_prefix, matches, RouteMatch};
pub use slip::{SlipDecoder, SlipError, END, ESC, ESC_END, ESC_ESC, MAX_DATAGRAM_SIZE};
