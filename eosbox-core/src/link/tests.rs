//! End-to-end control loop tests against in-memory collaborators

use std::collections::VecDeque;
use std::string::String as StdString;
use std::vec::Vec as StdVec;

use eosbox_hal::{Level, PinId};
use eosbox_protocol::{OscArg, OscMessage};

use super::*;
use crate::config::{Direction, PanelPins};
use crate::session::SessionState;

struct MockBoard {
    levels: [Level; 32],
    now: u64,
}

impl MockBoard {
    fn new() -> Self {
        Self {
            levels: [Level::High; 32],
            now: 0,
        }
    }

    fn set(&mut self, pin: PinId, level: Level) {
        self.levels[pin.0 as usize] = level;
    }
}

impl PinSampler for MockBoard {
    fn read_level(&mut self, pin: PinId) -> Level {
        self.levels[pin.0 as usize]
    }
}

impl MonotonicClock for MockBoard {
    fn now_ms(&mut self) -> u64 {
        self.now
    }
}

#[derive(Default)]
struct MockTransport {
    inbound: VecDeque<StdVec<u8>>,
    current: Option<(StdVec<u8>, usize)>,
    outbound: Option<StdVec<u8>>,
    sent: StdVec<StdVec<u8>>,
}

impl MockTransport {
    fn queue(&mut self, datagram: &[u8]) {
        self.inbound.push_back(datagram.to_vec());
    }

    fn queue_message(&mut self, message: &OscMessage) {
        let bytes = message.encode_to_vec().unwrap();
        self.queue(&bytes);
    }
}

impl DatagramTransport for MockTransport {
    type Error = ();

    fn send_start(&mut self) -> Result<(), ()> {
        self.outbound = Some(StdVec::new());
        Ok(())
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), ()> {
        self.outbound.as_mut().ok_or(())?.extend_from_slice(buf);
        Ok(())
    }

    fn send_end(&mut self) -> Result<(), ()> {
        let datagram = self.outbound.take().ok_or(())?;
        self.sent.push(datagram);
        Ok(())
    }

    fn bytes_available(&mut self) -> usize {
        if self.current.is_none() {
            self.current = self.inbound.pop_front().map(|d| (d, 0));
        }
        self.current
            .as_ref()
            .map_or(0, |(data, pos)| data.len() - pos)
    }

    fn read_byte(&mut self) -> Option<u8> {
        let (data, pos) = self.current.as_mut()?;
        let byte = data.get(*pos).copied()?;
        *pos += 1;
        Some(byte)
    }

    fn is_datagram_complete(&mut self) -> bool {
        match &self.current {
            Some((data, pos)) if *pos == data.len() => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Default)]
struct MockDisplay {
    renders: StdVec<(SessionState, f32, f32)>,
}

impl DisplaySink for MockDisplay {
    fn render(&mut self, state: SessionState, pan: f32, tilt: f32) {
        self.renders.push((state, pan, tilt));
    }
}

#[derive(Default)]
struct MockLed(bool);

impl OutputPin for MockLed {
    fn set_high(&mut self) {
        self.0 = true;
    }

    fn set_low(&mut self) {
        self.0 = false;
    }

    fn is_set_high(&self) -> bool {
        self.0
    }
}

type TestLink = ConsoleLink<MockBoard, MockTransport, MockDisplay, MockLed>;

fn pins() -> PanelPins {
    PanelConfig::default().pins
}

fn link_with(config: PanelConfig, board: MockBoard) -> TestLink {
    ConsoleLink::new(
        config,
        board,
        MockTransport::default(),
        MockDisplay::default(),
        MockLed::default(),
    )
}

fn link() -> TestLink {
    link_with(PanelConfig::default(), MockBoard::new())
}

/// Sent datagrams as addresses, with the raw handshake reply shown as-is
fn sent_addresses(link: &TestLink) -> StdVec<StdString> {
    link.transport()
        .sent
        .iter()
        .map(|d| match OscMessage::decode(d) {
            Ok(msg) => msg.address().to_string(),
            Err(_) => StdString::from_utf8_lossy(d).into_owned(),
        })
        .collect()
}

fn sent_messages(link: &TestLink) -> StdVec<OscMessage> {
    link.transport()
        .sent
        .iter()
        .filter_map(|d| OscMessage::decode(d).ok())
        .collect()
}

fn clear_sent(link: &mut TestLink) {
    link.transport_mut().sent.clear();
}

fn param(address: &str, value: f32) -> OscMessage {
    OscMessage::new(address)
        .unwrap()
        .with_arg(OscArg::Float(value))
        .unwrap()
}

fn count(addresses: &[StdString], wanted: &str) -> usize {
    addresses.iter().filter(|a| a.as_str() == wanted).count()
}

#[test]
fn test_start_announces_and_shows_splash() {
    let mut link = link();
    link.start();

    assert_eq!(
        sent_addresses(&link),
        [
            "OK",
            "/eos/filter/add",
            "/eos/subscribe/param/pan",
            "/eos/subscribe/param/tilt",
        ]
    );
    assert_eq!(
        link.display().renders,
        [(SessionState::Disconnected, 0.0, 0.0)]
    );
    assert_eq!(link.session().state(), SessionState::Disconnected);
    assert!(!link.indicator().0);
}

#[test]
fn test_idle_poll_does_nothing() {
    let mut link = link();
    for _ in 0..10 {
        link.poll();
    }
    assert!(link.transport().sent.is_empty());
    assert!(link.display().renders.is_empty());
}

#[test]
fn test_handshake_replies_and_connects() {
    let mut link = link();
    link.transport_mut().queue(b"ETCOSC?");
    link.poll();

    assert_eq!(
        sent_addresses(&link),
        [
            "OK",
            "/eos/filter/add",
            "/eos/subscribe/param/pan",
            "/eos/subscribe/param/tilt",
        ]
    );
    assert_eq!(link.session().state(), SessionState::Connected);
    assert!(link.indicator().0);
    assert_eq!(
        link.display().renders,
        [(SessionState::Connected, 0.0, 0.0)]
    );
}

#[test]
fn test_repeated_handshake_subscribes_once() {
    let mut link = link();
    link.transport_mut().queue(b"ETCOSC?");
    link.transport_mut().queue(b"ETCOSC?");
    link.poll();
    link.poll();

    let addresses = sent_addresses(&link);
    assert_eq!(count(&addresses, "OK"), 2);
    assert_eq!(count(&addresses, "/eos/subscribe/param/pan"), 1);
    assert_eq!(count(&addresses, "/eos/filter/add"), 1);
}

#[test]
fn test_every_query_policy_resubscribes() {
    let config = PanelConfig {
        handshake_policy: crate::config::HandshakePolicy::SubscribeOnEveryQuery,
        ..PanelConfig::default()
    };
    let mut link = link_with(config, MockBoard::new());
    link.transport_mut().queue(b"ETCOSC?");
    link.transport_mut().queue(b"ETCOSC?");
    link.poll();
    link.poll();

    assert_eq!(count(&sent_addresses(&link), "/eos/subscribe/param/pan"), 2);
}

#[test]
fn test_filter_add_arguments() {
    let mut link = link();
    link.start();
    let sent = sent_messages(&link);
    let filter = &sent[0];
    assert_eq!(filter.address(), "/eos/filter/add");
    assert_eq!(
        filter.args(),
        &[
            OscArg::string("/eos/out/param/*").unwrap(),
            OscArg::string("/eos/out/ping").unwrap(),
        ]
    );
}

#[test]
fn test_param_update_routes_and_renders() {
    let mut link = link();
    link.transport_mut()
        .queue_message(&param("/eos/out/param/pan", 42.5));
    link.poll();

    assert_eq!(link.session().state(), SessionState::Connected);
    assert_eq!(link.session().params().pan, 42.5);
    assert_eq!(count(&sent_addresses(&link), "/eos/subscribe/param/tilt"), 1);
    assert_eq!(
        link.display().renders,
        [(SessionState::Connected, 42.5, 0.0)]
    );

    clear_sent(&mut link);
    link.transport_mut()
        .queue_message(&param("/eos/out/param/tilt", -10.0));
    link.poll();

    assert!(link.transport().sent.is_empty());
    assert_eq!(
        link.display().renders.last(),
        Some(&(SessionState::Connected, 42.5, -10.0))
    );
}

#[test]
fn test_foreign_message_ignored() {
    let mut link = link();
    link.transport_mut()
        .queue_message(&param("/other/out/param/pan", 1.0));
    link.poll();

    assert_eq!(link.session().state(), SessionState::Disconnected);
    assert!(link.transport().sent.is_empty());
    assert!(link.display().renders.is_empty());
    assert_eq!(link.session().liveness().last_activity(), Some(0));
}

#[test]
fn test_malformed_datagram_dropped_but_counts_as_traffic() {
    let mut link = link();
    link.board_mut().now = 1234;
    link.transport_mut().queue(b"\x01\x02garbage");
    link.poll();

    assert!(link.transport().sent.is_empty());
    assert_eq!(link.session().state(), SessionState::Disconnected);
    assert_eq!(link.session().liveness().last_activity(), Some(1234));
}

#[test]
fn test_oversized_datagram_dropped() {
    let mut link = link();
    let mut big = param("/eos/out/param/pan", 3.0)
        .encode_to_vec()
        .unwrap()
        .to_vec();
    big.resize(MAX_DATAGRAM_SIZE + 100, 0);
    link.board_mut().now = 50;
    link.transport_mut().queue(&big);
    link.poll();

    assert_eq!(link.session().state(), SessionState::Disconnected);
    assert_eq!(link.session().params().pan, 0.0);
    assert_eq!(link.session().liveness().last_activity(), Some(50));

    // The next datagram is handled normally
    link.transport_mut()
        .queue_message(&param("/eos/out/param/pan", 3.0));
    link.poll();
    assert_eq!(link.session().params().pan, 3.0);
}

#[test]
fn test_liveness_ping_and_timeout() {
    let mut link = link();
    link.transport_mut().queue(b"ETCOSC?");
    link.poll();
    assert_eq!(link.session().liveness().last_activity(), Some(0));
    clear_sent(&mut link);

    link.board_mut().now = 2600;
    link.poll();
    let pings = sent_messages(&link);
    assert_eq!(pings.len(), 1);
    assert_eq!(pings[0].address(), "/eos/ping");
    assert_eq!(pings[0].arg(0).and_then(OscArg::as_str), Some("box1_hello"));

    link.board_mut().now = 2700;
    link.poll();
    assert_eq!(link.transport().sent.len(), 1);
    assert_eq!(link.session().state(), SessionState::Connected);

    link.board_mut().now = 5100;
    link.poll();
    assert_eq!(link.transport().sent.len(), 1);
    assert_eq!(link.session().state(), SessionState::Disconnected);
    assert_eq!(link.session().liveness().last_activity(), None);
    assert!(!link.indicator().0);
    assert_eq!(
        link.display().renders.last(),
        Some(&(SessionState::Disconnected, 0.0, 0.0))
    );

    // Tracking stays off until traffic resumes
    link.board_mut().now = 20_000;
    link.poll();
    assert_eq!(link.transport().sent.len(), 1);
}

#[test]
fn test_traffic_rearms_ping() {
    let mut link = link();
    link.transport_mut().queue(b"ETCOSC?");
    link.poll();

    link.board_mut().now = 3000;
    link.poll();
    link.transport_mut()
        .queue_message(&param("/eos/out/param/pan", 1.0));
    link.board_mut().now = 3100;
    link.poll();
    clear_sent(&mut link);

    link.board_mut().now = 5700;
    link.poll();
    assert_eq!(sent_addresses(&link), ["/eos/ping"]);
    assert_eq!(link.session().state(), SessionState::Connected);
}

#[test]
fn test_wheel_step_forwards_scaled_ticks() {
    for (scale, expected) in [(1, 1.0f32), (3, 3.0)] {
        let mut config = PanelConfig::default();
        config.pan.scale = scale;

        // A high, B low: the next A edge decodes to +1
        let mut board = MockBoard::new();
        board.set(pins().pan_b, Level::Low);
        let mut link = link_with(config, board);

        link.board_mut().set(pins().pan_a, Level::Low);
        link.poll();

        let sent = sent_messages(&link);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].address(), "/eos/wheel/coarse/pan");
        assert_eq!(sent[0].args(), &[OscArg::Float(expected)]);
    }
}

#[test]
fn test_reverse_wheel_flips_sign() {
    let mut config = PanelConfig::default();
    config.tilt.direction = Direction::Reverse;
    let mut link = link_with(config, MockBoard::new());

    // A high, B high: the next A edge decodes to -1, reversed to +1
    link.board_mut().set(pins().tilt_a, Level::Low);
    link.poll();

    let sent = sent_messages(&link);
    assert_eq!(sent[0].address(), "/eos/wheel/coarse/tilt");
    assert_eq!(sent[0].args(), &[OscArg::Float(1.0)]);
}

#[test]
fn test_shift_selects_fine_mode() {
    let mut link = link();
    link.board_mut().set(pins().shift, Level::Low);
    link.board_mut().set(pins().pan_a, Level::Low);
    link.poll();

    assert_eq!(sent_addresses(&link), ["/eos/wheel/fine/pan"]);
}

#[test]
fn test_phase_b_only_motion_is_silent() {
    let mut link = link();
    link.board_mut().set(pins().pan_b, Level::Low);
    link.poll();
    assert!(link.transport().sent.is_empty());
}

#[test]
fn test_keys_send_edges() {
    let mut link = link();
    let next = pins().next;

    link.board_mut().set(next, Level::Low);
    link.poll();
    link.poll();
    link.board_mut().set(next, Level::High);
    link.poll();

    let sent = sent_messages(&link);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].address(), "/eos/key/NEXT");
    assert_eq!(sent[0].args(), &[OscArg::Int(1)]);
    assert_eq!(sent[1].address(), "/eos/key/NEXT");
    assert_eq!(sent[1].args(), &[OscArg::Int(0)]);
}

#[test]
fn test_cycle_order_tilt_pan_keys_inbound() {
    let mut link = link();
    link.board_mut().set(pins().pan_a, Level::Low);
    link.board_mut().set(pins().tilt_a, Level::Low);
    link.board_mut().set(pins().last, Level::Low);
    link.transport_mut().queue(b"ETCOSC?");
    link.poll();

    let addresses = sent_addresses(&link);
    assert_eq!(
        &addresses[..4],
        [
            "/eos/wheel/coarse/tilt",
            "/eos/wheel/coarse/pan",
            "/eos/key/LAST",
            "OK",
        ]
    );
}

#[test]
fn test_custom_box_name_in_ping() {
    let config = PanelConfig {
        box_name: crate::config::label("stage-left"),
        ..PanelConfig::default()
    };
    let mut link = link_with(config, MockBoard::new());
    link.transport_mut().queue(b"ETCOSC?");
    link.poll();
    clear_sent(&mut link);

    link.board_mut().now = 3000;
    link.poll();
    let sent = sent_messages(&link);
    assert_eq!(
        sent[0].arg(0).and_then(OscArg::as_str),
        Some("stage-left_hello")
    );
}
