//! Control loop engine
//!
//! [`ConsoleLink`] owns every collaborator and runs one fixed-order pass
//! per [`poll`](ConsoleLink::poll):
//!
//! 1. decode both wheels (tilt, then pan) and send motion
//! 2. check the keys and send edges
//! 3. drain inbound bytes; on a datagram boundary handle the datagram
//! 4. run the liveness check
//! 5. render if anything visible changed
//!
//! Nothing in a pass blocks. Waiting for the console is just more passes.

use core::fmt::Write;

use eosbox_hal::{DatagramTransport, MonotonicClock, OutputPin, PinSampler};
use eosbox_protocol::{
    Axis, ConsoleMessage, InboundMessage, WheelMode, HANDSHAKE_REPLY, MAX_DATAGRAM_SIZE,
    MAX_MESSAGE_SIZE,
};
use heapless::{String, Vec};

use crate::config::{PanelConfig, LAST_KEY, NAMESPACE, NEXT_KEY, PING_TOKEN_SUFFIX};
use crate::input::{Button, Encoder};
use crate::session::{Session, SessionEffects};
use crate::traits::DisplaySink;

#[cfg(test)]
mod tests;

/// Encoded outbound packet
type Packet = Vec<u8, MAX_MESSAGE_SIZE>;

/// The panel's side of the console link
pub struct ConsoleLink<B, T, D, L>
where
    B: PinSampler + MonotonicClock,
    T: DatagramTransport,
    D: DisplaySink,
    L: OutputPin,
{
    board: B,
    transport: T,
    display: D,
    indicator: L,
    config: PanelConfig,
    session: Session,
    pan: Encoder,
    tilt: Encoder,
    keys: [Button; 2],
    rx: Vec<u8, MAX_DATAGRAM_SIZE>,
    rx_overflow: bool,
    ping_token: String<32>,
}

impl<B, T, D, L> ConsoleLink<B, T, D, L>
where
    B: PinSampler + MonotonicClock,
    T: DatagramTransport,
    D: DisplaySink,
    L: OutputPin,
{
    /// Create the link, seeding the wheel decoders from the current pin levels
    pub fn new(config: PanelConfig, mut board: B, transport: T, display: D, indicator: L) -> Self {
        let pins = config.pins;
        let pan = Encoder::with_sampler(&mut board, pins.pan_a, pins.pan_b, config.pan.direction);
        let tilt = Encoder::with_sampler(
            &mut board,
            pins.tilt_a,
            pins.tilt_b,
            config.tilt.direction,
        );

        let mut ping_token = String::new();
        let _ = write!(ping_token, "{}{}", config.box_name, PING_TOKEN_SUFFIX);

        Self {
            board,
            transport,
            display,
            indicator,
            session: Session::new(&config),
            pan,
            tilt,
            keys: [
                Button::new(pins.next, NEXT_KEY),
                Button::new(pins.last, LAST_KEY),
            ],
            rx: Vec::new(),
            rx_overflow: false,
            ping_token,
            config,
        }
    }

    /// Announce the panel at power-up
    ///
    /// Sends the handshake reply and the subscription sequence so a console
    /// that is already listening starts reporting, then shows the splash
    /// screen. The session stays Disconnected until the console talks.
    pub fn start(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::info!("announcing {} to console", self.ping_token.as_str());

        self.send_raw(HANDSHAKE_REPLY.as_bytes());
        self.subscribe();
        self.indicator.set_low();
        self.render();
    }

    /// Run one pass of the control loop
    pub fn poll(&mut self) {
        self.poll_wheels();
        self.poll_keys();
        self.poll_inbound();

        let now = self.board.now_ms();
        let effects = self.session.check_liveness(now);
        self.apply(effects);

        if self.session.take_dirty() {
            self.render();
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn indicator(&self) -> &L {
        &self.indicator
    }

    fn poll_wheels(&mut self) {
        let tilt = i32::from(self.tilt.poll(&mut self.board)) * self.config.tilt.scale;
        let pan = i32::from(self.pan.poll(&mut self.board)) * self.config.pan.scale;

        if tilt != 0 {
            self.send_wheel(Axis::Tilt, tilt);
        }
        if pan != 0 {
            self.send_wheel(Axis::Pan, pan);
        }
    }

    fn send_wheel(&mut self, axis: Axis, ticks: i32) {
        let mode = if self.board.read_level(self.config.pins.shift).is_low() {
            WheelMode::Fine
        } else {
            WheelMode::Coarse
        };
        self.send(&ConsoleMessage::Wheel {
            mode,
            axis,
            ticks: ticks as f32,
        });
    }

    fn poll_keys(&mut self) {
        for i in 0..self.keys.len() {
            let level = self.board.read_level(self.keys[i].pin());
            if let Some(edge) = self.keys[i].check(level).edge() {
                let name = self.keys[i].name();
                self.send(&ConsoleMessage::Key { name, edge });
            }
        }
    }

    fn poll_inbound(&mut self) {
        while self.transport.bytes_available() > 0 {
            let Some(byte) = self.transport.read_byte() else {
                break;
            };
            if self.rx.push(byte).is_err() {
                self.rx_overflow = true;
            }
        }

        if !self.transport.is_datagram_complete() {
            return;
        }

        let now = self.board.now_ms();
        if core::mem::take(&mut self.rx_overflow) {
            #[cfg(feature = "defmt")]
            defmt::warn!("inbound datagram over {} bytes dropped", MAX_DATAGRAM_SIZE);
            self.session.on_discarded(now);
        } else {
            let message = InboundMessage::parse(&self.rx, NAMESPACE);
            let effects = self.session.on_datagram(&message, now);
            self.apply(effects);
        }
        self.rx.clear();
    }

    fn apply(&mut self, effects: SessionEffects) {
        if effects.reply_handshake {
            self.send_raw(HANDSHAKE_REPLY.as_bytes());
        }
        if effects.subscribe {
            self.subscribe();
        }
        if effects.ping {
            let packet = encode(&ConsoleMessage::Ping {
                token: &self.ping_token,
            });
            if let Some(packet) = packet {
                self.send_raw(&packet);
            }
        }
        if let Some(on) = effects.indicator {
            self.indicator.set_state(on);
        }
    }

    fn subscribe(&mut self) {
        self.send(&ConsoleMessage::FilterAdd);
        for axis in Axis::ALL {
            self.send(&ConsoleMessage::Subscribe(axis));
        }
    }

    fn render(&mut self) {
        let params = *self.session.params();
        self.display
            .render(self.session.state(), params.pan, params.tilt);
    }

    fn send(&mut self, message: &ConsoleMessage<'_>) {
        if let Some(packet) = encode(message) {
            self.send_raw(&packet);
        }
    }

    fn send_raw(&mut self, payload: &[u8]) {
        if self.transport.send_datagram(payload).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("transport write failed, {} bytes lost", payload.len());
        }
    }
}

fn encode(message: &ConsoleMessage<'_>) -> Option<Packet> {
    match message
        .to_message(NAMESPACE)
        .and_then(|msg| msg.encode_to_vec())
    {
        Ok(packet) => Some(packet),
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("cannot encode {}: {}", message, _e);
            None
        }
    }
}
