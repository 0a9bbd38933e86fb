//! SLIP-framed serial transport
//!
//! Wraps any non-blocking byte port and presents it as a
//! [`DatagramTransport`]. Inbound bytes are run through a [`SlipDecoder`]
//! until one datagram is complete; that datagram is then handed out byte
//! by byte before the next one is decoded.

use eosbox_hal::DatagramTransport;
use eosbox_protocol::slip::{self, escape_byte, Datagram, SlipDecoder, END};
use embedded_io::{Read, ReadReady, Write};

/// Datagram transport over a SLIP-encoded byte stream
pub struct SlipSerial<P> {
    port: P,
    decoder: SlipDecoder,
    /// Fully decoded datagram being read out
    pending: Option<Datagram>,
    cursor: usize,
}

impl<P> SlipSerial<P>
where
    P: Read + ReadReady + Write,
{
    pub fn new(port: P) -> Self {
        Self {
            port,
            decoder: SlipDecoder::new(),
            pending: None,
            cursor: 0,
        }
    }

    /// Release the underlying port
    pub fn free(self) -> P {
        self.port
    }

    /// Decode buffered port bytes until a datagram is pending
    ///
    /// A frame the decoder rejects still marks a datagram boundary: it is
    /// handed out empty so the link sees the traffic and drops it as
    /// malformed.
    fn fill(&mut self) {
        let mut byte = [0u8; 1];
        while self.pending.is_none() {
            match self.port.read_ready() {
                Ok(true) => {}
                _ => return,
            }
            match self.port.read(&mut byte) {
                Ok(1) => {}
                _ => return,
            }

            match self.decoder.feed(byte[0]) {
                Ok(Some(datagram)) => self.pending = Some(datagram),
                Ok(None) => {}
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("slip frame dropped: {}", _e);
                    self.pending = Some(Datagram::new());
                }
            }
            self.cursor = 0;
        }
    }
}

impl<P> DatagramTransport for SlipSerial<P>
where
    P: Read + ReadReady + Write,
{
    type Error = P::Error;

    fn send_start(&mut self) -> Result<(), Self::Error> {
        self.port.write_all(&[END])
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        for &b in buf {
            let (escaped, len) = escape_byte(b);
            self.port.write_all(&escaped[..len])?;
        }
        Ok(())
    }

    fn send_end(&mut self) -> Result<(), Self::Error> {
        self.port.write_all(&[END])?;
        self.port.flush()
    }

    /// Encode the whole frame up front and hand it to the port in one
    /// write. Payloads too large for the frame buffer are streamed.
    fn send_datagram(&mut self, payload: &[u8]) -> Result<(), Self::Error> {
        let Ok(frame) = slip::encode_to_vec(payload) else {
            self.send_start()?;
            let written = self.write_bytes(payload);
            let ended = self.send_end();
            return written.and(ended);
        };
        self.port.write_all(&frame)?;
        self.port.flush()
    }

    fn bytes_available(&mut self) -> usize {
        self.fill();
        self.pending
            .as_ref()
            .map_or(0, |d| d.len().saturating_sub(self.cursor))
    }

    fn read_byte(&mut self) -> Option<u8> {
        let byte = self.pending.as_ref()?.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(byte)
    }

    fn is_datagram_complete(&mut self) -> bool {
        self.fill();
        match &self.pending {
            Some(d) if self.cursor >= d.len() => {
                self.pending = None;
                self.cursor = 0;
                true
            }
            _ => false,
        }
    }
}
