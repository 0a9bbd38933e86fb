//! Datagram transport abstraction
//!
//! The console link runs over a byte stream that a framing layer cuts
//! into datagrams (SLIP on the serial port). This trait is the boundary
//! between that framing layer and the panel logic: the logic writes one
//! datagram at a time and reads decoded payload bytes until the framing
//! layer reports a datagram boundary.

/// Framed, non-blocking datagram link
///
/// Sending is bracketed: [`send_start`](Self::send_start), any number of
/// [`write_bytes`](Self::write_bytes), then [`send_end`](Self::send_end),
/// which must frame and flush the datagram before returning. Datagrams
/// are never interleaved.
///
/// Receiving never blocks: [`bytes_available`](Self::bytes_available)
/// only reports what the transport already holds.
pub trait DatagramTransport {
    /// Error type for send operations
    type Error;

    /// Begin an outbound datagram
    fn send_start(&mut self) -> Result<(), Self::Error>;

    /// Append payload bytes to the outbound datagram
    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), Self::Error>;

    /// Finish the outbound datagram and flush it to the wire
    fn send_end(&mut self) -> Result<(), Self::Error>;

    /// Number of decoded payload bytes ready to read
    fn bytes_available(&mut self) -> usize;

    /// Read one decoded payload byte, if any is ready
    fn read_byte(&mut self) -> Option<u8>;

    /// Whether the inbound datagram boundary has been reached
    ///
    /// Returns `true` once per datagram, after all of its bytes have been
    /// read. The next call starts tracking the following datagram.
    fn is_datagram_complete(&mut self) -> bool;

    /// Send a complete datagram in one call
    ///
    /// The datagram is always closed once started, even if writing the
    /// payload fails, so the peer never sees it run into the next one.
    /// The first error is returned.
    fn send_datagram(&mut self, payload: &[u8]) -> Result<(), Self::Error> {
        self.send_start()?;
        let written = self.write_bytes(payload);
        let ended = self.send_end();
        written.and(ended)
    }
}
