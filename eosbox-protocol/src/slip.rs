//! SLIP datagram framing (RFC 1055, double-ended)
//!
//! Frame format:
//! - END (1 byte): 0xC0, flushes any line noise
//! - PAYLOAD: datagram bytes, with END sent as ESC ESC_END and ESC as ESC ESC_ESC
//! - END (1 byte): 0xC0, terminates the datagram
//!
//! Back-to-back END bytes produce empty frames, which are skipped.

use heapless::Vec;

/// Frame delimiter
pub const END: u8 = 0xC0;
/// Escape introducer
pub const ESC: u8 = 0xDB;
/// Escaped END
pub const ESC_END: u8 = 0xDC;
/// Escaped ESC
pub const ESC_ESC: u8 = 0xDD;

/// Largest datagram the decoder will reassemble
pub const MAX_DATAGRAM_SIZE: usize = 512;

/// Worst-case encoded size: every byte escaped plus both delimiters
pub const MAX_ENCODED_SIZE: usize = 2 + 2 * MAX_DATAGRAM_SIZE;

/// A reassembled datagram
pub type Datagram = Vec<u8, MAX_DATAGRAM_SIZE>;

/// Errors that can occur during SLIP decoding or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlipError {
    /// ESC followed by something other than ESC_END or ESC_ESC
    InvalidEscape(u8),
    /// Datagram longer than [`MAX_DATAGRAM_SIZE`]
    Overflow,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Encode `payload` as one SLIP frame into `buffer`
///
/// Returns the number of bytes written
pub fn encode(payload: &[u8], buffer: &mut [u8]) -> Result<usize, SlipError> {
    let mut pos = 0;
    let mut put = |bytes: &[u8]| -> Result<(), SlipError> {
        let end = pos + bytes.len();
        buffer
            .get_mut(pos..end)
            .ok_or(SlipError::BufferTooSmall)?
            .copy_from_slice(bytes);
        pos = end;
        Ok(())
    };

    put(&[END])?;
    for &byte in payload {
        let (escaped, len) = escape_byte(byte);
        put(&escaped[..len])?;
    }
    put(&[END])?;

    Ok(pos)
}

/// Encode `payload` as one SLIP frame into a heapless Vec
pub fn encode_to_vec(payload: &[u8]) -> Result<Vec<u8, MAX_ENCODED_SIZE>, SlipError> {
    let mut buffer = [0u8; MAX_ENCODED_SIZE];
    let len = encode(payload, &mut buffer)?;
    let mut vec = Vec::new();
    vec.extend_from_slice(&buffer[..len])
        .map_err(|_| SlipError::BufferTooSmall)?;
    Ok(vec)
}

/// Wire form of a single payload byte
///
/// Returns the bytes and how many of them are used (1 or 2)
pub fn escape_byte(byte: u8) -> ([u8; 2], usize) {
    match byte {
        END => ([ESC, ESC_END], 2),
        ESC => ([ESC, ESC_ESC], 2),
        b => ([b, 0], 1),
    }
}

/// Incremental SLIP decoder
#[derive(Debug, Clone)]
pub struct SlipDecoder {
    state: DecodeState,
    buffer: Datagram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Collecting payload bytes
    Normal,
    /// Got ESC, waiting for ESC_END or ESC_ESC
    Escaped,
    /// Frame is bad, dropping bytes until the next END
    Discarding,
}

impl Default for SlipDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SlipDecoder {
    pub fn new() -> Self {
        Self {
            state: DecodeState::Normal,
            buffer: Vec::new(),
        }
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns `Ok(Some(datagram))` when END closes a non-empty frame,
    /// `Ok(None)` when more bytes are needed, or `Err` once when the
    /// current frame goes bad. A bad frame is discarded up to the next END.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Datagram>, SlipError> {
        if byte == END {
            let state = self.state;
            self.state = DecodeState::Normal;
            if state == DecodeState::Discarding || self.buffer.is_empty() {
                self.buffer.clear();
                return Ok(None);
            }
            // END right after ESC terminates the frame; the stray ESC is dropped
            return Ok(Some(core::mem::take(&mut self.buffer)));
        }

        match self.state {
            DecodeState::Discarding => Ok(None),
            DecodeState::Escaped => {
                let decoded = match byte {
                    ESC_END => END,
                    ESC_ESC => ESC,
                    other => return Err(self.discard(SlipError::InvalidEscape(other))),
                };
                self.state = DecodeState::Normal;
                self.push(decoded)
            }
            DecodeState::Normal => {
                if byte == ESC {
                    self.state = DecodeState::Escaped;
                    Ok(None)
                } else {
                    self.push(byte)
                }
            }
        }
    }

    fn push(&mut self, byte: u8) -> Result<Option<Datagram>, SlipError> {
        match self.buffer.push(byte) {
            Ok(()) => Ok(None),
            Err(_) => Err(self.discard(SlipError::Overflow)),
        }
    }

    fn discard(&mut self, error: SlipError) -> SlipError {
        self.state = DecodeState::Discarding;
        self.buffer.clear();
        error
    }
}
