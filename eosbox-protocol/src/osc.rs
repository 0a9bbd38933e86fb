//! OSC addressed messages
//!
//! Packet layout (all fields padded with NULs to a multiple of 4 bytes):
//! - ADDRESS: NUL-terminated ASCII path, e.g. `/eos/wheel/coarse/pan`
//! - TYPE TAGS: NUL-terminated string starting with `,`, one tag per argument
//! - ARGUMENTS: big-endian binary data in tag order
//!
//! Supported tags:
//! - `i`: int32, 4 bytes
//! - `f`: float32, 4 bytes
//! - `s`: string, NUL-terminated and padded
//! - `T` / `F`: boolean, no data bytes

use heapless::{String, Vec};

/// Maximum address length in bytes
pub const MAX_ADDRESS_LEN: usize = 64;

/// Maximum length of a string argument
pub const MAX_STRING_LEN: usize = 48;

/// Maximum number of arguments carried by one message
pub const MAX_ARGS: usize = 8;

/// Maximum encoded size of a message
pub const MAX_MESSAGE_SIZE: usize = 512;

/// Errors from building, encoding or decoding a message
///
/// Every decode error means the same thing to the link: the datagram
/// was not a well-formed addressed message and gets dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OscError {
    /// Address is empty or does not start with `/`
    InvalidAddress,
    /// Address exceeds [`MAX_ADDRESS_LEN`]
    AddressTooLong,
    /// String argument exceeds [`MAX_STRING_LEN`]
    StringTooLong,
    /// More than [`MAX_ARGS`] arguments
    TooManyArguments,
    /// String field without a NUL terminator
    UnterminatedString,
    /// String field is not valid UTF-8
    InvalidString,
    /// Type tag string does not start with `,`
    InvalidTypeTags,
    /// Type tag this codec does not understand
    UnknownTypeTag(u8),
    /// Packet ends in the middle of a field
    Truncated,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A typed message argument
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OscArg {
    Int(i32),
    Float(f32),
    Str(String<MAX_STRING_LEN>),
    Bool(bool),
}

impl OscArg {
    /// Build a string argument
    pub fn string(value: &str) -> Result<Self, OscError> {
        let mut s = String::new();
        s.push_str(value).map_err(|_| OscError::StringTooLong)?;
        Ok(OscArg::Str(s))
    }

    /// Type tag character for this argument
    pub fn tag(&self) -> u8 {
        match self {
            OscArg::Int(_) => b'i',
            OscArg::Float(_) => b'f',
            OscArg::Str(_) => b's',
            OscArg::Bool(true) => b'T',
            OscArg::Bool(false) => b'F',
        }
    }

    /// Numeric value as a float (ints are widened)
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            OscArg::Float(v) => Some(*v),
            OscArg::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            OscArg::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OscArg::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Number of data bytes this argument occupies in a packet
    fn encoded_len(&self) -> usize {
        match self {
            OscArg::Int(_) | OscArg::Float(_) => 4,
            OscArg::Str(s) => padded_len(s.len()),
            OscArg::Bool(_) => 0,
        }
    }
}

/// An addressed message: a path plus an ordered list of typed arguments
///
/// Immutable once built; construct with [`OscMessage::new`] and
/// [`OscMessage::with_arg`], or parse one with [`OscMessage::decode`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OscMessage {
    address: String<MAX_ADDRESS_LEN>,
    args: Vec<OscArg, MAX_ARGS>,
}

impl OscMessage {
    /// Create a message with no arguments
    pub fn new(address: &str) -> Result<Self, OscError> {
        if !address.starts_with('/') {
            return Err(OscError::InvalidAddress);
        }
        let mut addr = String::new();
        addr.push_str(address)
            .map_err(|_| OscError::AddressTooLong)?;
        Ok(Self {
            address: addr,
            args: Vec::new(),
        })
    }

    /// Append an argument, returning the extended message
    pub fn with_arg(mut self, arg: OscArg) -> Result<Self, OscError> {
        self.args
            .push(arg)
            .map_err(|_| OscError::TooManyArguments)?;
        Ok(self)
    }

    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    pub fn args(&self) -> &[OscArg] {
        &self.args
    }

    /// Argument at `index`, if present
    pub fn arg(&self, index: usize) -> Option<&OscArg> {
        self.args.get(index)
    }

    /// Size of the encoded packet in bytes
    pub fn encoded_len(&self) -> usize {
        padded_len(self.address.len())
            + padded_len(1 + self.args.len())
            + self.args.iter().map(OscArg::encoded_len).sum::<usize>()
    }

    /// Encode this message into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, OscError> {
        let total = self.encoded_len();
        if buffer.len() < total {
            return Err(OscError::BufferTooSmall);
        }

        let mut pos = write_padded(buffer, 0, self.address.as_bytes());

        let mut tags: Vec<u8, { MAX_ARGS + 1 }> = Vec::new();
        let _ = tags.push(b',');
        for arg in &self.args {
            let _ = tags.push(arg.tag());
        }
        pos = write_padded(buffer, pos, &tags);

        for arg in &self.args {
            match arg {
                OscArg::Int(v) => {
                    buffer[pos..pos + 4].copy_from_slice(&v.to_be_bytes());
                    pos += 4;
                }
                OscArg::Float(v) => {
                    buffer[pos..pos + 4].copy_from_slice(&v.to_bits().to_be_bytes());
                    pos += 4;
                }
                OscArg::Str(s) => {
                    pos = write_padded(buffer, pos, s.as_bytes());
                }
                OscArg::Bool(_) => {}
            }
        }

        Ok(pos)
    }

    /// Encode this message into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_MESSAGE_SIZE>, OscError> {
        let mut buffer = [0u8; MAX_MESSAGE_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| OscError::BufferTooSmall)?;
        Ok(vec)
    }

    /// Parse a message from a complete packet
    ///
    /// A packet that ends right after the address (no type tag string)
    /// is accepted as a message without arguments.
    pub fn decode(bytes: &[u8]) -> Result<Self, OscError> {
        let (address, mut pos) = read_padded_str(bytes, 0)?;
        let mut message = Self::new(address)?;

        if pos >= bytes.len() {
            return Ok(message);
        }

        let (tags, next) = read_padded_str(bytes, pos)?;
        pos = next;
        let tags = tags
            .strip_prefix(',')
            .ok_or(OscError::InvalidTypeTags)?;

        for tag in tags.bytes() {
            let arg = match tag {
                b'i' => OscArg::Int(i32::from_be_bytes(read_word(bytes, &mut pos)?)),
                b'f' => OscArg::Float(f32::from_bits(u32::from_be_bytes(read_word(
                    bytes, &mut pos,
                )?))),
                b's' => {
                    let (s, next) = read_padded_str(bytes, pos)?;
                    pos = next;
                    OscArg::string(s)?
                }
                b'T' => OscArg::Bool(true),
                b'F' => OscArg::Bool(false),
                other => return Err(OscError::UnknownTypeTag(other)),
            };
            message
                .args
                .push(arg)
                .map_err(|_| OscError::TooManyArguments)?;
        }

        Ok(message)
    }

    /// Match `pattern` against the address starting at `offset`
    ///
    /// See [`crate::pattern::match_prefix`] for the matching rules.
    pub fn match_at(&self, pattern: &str, offset: usize) -> Option<crate::pattern::RouteMatch<'_>> {
        crate::pattern::match_prefix(self.address(), offset, pattern)
    }

    /// Dispatch to `handler` if `pattern` matches at `offset`
    ///
    /// The handler receives this message and the address offset just past
    /// the matched part, so it can keep routing on the remainder. Returns
    /// whether the pattern matched.
    pub fn route<F>(&self, pattern: &str, offset: usize, handler: F) -> bool
    where
        F: FnOnce(&Self, usize),
    {
        match self.match_at(pattern, offset) {
            Some(m) => {
                handler(self, m.offset);
                true
            }
            None => false,
        }
    }
}

/// Length of a NUL-terminated string field padded to 4 bytes
const fn padded_len(len: usize) -> usize {
    (len + 4) & !3
}

/// Write `data` plus NUL padding at `pos`, returning the next position
///
/// The caller has already checked the buffer is large enough.
fn write_padded(buffer: &mut [u8], pos: usize, data: &[u8]) -> usize {
    let end = pos + padded_len(data.len());
    buffer[pos..pos + data.len()].copy_from_slice(data);
    buffer[pos + data.len()..end].fill(0);
    end
}

fn read_padded_str(bytes: &[u8], pos: usize) -> Result<(&str, usize), OscError> {
    let rest = bytes.get(pos..).ok_or(OscError::Truncated)?;
    let len = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or(OscError::UnterminatedString)?;
    let s = core::str::from_utf8(&rest[..len]).map_err(|_| OscError::InvalidString)?;
    let next = pos + padded_len(len);
    if next > bytes.len() {
        return Err(OscError::Truncated);
    }
    Ok((s, next))
}

fn read_word(bytes: &[u8], pos: &mut usize) -> Result<[u8; 4], OscError> {
    let word = bytes
        .get(*pos..*pos + 4)
        .ok_or(OscError::Truncated)?;
    *pos += 4;
    Ok([word[0], word[1], word[2], word[3]])
}
