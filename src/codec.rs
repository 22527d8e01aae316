//! Stateless encode/decode of scalar values.
//!
//! All fixed-width values are big-endian. Two variable-length encodings sit on
//! top of them:
//!
//! * compact integer: `[0, 254]` in one byte, anything else as the sentinel
//!   byte `255` followed by a 4-byte signed integer;
//! * string: a 2-byte length prefix (`0xFFFF` marks null) followed by the UTF-8 bytes.

use crate::error::{Error, Result};

/// Leading byte announcing that a full 4-byte integer follows.
pub const COMPACT_SENTINEL: u8 = 0xFF;

/// Widest compact encoding: sentinel plus a 4-byte integer.
pub const COMPACT_MAX_LEN: usize = 5;

/// Length prefix reserved for a null string.
pub const NULL_STRING: u16 = 0xFFFF;

/// Largest UTF-8 byte length a length-prefixed string may carry.
pub const MAX_STRING_LEN: usize = NULL_STRING as usize - 1;

/// Width of the widest fixed-width primitive. Work buffers must hold at least this many bytes.
pub const MAX_PRIMITIVE_WIDTH: usize = 8;

/// A fixed-width scalar with a big-endian wire representation.
pub trait FixedWidth: Copy {
    /// Encoded size in bytes.
    const WIDTH: usize;

    /// Writes `self` into `out[..Self::WIDTH]`.
    fn put(self, out: &mut [u8]);

    /// Reads a value from `src[..Self::WIDTH]`.
    fn get(src: &[u8]) -> Self;
}

macro_rules! fixed_width {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FixedWidth for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn put(self, out: &mut [u8]) {
                    out[..Self::WIDTH].copy_from_slice(&self.to_be_bytes());
                }

                #[inline]
                fn get(src: &[u8]) -> Self {
                    let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                    bytes.copy_from_slice(&src[..Self::WIDTH]);
                    <$ty>::from_be_bytes(bytes)
                }
            }
        )*
    };
}

fixed_width!(i8, u8, i16, u16, i32, u32, i64, f32, f64);

impl FixedWidth for bool {
    const WIDTH: usize = 1;

    #[inline]
    fn put(self, out: &mut [u8]) {
        out[0] = self as u8;
    }

    #[inline]
    fn get(src: &[u8]) -> Self {
        src[0] != 0
    }
}

/// Number of bytes `value` occupies as a compact integer.
#[inline]
pub fn compact_len(value: i32) -> usize {
    if (0..COMPACT_SENTINEL as i32).contains(&value) {
        1
    } else {
        COMPACT_MAX_LEN
    }
}

/// Encodes `value` as a compact integer into `out`, returning the number of bytes used.
pub fn encode_compact(value: i32, out: &mut [u8; COMPACT_MAX_LEN]) -> usize {
    if compact_len(value) == 1 {
        out[0] = value as u8;
        1
    } else {
        out[0] = COMPACT_SENTINEL;
        value.put(&mut out[1..]);
        COMPACT_MAX_LEN
    }
}

/// Decodes a compact integer from the front of `src`.
///
/// Returns the value and the number of bytes consumed, or `None` when `src`
/// is too short to hold the complete encoding.
pub fn decode_compact(src: &[u8]) -> Option<(i32, usize)> {
    match src.first() {
        None => None,
        Some(&COMPACT_SENTINEL) if src.len() < COMPACT_MAX_LEN => None,
        Some(&COMPACT_SENTINEL) => Some((i32::get(&src[1..]), COMPACT_MAX_LEN)),
        Some(&byte) => Some((byte as i32, 1)),
    }
}

/// Computes the 2-byte length prefix for an optional string.
///
/// Fails with `OversizedString` when the UTF-8 length reaches the null sentinel.
pub fn string_prefix(value: Option<&str>) -> Result<u16> {
    match value {
        None => Ok(NULL_STRING),
        Some(s) if s.len() > MAX_STRING_LEN => Err(Error::OversizedString {
            len: s.len(),
            limit: MAX_STRING_LEN,
        }),
        Some(s) => Ok(s.len() as u16),
    }
}

/// Interprets a decoded length prefix: `None` for null, otherwise the byte length.
#[inline]
pub fn string_len(prefix: u16) -> Option<usize> {
    (prefix != NULL_STRING).then_some(prefix as usize)
}

/// Converts the payload of a length-prefixed string to an owned `String`.
pub fn decode_utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::invalid_data(format!("string is not UTF-8: {e}")))
}

/// Encodes a character as a single UTF-16 code unit.
pub fn encode_char(c: char) -> Result<u16> {
    u16::try_from(c as u32).map_err(|_| {
        Error::invalid_data(format!(
            "character U+{:04X} does not fit a 2-byte code unit",
            c as u32
        ))
    })
}

/// Decodes a UTF-16 code unit; lone surrogates are rejected.
pub fn decode_char(unit: u16) -> Result<char> {
    char::from_u32(unit as u32)
        .ok_or_else(|| Error::invalid_data(format!("code unit 0x{unit:04X} is a surrogate")))
}

/// Latin-1 bytes of `s`. Characters outside Latin-1 become `?`.
pub fn latin1_encode(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| u8::try_from(c as u32).unwrap_or(b'?'))
        .collect()
}

/// Decodes Latin-1 bytes; every byte maps to the code point of the same value.
pub fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
