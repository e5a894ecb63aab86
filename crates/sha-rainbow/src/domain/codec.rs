//! 6-bit password codec
//!
//! Maps a fixed-length alphanumeric password to a u64 and back.
//! Character `i` occupies bits `6*i .. 6*i+6`:
//! - '0'-'9' -> 0-9
//! - 'A'-'Z' -> 10-35
//! - 'a'-'z' -> 36-61

use crate::constants::{BITS_PER_CHAR, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::error::CodecError;

const SYMBOL_MASK: u64 = 0x3F;

/// Largest valid 6-bit symbol
const MAX_SYMBOL: u8 = 61;

#[inline]
fn check_length(length: usize) -> Result<(), CodecError> {
    if (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(CodecError::InvalidLength(length))
    }
}

/// Convert a character to its 6-bit symbol
#[inline]
pub fn symbol_of(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'Z' => Some(byte - b'A' + 10),
        b'a'..=b'z' => Some(byte - b'a' + 36),
        _ => None,
    }
}

/// Convert a 6-bit symbol back to its character
#[inline]
pub fn char_of(symbol: u8) -> Option<u8> {
    match symbol {
        0..=9 => Some(b'0' + symbol),
        10..=35 => Some(b'A' + symbol - 10),
        36..=MAX_SYMBOL => Some(b'a' + symbol - 36),
        _ => None,
    }
}

/// Encode a password into a u64
pub fn encode(password: &[u8]) -> Result<u64, CodecError> {
    check_length(password.len())?;

    let mut code = 0u64;
    for (index, &byte) in password.iter().enumerate() {
        let symbol = symbol_of(byte).ok_or(CodecError::InvalidCharacter { byte, index })?;
        code |= (symbol as u64) << (BITS_PER_CHAR as usize * index);
    }
    Ok(code)
}

/// Decode a u64 into a password of `length` characters
pub fn decode(code: u64, length: usize) -> Result<Vec<u8>, CodecError> {
    check_length(length)?;

    (0..length)
        .map(|index| {
            let value = ((code >> (BITS_PER_CHAR as usize * index)) & SYMBOL_MASK) as u8;
            char_of(value).ok_or(CodecError::InvalidSymbol { value, index })
        })
        .collect()
}
