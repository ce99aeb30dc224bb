//! Checksum-protected data words
//!
//! Every 16-bit word exchanged with the sensor travels as three bytes:
//! `[msb, lsb, crc8(msb, lsb)]`.

use core::fmt;

use crate::crc::checksum;

/// Size of one word on the wire, including its checksum byte
pub const WORD_SIZE: usize = 3;

/// A received word whose trailing byte does not match its checksum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumMismatch {
    /// Checksum computed over the received data bytes
    pub expected: u8,
    /// Checksum byte found on the wire
    pub actual: u8,
}

impl fmt::Display for ChecksumMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "checksum mismatch: expected {:#04x}, got {:#04x}",
            self.expected, self.actual
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ChecksumMismatch {}

/// Encode a word as `[msb, lsb, crc]`
pub fn encode(word: u16) -> [u8; WORD_SIZE] {
    let [msb, lsb] = word.to_be_bytes();
    [msb, lsb, checksum(msb, lsb)]
}

/// Decode and validate a `[msb, lsb, crc]` group
pub fn decode(bytes: [u8; WORD_SIZE]) -> Result<u16, ChecksumMismatch> {
    let [msb, lsb, actual] = bytes;
    let expected = checksum(msb, lsb);
    if actual != expected {
        return Err(ChecksumMismatch { expected, actual });
    }
    Ok(u16::from_be_bytes([msb, lsb]))
}

/// Decode every group in `bytes` into `words`
///
/// Nothing is written to `words` unless all groups validate.
pub(crate) fn decode_all(bytes: &[u8], words: &mut [u16]) -> Result<(), ChecksumMismatch> {
    assert_eq!(bytes.len(), words.len() * WORD_SIZE);

    for chunk in bytes.chunks(WORD_SIZE) {
        decode([chunk[0], chunk[1], chunk[2]])?;
    }
    for (word, chunk) in words.iter_mut().zip(bytes.chunks(WORD_SIZE)) {
        *word = u16::from_be_bytes([chunk[0], chunk[1]]);
    }
    Ok(())
}
