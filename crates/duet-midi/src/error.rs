//! Decode errors for MIDI 1.0 byte and UMP word input.

use thiserror::Error;

/// Failure to turn raw wire data into a [`MidiEvent`](crate::MidiEvent).
///
/// Encoding has no error type: every event that can be constructed can be encoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Wrong byte or word count for the message type claimed by the status.
    #[error("malformed message length: expected {expected}, got {actual}")]
    MalformedLength { expected: usize, actual: usize },

    /// A byte required to be 7-bit data has its top bit set.
    #[error("invalid data byte {byte:#04x} at index {index}")]
    InvalidDataByte { index: usize, byte: u8 },

    /// Status byte, UMP message type or sub-type is not in the known table.
    #[error("unrecognized status {0:#04x}")]
    UnrecognizedStatus(u8),

    /// A packed field holds a raw integer wider than its declared width.
    #[error("field `{field}` value {value:#x} exceeds {bits} bits")]
    OutOfRangeField {
        field: &'static str,
        value: u32,
        bits: u32,
    },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
