//! Error types for the receive/send boundary.

use duet_midi::DecodeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("MIDI decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Event queue full ({dropped} events dropped so far)")]
    QueueFull { dropped: u64 },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
