//! Centralized error type for the duet umbrella crate.
//!
//! Wraps the subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] duet_midi::DecodeError),

    #[cfg(feature = "io")]
    #[error("MIDI I/O: {0}")]
    Io(#[from] duet_midi_io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
