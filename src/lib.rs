//! # Duet - MIDI 1.0 and MIDI 2.0 behind one event model
//!
//! ## Architecture
//!
//! Duet is an umbrella crate over:
//! - **duet-midi** - Protocol-agnostic values, events, MIDI 1.0 / UMP codecs, filters
//! - **duet-midi-io** - Receive/send boundary (stream splitting, event queue, shared filters)
//!
//! ## Quick Start
//!
//! ```
//! use duet::prelude::*;
//!
//! // A note on built from a MIDI 1.0 velocity...
//! let event = MidiEvent::note_on(
//!     u7::new(60),
//!     Value7Bit16Bit::Midi1(u7::new(127)),
//!     u4::new(0),
//!     u4::new(0),
//! );
//!
//! // ...encodes to either protocol
//! assert_eq!(event.to_midi1_bytes().as_slice(), &[0x90, 60, 127]);
//! assert_eq!(event.to_ump_words().as_slice(), &[0x4090_3C00, 0xFFFF_0000]);
//!
//! // and equals its full-scale unit interval counterpart
//! let unit = MidiEvent::note_on(
//!     u7::new(60),
//!     Value7Bit16Bit::UnitInterval(1.0),
//!     u4::new(0),
//!     u4::new(0),
//! );
//! assert_eq!(event, unit);
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Core plus `io`
//! - `io` - Receive/send boundary

/// Re-export of duet-midi for direct access
pub use duet_midi as midi;

pub use duet_midi::{
    // Errors
    DecodeError,
    // Values
    Domain,
    DomainValue,
    Validated,
    Value14Bit32Bit,
    Value7Bit16Bit,
    Value7Bit32Bit,
    Width,
    // Events
    ChannelVoice,
    MessageClass,
    MessageType,
    MidiEvent,
    SysEx,
    SystemCommon,
    SystemRealTime,
    Utility,
    // Codecs
    Midi1Bytes,
    MidiProtocol,
    UmpWords,
    // Filters
    Filter,
    FilterEvents,
    SeriesFilter,
};

pub use duet_midi::{u14, u4, u7};

// Receive/send boundary
#[cfg(feature = "io")]
pub use duet_midi_io as io;

#[cfg(feature = "io")]
pub use duet_midi_io::{
    encode_packet, EventCallback, MidiEventConsumer, MidiReceiver, OutboundPacket,
    ReceiveHandler, ReceiverConfig, SharedSeriesFilter, WireFormat,
};

mod error;
pub use error::{Error, Result};

/// Convenience prelude for common imports
pub mod prelude {
    pub use duet_midi::prelude::*;

    pub use crate::{Error, Result};

    #[cfg(feature = "io")]
    pub use duet_midi_io::{
        encode_packet, MidiEventConsumer, MidiReceiver, OutboundPacket, ReceiveHandler,
        WireFormat,
    };
}
