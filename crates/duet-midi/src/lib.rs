//! Protocol-agnostic MIDI 1.0 / MIDI 2.0 core for duet.
//!
//! Values are stored in whichever domain they were created in (unit interval,
//! bipolar unit interval, MIDI 1.0 width or MIDI 2.0 width) and rendered at the
//! width each wire protocol needs. Events encode to MIDI 1.0 bytes and Universal
//! MIDI Packet words, decode back, and can be classified and filtered.
//!
//! Everything here is pure and synchronous: no I/O, no locks, no logging.
//!
//! # Example
//!
//! ```
//! use duet_midi::prelude::*;
//!
//! let event = MidiEvent::unofficial_bus_select(u7::new(0x20), u4::new(3));
//! assert_eq!(event.to_midi1_bytes().as_slice(), &[0xF5, 0x20]);
//! assert_eq!(event.to_ump_words().as_slice(), &[0x13F5_2000]);
//!
//! let velocity = Value7Bit16Bit::UnitInterval(1.0);
//! assert_eq!(velocity, Value7Bit16Bit::Midi1(u7::new(127)));
//! assert_eq!(velocity.midi2(), 0xFFFF);
//! ```

// Error types
pub mod error;
pub use error::{DecodeError, Result};

// Numeric conversions between domains
pub mod scale;
pub use scale::Width;

// Protocol-agnostic values
pub mod value;
pub use value::{
    Domain, DomainValue, Validated, Value14Bit32Bit, Value7Bit16Bit, Value7Bit32Bit,
};

// Logical events and classification
pub mod event;
pub use event::{
    ChannelVoice, ChannelVoiceType, MessageClass, MessageType, MidiEvent, SysEx, SysExType,
    SystemCommon, SystemCommonType, SystemRealTime, Utility, UtilityType,
};

// Wire codecs
pub mod codec;
pub use codec::{
    decode_midi1, decode_midi1_in_group, decode_ump, encode_midi1, encode_ump,
    midi1_message_len, Midi1Bytes, MidiProtocol, UmpMessageType, UmpWords,
};

// Filters
pub mod filter;
pub use filter::{
    ChannelVoiceFilter, Filter, FilterEvents, GroupFilter, SeriesFilter, SubType, TypeRule,
};

pub(crate) mod serde_support;

// Width-restricted integers used for groups, channels and data fields
pub use midi2::prelude::{u14, u4, u7};

pub mod prelude {
    pub use crate::codec::{MidiProtocol, UmpWords};
    pub use crate::event::{
        ChannelVoice, ChannelVoiceType, MessageClass, MidiEvent, SysExType, SystemCommonType,
        SystemRealTime, UtilityType,
    };
    pub use crate::filter::{Filter, FilterEvents, SeriesFilter};
    pub use crate::value::{Validated, Value14Bit32Bit, Value7Bit16Bit, Value7Bit32Bit};
    pub use crate::{u14, u4, u7};
}
