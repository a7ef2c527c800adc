//! Wire codecs: MIDI 1.0 bytes and Universal MIDI Packet words.
//!
//! Encoding never fails: every field of a [`MidiEvent`] is in range by
//! construction. Decoding takes exactly one message and reports malformed input
//! as a [`DecodeError`](crate::DecodeError).

mod midi1;
mod ump;

pub use midi1::{decode_midi1, decode_midi1_in_group, encode_midi1, midi1_message_len};
pub use ump::{decode_ump, encode_ump};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::Result;
use crate::event::MidiEvent;

/// Encoded MIDI 1.0 message. Inline for everything but SysEx.
pub type Midi1Bytes = SmallVec<[u8; 3]>;

/// Encoded UMP message. Inline up to 128-bit packets.
pub type UmpWords = SmallVec<[u32; 4]>;

/// Protocol used for channel voice messages inside UMP.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MidiProtocol {
    /// MIDI 1.0 channel voice in UMP (message type 0x2).
    Midi1,
    /// MIDI 2.0 channel voice (message type 0x4).
    #[default]
    Midi2,
}

/// UMP message type, the top nibble of a packet's first word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UmpMessageType {
    Utility,
    SystemRealTimeAndCommon,
    Midi1ChannelVoice,
    /// 64-bit data, carries SysEx7.
    Data64,
    Midi2ChannelVoice,
    /// 128-bit data, carries SysEx8 and mixed data sets.
    Data128,
    FlexData,
    UmpStream,
    Reserved(u8),
}

impl UmpMessageType {
    #[inline]
    pub const fn from_nibble(nibble: u8) -> Self {
        match nibble & 0x0F {
            0x0 => Self::Utility,
            0x1 => Self::SystemRealTimeAndCommon,
            0x2 => Self::Midi1ChannelVoice,
            0x3 => Self::Data64,
            0x4 => Self::Midi2ChannelVoice,
            0x5 => Self::Data128,
            0xD => Self::FlexData,
            0xF => Self::UmpStream,
            other => Self::Reserved(other),
        }
    }

    /// Message type of the packet starting with `word`.
    #[inline]
    pub const fn from_word(word: u32) -> Self {
        Self::from_nibble((word >> 28) as u8)
    }

    #[inline]
    pub const fn nibble(self) -> u8 {
        match self {
            Self::Utility => 0x0,
            Self::SystemRealTimeAndCommon => 0x1,
            Self::Midi1ChannelVoice => 0x2,
            Self::Data64 => 0x3,
            Self::Midi2ChannelVoice => 0x4,
            Self::Data128 => 0x5,
            Self::FlexData => 0xD,
            Self::UmpStream => 0xF,
            Self::Reserved(n) => n,
        }
    }

    /// Packet size in 32-bit words. Defined for reserved types too, so streams
    /// can skip packets they do not understand.
    #[inline]
    pub const fn word_count(self) -> usize {
        match self.nibble() {
            0x0..=0x2 | 0x6 | 0x7 => 1,
            0x3 | 0x4 | 0x8..=0xA => 2,
            0xB | 0xC => 3,
            _ => 4,
        }
    }
}

impl MidiEvent {
    /// See [`encode_midi1`].
    #[inline]
    pub fn to_midi1_bytes(&self) -> Midi1Bytes {
        encode_midi1(self)
    }

    /// UMP words using the MIDI 2.0 protocol for channel voice messages.
    #[inline]
    pub fn to_ump_words(&self) -> UmpWords {
        encode_ump(self, MidiProtocol::default())
    }

    #[inline]
    pub fn to_ump_words_for(&self, protocol: MidiProtocol) -> UmpWords {
        encode_ump(self, protocol)
    }

    #[inline]
    pub fn from_midi1_bytes(bytes: &[u8]) -> Result<Self> {
        decode_midi1(bytes)
    }

    #[inline]
    pub fn from_ump_words(words: &[u32]) -> Result<Self> {
        decode_ump(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_counts() {
        let expected = [1, 1, 1, 2, 2, 4, 1, 1, 2, 2, 2, 3, 3, 4, 4, 4];
        for (nibble, count) in expected.iter().enumerate() {
            assert_eq!(
                UmpMessageType::from_nibble(nibble as u8).word_count(),
                *count,
                "message type {nibble:#x}"
            );
        }
    }

    #[test]
    fn test_nibble_round_trip() {
        for nibble in 0..16u8 {
            assert_eq!(UmpMessageType::from_nibble(nibble).nibble(), nibble);
        }
        assert_eq!(
            UmpMessageType::from_word(0x40B0_0700),
            UmpMessageType::Midi2ChannelVoice
        );
    }

    #[test]
    fn test_default_protocol_is_midi2() {
        assert_eq!(MidiProtocol::default(), MidiProtocol::Midi2);
    }
}
