//! Encoding events for a sending endpoint.

use duet_midi::{Midi1Bytes, MidiEvent, MidiProtocol, UmpWords};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// What an endpoint accepts on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireFormat {
    /// MIDI 1.0 byte stream.
    Midi1,
    /// Universal MIDI Packets; channel voice messages use the given protocol.
    Ump(MidiProtocol),
}

impl Default for WireFormat {
    fn default() -> Self {
        Self::Ump(MidiProtocol::Midi2)
    }
}

/// One encoded message, ready to hand to a host API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundPacket {
    Midi1(Midi1Bytes),
    Ump(UmpWords),
}

impl OutboundPacket {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Midi1(bytes) => bytes.is_empty(),
            Self::Ump(words) => words.is_empty(),
        }
    }

    /// The MIDI 1.0 byte form, if this packet is one.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Midi1(bytes) => Some(bytes.as_slice()),
            Self::Ump(_) => None,
        }
    }

    /// The UMP word form, if this packet is one.
    pub fn as_words(&self) -> Option<&[u32]> {
        match self {
            Self::Midi1(_) => None,
            Self::Ump(words) => Some(words.as_slice()),
        }
    }
}

/// Encode a single event. Events with no MIDI 1.0 form (utility messages)
/// produce an empty [`OutboundPacket::Midi1`].
pub fn encode_packet(event: &MidiEvent, format: WireFormat) -> OutboundPacket {
    match format {
        WireFormat::Midi1 => OutboundPacket::Midi1(event.to_midi1_bytes()),
        WireFormat::Ump(protocol) => OutboundPacket::Ump(event.to_ump_words_for(protocol)),
    }
}

/// Encode a batch, skipping events that encode to nothing.
pub fn encode_all<'a>(
    events: impl IntoIterator<Item = &'a MidiEvent>,
    format: WireFormat,
) -> Vec<OutboundPacket> {
    events
        .into_iter()
        .filter_map(|event| {
            let packet = encode_packet(event, format);
            if packet.is_empty() {
                trace!(?event, ?format, "event has no encoding, skipping");
                None
            } else {
                Some(packet)
            }
        })
        .collect()
}
