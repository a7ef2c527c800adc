//! Receive/send boundary for duet.
//!
//! Platform backends hand raw packets to a [`ReceiveHandler`]. The types here
//! split those packets into messages, decode them, apply a swappable filter
//! chain and queue the result for a processing thread without blocking the
//! host callback. On the way out, [`encode_packet`] turns events back into the
//! wire format an endpoint accepts.

pub mod error;
pub use error::{Error, Result};

pub mod stream;
pub use stream::{
    decode_midi1_stream, decode_ump_stream, split_ump, Midi1StreamParser, UmpPackets,
    UmpStreamParser, MAX_SYSEX_BYTES,
};

mod queue;
pub use queue::{
    midi_event_channel, midi_event_channel_with_capacity, MidiEventAggregator,
    MidiEventConsumer, MidiEventProducer,
};

mod shared_filter;
pub use shared_filter::SharedSeriesFilter;

mod receive;
pub use receive::{EventCallback, PacketDecoder, ReceiveHandler};

mod receiver;
pub use receiver::{MidiReceiver, MidiReceiverBuilder, ReceiverConfig};

mod outbound;
pub use outbound::{encode_all, encode_packet, OutboundPacket, WireFormat};
