//! The seam between a host MIDI API and the codec.
//!
//! A platform backend calls a [`ReceiveHandler`] from its own thread with raw
//! packets. [`PacketDecoder`] splits and decodes them; undecodable messages are
//! logged and skipped so one bad byte never stalls a live stream.

use duet_midi::{decode_midi1_in_group, decode_ump, u4, MidiEvent};
use parking_lot::Mutex;
use tracing::debug;

use crate::stream::{Midi1StreamParser, UmpStreamParser};

/// Receives raw packets from a host API callback.
pub trait ReceiveHandler: Send + Sync {
    /// A MIDI 1.0 byte packet. May hold several messages or part of one.
    fn midi1_received(&self, bytes: &[u8]);

    /// A buffer of UMP words. May hold several packets or part of one.
    fn ump_received(&self, words: &[u32]);
}

/// Stateful decoder for one source.
#[derive(Debug, Clone)]
pub struct PacketDecoder {
    midi1: Midi1StreamParser,
    ump: UmpStreamParser,
    group: u4,
}

impl Default for PacketDecoder {
    fn default() -> Self {
        Self::new(u4::new(0), true)
    }
}

impl PacketDecoder {
    /// `group` tags events decoded from MIDI 1.0 bytes, which carry none.
    pub fn new(group: u4, running_status: bool) -> Self {
        Self {
            midi1: Midi1StreamParser::new(running_status),
            ump: UmpStreamParser::new(),
            group,
        }
    }

    #[inline]
    pub fn group(&self) -> u4 {
        self.group
    }

    /// Drop partial messages, e.g. after the source reconnects.
    pub fn reset(&mut self) {
        self.midi1.reset();
        self.ump.reset();
    }

    /// Split `bytes` into messages and pass each decoded event to `emit`.
    /// Undecodable messages are logged and skipped.
    pub fn decode_midi1(&mut self, bytes: &[u8], mut emit: impl FnMut(MidiEvent)) {
        let group = self.group;
        self.midi1
            .push(bytes, |message| match decode_midi1_in_group(message, group) {
                Ok(event) => emit(event),
                Err(e) => debug!(?message, "skipping undecodable MIDI 1.0 message: {}", e),
            });
    }

    /// Split `words` into packets and pass each decoded event to `emit`.
    /// Undecodable packets are logged and skipped.
    pub fn decode_ump(&mut self, words: &[u32], mut emit: impl FnMut(MidiEvent)) {
        self.ump.push(words, |packet| match decode_ump(packet) {
            Ok(event) => emit(event),
            Err(e) => debug!(?packet, "skipping undecodable UMP packet: {}", e),
        });
    }
}

/// Handler that decodes packets and passes each event to a callback.
pub struct EventCallback<F> {
    decoder: Mutex<PacketDecoder>,
    callback: F,
}

impl<F> EventCallback<F>
where
    F: Fn(MidiEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self::with_decoder(PacketDecoder::default(), callback)
    }

    /// Use a preconfigured decoder, e.g. one with a non-default group or
    /// running status disabled.
    pub fn with_decoder(decoder: PacketDecoder, callback: F) -> Self {
        Self {
            decoder: Mutex::new(decoder),
            callback,
        }
    }
}

impl<F> ReceiveHandler for EventCallback<F>
where
    F: Fn(MidiEvent) + Send + Sync,
{
    fn midi1_received(&self, bytes: &[u8]) {
        self.decoder.lock().decode_midi1(bytes, &self.callback);
    }

    fn ump_received(&self, words: &[u32]) {
        self.decoder.lock().decode_ump(words, &self.callback);
    }
}
