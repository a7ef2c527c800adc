//! Splitting raw packets into complete messages.
//!
//! Hosts deliver MIDI 1.0 data as byte packets that may hold several messages,
//! use running status, interleave real-time bytes or split a message across
//! packets. UMP packets may likewise hold several messages and SysEx7 spans
//! several 2-word packets. The parsers here keep the state needed to hand the
//! codec exactly one complete message at a time.
//!
//! Input that can never form a message (stray data bytes, an interrupted or
//! oversized SysEx, orphan SysEx7 packets) is dropped by the live `push` path
//! with a trace log. The strict `decode_*_stream` helpers report it instead.

use duet_midi::{
    decode_midi1_in_group, decode_ump, midi1_message_len, u4, DecodeError, MidiEvent,
    UmpMessageType,
};
use smallvec::SmallVec;
use tracing::trace;

use crate::error::Result;

const SYSEX_START: u8 = 0xF0;
const SYSEX_END: u8 = 0xF7;

/// Longest SysEx payload either parser buffers before dropping the message.
pub const MAX_SYSEX_BYTES: usize = 64 * 1024;

/// Words of a SysEx7 message carrying [`MAX_SYSEX_BYTES`] of payload.
const MAX_SYSEX7_WORDS: usize = MAX_SYSEX_BYTES.div_ceil(6) * 2;

/// What a parser found in its input.
enum Split<'a, T> {
    /// One complete message, ready for the codec.
    Message(&'a [T]),
    /// Input dropped because it cannot form a message.
    Malformed(DecodeError),
}

/// Byte-stream splitter for MIDI 1.0.
#[derive(Debug, Clone)]
pub struct Midi1StreamParser {
    use_running_status: bool,
    running_status: Option<u8>,
    message: SmallVec<[u8; 3]>,
    expected_len: usize,
    sysex: Option<Vec<u8>>,
}

impl Default for Midi1StreamParser {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Midi1StreamParser {
    /// With `use_running_status` off, data bytes without a preceding status
    /// byte are reported as malformed instead of reusing the last status.
    pub fn new(use_running_status: bool) -> Self {
        Self {
            use_running_status,
            running_status: None,
            message: SmallVec::new(),
            expected_len: 0,
            sysex: None,
        }
    }

    /// Forget any partial message and the running status.
    pub fn reset(&mut self) {
        self.running_status = None;
        self.message.clear();
        self.expected_len = 0;
        self.sysex = None;
    }

    /// Feed `bytes`, calling `emit` once per complete message.
    ///
    /// Real-time bytes are emitted as soon as they are seen, even in the middle
    /// of another message. A partial message is kept for the next call.
    pub fn push(&mut self, bytes: &[u8], mut emit: impl FnMut(&[u8])) {
        self.feed(bytes, |split| match split {
            Split::Message(message) => emit(message),
            Split::Malformed(err) => trace!(%err, "dropping malformed MIDI 1.0 input"),
        });
    }

    /// End of input. Fails if a message or SysEx is still incomplete, and
    /// discards it either way. Running status survives.
    pub fn finish(&mut self) -> Result<()> {
        let mut failure = None;
        self.interrupt(&mut |split| {
            if let Split::Malformed(err) = split {
                failure.get_or_insert(err);
            }
        });
        failure.map_or(Ok(()), |err| Err(err.into()))
    }

    fn feed(&mut self, bytes: &[u8], mut sink: impl FnMut(Split<'_, u8>)) {
        for byte in bytes {
            match *byte {
                0xF8..=0xFF => sink(Split::Message(std::slice::from_ref(byte))),
                SYSEX_START => {
                    self.interrupt(&mut sink);
                    self.running_status = None;
                    self.sysex = Some(vec![SYSEX_START]);
                }
                SYSEX_END => match self.sysex.take() {
                    Some(mut sysex) => {
                        sysex.push(SYSEX_END);
                        sink(Split::Message(sysex.as_slice()));
                    }
                    None => {
                        self.interrupt(&mut sink);
                        sink(Split::Malformed(DecodeError::UnrecognizedStatus(SYSEX_END)));
                    }
                },
                status @ (0x80..=0xEF | 0xF1..=0xF6) => {
                    self.interrupt(&mut sink);
                    self.start_message(status, &mut sink);
                }
                data => self.push_data(data, &mut sink),
            }
        }
    }

    /// A status byte cuts off whatever message was in progress.
    fn interrupt(&mut self, sink: &mut impl FnMut(Split<'_, u8>)) {
        if let Some(sysex) = self.sysex.take() {
            sink(Split::Malformed(DecodeError::MalformedLength {
                expected: sysex.len() + 1,
                actual: sysex.len(),
            }));
        }
        if !self.message.is_empty() {
            sink(Split::Malformed(DecodeError::MalformedLength {
                expected: self.expected_len,
                actual: self.message.len(),
            }));
            self.message.clear();
        }
    }

    fn start_message(&mut self, status: u8, sink: &mut impl FnMut(Split<'_, u8>)) {
        self.running_status = (status < 0xF0 && self.use_running_status).then_some(status);
        match midi1_message_len(status) {
            Some(len) if len > 1 => {
                self.message.push(status);
                self.expected_len = len;
            }
            // Single byte or undefined: hand it over as is, the codec rejects the latter.
            _ => sink(Split::Message(std::slice::from_ref(&status))),
        }
    }

    fn push_data(&mut self, byte: u8, sink: &mut impl FnMut(Split<'_, u8>)) {
        if let Some(sysex) = self.sysex.as_mut() {
            if sysex.len() > MAX_SYSEX_BYTES {
                let len = sysex.len();
                self.sysex = None;
                sink(Split::Malformed(DecodeError::MalformedLength {
                    expected: MAX_SYSEX_BYTES + 2,
                    actual: len + 1,
                }));
            } else {
                sysex.push(byte);
            }
            return;
        }

        if self.message.is_empty() {
            match self.running_status {
                Some(status) => {
                    self.message.push(status);
                    self.expected_len = midi1_message_len(status).unwrap_or(1);
                }
                None => {
                    sink(Split::Malformed(DecodeError::UnrecognizedStatus(byte)));
                    return;
                }
            }
        }

        self.message.push(byte);
        if self.message.len() >= self.expected_len {
            sink(Split::Message(self.message.as_slice()));
            self.message.clear();
        }
    }
}

/// Packet-stream splitter for UMP. Reassembles multi-packet SysEx7, keeping
/// one message in progress per group.
#[derive(Debug, Clone, Default)]
pub struct UmpStreamParser {
    pending: SmallVec<[u32; 4]>,
    sysex: [Vec<u32>; 16],
}

impl UmpStreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the partial packet and every group's partial SysEx7.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.sysex.iter_mut().for_each(Vec::clear);
    }

    /// Feed `words`, calling `emit` once per complete message. A packet cut off
    /// at the end of `words` is completed by the next call.
    pub fn push(&mut self, words: &[u32], mut emit: impl FnMut(&[u32])) {
        self.feed(words, |split| match split {
            Split::Message(packet) => emit(packet),
            Split::Malformed(err) => trace!(%err, "dropping malformed UMP input"),
        });
    }

    /// End of input. Fails if a packet or a SysEx7 message is still
    /// incomplete, and discards it either way.
    pub fn finish(&mut self) -> Result<()> {
        let mut failure = None;
        if !self.pending.is_empty() {
            failure = Some(DecodeError::MalformedLength {
                expected: UmpMessageType::from_word(self.pending[0]).word_count(),
                actual: self.pending.len(),
            });
            self.pending.clear();
        }
        for group in 0..self.sysex.len() {
            self.abandon_sysex7(group, &mut |split| {
                if let Split::Malformed(err) = split {
                    failure.get_or_insert(err);
                }
            });
        }
        failure.map_or(Ok(()), |err| Err(err.into()))
    }

    fn feed(&mut self, words: &[u32], mut sink: impl FnMut(Split<'_, u32>)) {
        for &word in words {
            self.pending.push(word);
            let len = UmpMessageType::from_word(self.pending[0]).word_count();
            if self.pending.len() < len {
                continue;
            }

            let packet = std::mem::take(&mut self.pending);
            if UmpMessageType::from_word(packet[0]) == UmpMessageType::Data64 {
                self.push_sysex7(&packet, &mut sink);
            } else {
                sink(Split::Message(packet.as_slice()));
            }
        }
    }

    fn abandon_sysex7(&mut self, group: usize, sink: &mut impl FnMut(Split<'_, u32>)) {
        let buffer = &mut self.sysex[group];
        if !buffer.is_empty() {
            let len = buffer.len();
            buffer.clear();
            sink(Split::Malformed(DecodeError::MalformedLength {
                expected: len + 2,
                actual: len,
            }));
        }
    }

    fn push_sysex7(&mut self, packet: &[u32], sink: &mut impl FnMut(Split<'_, u32>)) {
        let group = ((packet[0] >> 24) & 0xF) as usize;
        match (packet[0] >> 20) & 0xF {
            // start
            0x1 => {
                self.abandon_sysex7(group, sink);
                self.sysex[group].extend_from_slice(packet);
            }
            // continue / end
            status @ (0x2 | 0x3) => {
                let len = self.sysex[group].len();
                if len == 0 {
                    sink(Split::Malformed(DecodeError::UnrecognizedStatus(
                        packet[0].to_be_bytes()[1],
                    )));
                    return;
                }
                if len + packet.len() > MAX_SYSEX7_WORDS {
                    self.sysex[group].clear();
                    sink(Split::Malformed(DecodeError::MalformedLength {
                        expected: MAX_SYSEX7_WORDS,
                        actual: len + packet.len(),
                    }));
                    return;
                }
                self.sysex[group].extend_from_slice(packet);
                if status == 0x3 {
                    sink(Split::Message(self.sysex[group].as_slice()));
                    self.sysex[group].clear();
                }
            }
            // complete, or an invalid status the codec reports
            _ => sink(Split::Message(packet)),
        }
    }
}

/// Iterator over the packets of a UMP buffer, see [`split_ump`].
#[derive(Debug, Clone)]
pub struct UmpPackets<'a> {
    words: &'a [u32],
}

impl<'a> Iterator for UmpPackets<'a> {
    type Item = &'a [u32];

    fn next(&mut self) -> Option<Self::Item> {
        let first = *self.words.first()?;
        let len = UmpMessageType::from_word(first)
            .word_count()
            .min(self.words.len());
        let (packet, rest) = self.words.split_at(len);
        self.words = rest;
        Some(packet)
    }
}

/// Split a UMP buffer into packets by message type word count. A truncated final
/// packet is yielded short. No SysEx7 reassembly; use [`UmpStreamParser`] for that.
pub fn split_ump(words: &[u32]) -> UmpPackets<'_> {
    UmpPackets { words }
}

/// Decode the splits of a strict stream, stopping at the first failure.
struct StrictDecoder {
    events: Vec<MidiEvent>,
    failure: Option<DecodeError>,
}

impl StrictDecoder {
    fn new() -> Self {
        Self {
            events: Vec::new(),
            failure: None,
        }
    }

    fn accept<T>(
        &mut self,
        split: Split<'_, T>,
        decode: impl FnOnce(&[T]) -> duet_midi::Result<MidiEvent>,
    ) {
        if self.failure.is_some() {
            return;
        }
        match split {
            Split::Message(message) => match decode(message) {
                Ok(event) => self.events.push(event),
                Err(err) => self.failure = Some(err),
            },
            Split::Malformed(err) => self.failure = Some(err),
        }
    }

    fn finish(self, end_of_input: impl FnOnce() -> Result<()>) -> Result<Vec<MidiEvent>> {
        if let Some(err) = self.failure {
            return Err(err.into());
        }
        end_of_input()?;
        Ok(self.events)
    }
}

/// Decode every message of a self-contained MIDI 1.0 packet.
///
/// Fails on the first malformed message, on stray data bytes and on a message
/// or SysEx left incomplete at the end of `bytes`.
pub fn decode_midi1_stream(
    bytes: &[u8],
    group: u4,
    running_status: bool,
) -> Result<Vec<MidiEvent>> {
    let mut parser = Midi1StreamParser::new(running_status);
    let mut decoder = StrictDecoder::new();
    parser.feed(bytes, |split| {
        decoder.accept(split, |message| decode_midi1_in_group(message, group))
    });
    decoder.finish(|| parser.finish())
}

/// Decode every message of a self-contained UMP buffer.
///
/// Fails on the first malformed message, on orphan SysEx7 packets and on a
/// packet or SysEx7 message left incomplete at the end of `words`.
pub fn decode_ump_stream(words: &[u32]) -> Result<Vec<MidiEvent>> {
    let mut parser = UmpStreamParser::new();
    let mut decoder = StrictDecoder::new();
    parser.feed(words, |split| decoder.accept(split, decode_ump));
    decoder.finish(|| parser.finish())
}
