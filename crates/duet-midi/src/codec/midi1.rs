//! MIDI 1.0 byte codec.

use midi2::prelude::*;
use smallvec::smallvec;

use super::Midi1Bytes;
use crate::error::{DecodeError, Result};
use crate::event::{ChannelVoice, MidiEvent, SysEx, SystemCommon, SystemRealTime};
use crate::value::{Value14Bit32Bit, Value7Bit16Bit, Value7Bit32Bit};

pub(crate) const SYSEX_START: u8 = 0xF0;
pub(crate) const SYSEX_END: u8 = 0xF7;

/// Total length in bytes (status included) of the message started by `status`.
///
/// `None` for SysEx (variable length), 0xF7 and undefined statuses.
pub const fn midi1_message_len(status: u8) -> Option<usize> {
    match status {
        0x80..=0xBF | 0xE0..=0xEF => Some(3),
        0xC0..=0xDF => Some(2),
        0xF1 | 0xF3 | 0xF5 => Some(2),
        0xF2 => Some(3),
        0xF6 | 0xF8 | 0xFA | 0xFB | 0xFC | 0xFE | 0xFF => Some(1),
        _ => None,
    }
}

#[inline]
fn split_14bit(value: u14) -> (u8, u8) {
    let v = u16::from(value);
    ((v & 0x7F) as u8, (v >> 7) as u8)
}

#[inline]
fn join_14bit(lsb: u7, msb: u7) -> u14 {
    u14::new((u16::from(u8::from(msb)) << 7) | u16::from(u8::from(lsb)))
}

pub(crate) fn channel_voice_bytes(channel: u4, msg: &ChannelVoice) -> Midi1Bytes {
    let ch = u8::from(channel);
    match *msg {
        ChannelVoice::NoteOff { note, velocity } => {
            smallvec![0x80 | ch, u8::from(note), u8::from(velocity.midi1())]
        }
        ChannelVoice::NoteOn { note, velocity } => {
            smallvec![0x90 | ch, u8::from(note), u8::from(velocity.midi1())]
        }
        ChannelVoice::NotePressure { note, amount } => {
            smallvec![0xA0 | ch, u8::from(note), u8::from(amount.midi1())]
        }
        ChannelVoice::ControlChange { controller, value } => {
            smallvec![0xB0 | ch, u8::from(controller), u8::from(value.midi1())]
        }
        ChannelVoice::ProgramChange { program } => smallvec![0xC0 | ch, u8::from(program)],
        ChannelVoice::ChannelPressure { amount } => {
            smallvec![0xD0 | ch, u8::from(amount.midi1())]
        }
        ChannelVoice::PitchBend { value } => {
            let (lsb, msb) = split_14bit(value.midi1());
            smallvec![0xE0 | ch, lsb, msb]
        }
    }
}

pub(crate) fn system_common_bytes(msg: &SystemCommon) -> Midi1Bytes {
    match *msg {
        SystemCommon::TimecodeQuarterFrame { data } => smallvec![0xF1, u8::from(data)],
        SystemCommon::SongPositionPointer { beat } => {
            let (lsb, msb) = split_14bit(beat);
            smallvec![0xF2, lsb, msb]
        }
        SystemCommon::SongSelect { number } => smallvec![0xF3, u8::from(number)],
        SystemCommon::UnofficialBusSelect { bus } => smallvec![0xF5, u8::from(bus)],
        SystemCommon::TuneRequest => smallvec![0xF6],
    }
}

/// Encode `event` as a MIDI 1.0 message.
///
/// The group is not representable in MIDI 1.0 and is dropped. Utility messages
/// exist only in UMP and encode to an empty sequence.
pub fn encode_midi1(event: &MidiEvent) -> Midi1Bytes {
    match event {
        MidiEvent::ChannelVoice { channel, msg, .. } => channel_voice_bytes(*channel, msg),
        MidiEvent::SystemCommon { msg, .. } => system_common_bytes(msg),
        MidiEvent::SystemRealTime { msg, .. } => smallvec![msg.status()],
        MidiEvent::SystemExclusive {
            msg: SysEx::SysEx7 { data },
            ..
        } => {
            let mut bytes = Midi1Bytes::with_capacity(data.len() + 2);
            bytes.push(SYSEX_START);
            bytes.extend(data.iter().map(|b| u8::from(*b)));
            bytes.push(SYSEX_END);
            bytes
        }
        MidiEvent::Utility { .. } => Midi1Bytes::new(),
    }
}

/// Build an event from an already validated status and data bytes.
///
/// Data bytes beyond the message's length are ignored. Shared with the UMP
/// decoder for message types 0x1 and 0x2.
pub(crate) fn event_from_status(status: u8, data: [u7; 2], group: u4) -> Result<MidiEvent> {
    let [d1, d2] = data;
    if (0x80..=0xEF).contains(&status) {
        let channel = u4::new(status & 0x0F);
        let msg = match status & 0xF0 {
            0x80 => ChannelVoice::NoteOff {
                note: d1,
                velocity: Value7Bit16Bit::Midi1(d2).into(),
            },
            0x90 => ChannelVoice::NoteOn {
                note: d1,
                velocity: Value7Bit16Bit::Midi1(d2).into(),
            },
            0xA0 => ChannelVoice::NotePressure {
                note: d1,
                amount: Value7Bit32Bit::Midi1(d2).into(),
            },
            0xB0 => ChannelVoice::ControlChange {
                controller: d1,
                value: Value7Bit32Bit::Midi1(d2).into(),
            },
            0xC0 => ChannelVoice::ProgramChange { program: d1 },
            0xD0 => ChannelVoice::ChannelPressure {
                amount: Value7Bit32Bit::Midi1(d1).into(),
            },
            _ => ChannelVoice::PitchBend {
                value: Value14Bit32Bit::Midi1(join_14bit(d1, d2)).into(),
            },
        };
        return Ok(MidiEvent::channel_voice(msg, channel, group));
    }

    if let Some(msg) = SystemRealTime::from_status(status) {
        return Ok(MidiEvent::system_real_time(msg, group));
    }

    let msg = match status {
        0xF1 => SystemCommon::TimecodeQuarterFrame { data: d1 },
        0xF2 => SystemCommon::SongPositionPointer {
            beat: join_14bit(d1, d2),
        },
        0xF3 => SystemCommon::SongSelect { number: d1 },
        0xF5 => SystemCommon::UnofficialBusSelect { bus: d1 },
        0xF6 => SystemCommon::TuneRequest,
        _ => return Err(DecodeError::UnrecognizedStatus(status)),
    };
    Ok(MidiEvent::SystemCommon { group, msg })
}

#[inline]
fn data_byte(bytes: &[u8], index: usize) -> Result<u7> {
    match bytes.get(index) {
        None => Ok(u7::new(0)),
        Some(&byte) if byte & 0x80 != 0 => Err(DecodeError::InvalidDataByte { index, byte }),
        Some(&byte) => Ok(u7::new(byte)),
    }
}

fn decode_sysex7(bytes: &[u8], group: u4) -> Result<MidiEvent> {
    match bytes.last() {
        Some(&SYSEX_END) if bytes.len() >= 2 => {}
        _ => {
            return Err(DecodeError::MalformedLength {
                expected: bytes.len() + 1,
                actual: bytes.len(),
            })
        }
    }
    let payload = &bytes[1..bytes.len() - 1];
    MidiEvent::try_sysex7(payload, group).map_err(|e| match e {
        DecodeError::InvalidDataByte { index, byte } => DecodeError::InvalidDataByte {
            index: index + 1,
            byte,
        },
        other => other,
    })
}

/// Decode one complete MIDI 1.0 message into group 0.
pub fn decode_midi1(bytes: &[u8]) -> Result<MidiEvent> {
    decode_midi1_in_group(bytes, u4::new(0))
}

/// Decode one complete MIDI 1.0 message, tagging it with `group`.
///
/// `bytes` must hold exactly one message: no running status, no interleaved
/// real-time bytes. Values are stored in their 7/14-bit native domains.
pub fn decode_midi1_in_group(bytes: &[u8], group: u4) -> Result<MidiEvent> {
    let Some(&status) = bytes.first() else {
        return Err(DecodeError::MalformedLength {
            expected: 1,
            actual: 0,
        });
    };

    if status == SYSEX_START {
        return decode_sysex7(bytes, group);
    }

    let Some(len) = midi1_message_len(status) else {
        return Err(DecodeError::UnrecognizedStatus(status));
    };
    if bytes.len() != len {
        return Err(DecodeError::MalformedLength {
            expected: len,
            actual: bytes.len(),
        });
    }

    let data = [data_byte(bytes, 1)?, data_byte(bytes, 2)?];
    event_from_status(status, data, group)
}
