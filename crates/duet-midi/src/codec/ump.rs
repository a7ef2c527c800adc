//! Universal MIDI Packet codec.

use midi2::prelude::*;
use smallvec::smallvec;

use super::midi1::{channel_voice_bytes, event_from_status, midi1_message_len, system_common_bytes};
use super::{MidiProtocol, UmpMessageType, UmpWords};
use crate::error::{DecodeError, Result};
use crate::event::{ChannelVoice, MidiEvent, SysEx, Utility};
use crate::value::{Value14Bit32Bit, Value7Bit16Bit, Value7Bit32Bit};

/// Payload bytes carried by one SysEx7 packet.
const SYSEX7_PACKET_BYTES: usize = 6;

const SYSEX7_COMPLETE: u8 = 0x0;
const SYSEX7_START: u8 = 0x1;
const SYSEX7_CONTINUE: u8 = 0x2;
const SYSEX7_END: u8 = 0x3;

#[inline]
fn header(mt: UmpMessageType, group: u4) -> u32 {
    (u32::from(mt.nibble()) << 28) | (u32::from(u8::from(group)) << 24)
}

/// One word holding a MIDI 1.0 message of up to three bytes, zero padded.
#[inline]
fn packed_midi1_word(mt: UmpMessageType, group: u4, bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take(3)
        .enumerate()
        .fold(header(mt, group), |word, (i, &b)| {
            word | (u32::from(b) << (16 - 8 * i))
        })
}

fn midi2_channel_voice_words(group: u4, channel: u4, msg: &ChannelVoice) -> UmpWords {
    let (opcode, index, data) = match *msg {
        ChannelVoice::NoteOff { note, velocity } => {
            (0x8, u8::from(note), u32::from(velocity.midi2()) << 16)
        }
        ChannelVoice::NoteOn { note, velocity } => {
            (0x9, u8::from(note), u32::from(velocity.midi2()) << 16)
        }
        ChannelVoice::NotePressure { note, amount } => (0xA, u8::from(note), amount.midi2()),
        ChannelVoice::ControlChange { controller, value } => {
            (0xB, u8::from(controller), value.midi2())
        }
        ChannelVoice::ProgramChange { program } => (0xC, 0, u32::from(u8::from(program)) << 24),
        ChannelVoice::ChannelPressure { amount } => (0xD, 0, amount.midi2()),
        ChannelVoice::PitchBend { value } => (0xE, 0, value.midi2()),
    };
    let w0 = header(UmpMessageType::Midi2ChannelVoice, group)
        | (opcode << 20)
        | (u32::from(u8::from(channel)) << 16)
        | (u32::from(index) << 8);
    smallvec![w0, data]
}

fn sysex7_words(group: u4, data: &[u7]) -> UmpWords {
    let chunks: Vec<&[u7]> = if data.is_empty() {
        vec![data]
    } else {
        data.chunks(SYSEX7_PACKET_BYTES).collect()
    };
    let last = chunks.len() - 1;

    let mut words = UmpWords::with_capacity(chunks.len() * 2);
    for (i, chunk) in chunks.iter().enumerate() {
        let status = match (i, last) {
            (_, 0) => SYSEX7_COMPLETE,
            (0, _) => SYSEX7_START,
            (i, last) if i == last => SYSEX7_END,
            _ => SYSEX7_CONTINUE,
        };
        let mut payload = [0u8; SYSEX7_PACKET_BYTES];
        for (slot, byte) in payload.iter_mut().zip(chunk.iter()) {
            *slot = u8::from(*byte);
        }
        words.push(
            header(UmpMessageType::Data64, group)
                | (u32::from(status) << 20)
                | ((chunk.len() as u32) << 16)
                | (u32::from(payload[0]) << 8)
                | u32::from(payload[1]),
        );
        words.push(u32::from_be_bytes([
            payload[2], payload[3], payload[4], payload[5],
        ]));
    }
    words
}

/// Encode `event` as UMP words.
///
/// Channel voice messages use message type 0x2 for [`MidiProtocol::Midi1`] and
/// 0x4 for [`MidiProtocol::Midi2`]. Other classes have one form regardless of
/// protocol. Unused bytes are always zero.
pub fn encode_ump(event: &MidiEvent, protocol: MidiProtocol) -> UmpWords {
    match event {
        MidiEvent::ChannelVoice {
            group,
            channel,
            msg,
        } => match protocol {
            MidiProtocol::Midi1 => smallvec![packed_midi1_word(
                UmpMessageType::Midi1ChannelVoice,
                *group,
                &channel_voice_bytes(*channel, msg),
            )],
            MidiProtocol::Midi2 => midi2_channel_voice_words(*group, *channel, msg),
        },
        MidiEvent::SystemCommon { group, msg } => smallvec![packed_midi1_word(
            UmpMessageType::SystemRealTimeAndCommon,
            *group,
            &system_common_bytes(msg),
        )],
        MidiEvent::SystemRealTime { group, msg } => smallvec![packed_midi1_word(
            UmpMessageType::SystemRealTimeAndCommon,
            *group,
            &[msg.status()],
        )],
        MidiEvent::SystemExclusive {
            group,
            msg: SysEx::SysEx7 { data },
        } => sysex7_words(*group, data),
        MidiEvent::Utility { group, msg } => {
            let (status, time) = match *msg {
                Utility::NoOp => (0x0, 0),
                Utility::JitterReductionClock { time } => (0x1, time),
                Utility::JitterReductionTimestamp { time } => (0x2, time),
            };
            smallvec![header(UmpMessageType::Utility, *group) | (status << 20) | u32::from(time)]
        }
    }
}

#[inline]
fn byte_at(word: u32, index: usize) -> u8 {
    word.to_be_bytes()[index]
}

/// A packed 7-bit field. The top bit must be clear.
#[inline]
fn field7(field: &'static str, value: u8) -> Result<u7> {
    if value & 0x80 != 0 {
        Err(DecodeError::OutOfRangeField {
            field,
            value: u32::from(value),
            bits: 7,
        })
    } else {
        Ok(u7::new(value))
    }
}

fn decode_utility(word: u32, group: u4) -> Result<MidiEvent> {
    let time = (word & 0xFFFF) as u16;
    let msg = match (word >> 20) & 0xF {
        0x0 => Utility::NoOp,
        0x1 => Utility::JitterReductionClock { time },
        0x2 => Utility::JitterReductionTimestamp { time },
        _ => return Err(DecodeError::UnrecognizedStatus(byte_at(word, 1))),
    };
    Ok(MidiEvent::Utility { group, msg })
}

/// Message types 0x1 and 0x2 carry a MIDI 1.0 message in bytes 1..=3.
fn decode_packed_midi1(word: u32, group: u4, channel_voice: bool) -> Result<MidiEvent> {
    let status = byte_at(word, 1);
    let in_class = if channel_voice {
        (0x80..=0xEF).contains(&status)
    } else {
        status > 0xF0 && status != 0xF7
    };
    let len = match midi1_message_len(status) {
        Some(len) if in_class => len,
        _ => return Err(DecodeError::UnrecognizedStatus(status)),
    };

    let mut data = [u7::new(0); 2];
    for (i, slot) in data.iter_mut().enumerate().take(len - 1) {
        let field = if i == 0 { "data byte 1" } else { "data byte 2" };
        *slot = field7(field, byte_at(word, 2 + i))?;
    }
    event_from_status(status, data, group)
}

fn decode_midi2_channel_voice(words: &[u32], group: u4) -> Result<MidiEvent> {
    let (w0, w1) = (words[0], words[1]);
    let opcode = (w0 >> 20) & 0xF;
    let channel = u4::new(((w0 >> 16) & 0xF) as u8);
    let index = byte_at(w0, 2);

    let msg = match opcode {
        0x8 => ChannelVoice::NoteOff {
            note: field7("note", index)?,
            velocity: Value7Bit16Bit::Midi2((w1 >> 16) as u16).into(),
        },
        0x9 => ChannelVoice::NoteOn {
            note: field7("note", index)?,
            velocity: Value7Bit16Bit::Midi2((w1 >> 16) as u16).into(),
        },
        0xA => ChannelVoice::NotePressure {
            note: field7("note", index)?,
            amount: Value7Bit32Bit::Midi2(w1).into(),
        },
        0xB => ChannelVoice::ControlChange {
            controller: field7("controller", index)?,
            value: Value7Bit32Bit::Midi2(w1).into(),
        },
        0xC => ChannelVoice::ProgramChange {
            program: field7("program", byte_at(w1, 0))?,
        },
        0xD => ChannelVoice::ChannelPressure {
            amount: Value7Bit32Bit::Midi2(w1).into(),
        },
        0xE => ChannelVoice::PitchBend {
            value: Value14Bit32Bit::Midi2(w1).into(),
        },
        _ => return Err(DecodeError::UnrecognizedStatus(byte_at(w0, 1))),
    };
    Ok(MidiEvent::channel_voice(msg, channel, group))
}

/// Reassemble one SysEx7 message from a complete packet or a
/// start/continue.../end sequence.
fn decode_sysex7(words: &[u32], group: u4) -> Result<MidiEvent> {
    if words.len() % 2 != 0 {
        return Err(DecodeError::MalformedLength {
            expected: words.len() + 1,
            actual: words.len(),
        });
    }

    let packets = words.len() / 2;
    let mut data = Vec::with_capacity(packets * SYSEX7_PACKET_BYTES);
    for (i, packet) in words.chunks_exact(2).enumerate() {
        let status = ((packet[0] >> 20) & 0xF) as u8;
        let expected = match (i, packets - 1) {
            (_, 0) => SYSEX7_COMPLETE,
            (0, _) => SYSEX7_START,
            (i, last) if i == last => SYSEX7_END,
            _ => SYSEX7_CONTINUE,
        };
        if status != expected || ((packet[0] >> 24) & 0xF) as u8 != u8::from(group) {
            return Err(DecodeError::UnrecognizedStatus(byte_at(packet[0], 1)));
        }

        let count = ((packet[0] >> 16) & 0xF) as usize;
        if count > SYSEX7_PACKET_BYTES {
            return Err(DecodeError::MalformedLength {
                expected: SYSEX7_PACKET_BYTES,
                actual: count,
            });
        }

        let [_, _, b0, b1] = packet[0].to_be_bytes();
        let [b2, b3, b4, b5] = packet[1].to_be_bytes();
        for byte in [b0, b1, b2, b3, b4, b5].into_iter().take(count) {
            data.push(field7("sysex data", byte)?);
        }
    }
    Ok(MidiEvent::sysex7(data, group))
}

/// Decode one complete UMP message.
///
/// `words` must hold exactly the words of one message, except SysEx7 which may
/// span several 2-word packets. Values are stored in the native width of the
/// message type: 7/14-bit for types 0x1 and 0x2, 16/32-bit for type 0x4.
pub fn decode_ump(words: &[u32]) -> Result<MidiEvent> {
    let Some(&w0) = words.first() else {
        return Err(DecodeError::MalformedLength {
            expected: 1,
            actual: 0,
        });
    };
    let mt = UmpMessageType::from_word(w0);
    let group = u4::new(((w0 >> 24) & 0xF) as u8);

    if mt == UmpMessageType::Data64 {
        return decode_sysex7(words, group);
    }

    let expected = mt.word_count();
    let supported = matches!(
        mt,
        UmpMessageType::Utility
            | UmpMessageType::SystemRealTimeAndCommon
            | UmpMessageType::Midi1ChannelVoice
            | UmpMessageType::Midi2ChannelVoice
    );
    if !supported {
        return Err(DecodeError::UnrecognizedStatus(byte_at(w0, 0)));
    }
    if words.len() != expected {
        return Err(DecodeError::MalformedLength {
            expected,
            actual: words.len(),
        });
    }

    match mt {
        UmpMessageType::Utility => decode_utility(w0, group),
        UmpMessageType::SystemRealTimeAndCommon => decode_packed_midi1(w0, group, false),
        UmpMessageType::Midi1ChannelVoice => decode_packed_midi1(w0, group, true),
        _ => decode_midi2_channel_voice(words, group),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(n: u8) -> u4 {
        u4::new(n)
    }

    #[test]
    fn test_real_time_word() {
        let words = encode_ump(&MidiEvent::r#continue(g(0)), MidiProtocol::Midi2);
        assert_eq!(words.as_slice(), &[0x10FB_0000]);
        let words = encode_ump(&MidiEvent::timing_clock(g(0xA)), MidiProtocol::Midi1);
        assert_eq!(words.as_slice(), &[0x1AF8_0000]);
    }

    #[test]
    fn test_system_common_words() {
        let event = MidiEvent::song_position_pointer(u14::new(0x1234), g(2));
        assert_eq!(
            encode_ump(&event, MidiProtocol::Midi2).as_slice(),
            &[0x12F2_3424]
        );
        let event = MidiEvent::tune_request(g(0));
        assert_eq!(
            encode_ump(&event, MidiProtocol::Midi2).as_slice(),
            &[0x10F6_0000]
        );
    }

    #[test]
    fn test_midi1_channel_voice_word() {
        let event = MidiEvent::note_on(
            u7::new(0x3C),
            Value7Bit16Bit::Midi1(u7::new(0x64)),
            g(1),
            g(5),
        );
        let words = encode_ump(&event, MidiProtocol::Midi1);
        assert_eq!(words.as_slice(), &[0x2591_3C64]);
        assert_eq!(decode_ump(&words), Ok(event));

        let event = MidiEvent::program_change(u7::new(5), g(0), g(0));
        assert_eq!(
            encode_ump(&event, MidiProtocol::Midi1).as_slice(),
            &[0x20C0_0500]
        );
    }

    #[test]
    fn test_midi2_note_on_layout() {
        let event = MidiEvent::note_on(
            u7::new(0x3C),
            Value7Bit16Bit::Midi2(0xABCD),
            g(2),
            g(1),
        );
        let words = encode_ump(&event, MidiProtocol::Midi2);
        assert_eq!(words.as_slice(), &[0x4192_3C00, 0xABCD_0000]);
        assert_eq!(decode_ump(&words), Ok(event));
    }

    #[test]
    fn test_midi2_widens_midi1_values() {
        let event = MidiEvent::pitch_bend(
            Value14Bit32Bit::Midi1(u14::new(0x2000)),
            g(0),
            g(0),
        );
        assert_eq!(
            encode_ump(&event, MidiProtocol::Midi2).as_slice(),
            &[0x40E0_0000, 0x8000_0000]
        );
        let event = MidiEvent::cc(
            u7::new(7),
            Value7Bit32Bit::Midi1(u7::new(127)),
            g(0),
            g(0),
        );
        assert_eq!(
            encode_ump(&event, MidiProtocol::Midi2).as_slice(),
            &[0x40B0_0700, 0xFFFF_FFFF]
        );
    }

    #[test]
    fn test_midi2_program_change() {
        let event = MidiEvent::program_change(u7::new(0x42), g(3), g(0));
        let words = encode_ump(&event, MidiProtocol::Midi2);
        assert_eq!(words.as_slice(), &[0x40C3_0000, 0x4200_0000]);
        assert_eq!(decode_ump(&words), Ok(event));
    }

    #[test]
    fn test_sysex7_single_packet() {
        let event = MidiEvent::try_sysex7(&[1, 2, 3], g(4)).unwrap();
        let words = encode_ump(&event, MidiProtocol::Midi2);
        assert_eq!(words.as_slice(), &[0x3403_0102, 0x0300_0000]);
        assert_eq!(decode_ump(&words), Ok(event));
    }

    #[test]
    fn test_sysex7_multi_packet() {
        let payload: Vec<u8> = (1..=14).collect();
        let event = MidiEvent::try_sysex7(&payload, g(0)).unwrap();
        let words = encode_ump(&event, MidiProtocol::Midi2);
        assert_eq!(
            words.as_slice(),
            &[
                0x3016_0102,
                0x0304_0506,
                0x3026_0708,
                0x090A_0B0C,
                0x3032_0D0E,
                0x0000_0000,
            ]
        );
        assert_eq!(decode_ump(&words), Ok(event));
    }

    #[test]
    fn test_sysex7_empty() {
        let event = MidiEvent::sysex7(Vec::new(), g(0));
        let words = encode_ump(&event, MidiProtocol::Midi2);
        assert_eq!(words.as_slice(), &[0x3000_0000, 0x0000_0000]);
        assert_eq!(decode_ump(&words), Ok(event));
    }

    #[test]
    fn test_sysex7_out_of_order_packets() {
        assert_eq!(
            decode_ump(&[0x3026_0708, 0x090A_0B0C]),
            Err(DecodeError::UnrecognizedStatus(0x26))
        );
        assert_eq!(
            decode_ump(&[0x3007_0102, 0x0304_0506]),
            Err(DecodeError::MalformedLength {
                expected: 6,
                actual: 7
            })
        );
    }

    #[test]
    fn test_utility_words() {
        let event = MidiEvent::jitter_reduction_timestamp(0xBEEF, g(0));
        let words = encode_ump(&event, MidiProtocol::Midi2);
        assert_eq!(words.as_slice(), &[0x0020_BEEF]);
        assert_eq!(decode_ump(&words), Ok(event));
        assert_eq!(
            decode_ump(&[0x0000_0000]),
            Ok(MidiEvent::no_op(g(0)))
        );
        assert_eq!(
            decode_ump(&[0x0050_0000]),
            Err(DecodeError::UnrecognizedStatus(0x50))
        );
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(
            decode_ump(&[]),
            Err(DecodeError::MalformedLength {
                expected: 1,
                actual: 0
            })
        );
        assert_eq!(
            decode_ump(&[0x4090_3C00]),
            Err(DecodeError::MalformedLength {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            decode_ump(&[0x10FB_0000, 0]),
            Err(DecodeError::MalformedLength {
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(
            decode_ump(&[0x5000_0000, 0, 0, 0]),
            Err(DecodeError::UnrecognizedStatus(0x50))
        );
        assert_eq!(
            decode_ump(&[0x4090_BC00, 0]),
            Err(DecodeError::OutOfRangeField {
                field: "note",
                value: 0xBC,
                bits: 7
            })
        );
        assert_eq!(
            decode_ump(&[0x1090_3C64]),
            Err(DecodeError::UnrecognizedStatus(0x90))
        );
        assert_eq!(
            decode_ump(&[0x20F8_0000]),
            Err(DecodeError::UnrecognizedStatus(0xF8))
        );
        assert_eq!(
            decode_ump(&[0x10F3_8000]),
            Err(DecodeError::OutOfRangeField {
                field: "data byte 1",
                value: 0x80,
                bits: 7
            })
        );
        assert_eq!(
            decode_ump(&[0x4010_0000, 0]),
            Err(DecodeError::UnrecognizedStatus(0x10))
        );
    }

    #[test]
    fn test_decoded_midi2_values_are_native_width() {
        let event = decode_ump(&[0x40D0_0000, 0x1234_5678]).unwrap();
        match event {
            MidiEvent::ChannelVoice {
                msg: ChannelVoice::ChannelPressure { amount },
                ..
            } => assert!(matches!(amount.get(), Value7Bit32Bit::Midi2(0x1234_5678))),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
