//! Byte and word layouts checked against independent encoders.
//!
//! `midi-msg` renders MIDI 1.0 bytes and the `midi2` message builders render
//! MIDI 2.0 channel voice packets; our codec must agree with both bit for bit.

use duet_midi::prelude::*;
use duet_midi::{decode_midi1, decode_ump, encode_midi1, encode_ump};
use midi2::{Channeled, Data, Grouped};
use midi_msg::{
    Channel, ChannelVoiceMsg, ControlChange, MidiMsg, SystemCommonMsg, SystemRealTimeMsg,
};

fn g(n: u8) -> u4 {
    u4::new(n)
}

// ---------------------------------------------------------------------------
// MIDI 1.0 vs midi-msg
// ---------------------------------------------------------------------------

#[test]
fn test_channel_voice_bytes_match_midi_msg() {
    let cases: Vec<(MidiEvent, MidiMsg)> = vec![
        (
            MidiEvent::note_on(
                u7::new(60),
                Value7Bit16Bit::Midi1(u7::new(100)),
                u4::new(0),
                g(0),
            ),
            MidiMsg::ChannelVoice {
                channel: Channel::Ch1,
                msg: ChannelVoiceMsg::NoteOn {
                    note: 60,
                    velocity: 100,
                },
            },
        ),
        (
            MidiEvent::note_off(
                u7::new(72),
                Value7Bit16Bit::Midi1(u7::new(64)),
                u4::new(9),
                g(0),
            ),
            MidiMsg::ChannelVoice {
                channel: Channel::from_u8(9),
                msg: ChannelVoiceMsg::NoteOff {
                    note: 72,
                    velocity: 64,
                },
            },
        ),
        (
            MidiEvent::note_pressure(
                u7::new(61),
                Value7Bit32Bit::Midi1(u7::new(33)),
                u4::new(2),
                g(0),
            ),
            MidiMsg::ChannelVoice {
                channel: Channel::from_u8(2),
                msg: ChannelVoiceMsg::PolyPressure {
                    note: 61,
                    pressure: 33,
                },
            },
        ),
        (
            MidiEvent::cc(
                u7::new(7),
                Value7Bit32Bit::Midi1(u7::new(127)),
                u4::new(15),
                g(0),
            ),
            MidiMsg::ChannelVoice {
                channel: Channel::from_u8(15),
                msg: ChannelVoiceMsg::ControlChange {
                    control: ControlChange::CC {
                        control: 7,
                        value: 127,
                    },
                },
            },
        ),
        (
            MidiEvent::program_change(u7::new(42), u4::new(3), g(0)),
            MidiMsg::ChannelVoice {
                channel: Channel::from_u8(3),
                msg: ChannelVoiceMsg::ProgramChange { program: 42 },
            },
        ),
        (
            MidiEvent::channel_pressure(Value7Bit32Bit::Midi1(u7::new(5)), u4::new(0), g(0)),
            MidiMsg::ChannelVoice {
                channel: Channel::Ch1,
                msg: ChannelVoiceMsg::ChannelPressure { pressure: 5 },
            },
        ),
        (
            MidiEvent::pitch_bend(Value14Bit32Bit::CENTER, u4::new(1), g(0)),
            MidiMsg::ChannelVoice {
                channel: Channel::from_u8(1),
                msg: ChannelVoiceMsg::PitchBend { bend: 8192 },
            },
        ),
        (
            MidiEvent::pitch_bend(
                Value14Bit32Bit::Midi1(u14::new(0x3FFF)),
                u4::new(1),
                g(0),
            ),
            MidiMsg::ChannelVoice {
                channel: Channel::from_u8(1),
                msg: ChannelVoiceMsg::PitchBend { bend: 0x3FFF },
            },
        ),
    ];

    for (event, reference) in cases {
        assert_eq!(
            encode_midi1(&event).to_vec(),
            reference.to_midi(),
            "{event:?}"
        );
    }
}

#[test]
fn test_system_bytes_match_midi_msg() {
    let cases: Vec<(MidiEvent, MidiMsg)> = vec![
        (
            MidiEvent::r#continue(g(0)),
            MidiMsg::SystemRealTime {
                msg: SystemRealTimeMsg::Continue,
            },
        ),
        (
            MidiEvent::timing_clock(g(0)),
            MidiMsg::SystemRealTime {
                msg: SystemRealTimeMsg::TimingClock,
            },
        ),
        (
            MidiEvent::system_reset(g(0)),
            MidiMsg::SystemRealTime {
                msg: SystemRealTimeMsg::SystemReset,
            },
        ),
        (
            MidiEvent::song_position_pointer(u14::new(1000), g(0)),
            MidiMsg::SystemCommon {
                msg: SystemCommonMsg::SongPosition(1000),
            },
        ),
        (
            MidiEvent::song_select(u7::new(12), g(0)),
            MidiMsg::SystemCommon {
                msg: SystemCommonMsg::SongSelect(12),
            },
        ),
        (
            MidiEvent::tune_request(g(0)),
            MidiMsg::SystemCommon {
                msg: SystemCommonMsg::TuneRequest,
            },
        ),
    ];

    for (event, reference) in cases {
        assert_eq!(
            encode_midi1(&event).to_vec(),
            reference.to_midi(),
            "{event:?}"
        );
    }
}

// ---------------------------------------------------------------------------
// MIDI 2.0 channel voice vs midi2 builders
// ---------------------------------------------------------------------------

#[test]
fn test_note_on_words_match_midi2() {
    let mut reference = midi2::channel_voice2::NoteOn::<[u32; 2]>::new();
    reference.set_group(u4::new(4));
    reference.set_channel(u4::new(9));
    reference.set_note_number(u7::new(64));
    reference.set_velocity(0x1234);

    let event = MidiEvent::note_on(
        u7::new(64),
        Value7Bit16Bit::Midi2(0x1234),
        u4::new(9),
        u4::new(4),
    );
    let words = encode_ump(&event, MidiProtocol::Midi2);
    assert_eq!(words.as_slice(), reference.data());
    assert_eq!(decode_ump(reference.data()), Ok(event));
}

#[test]
fn test_note_off_words_match_midi2() {
    let mut reference = midi2::channel_voice2::NoteOff::<[u32; 2]>::new();
    reference.set_group(u4::new(0));
    reference.set_channel(u4::new(1));
    reference.set_note_number(u7::new(10));
    reference.set_velocity(0xFFFF);

    let event = MidiEvent::note_off(
        u7::new(10),
        Value7Bit16Bit::UnitInterval(1.0),
        u4::new(1),
        g(0),
    );
    assert_eq!(
        encode_ump(&event, MidiProtocol::Midi2).as_slice(),
        reference.data()
    );
}

#[test]
fn test_control_change_words_match_midi2() {
    let mut reference = midi2::channel_voice2::ControlChange::<[u32; 2]>::new();
    reference.set_group(u4::new(2));
    reference.set_channel(u4::new(3));
    reference.set_control(u7::new(74));
    reference.set_control_change_data(0xDEAD_BEEF);

    let event = MidiEvent::cc(
        u7::new(74),
        Value7Bit32Bit::Midi2(0xDEAD_BEEF),
        u4::new(3),
        u4::new(2),
    );
    assert_eq!(
        encode_ump(&event, MidiProtocol::Midi2).as_slice(),
        reference.data()
    );
    assert_eq!(decode_ump(reference.data()), Ok(event));
}

#[test]
fn test_pressure_and_bend_words_match_midi2() {
    let mut key = midi2::channel_voice2::KeyPressure::<[u32; 2]>::new();
    key.set_group(u4::new(0));
    key.set_channel(u4::new(0));
    key.set_note_number(u7::new(60));
    key.set_key_pressure_data(0x8000_0000);
    let event = MidiEvent::note_pressure(
        u7::new(60),
        Value7Bit32Bit::Midi1(u7::new(64)),
        u4::new(0),
        g(0),
    );
    assert_eq!(
        encode_ump(&event, MidiProtocol::Midi2).as_slice(),
        key.data()
    );

    let mut channel = midi2::channel_voice2::ChannelPressure::<[u32; 2]>::new();
    channel.set_group(u4::new(7));
    channel.set_channel(u4::new(7));
    channel.set_channel_pressure_data(42);
    let event = MidiEvent::channel_pressure(Value7Bit32Bit::Midi2(42), u4::new(7), u4::new(7));
    assert_eq!(
        encode_ump(&event, MidiProtocol::Midi2).as_slice(),
        channel.data()
    );

    let mut bend = midi2::channel_voice2::ChannelPitchBend::<[u32; 2]>::new();
    bend.set_group(u4::new(1));
    bend.set_channel(u4::new(0));
    bend.set_pitch_bend_data(0x8000_0000);
    let event = MidiEvent::pitch_bend(Value14Bit32Bit::CENTER, u4::new(0), u4::new(1));
    assert_eq!(
        encode_ump(&event, MidiProtocol::Midi2).as_slice(),
        bend.data()
    );
}

#[test]
fn test_program_change_words_match_midi2() {
    let mut reference = midi2::channel_voice2::ProgramChange::<[u32; 2]>::new();
    reference.set_group(u4::new(0));
    reference.set_channel(u4::new(5));
    reference.set_program(u7::new(99));

    let event = MidiEvent::program_change(u7::new(99), u4::new(5), g(0));
    assert_eq!(
        encode_ump(&event, MidiProtocol::Midi2).as_slice(),
        reference.data()
    );
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

fn midi1_native_events() -> Vec<MidiEvent> {
    vec![
        MidiEvent::note_on(
            u7::new(1),
            Value7Bit16Bit::Midi1(u7::new(127)),
            u4::new(15),
            g(0),
        ),
        MidiEvent::note_pressure(
            u7::new(127),
            Value7Bit32Bit::Midi1(u7::new(0)),
            u4::new(0),
            g(0),
        ),
        MidiEvent::cc(
            u7::new(0),
            Value7Bit32Bit::Midi1(u7::new(1)),
            u4::new(4),
            g(0),
        ),
        MidiEvent::pitch_bend(
            Value14Bit32Bit::Midi1(u14::new(0x0001)),
            u4::new(4),
            g(0),
        ),
        MidiEvent::timecode_quarter_frame(u7::new(0x35), g(0)),
        MidiEvent::unofficial_bus_select(u7::new(0x7F), g(0)),
        MidiEvent::active_sensing(g(0)),
        MidiEvent::try_sysex7(&[0x41, 0x10, 0x42, 0x12], g(0)).unwrap(),
    ]
}

#[test]
fn test_midi1_round_trip() {
    for event in midi1_native_events() {
        let bytes = encode_midi1(&event);
        assert_eq!(decode_midi1(&bytes), Ok(event.clone()), "{bytes:02X?}");
    }
}

#[test]
fn test_ump_round_trip_both_protocols() {
    for event in midi1_native_events() {
        for protocol in [MidiProtocol::Midi1, MidiProtocol::Midi2] {
            let event = event.clone().with_group(u4::new(6));
            let words = encode_ump(&event, protocol);
            assert_eq!(decode_ump(&words), Ok(event.clone()), "{words:08X?}");
        }
    }
}

#[test]
fn test_midi2_values_survive_midi2_round_trip_exactly() {
    for raw in [0u32, 1, 0x7FFF_FFFF, 0x8000_0000, 0xFFFF_FFFE, u32::MAX] {
        let event = MidiEvent::pitch_bend(Value14Bit32Bit::Midi2(raw), u4::new(0), g(0));
        let decoded = decode_ump(&encode_ump(&event, MidiProtocol::Midi2)).unwrap();
        match decoded {
            MidiEvent::ChannelVoice {
                msg: ChannelVoice::PitchBend { value },
                ..
            } => assert_eq!(value.midi2(), raw),
            other => panic!("unexpected event {other:?}"),
        }
    }
}

#[test]
fn test_midi1_to_midi2_and_back_preserves_midi1_value() {
    for v in 0..=127u8 {
        let event = MidiEvent::cc(
            u7::new(1),
            Value7Bit32Bit::Midi1(u7::new(v)),
            u4::new(0),
            g(0),
        );
        let wide = decode_ump(&encode_ump(&event, MidiProtocol::Midi2)).unwrap();
        let narrow = decode_midi1(&encode_midi1(&wide)).unwrap();
        assert_eq!(encode_midi1(&narrow).as_slice(), &[0xB0, 0x01, v]);
    }
}
