//! Serde support for values and events.
//!
//! The 4/7/14-bit field types are not serde-aware, so everything goes through
//! mirror types of plain integers. Deserializing re-checks every field width and
//! clamps real-valued domains, so a deserialized event upholds the same
//! invariants as a constructed one.

use midi2::prelude::*;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DecodeError;
use crate::event::{ChannelVoice, MidiEvent, SysEx, SystemCommon, SystemRealTime, Utility};
use crate::scale::Width;
use crate::value::{DomainValue, Validated, Value14Bit32Bit, Value7Bit16Bit, Value7Bit32Bit};

#[derive(Serialize, Deserialize)]
enum SerializableValue {
    UnitInterval(f64),
    BipolarUnitInterval(f64),
    Midi1(u32),
    Midi2(u32),
}

fn checked<E: serde::de::Error>(field: &'static str, value: u32, width: Width) -> Result<u32, E> {
    if value > width.max() {
        Err(E::custom(DecodeError::OutOfRangeField {
            field,
            value,
            bits: width.bits(),
        }))
    } else {
        Ok(value)
    }
}

fn u4_field<E: serde::de::Error>(field: &'static str, value: u8) -> Result<u4, E> {
    if value > 0x0F {
        Err(E::custom(DecodeError::OutOfRangeField {
            field,
            value: u32::from(value),
            bits: 4,
        }))
    } else {
        Ok(u4::new(value))
    }
}

fn u7_field<E: serde::de::Error>(field: &'static str, value: u8) -> Result<u7, E> {
    checked(field, u32::from(value), Width::Bits7).map(|v| u7::new(v as u8))
}

fn u14_field<E: serde::de::Error>(field: &'static str, value: u16) -> Result<u14, E> {
    checked(field, u32::from(value), Width::Bits14).map(|v| u14::new(v as u16))
}

// ==================== Values ====================

impl Serialize for Value7Bit16Bit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Self::UnitInterval(v) => SerializableValue::UnitInterval(v),
            Self::Midi1(v) => SerializableValue::Midi1(u32::from(u8::from(v))),
            Self::Midi2(v) => SerializableValue::Midi2(u32::from(v)),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value7Bit16Bit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match SerializableValue::deserialize(deserializer)? {
            SerializableValue::UnitInterval(v) => Self::UnitInterval(v),
            SerializableValue::Midi1(v) => {
                Self::Midi1(u7::new(checked::<D::Error>("midi1", v, Width::Bits7)? as u8))
            }
            SerializableValue::Midi2(v) => {
                Self::Midi2(checked::<D::Error>("midi2", v, Width::Bits16)? as u16)
            }
            SerializableValue::BipolarUnitInterval(_) => {
                return Err(D::Error::custom("bipolar domain in a unipolar value"))
            }
        };
        Ok(value.clamped())
    }
}

impl Serialize for Value7Bit32Bit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Self::UnitInterval(v) => SerializableValue::UnitInterval(v),
            Self::Midi1(v) => SerializableValue::Midi1(u32::from(u8::from(v))),
            Self::Midi2(v) => SerializableValue::Midi2(v),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value7Bit32Bit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match SerializableValue::deserialize(deserializer)? {
            SerializableValue::UnitInterval(v) => Self::UnitInterval(v),
            SerializableValue::Midi1(v) => {
                Self::Midi1(u7::new(checked::<D::Error>("midi1", v, Width::Bits7)? as u8))
            }
            SerializableValue::Midi2(v) => Self::Midi2(v),
            SerializableValue::BipolarUnitInterval(_) => {
                return Err(D::Error::custom("bipolar domain in a unipolar value"))
            }
        };
        Ok(value.clamped())
    }
}

impl Serialize for Value14Bit32Bit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Self::UnitInterval(v) => SerializableValue::UnitInterval(v),
            Self::BipolarUnitInterval(v) => SerializableValue::BipolarUnitInterval(v),
            Self::Midi1(v) => SerializableValue::Midi1(u32::from(u16::from(v))),
            Self::Midi2(v) => SerializableValue::Midi2(v),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value14Bit32Bit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match SerializableValue::deserialize(deserializer)? {
            SerializableValue::UnitInterval(v) => Self::UnitInterval(v),
            SerializableValue::BipolarUnitInterval(v) => Self::BipolarUnitInterval(v),
            SerializableValue::Midi1(v) => {
                Self::Midi1(u14::new(checked::<D::Error>("midi1", v, Width::Bits14)? as u16))
            }
            SerializableValue::Midi2(v) => Self::Midi2(v),
        };
        Ok(value.clamped())
    }
}

impl<V: DomainValue + Serialize> Serialize for Validated<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.get().serialize(serializer)
    }
}

impl<'de, V: DomainValue + Deserialize<'de>> Deserialize<'de> for Validated<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        V::deserialize(deserializer).map(Validated::new)
    }
}

// ==================== Events ====================

#[derive(Serialize, Deserialize)]
struct SerializableMidiEvent {
    group: u8,
    data: EventData,
}

#[derive(Serialize, Deserialize)]
enum EventData {
    NoteOff { channel: u8, note: u8, velocity: Value7Bit16Bit },
    NoteOn { channel: u8, note: u8, velocity: Value7Bit16Bit },
    NotePressure { channel: u8, note: u8, amount: Value7Bit32Bit },
    ControlChange { channel: u8, controller: u8, value: Value7Bit32Bit },
    ProgramChange { channel: u8, program: u8 },
    ChannelPressure { channel: u8, amount: Value7Bit32Bit },
    PitchBend { channel: u8, value: Value14Bit32Bit },
    TimecodeQuarterFrame { data: u8 },
    SongPositionPointer { beat: u16 },
    SongSelect { number: u8 },
    UnofficialBusSelect { bus: u8 },
    TuneRequest,
    SystemRealTime { status: u8 },
    SysEx7 { data: Vec<u8> },
    NoOp,
    JitterReductionClock { time: u16 },
    JitterReductionTimestamp { time: u16 },
}

fn channel_voice_data(channel: u4, msg: &ChannelVoice) -> EventData {
    let channel = u8::from(channel);
    match *msg {
        ChannelVoice::NoteOff { note, velocity } => EventData::NoteOff {
            channel,
            note: u8::from(note),
            velocity: velocity.get(),
        },
        ChannelVoice::NoteOn { note, velocity } => EventData::NoteOn {
            channel,
            note: u8::from(note),
            velocity: velocity.get(),
        },
        ChannelVoice::NotePressure { note, amount } => EventData::NotePressure {
            channel,
            note: u8::from(note),
            amount: amount.get(),
        },
        ChannelVoice::ControlChange { controller, value } => EventData::ControlChange {
            channel,
            controller: u8::from(controller),
            value: value.get(),
        },
        ChannelVoice::ProgramChange { program } => EventData::ProgramChange {
            channel,
            program: u8::from(program),
        },
        ChannelVoice::ChannelPressure { amount } => EventData::ChannelPressure {
            channel,
            amount: amount.get(),
        },
        ChannelVoice::PitchBend { value } => EventData::PitchBend {
            channel,
            value: value.get(),
        },
    }
}

impl Serialize for MidiEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let data = match self {
            MidiEvent::ChannelVoice { channel, msg, .. } => channel_voice_data(*channel, msg),
            MidiEvent::SystemCommon { msg, .. } => match *msg {
                SystemCommon::TimecodeQuarterFrame { data } => EventData::TimecodeQuarterFrame {
                    data: u8::from(data),
                },
                SystemCommon::SongPositionPointer { beat } => EventData::SongPositionPointer {
                    beat: u16::from(beat),
                },
                SystemCommon::SongSelect { number } => EventData::SongSelect {
                    number: u8::from(number),
                },
                SystemCommon::UnofficialBusSelect { bus } => EventData::UnofficialBusSelect {
                    bus: u8::from(bus),
                },
                SystemCommon::TuneRequest => EventData::TuneRequest,
            },
            MidiEvent::SystemRealTime { msg, .. } => EventData::SystemRealTime {
                status: msg.status(),
            },
            MidiEvent::SystemExclusive {
                msg: SysEx::SysEx7 { data },
                ..
            } => EventData::SysEx7 {
                data: data.iter().map(|b| u8::from(*b)).collect(),
            },
            MidiEvent::Utility { msg, .. } => match *msg {
                Utility::NoOp => EventData::NoOp,
                Utility::JitterReductionClock { time } => EventData::JitterReductionClock { time },
                Utility::JitterReductionTimestamp { time } => {
                    EventData::JitterReductionTimestamp { time }
                }
            },
        };

        SerializableMidiEvent {
            group: u8::from(self.group()),
            data,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MidiEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let serializable = SerializableMidiEvent::deserialize(deserializer)?;
        let group = u4_field::<D::Error>("group", serializable.group)?;

        let voice = |channel: u8, msg: ChannelVoice| -> Result<MidiEvent, D::Error> {
            let channel = u4_field::<D::Error>("channel", channel)?;
            Ok(MidiEvent::channel_voice(msg, channel, group))
        };

        match serializable.data {
            EventData::NoteOff {
                channel,
                note,
                velocity,
            } => voice(
                channel,
                ChannelVoice::NoteOff {
                    note: u7_field::<D::Error>("note", note)?,
                    velocity: velocity.into(),
                },
            ),
            EventData::NoteOn {
                channel,
                note,
                velocity,
            } => voice(
                channel,
                ChannelVoice::NoteOn {
                    note: u7_field::<D::Error>("note", note)?,
                    velocity: velocity.into(),
                },
            ),
            EventData::NotePressure {
                channel,
                note,
                amount,
            } => voice(
                channel,
                ChannelVoice::NotePressure {
                    note: u7_field::<D::Error>("note", note)?,
                    amount: amount.into(),
                },
            ),
            EventData::ControlChange {
                channel,
                controller,
                value,
            } => voice(
                channel,
                ChannelVoice::ControlChange {
                    controller: u7_field::<D::Error>("controller", controller)?,
                    value: value.into(),
                },
            ),
            EventData::ProgramChange { channel, program } => voice(
                channel,
                ChannelVoice::ProgramChange {
                    program: u7_field::<D::Error>("program", program)?,
                },
            ),
            EventData::ChannelPressure { channel, amount } => voice(
                channel,
                ChannelVoice::ChannelPressure {
                    amount: amount.into(),
                },
            ),
            EventData::PitchBend { channel, value } => voice(
                channel,
                ChannelVoice::PitchBend {
                    value: value.into(),
                },
            ),
            EventData::TimecodeQuarterFrame { data } => Ok(MidiEvent::timecode_quarter_frame(
                u7_field::<D::Error>("data", data)?,
                group,
            )),
            EventData::SongPositionPointer { beat } => Ok(MidiEvent::song_position_pointer(
                u14_field::<D::Error>("beat", beat)?,
                group,
            )),
            EventData::SongSelect { number } => {
                let number = u7_field::<D::Error>("number", number)?;
                Ok(MidiEvent::song_select(number, group))
            }
            EventData::UnofficialBusSelect { bus } => Ok(MidiEvent::unofficial_bus_select(
                u7_field::<D::Error>("bus", bus)?,
                group,
            )),
            EventData::TuneRequest => Ok(MidiEvent::tune_request(group)),
            EventData::SystemRealTime { status } => SystemRealTime::from_status(status)
                .map(|msg| MidiEvent::system_real_time(msg, group))
                .ok_or_else(|| D::Error::custom(DecodeError::UnrecognizedStatus(status))),
            EventData::SysEx7 { data } => {
                MidiEvent::try_sysex7(&data, group).map_err(D::Error::custom)
            }
            EventData::NoOp => Ok(MidiEvent::no_op(group)),
            EventData::JitterReductionClock { time } => {
                Ok(MidiEvent::jitter_reduction_clock(time, group))
            }
            EventData::JitterReductionTimestamp { time } => {
                Ok(MidiEvent::jitter_reduction_timestamp(time, group))
            }
        }
    }
}
