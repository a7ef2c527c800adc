//! Logical MIDI events, independent of wire protocol.
//!
//! An event carries its UMP group and, for channel voice messages, its channel.
//! Values attached to fields are [`Validated`] so they are always in range and can
//! be rendered at any width the target protocol needs.

mod kind;

pub use kind::{
    ChannelVoiceType, MessageClass, MessageType, SysExType, SystemCommonType, UtilityType,
};

use midi2::prelude::*;

use crate::error::{DecodeError, Result};
use crate::value::{Validated, Value14Bit32Bit, Value7Bit16Bit, Value7Bit32Bit};

/// A decoded (or to-be-encoded) MIDI message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MidiEvent {
    ChannelVoice {
        group: u4,
        channel: u4,
        msg: ChannelVoice,
    },
    SystemCommon {
        group: u4,
        msg: SystemCommon,
    },
    SystemRealTime {
        group: u4,
        msg: SystemRealTime,
    },
    SystemExclusive {
        group: u4,
        msg: SysEx,
    },
    /// UMP-only housekeeping messages.
    Utility {
        group: u4,
        msg: Utility,
    },
}

/// Channel voice message body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelVoice {
    NoteOff {
        note: u7,
        velocity: Validated<Value7Bit16Bit>,
    },
    NoteOn {
        note: u7,
        velocity: Validated<Value7Bit16Bit>,
    },
    /// Polyphonic key pressure.
    NotePressure {
        note: u7,
        amount: Validated<Value7Bit32Bit>,
    },
    ControlChange {
        controller: u7,
        value: Validated<Value7Bit32Bit>,
    },
    ProgramChange {
        program: u7,
    },
    ChannelPressure {
        amount: Validated<Value7Bit32Bit>,
    },
    PitchBend {
        value: Validated<Value14Bit32Bit>,
    },
}

/// System common message body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SystemCommon {
    /// MTC quarter frame (0xF1).
    TimecodeQuarterFrame { data: u7 },
    /// Song position in MIDI beats (0xF2).
    SongPositionPointer { beat: u14 },
    SongSelect { number: u7 },
    /// Bus select (0xF5). Never ratified, but widely sent.
    UnofficialBusSelect { bus: u7 },
    TuneRequest,
}

/// System real-time messages. These carry no data, so the message is its own type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SystemRealTime {
    TimingClock,
    Start,
    Continue,
    Stop,
    ActiveSensing,
    SystemReset,
}

/// System exclusive message body. Payload excludes the 0xF0/0xF7 framing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SysEx {
    SysEx7 { data: Vec<u7> },
}

/// UMP utility message body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Utility {
    NoOp,
    JitterReductionClock { time: u16 },
    JitterReductionTimestamp { time: u16 },
}

impl SystemRealTime {
    /// MIDI 1.0 status byte.
    #[inline]
    pub const fn status(self) -> u8 {
        match self {
            Self::TimingClock => 0xF8,
            Self::Start => 0xFA,
            Self::Continue => 0xFB,
            Self::Stop => 0xFC,
            Self::ActiveSensing => 0xFE,
            Self::SystemReset => 0xFF,
        }
    }

    #[inline]
    pub const fn from_status(status: u8) -> Option<Self> {
        match status {
            0xF8 => Some(Self::TimingClock),
            0xFA => Some(Self::Start),
            0xFB => Some(Self::Continue),
            0xFC => Some(Self::Stop),
            0xFE => Some(Self::ActiveSensing),
            0xFF => Some(Self::SystemReset),
            _ => None,
        }
    }
}

impl MidiEvent {
    // ==================== Channel voice ====================

    #[inline]
    pub fn note_on(note: u7, velocity: Value7Bit16Bit, channel: u4, group: u4) -> Self {
        Self::channel_voice(
            ChannelVoice::NoteOn {
                note,
                velocity: velocity.into(),
            },
            channel,
            group,
        )
    }

    #[inline]
    pub fn note_off(note: u7, velocity: Value7Bit16Bit, channel: u4, group: u4) -> Self {
        Self::channel_voice(
            ChannelVoice::NoteOff {
                note,
                velocity: velocity.into(),
            },
            channel,
            group,
        )
    }

    #[inline]
    pub fn note_pressure(note: u7, amount: Value7Bit32Bit, channel: u4, group: u4) -> Self {
        Self::channel_voice(
            ChannelVoice::NotePressure {
                note,
                amount: amount.into(),
            },
            channel,
            group,
        )
    }

    #[inline]
    pub fn cc(controller: u7, value: Value7Bit32Bit, channel: u4, group: u4) -> Self {
        Self::channel_voice(
            ChannelVoice::ControlChange {
                controller,
                value: value.into(),
            },
            channel,
            group,
        )
    }

    #[inline]
    pub fn program_change(program: u7, channel: u4, group: u4) -> Self {
        Self::channel_voice(ChannelVoice::ProgramChange { program }, channel, group)
    }

    #[inline]
    pub fn channel_pressure(amount: Value7Bit32Bit, channel: u4, group: u4) -> Self {
        Self::channel_voice(
            ChannelVoice::ChannelPressure {
                amount: amount.into(),
            },
            channel,
            group,
        )
    }

    #[inline]
    pub fn pitch_bend(value: Value14Bit32Bit, channel: u4, group: u4) -> Self {
        Self::channel_voice(
            ChannelVoice::PitchBend {
                value: value.into(),
            },
            channel,
            group,
        )
    }

    #[inline]
    pub fn channel_voice(msg: ChannelVoice, channel: u4, group: u4) -> Self {
        Self::ChannelVoice {
            group,
            channel,
            msg,
        }
    }

    // ==================== System common ====================

    #[inline]
    pub fn timecode_quarter_frame(data: u7, group: u4) -> Self {
        Self::SystemCommon {
            group,
            msg: SystemCommon::TimecodeQuarterFrame { data },
        }
    }

    #[inline]
    pub fn song_position_pointer(beat: u14, group: u4) -> Self {
        Self::SystemCommon {
            group,
            msg: SystemCommon::SongPositionPointer { beat },
        }
    }

    #[inline]
    pub fn song_select(number: u7, group: u4) -> Self {
        Self::SystemCommon {
            group,
            msg: SystemCommon::SongSelect { number },
        }
    }

    #[inline]
    pub fn unofficial_bus_select(bus: u7, group: u4) -> Self {
        Self::SystemCommon {
            group,
            msg: SystemCommon::UnofficialBusSelect { bus },
        }
    }

    #[inline]
    pub fn tune_request(group: u4) -> Self {
        Self::SystemCommon {
            group,
            msg: SystemCommon::TuneRequest,
        }
    }

    // ==================== System real-time ====================

    #[inline]
    pub fn system_real_time(msg: SystemRealTime, group: u4) -> Self {
        Self::SystemRealTime { group, msg }
    }

    #[inline]
    pub fn timing_clock(group: u4) -> Self {
        Self::system_real_time(SystemRealTime::TimingClock, group)
    }

    #[inline]
    pub fn start(group: u4) -> Self {
        Self::system_real_time(SystemRealTime::Start, group)
    }

    #[inline]
    pub fn r#continue(group: u4) -> Self {
        Self::system_real_time(SystemRealTime::Continue, group)
    }

    #[inline]
    pub fn stop(group: u4) -> Self {
        Self::system_real_time(SystemRealTime::Stop, group)
    }

    #[inline]
    pub fn active_sensing(group: u4) -> Self {
        Self::system_real_time(SystemRealTime::ActiveSensing, group)
    }

    #[inline]
    pub fn system_reset(group: u4) -> Self {
        Self::system_real_time(SystemRealTime::SystemReset, group)
    }

    // ==================== System exclusive ====================

    #[inline]
    pub fn sysex7(data: Vec<u7>, group: u4) -> Self {
        Self::SystemExclusive {
            group,
            msg: SysEx::SysEx7 { data },
        }
    }

    /// SysEx7 from raw payload bytes, rejecting any byte with its top bit set.
    pub fn try_sysex7(data: &[u8], group: u4) -> Result<Self> {
        let data = data
            .iter()
            .enumerate()
            .map(|(index, &byte)| {
                if byte & 0x80 != 0 {
                    Err(DecodeError::InvalidDataByte { index, byte })
                } else {
                    Ok(u7::new(byte))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::sysex7(data, group))
    }

    // ==================== Utility ====================

    #[inline]
    pub fn no_op(group: u4) -> Self {
        Self::Utility {
            group,
            msg: Utility::NoOp,
        }
    }

    #[inline]
    pub fn jitter_reduction_clock(time: u16, group: u4) -> Self {
        Self::Utility {
            group,
            msg: Utility::JitterReductionClock { time },
        }
    }

    #[inline]
    pub fn jitter_reduction_timestamp(time: u16, group: u4) -> Self {
        Self::Utility {
            group,
            msg: Utility::JitterReductionTimestamp { time },
        }
    }

    // ==================== Accessors ====================

    #[inline]
    pub fn group(&self) -> u4 {
        match self {
            Self::ChannelVoice { group, .. }
            | Self::SystemCommon { group, .. }
            | Self::SystemRealTime { group, .. }
            | Self::SystemExclusive { group, .. }
            | Self::Utility { group, .. } => *group,
        }
    }

    #[inline]
    pub fn set_group(&mut self, new_group: u4) {
        match self {
            Self::ChannelVoice { group, .. }
            | Self::SystemCommon { group, .. }
            | Self::SystemRealTime { group, .. }
            | Self::SystemExclusive { group, .. }
            | Self::Utility { group, .. } => *group = new_group,
        }
    }

    #[inline]
    pub fn with_group(mut self, group: u4) -> Self {
        self.set_group(group);
        self
    }

    /// Channel of a channel voice message.
    #[inline]
    pub fn channel(&self) -> Option<u4> {
        match self {
            Self::ChannelVoice { channel, .. } => Some(*channel),
            _ => None,
        }
    }

    /// Controller number of a control change.
    #[inline]
    pub fn controller(&self) -> Option<u7> {
        match self {
            Self::ChannelVoice {
                msg: ChannelVoice::ControlChange { controller, .. },
                ..
            } => Some(*controller),
            _ => None,
        }
    }

    /// Note number of note and note pressure messages.
    #[inline]
    pub fn note(&self) -> Option<u7> {
        match self {
            Self::ChannelVoice {
                msg:
                    ChannelVoice::NoteOn { note, .. }
                    | ChannelVoice::NoteOff { note, .. }
                    | ChannelVoice::NotePressure { note, .. },
                ..
            } => Some(*note),
            _ => None,
        }
    }
}
