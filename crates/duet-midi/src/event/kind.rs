//! Message classes and per-class subtypes.

use super::{ChannelVoice, MidiEvent, SysEx, SystemCommon, SystemRealTime, Utility};

/// Top-level category of a MIDI message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageClass {
    ChannelVoice,
    SystemCommon,
    SystemRealTime,
    SystemExclusive,
    Utility,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelVoiceType {
    NoteOff,
    NoteOn,
    NotePressure,
    ControlChange,
    ProgramChange,
    ChannelPressure,
    PitchBend,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SystemCommonType {
    TimecodeQuarterFrame,
    SongPositionPointer,
    SongSelect,
    UnofficialBusSelect,
    TuneRequest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SysExType {
    SysEx7,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UtilityType {
    NoOp,
    JitterReductionClock,
    JitterReductionTimestamp,
}

/// Subtype of any class. System real-time messages are their own subtype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageType {
    ChannelVoice(ChannelVoiceType),
    SystemCommon(SystemCommonType),
    SystemRealTime(SystemRealTime),
    SystemExclusive(SysExType),
    Utility(UtilityType),
}

impl MessageType {
    #[inline]
    pub fn class(self) -> MessageClass {
        match self {
            Self::ChannelVoice(_) => MessageClass::ChannelVoice,
            Self::SystemCommon(_) => MessageClass::SystemCommon,
            Self::SystemRealTime(_) => MessageClass::SystemRealTime,
            Self::SystemExclusive(_) => MessageClass::SystemExclusive,
            Self::Utility(_) => MessageClass::Utility,
        }
    }
}

impl From<ChannelVoiceType> for MessageType {
    fn from(t: ChannelVoiceType) -> Self {
        Self::ChannelVoice(t)
    }
}

impl From<SystemCommonType> for MessageType {
    fn from(t: SystemCommonType) -> Self {
        Self::SystemCommon(t)
    }
}

impl From<SystemRealTime> for MessageType {
    fn from(t: SystemRealTime) -> Self {
        Self::SystemRealTime(t)
    }
}

impl From<SysExType> for MessageType {
    fn from(t: SysExType) -> Self {
        Self::SystemExclusive(t)
    }
}

impl From<UtilityType> for MessageType {
    fn from(t: UtilityType) -> Self {
        Self::Utility(t)
    }
}

impl ChannelVoice {
    #[inline]
    pub fn message_type(&self) -> ChannelVoiceType {
        match self {
            Self::NoteOff { .. } => ChannelVoiceType::NoteOff,
            Self::NoteOn { .. } => ChannelVoiceType::NoteOn,
            Self::NotePressure { .. } => ChannelVoiceType::NotePressure,
            Self::ControlChange { .. } => ChannelVoiceType::ControlChange,
            Self::ProgramChange { .. } => ChannelVoiceType::ProgramChange,
            Self::ChannelPressure { .. } => ChannelVoiceType::ChannelPressure,
            Self::PitchBend { .. } => ChannelVoiceType::PitchBend,
        }
    }
}

impl SystemCommon {
    #[inline]
    pub fn message_type(&self) -> SystemCommonType {
        match self {
            Self::TimecodeQuarterFrame { .. } => SystemCommonType::TimecodeQuarterFrame,
            Self::SongPositionPointer { .. } => SystemCommonType::SongPositionPointer,
            Self::SongSelect { .. } => SystemCommonType::SongSelect,
            Self::UnofficialBusSelect { .. } => SystemCommonType::UnofficialBusSelect,
            Self::TuneRequest => SystemCommonType::TuneRequest,
        }
    }
}

impl SysEx {
    #[inline]
    pub fn message_type(&self) -> SysExType {
        match self {
            Self::SysEx7 { .. } => SysExType::SysEx7,
        }
    }
}

impl Utility {
    #[inline]
    pub fn message_type(&self) -> UtilityType {
        match self {
            Self::NoOp => UtilityType::NoOp,
            Self::JitterReductionClock { .. } => UtilityType::JitterReductionClock,
            Self::JitterReductionTimestamp { .. } => UtilityType::JitterReductionTimestamp,
        }
    }
}

impl MidiEvent {
    /// Class of the event. Total over every event.
    #[inline]
    pub fn class(&self) -> MessageClass {
        match self {
            Self::ChannelVoice { .. } => MessageClass::ChannelVoice,
            Self::SystemCommon { .. } => MessageClass::SystemCommon,
            Self::SystemRealTime { .. } => MessageClass::SystemRealTime,
            Self::SystemExclusive { .. } => MessageClass::SystemExclusive,
            Self::Utility { .. } => MessageClass::Utility,
        }
    }

    #[inline]
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::ChannelVoice { msg, .. } => msg.message_type().into(),
            Self::SystemCommon { msg, .. } => msg.message_type().into(),
            Self::SystemRealTime { msg, .. } => (*msg).into(),
            Self::SystemExclusive { msg, .. } => msg.message_type().into(),
            Self::Utility { msg, .. } => msg.message_type().into(),
        }
    }

    #[inline]
    pub fn is_of_class(&self, class: MessageClass) -> bool {
        self.class() == class
    }

    /// True if the event has subtype `t`. The subtype also fixes the class.
    #[inline]
    pub fn is_of_type(&self, t: impl Into<MessageType>) -> bool {
        self.message_type() == t.into()
    }

    /// True if the event has any of `types`. An empty set never matches.
    pub fn is_of_types<T: Into<MessageType> + Copy>(&self, types: &[T]) -> bool {
        if types.is_empty() {
            return false;
        }
        let own = self.message_type();
        types.iter().any(|t| (*t).into() == own)
    }

    #[inline]
    pub fn is_channel_voice(&self) -> bool {
        self.is_of_class(MessageClass::ChannelVoice)
    }

    #[inline]
    pub fn is_system_common(&self) -> bool {
        self.is_of_class(MessageClass::SystemCommon)
    }

    #[inline]
    pub fn is_system_real_time(&self) -> bool {
        self.is_of_class(MessageClass::SystemRealTime)
    }

    #[inline]
    pub fn is_system_exclusive(&self) -> bool {
        self.is_of_class(MessageClass::SystemExclusive)
    }

    #[inline]
    pub fn is_utility(&self) -> bool {
        self.is_of_class(MessageClass::Utility)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value7Bit32Bit;
    use midi2::prelude::*;

    fn cc11() -> MidiEvent {
        MidiEvent::cc(
            u7::new(11),
            Value7Bit32Bit::Midi1(u7::new(64)),
            u4::new(0),
            u4::new(0),
        )
    }

    #[test]
    fn test_class() {
        assert_eq!(cc11().class(), MessageClass::ChannelVoice);
        assert_eq!(
            MidiEvent::tune_request(u4::new(0)).class(),
            MessageClass::SystemCommon
        );
        assert_eq!(
            MidiEvent::stop(u4::new(0)).class(),
            MessageClass::SystemRealTime
        );
        assert_eq!(
            MidiEvent::sysex7(Vec::new(), u4::new(0)).class(),
            MessageClass::SystemExclusive
        );
        assert_eq!(MidiEvent::no_op(u4::new(0)).class(), MessageClass::Utility);
    }

    #[test]
    fn test_is_of_type() {
        let event = cc11();
        assert!(event.is_of_type(ChannelVoiceType::ControlChange));
        assert!(!event.is_of_type(ChannelVoiceType::NoteOn));
        assert!(!event.is_of_type(SystemRealTime::Start));
        assert!(MidiEvent::start(u4::new(0)).is_of_type(SystemRealTime::Start));
    }

    #[test]
    fn test_is_of_types() {
        let event = cc11();
        assert!(event.is_of_types(&[ChannelVoiceType::NoteOn, ChannelVoiceType::ControlChange]));
        assert!(!event.is_of_types(&[ChannelVoiceType::NoteOn]));
        assert!(!event.is_of_types::<ChannelVoiceType>(&[]));
        assert!(!MidiEvent::start(u4::new(0)).is_of_types::<SystemRealTime>(&[]));
    }

    #[test]
    fn test_message_type_class_agrees() {
        let events = [
            cc11(),
            MidiEvent::song_select(u7::new(3), u4::new(1)),
            MidiEvent::r#continue(u4::new(0)),
            MidiEvent::sysex7(vec![u7::new(1)], u4::new(0)),
            MidiEvent::jitter_reduction_clock(7, u4::new(0)),
        ];
        for event in &events {
            assert_eq!(event.message_type().class(), event.class());
        }
    }
}
