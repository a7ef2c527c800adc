//! Event filters.
//!
//! A [`Filter`] is a single rule targeting one message class (or the channel,
//! controller or group of an event). `only*` rules drop everything that does not
//! match, including other classes. `keep*` rules only thin out the targeted class
//! and let every other class through. `drop*` rules remove matching members of the
//! targeted class. Chain rules with [`SeriesFilter`].

mod series;

pub use series::{FilterEvents, SeriesFilter};

use midi2::prelude::*;

use crate::event::{
    ChannelVoiceType, MessageClass, MidiEvent, SysExType, SystemCommonType, SystemRealTime,
    UtilityType,
};

/// Subtype rule within one message class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRule<T> {
    /// Keep only events of the class.
    Only,
    /// Keep only events of the class having one of the subtypes.
    OnlyTypes(Vec<T>),
    /// Keep other classes, and events of the class having one of the subtypes.
    KeepTypes(Vec<T>),
    /// Drop every event of the class.
    Drop,
    /// Drop events of the class having one of the subtypes.
    DropTypes(Vec<T>),
}

impl<T: PartialEq> TypeRule<T> {
    /// `subtype` is `Some` exactly when the event belongs to the rule's class.
    pub fn passes(&self, subtype: Option<&T>) -> bool {
        match self {
            Self::Only => subtype.is_some(),
            Self::OnlyTypes(types) => subtype.is_some_and(|t| types.contains(t)),
            Self::KeepTypes(types) => subtype.map_or(true, |t| types.contains(t)),
            Self::Drop => subtype.is_none(),
            Self::DropTypes(types) => subtype.map_or(true, |t| !types.contains(t)),
        }
    }
}

/// A subtype enum usable in a [`TypeRule`].
pub trait SubType: Copy + PartialEq {
    /// Subtype of `event` if it belongs to this subtype's class.
    fn of(event: &MidiEvent) -> Option<Self>;

    /// Wrap a rule over this subtype into a [`Filter`].
    fn into_filter(rule: TypeRule<Self>) -> Filter;
}

impl SubType for ChannelVoiceType {
    fn of(event: &MidiEvent) -> Option<Self> {
        match event {
            MidiEvent::ChannelVoice { msg, .. } => Some(msg.message_type()),
            _ => None,
        }
    }

    fn into_filter(rule: TypeRule<Self>) -> Filter {
        Filter::ChannelVoice(ChannelVoiceFilter::Types(rule))
    }
}

impl SubType for SystemCommonType {
    fn of(event: &MidiEvent) -> Option<Self> {
        match event {
            MidiEvent::SystemCommon { msg, .. } => Some(msg.message_type()),
            _ => None,
        }
    }

    fn into_filter(rule: TypeRule<Self>) -> Filter {
        Filter::SystemCommon(rule)
    }
}

impl SubType for SystemRealTime {
    fn of(event: &MidiEvent) -> Option<Self> {
        match event {
            MidiEvent::SystemRealTime { msg, .. } => Some(*msg),
            _ => None,
        }
    }

    fn into_filter(rule: TypeRule<Self>) -> Filter {
        Filter::SystemRealTime(rule)
    }
}

impl SubType for SysExType {
    fn of(event: &MidiEvent) -> Option<Self> {
        match event {
            MidiEvent::SystemExclusive { msg, .. } => Some(msg.message_type()),
            _ => None,
        }
    }

    fn into_filter(rule: TypeRule<Self>) -> Filter {
        Filter::SystemExclusive(rule)
    }
}

impl SubType for UtilityType {
    fn of(event: &MidiEvent) -> Option<Self> {
        match event {
            MidiEvent::Utility { msg, .. } => Some(msg.message_type()),
            _ => None,
        }
    }

    fn into_filter(rule: TypeRule<Self>) -> Filter {
        Filter::Utility(rule)
    }
}

/// Channel voice rules beyond subtype.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChannelVoiceFilter {
    /// Subtype rule, see [`TypeRule`].
    Types(TypeRule<ChannelVoiceType>),
    /// Keep only channel voice events on these channels.
    OnlyChannels(Vec<u4>),
    /// Keep other classes, and channel voice events on these channels.
    KeepChannels(Vec<u4>),
    /// Drop channel voice events on these channels.
    DropChannels(Vec<u4>),
    /// Keep only control changes with these controller numbers.
    OnlyCCs(Vec<u7>),
    /// Keep everything except control changes with other controller numbers.
    KeepCCs(Vec<u7>),
    /// Drop control changes with these controller numbers.
    DropCCs(Vec<u7>),
}

impl ChannelVoiceFilter {
    /// True if `event` survives this rule.
    pub fn matches(&self, event: &MidiEvent) -> bool {
        let channel = event.channel();
        let controller = event.controller();
        match self {
            Self::Types(rule) => rule.passes(ChannelVoiceType::of(event).as_ref()),
            Self::OnlyChannels(channels) => channel.is_some_and(|c| channels.contains(&c)),
            Self::KeepChannels(channels) => channel.map_or(true, |c| channels.contains(&c)),
            Self::DropChannels(channels) => channel.map_or(true, |c| !channels.contains(&c)),
            Self::OnlyCCs(ccs) => controller.is_some_and(|c| ccs.contains(&c)),
            Self::KeepCCs(ccs) => controller.map_or(true, |c| ccs.contains(&c)),
            Self::DropCCs(ccs) => controller.map_or(true, |c| !ccs.contains(&c)),
        }
    }
}

/// Group rules. Every event carries a group, so there is no keep variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroupFilter {
    /// Keep only events in these groups.
    Only(Vec<u4>),
    /// Drop events in these groups.
    Drop(Vec<u4>),
}

/// One filter rule, tagged by the message class it targets.
///
/// Build rules with the constructors below rather than the variants.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Filter {
    ChannelVoice(ChannelVoiceFilter),
    SystemCommon(TypeRule<SystemCommonType>),
    SystemRealTime(TypeRule<SystemRealTime>),
    SystemExclusive(TypeRule<SysExType>),
    Utility(TypeRule<UtilityType>),
    Group(GroupFilter),
}

impl Filter {
    // ==================== Class ====================

    /// Keep only events of `class`.
    pub fn only_class(class: MessageClass) -> Self {
        Self::class_rule(class, true)
    }

    /// Drop every event of `class`.
    pub fn drop_class(class: MessageClass) -> Self {
        Self::class_rule(class, false)
    }

    fn class_rule(class: MessageClass, only: bool) -> Self {
        fn rule<T>(only: bool) -> TypeRule<T> {
            if only {
                TypeRule::Only
            } else {
                TypeRule::Drop
            }
        }

        match class {
            MessageClass::ChannelVoice => ChannelVoiceType::into_filter(rule(only)),
            MessageClass::SystemCommon => SystemCommonType::into_filter(rule(only)),
            MessageClass::SystemRealTime => SystemRealTime::into_filter(rule(only)),
            MessageClass::SystemExclusive => SysExType::into_filter(rule(only)),
            MessageClass::Utility => UtilityType::into_filter(rule(only)),
        }
    }

    // ==================== Subtype ====================

    /// Keep only events of `t`. Every other subtype and class is dropped.
    pub fn only_type<T: SubType>(t: T) -> Self {
        T::into_filter(TypeRule::OnlyTypes(vec![t]))
    }

    /// Keep only events having one of `types`. An empty set keeps nothing.
    pub fn only_types<T: SubType>(types: impl IntoIterator<Item = T>) -> Self {
        T::into_filter(TypeRule::OnlyTypes(types.into_iter().collect()))
    }

    /// Thin the class of `t` down to that one subtype. Other classes pass.
    pub fn keep_type<T: SubType>(t: T) -> Self {
        T::into_filter(TypeRule::KeepTypes(vec![t]))
    }

    /// Thin the class of `T` down to `types`. Other classes pass, and an empty
    /// set drops the whole class.
    pub fn keep_types<T: SubType>(types: impl IntoIterator<Item = T>) -> Self {
        T::into_filter(TypeRule::KeepTypes(types.into_iter().collect()))
    }

    /// Drop events of subtype `t`.
    pub fn drop_type<T: SubType>(t: T) -> Self {
        T::into_filter(TypeRule::DropTypes(vec![t]))
    }

    /// Drop events having any of `types`. An empty set drops nothing.
    pub fn drop_types<T: SubType>(types: impl IntoIterator<Item = T>) -> Self {
        T::into_filter(TypeRule::DropTypes(types.into_iter().collect()))
    }

    // ==================== Channel / CC ====================

    /// Keep only channel voice events on `channel`.
    pub fn only_channel(channel: u4) -> Self {
        Self::only_channels([channel])
    }

    /// Keep only channel voice events on one of `channels`. Events without a
    /// channel are dropped too.
    pub fn only_channels(channels: impl IntoIterator<Item = u4>) -> Self {
        Self::ChannelVoice(ChannelVoiceFilter::OnlyChannels(
            channels.into_iter().collect(),
        ))
    }

    /// Thin channel voice events down to `channels`. Events without a channel
    /// pass.
    pub fn keep_channels(channels: impl IntoIterator<Item = u4>) -> Self {
        Self::ChannelVoice(ChannelVoiceFilter::KeepChannels(
            channels.into_iter().collect(),
        ))
    }

    /// Drop channel voice events on `channel`.
    pub fn drop_channel(channel: u4) -> Self {
        Self::drop_channels([channel])
    }

    /// Drop channel voice events on any of `channels`.
    pub fn drop_channels(channels: impl IntoIterator<Item = u4>) -> Self {
        Self::ChannelVoice(ChannelVoiceFilter::DropChannels(
            channels.into_iter().collect(),
        ))
    }

    /// Keep only control changes for `controller`.
    pub fn only_cc(controller: u7) -> Self {
        Self::only_ccs([controller])
    }

    /// Keep only control changes for one of `controllers`. Notes, real-time
    /// messages and everything else are dropped.
    pub fn only_ccs(controllers: impl IntoIterator<Item = u7>) -> Self {
        Self::ChannelVoice(ChannelVoiceFilter::OnlyCCs(controllers.into_iter().collect()))
    }

    /// Thin control changes down to `controller`.
    pub fn keep_cc(controller: u7) -> Self {
        Self::keep_ccs([controller])
    }

    /// Thin control changes down to `controllers`. Events that are not control
    /// changes pass.
    pub fn keep_ccs(controllers: impl IntoIterator<Item = u7>) -> Self {
        Self::ChannelVoice(ChannelVoiceFilter::KeepCCs(controllers.into_iter().collect()))
    }

    /// Drop control changes for `controller`.
    pub fn drop_cc(controller: u7) -> Self {
        Self::drop_ccs([controller])
    }

    /// Drop control changes for any of `controllers`.
    pub fn drop_ccs(controllers: impl IntoIterator<Item = u7>) -> Self {
        Self::ChannelVoice(ChannelVoiceFilter::DropCCs(controllers.into_iter().collect()))
    }

    // ==================== Group ====================

    /// Keep only events in one of `groups`.
    pub fn only_groups(groups: impl IntoIterator<Item = u4>) -> Self {
        Self::Group(GroupFilter::Only(groups.into_iter().collect()))
    }

    /// Drop events in any of `groups`.
    pub fn drop_groups(groups: impl IntoIterator<Item = u4>) -> Self {
        Self::Group(GroupFilter::Drop(groups.into_iter().collect()))
    }

    // ==================== Application ====================

    /// True if `event` survives this filter.
    pub fn matches(&self, event: &MidiEvent) -> bool {
        match self {
            Self::ChannelVoice(filter) => filter.matches(event),
            Self::SystemCommon(rule) => rule.passes(SystemCommonType::of(event).as_ref()),
            Self::SystemRealTime(rule) => rule.passes(SystemRealTime::of(event).as_ref()),
            Self::SystemExclusive(rule) => rule.passes(SysExType::of(event).as_ref()),
            Self::Utility(rule) => rule.passes(UtilityType::of(event).as_ref()),
            Self::Group(GroupFilter::Only(groups)) => groups.contains(&event.group()),
            Self::Group(GroupFilter::Drop(groups)) => !groups.contains(&event.group()),
        }
    }

    /// Surviving events, in input order.
    pub fn apply(&self, events: &[MidiEvent]) -> Vec<MidiEvent> {
        events
            .iter()
            .filter(|event| self.matches(event))
            .cloned()
            .collect()
    }
}
