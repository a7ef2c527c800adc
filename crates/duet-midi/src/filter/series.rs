use super::Filter;
use crate::event::MidiEvent;

/// Ordered list of filters applied left to right.
///
/// Applying is pure, so one instance can filter many sequences concurrently.
/// Mutating the list while it is shared needs outside synchronization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SeriesFilter {
    pub filters: Vec<Filter>,
}

impl SeriesFilter {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }

    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Builder-style [`push`](Self::push).
    pub fn then(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run `events` through every stage in order.
    pub fn apply(&self, events: &[MidiEvent]) -> Vec<MidiEvent> {
        let mut events = events.to_vec();
        for filter in &self.filters {
            events.retain(|event| filter.matches(event));
        }
        events
    }

    /// True if a single event survives every stage.
    pub fn passes(&self, event: &MidiEvent) -> bool {
        self.filters.iter().all(|filter| filter.matches(event))
    }
}

impl From<Filter> for SeriesFilter {
    fn from(filter: Filter) -> Self {
        Self::new(vec![filter])
    }
}

impl FromIterator<Filter> for SeriesFilter {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// `events.filtered(&filter)` on slices of events.
pub trait FilterEvents {
    fn filtered(&self, filter: &Filter) -> Vec<MidiEvent>;

    fn filtered_series(&self, series: &SeriesFilter) -> Vec<MidiEvent>;
}

impl FilterEvents for [MidiEvent] {
    fn filtered(&self, filter: &Filter) -> Vec<MidiEvent> {
        filter.apply(self)
    }

    fn filtered_series(&self, series: &SeriesFilter) -> Vec<MidiEvent> {
        series.apply(self)
    }
}
