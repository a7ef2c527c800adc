//! A filter chain that can be swapped while receivers are running.

use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};
use duet_midi::{Filter, MidiEvent, SeriesFilter};

/// [`SeriesFilter`] behind an [`ArcSwap`].
///
/// Reads never block. Writers publish a new chain atomically; a reader in the
/// middle of a packet keeps the chain it loaded.
#[derive(Debug, Default)]
pub struct SharedSeriesFilter {
    inner: ArcSwap<SeriesFilter>,
}

impl SharedSeriesFilter {
    pub fn new(filter: SeriesFilter) -> Self {
        Self {
            inner: ArcSwap::from_pointee(filter),
        }
    }

    /// Snapshot of the current chain.
    #[inline]
    pub fn load(&self) -> Guard<Arc<SeriesFilter>> {
        self.inner.load()
    }

    #[inline]
    pub fn passes(&self, event: &MidiEvent) -> bool {
        self.inner.load().passes(event)
    }

    /// Run `events` through the current chain.
    pub fn apply(&self, events: &[MidiEvent]) -> Vec<MidiEvent> {
        self.inner.load().apply(events)
    }

    /// Swap in a new chain. Callers already holding a snapshot keep the old one.
    pub fn replace(&self, filter: SeriesFilter) {
        self.inner.store(Arc::new(filter));
    }

    /// Append a stage to the end of the chain.
    pub fn push(&self, filter: Filter) {
        self.inner.rcu(|current| {
            let mut next = SeriesFilter::clone(current);
            next.push(filter.clone());
            next
        });
    }

    /// Remove every stage; all events pass afterwards.
    pub fn clear(&self) {
        self.inner.store(Arc::new(SeriesFilter::default()));
    }
}

impl From<SeriesFilter> for SharedSeriesFilter {
    fn from(filter: SeriesFilter) -> Self {
        Self::new(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duet_midi::{u4, u7, MessageClass, Value7Bit16Bit};

    fn note_on(channel: u8) -> MidiEvent {
        MidiEvent::note_on(
            u7::new(60),
            Value7Bit16Bit::Midi1(u7::new(100)),
            u4::new(channel),
            u4::new(0),
        )
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let shared = SharedSeriesFilter::default();
        assert!(shared.passes(&note_on(0)));
        assert!(shared.passes(&MidiEvent::tune_request(u4::new(0))));
    }

    #[test]
    fn test_push_and_clear() {
        let shared = SharedSeriesFilter::default();
        shared.push(Filter::only_class(MessageClass::ChannelVoice));
        shared.push(Filter::drop_channel(u4::new(1)));
        assert_eq!(shared.load().filters.len(), 2);

        assert!(shared.passes(&note_on(0)));
        assert!(!shared.passes(&note_on(1)));
        assert!(!shared.passes(&MidiEvent::tune_request(u4::new(0))));

        shared.clear();
        assert!(shared.passes(&note_on(1)));
    }

    #[test]
    fn test_loaded_snapshot_survives_replace() {
        let shared = SharedSeriesFilter::new(Filter::only_channel(u4::new(3)).into());
        let snapshot = shared.load();
        shared.replace(SeriesFilter::default());

        assert!(!snapshot.passes(&note_on(0)));
        assert!(shared.passes(&note_on(0)));
    }

    #[test]
    fn test_apply() {
        let shared = SharedSeriesFilter::new(Filter::only_channel(u4::new(2)).into());
        let events: Vec<_> = (0..4).map(note_on).collect();
        assert_eq!(shared.apply(&events), vec![note_on(2)]);
    }
}
