//! Lock-free queue carrying decoded events from the receive callback to the
//! processing thread.
//!
//! Each receiver owns one single-producer single-consumer ring. The producer
//! lives inside the receive callback and never blocks or allocates: when the
//! ring is full the event is handed back so the caller can count the drop.
//! Several rings can be merged on the processing side with a
//! [`MidiEventAggregator`].

use crate::{Error, Result};
use duet_midi::MidiEvent;
use parking_lot::Mutex;
use ringbuf::{traits::*, HeapCons, HeapProd, HeapRb};

/// Ring size used when a receiver is built without an explicit capacity.
pub(crate) const DEFAULT_CAPACITY: usize = 256;

/// Write end of an event queue, owned by the receive callback.
pub struct MidiEventProducer {
    ring: HeapProd<MidiEvent>,
}

impl MidiEventProducer {
    /// Queues one event, handing it back when the ring is full.
    #[inline]
    pub fn push(&mut self, event: MidiEvent) -> std::result::Result<(), MidiEvent> {
        self.ring.try_push(event)
    }

    /// Queues events in order until the ring fills up and returns how many
    /// were queued. The rest of `events` is dropped.
    pub fn push_all(&mut self, events: impl IntoIterator<Item = MidiEvent>) -> usize {
        let mut queued = 0;
        for event in events {
            if self.ring.try_push(event).is_err() {
                break;
            }
            queued += 1;
        }
        queued
    }

    /// Slots still free for events.
    #[inline]
    pub fn free_len(&self) -> usize {
        self.ring.vacant_len()
    }

    /// Total number of slots in the ring.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity().get()
    }
}

/// Read end of an event queue, drained on the processing thread.
pub struct MidiEventConsumer {
    ring: HeapCons<MidiEvent>,
}

impl MidiEventConsumer {
    /// Takes the oldest queued event.
    #[inline]
    pub fn pop(&mut self) -> Option<MidiEvent> {
        self.ring.try_pop()
    }

    /// Moves every queued event onto the end of `out`, oldest first.
    ///
    /// Reusing `out` across process cycles keeps draining allocation-free once
    /// it has grown to the ring size. Returns the number of events moved.
    pub fn drain_into(&mut self, out: &mut Vec<MidiEvent>) -> usize {
        let before = out.len();
        out.extend(self.ring.pop_iter());
        out.len() - before
    }

    /// Takes every queued event into a fresh vector, oldest first.
    pub fn drain_all(&mut self) -> Vec<MidiEvent> {
        let mut events = Vec::with_capacity(self.ring.occupied_len());
        self.drain_into(&mut events);
        events
    }

    /// Whether at least one event is waiting.
    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.ring.is_empty()
    }

    /// Number of events waiting.
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.ring.occupied_len()
    }
}

/// Creates a queue with room for [`DEFAULT_CAPACITY`] events.
pub fn midi_event_channel() -> (MidiEventProducer, MidiEventConsumer) {
    let (ring, consumer) = HeapRb::new(DEFAULT_CAPACITY).split();
    (
        MidiEventProducer { ring },
        MidiEventConsumer { ring: consumer },
    )
}

/// Creates a queue with room for `capacity` events.
///
/// A zero capacity is rejected with [`Error::InvalidConfig`]: such a queue
/// could never deliver anything.
pub fn midi_event_channel_with_capacity(
    capacity: usize,
) -> Result<(MidiEventProducer, MidiEventConsumer)> {
    if capacity == 0 {
        return Err(Error::InvalidConfig(
            "queue capacity must be at least 1".into(),
        ));
    }
    let (ring, consumer) = HeapRb::new(capacity).split();
    Ok((
        MidiEventProducer { ring },
        MidiEventConsumer { ring: consumer },
    ))
}

/// Merges the queues of several receivers, one per source, into a single
/// drain point.
///
/// Sources are drained in the order they were added and each source keeps its
/// own event order. Nothing is interleaved by time: events carry no timestamps.
#[derive(Default)]
pub struct MidiEventAggregator {
    sources: Mutex<Vec<MidiEventConsumer>>,
}

impl MidiEventAggregator {
    /// An aggregator with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source and returns its position in the drain order.
    pub fn add_consumer(&self, consumer: MidiEventConsumer) -> usize {
        let mut sources = self.sources.lock();
        sources.push(consumer);
        sources.len() - 1
    }

    /// Number of sources added so far.
    pub fn source_count(&self) -> usize {
        self.sources.lock().len()
    }

    /// Moves every pending event of every source onto the end of `out`.
    ///
    /// Returns the number of events moved. When another thread is adding a
    /// source at the same moment nothing is drained and 0 is returned, so the
    /// processing thread never waits on the lock.
    pub fn drain_into(&self, out: &mut Vec<MidiEvent>) -> usize {
        let Some(mut sources) = self.sources.try_lock() else {
            return 0;
        };
        sources.iter_mut().map(|source| source.drain_into(out)).sum()
    }

    /// Takes every pending event of every source into a fresh vector.
    pub fn drain_all(&self) -> Vec<MidiEvent> {
        let mut events = Vec::new();
        self.drain_into(&mut events);
        events
    }

    /// Whether any source has an event waiting. Reports `false` while the
    /// source list is locked elsewhere.
    pub fn has_pending(&self) -> bool {
        self.sources
            .try_lock()
            .is_some_and(|sources| sources.iter().any(MidiEventConsumer::has_pending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duet_midi::{u4, u7, Value7Bit16Bit};

    fn note_on(note: u8) -> MidiEvent {
        MidiEvent::note_on(
            u7::new(note),
            Value7Bit16Bit::Midi1(u7::new(100)),
            u4::new(0),
            u4::new(0),
        )
    }

    #[test]
    fn test_channel_push_and_drain() {
        let (mut producer, mut consumer) = midi_event_channel();
        assert_eq!(producer.capacity(), DEFAULT_CAPACITY);

        assert!(producer.push(note_on(60)).is_ok());
        assert!(producer.push(MidiEvent::stop(u4::new(0))).is_ok());
        assert_eq!(consumer.pending_count(), 2);

        let events = consumer.drain_all();
        assert_eq!(events, vec![note_on(60), MidiEvent::stop(u4::new(0))]);
        assert!(!consumer.has_pending());
    }

    #[test]
    fn test_drain_into_appends_and_reuses_buffer() {
        let (mut producer, mut consumer) = midi_event_channel_with_capacity(8).unwrap();
        let mut buffer = vec![note_on(1)];

        producer.push_all([note_on(2), note_on(3)]);
        assert_eq!(consumer.drain_into(&mut buffer), 2);
        assert_eq!(buffer, vec![note_on(1), note_on(2), note_on(3)]);

        buffer.clear();
        let grown = buffer.capacity();
        producer.push(note_on(4)).unwrap();
        assert_eq!(consumer.drain_into(&mut buffer), 1);
        assert_eq!(buffer.capacity(), grown);
        assert_eq!(consumer.drain_into(&mut buffer), 0);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(matches!(
            midi_event_channel_with_capacity(0),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_capacity_overflow() {
        let (mut producer, mut consumer) = midi_event_channel_with_capacity(4).unwrap();

        assert_eq!(producer.push_all((0..6).map(note_on)), 4);
        assert_eq!(producer.free_len(), 0);
        assert_eq!(producer.push(note_on(9)), Err(note_on(9)));

        assert_eq!(consumer.pop(), Some(note_on(0)));
        assert_eq!(producer.free_len(), 1);
        assert_eq!(producer.push_all([note_on(7), note_on(8)]), 1);
        assert_eq!(
            consumer.drain_all(),
            vec![note_on(1), note_on(2), note_on(3), note_on(7)]
        );
    }

    #[test]
    fn test_aggregator_drains_sources_in_order() {
        let aggregator = MidiEventAggregator::new();
        let (mut keys, keys_out) = midi_event_channel();
        let (mut pads, pads_out) = midi_event_channel();
        assert_eq!(aggregator.add_consumer(keys_out), 0);
        assert_eq!(aggregator.add_consumer(pads_out), 1);
        assert_eq!(aggregator.source_count(), 2);

        pads.push(note_on(36)).unwrap();
        keys.push(note_on(60)).unwrap();
        keys.push(note_on(64)).unwrap();
        assert!(aggregator.has_pending());

        let mut events = Vec::new();
        assert_eq!(aggregator.drain_into(&mut events), 3);
        assert_eq!(events, vec![note_on(60), note_on(64), note_on(36)]);
        assert!(!aggregator.has_pending());
        assert!(aggregator.drain_all().is_empty());
    }

    #[test]
    fn test_aggregator_skips_drain_while_locked() {
        let aggregator = MidiEventAggregator::new();
        let (mut producer, consumer) = midi_event_channel();
        aggregator.add_consumer(consumer);
        producer.push(note_on(60)).unwrap();

        let guard = aggregator.sources.lock();
        assert!(!aggregator.has_pending());
        assert!(aggregator.drain_all().is_empty());
        drop(guard);

        assert_eq!(aggregator.drain_all(), vec![note_on(60)]);
    }
}
