//! Decode, filter and queue inbound MIDI for a processing thread.

use std::sync::atomic::{AtomicU64, Ordering};

use duet_midi::{u4, MidiEvent, SeriesFilter};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::queue::{
    midi_event_channel_with_capacity, MidiEventConsumer, MidiEventProducer, DEFAULT_CAPACITY,
};
use crate::receive::{PacketDecoder, ReceiveHandler};
use crate::shared_filter::SharedSeriesFilter;

struct ReceiverState {
    decoder: PacketDecoder,
    producer: MidiEventProducer,
}

/// A [`ReceiveHandler`] that feeds a bounded event queue.
///
/// Events rejected by the filter never reach the queue. When the queue is full
/// new events are dropped and counted; the queue never blocks the host thread.
pub struct MidiReceiver {
    state: Mutex<ReceiverState>,
    filter: SharedSeriesFilter,
    dropped: AtomicU64,
}

impl MidiReceiver {
    /// Start configuring a receiver.
    pub fn builder() -> MidiReceiverBuilder {
        MidiReceiverBuilder::default()
    }

    /// The live filter chain. Replace or extend it at any time.
    #[inline]
    pub fn filter(&self) -> &SharedSeriesFilter {
        &self.filter
    }

    /// Group tagged on events decoded from MIDI 1.0 bytes.
    pub fn default_group(&self) -> u4 {
        self.state.lock().decoder.group()
    }

    /// Total events lost to a full queue.
    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Queue an already decoded event, e.g. one produced locally.
    ///
    /// Returns `Ok(false)` if the filter rejected it.
    pub fn push_event(&self, event: MidiEvent) -> Result<bool> {
        if !self.filter.passes(&event) {
            return Ok(false);
        }
        match self.state.lock().producer.push(event) {
            Ok(()) => Ok(true),
            Err(_) => Err(Error::QueueFull {
                dropped: self.record_drop(),
            }),
        }
    }

    /// Discard partially received messages.
    pub fn reset(&self) {
        self.state.lock().decoder.reset();
        debug!("MIDI receiver reset");
    }

    fn record_drop(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn enqueue(&self, producer: &mut MidiEventProducer, filter: &SeriesFilter, event: MidiEvent) {
        if !filter.passes(&event) {
            return;
        }
        if producer.push(event).is_err() {
            let dropped = self.record_drop();
            warn!(dropped, "MIDI event queue full, dropping event");
        }
    }
}

impl ReceiveHandler for MidiReceiver {
    fn midi1_received(&self, bytes: &[u8]) {
        let filter = self.filter.load();
        let mut state = self.state.lock();
        let ReceiverState { decoder, producer } = &mut *state;
        decoder.decode_midi1(bytes, |event| self.enqueue(producer, &filter, event));
    }

    fn ump_received(&self, words: &[u32]) {
        let filter = self.filter.load();
        let mut state = self.state.lock();
        let ReceiverState { decoder, producer } = &mut *state;
        decoder.decode_ump(words, |event| self.enqueue(producer, &filter, event));
    }
}

/// Serializable receiver settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    /// Queue capacity in events.
    pub capacity: usize,
    /// Group (0-15) for events decoded from MIDI 1.0 bytes.
    pub default_group: u8,
    /// Accept running status in MIDI 1.0 byte streams.
    pub running_status: bool,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            default_group: 0,
            running_status: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct MidiReceiverBuilder {
    config: ReceiverConfig,
    filter: SeriesFilter,
}

impl MidiReceiverBuilder {
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    pub fn filter(mut self, filter: impl Into<SeriesFilter>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn default_group(mut self, group: u4) -> Self {
        self.config.default_group = u8::from(group);
        self
    }

    pub fn running_status(mut self, enabled: bool) -> Self {
        self.config.running_status = enabled;
        self
    }

    /// Take capacity, group and running status from `config`.
    pub fn config(mut self, config: ReceiverConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the receiver (hand it to the host callback) and the consumer end
    /// of its queue (drain it on the processing thread).
    pub fn build(self) -> Result<(MidiReceiver, MidiEventConsumer)> {
        let ReceiverConfig {
            capacity,
            default_group,
            running_status,
        } = self.config;

        if default_group > 15 {
            return Err(Error::InvalidConfig(format!(
                "group {default_group} out of range 0-15"
            )));
        }

        let (producer, consumer) = midi_event_channel_with_capacity(capacity)?;
        let receiver = MidiReceiver {
            state: Mutex::new(ReceiverState {
                decoder: PacketDecoder::new(u4::new(default_group), running_status),
                producer,
            }),
            filter: SharedSeriesFilter::new(self.filter),
            dropped: AtomicU64::new(0),
        };
        debug!(capacity, default_group, running_status, "MIDI receiver created");
        Ok((receiver, consumer))
    }
}
