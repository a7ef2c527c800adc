//! Feeds a simulated host stream through a receiver on one thread and drains it
//! on another, re-encoding each event as UMP.

use std::thread;

use duet_midi_io::{encode_packet, MidiReceiver, ReceiveHandler, WireFormat};
use duet_midi::{Filter, MessageClass};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let (receiver, mut consumer) = MidiReceiver::builder()
        .filter(Filter::drop_class(MessageClass::SystemRealTime))
        .build()
        .expect("default receiver config is valid");

    let host = thread::spawn(move || {
        // Note on with running status, a clock byte in the middle, then a SysEx.
        receiver.midi1_received(&[0x90, 60, 100, 64]);
        receiver.midi1_received(&[0xF8, 100, 0xF0, 0x7E, 0x7F, 0x06, 0x01, 0xF7]);
        receiver.midi1_received(&[0xF4]);
        receiver
    });
    let receiver = host.join().expect("host thread panicked");

    for event in consumer.drain_all() {
        let packet = encode_packet(&event, WireFormat::default());
        println!("{event:?}");
        println!("  -> {:08X?}", packet.as_words().unwrap_or_default());
    }
    println!("dropped: {}", receiver.dropped_count());
}
