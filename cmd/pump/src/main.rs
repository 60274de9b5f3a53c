//! Polling example
//!
//! One user-event source, one queue, a non-blocking drain loop: the
//! shape of a game loop that polls input once per frame.

use evq::{EventKind, EventPayload, EventQueue, EventSource, QueueConfig};

const DEMO_EVENT: EventKind = EventKind::user(1024);

fn main() {
    println!("=== evq polling example ===\n");

    let queue = EventQueue::with_config(QueueConfig::new().capacity(8));
    let source = EventSource::new();
    source.register(&queue);

    println!(
        "Created queue (capacity {}) and source {}\n",
        queue.capacity(),
        source.id()
    );

    // Push more than fits; the overflow policy drops the newest.
    for i in 1..=10 {
        source.push(DEMO_EVENT, EventPayload::User { data: [i, 0, 0, 0] });
    }
    println!("Pushed 10 events, queue holds {}\n", queue.len());

    // Frame-style drain.
    while let Ok(event) = queue.get_next() {
        if let EventPayload::User { data } = event.payload() {
            println!("  got event #{} at t={}ns", data[0], event.timestamp_ns());
        }
    }

    source.unregister(&queue);
    println!("\n=== Example Complete ===");
}
