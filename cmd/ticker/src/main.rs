//! Blocking-wait example
//!
//! A 50ms ticker feeds a queue while the main thread blocks in wait();
//! runs for one second and prints each tick as it lands.

use std::time::{Duration, Instant};

use evq::{EventPayload, EventQueue, Ticker};

fn main() {
    println!("=== evq ticker example ===\n");

    let queue = EventQueue::new();
    let mut ticker = Ticker::new(Duration::from_millis(50));
    ticker.register(&queue);
    ticker.start();

    let deadline = Instant::now() + Duration::from_secs(1);
    loop {
        match queue.wait_until(deadline) {
            Ok(event) => {
                if let EventPayload::Timer { count } = event.payload() {
                    println!("tick {:>2} at t={}ns", count, event.timestamp_ns());
                }
            }
            Err(_) => break,
        }
    }

    ticker.stop();
    println!("\nReceived {} ticks total", ticker.count());
    println!("=== Example Complete ===");
}
