//! Stress example
//!
//! Several producer threads hammer one bounded queue while the main
//! thread drains with timed waits. Reports how many events each
//! producer sent, how many the consumer received, and how many the
//! overflow policy dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use evq::{EventKind, EventPayload, EventQueue, EventSource, QueueConfig};

const PRODUCERS: usize = 4;
const RUN_FOR: Duration = Duration::from_millis(500);
const QUEUE_CAP: usize = 256;

fn main() {
    println!("=== evq stress example ===\n");
    println!(
        "{} producers -> one queue (capacity {}), running {}ms\n",
        PRODUCERS,
        QUEUE_CAP,
        RUN_FOR.as_millis()
    );

    let queue = EventQueue::with_config(QueueConfig::new().capacity(QUEUE_CAP));
    let stop = Arc::new(AtomicBool::new(false));

    let mut producers = Vec::with_capacity(PRODUCERS);
    for worker in 0..PRODUCERS {
        let queue = queue.clone();
        let stop = Arc::clone(&stop);
        producers.push(thread::spawn(move || {
            let src = EventSource::new();
            src.register(&queue);
            let mut sent: i64 = 0;
            while !stop.load(Ordering::Relaxed) {
                sent += 1;
                src.push(
                    EventKind::TIMER_TICK,
                    EventPayload::Timer { count: sent },
                );
                // Yield so the consumer gets a fair shot at the lock.
                thread::yield_now();
            }
            (worker, sent)
        }));
    }

    let deadline = Instant::now() + RUN_FOR;
    let mut received: u64 = 0;
    while let Ok(_event) = queue.wait_until(deadline) {
        received += 1;
    }
    stop.store(true, Ordering::Relaxed);

    // Joining drops each producer's source, purging whatever it still had
    // pending; those count as dropped below, alongside overflow losses.
    let mut total_sent: i64 = 0;
    for handle in producers {
        match handle.join() {
            Ok((worker, sent)) => {
                println!("producer {:>2}: sent {:>8}", worker, sent);
                total_sent += sent;
            }
            Err(_) => println!("producer panicked"),
        }
    }

    let dropped = (total_sent as u64).saturating_sub(received);
    println!("\ntotal sent:     {:>8}", total_sent);
    println!("received:       {:>8}", received);
    println!(
        "dropped:        {:>8} ({:.1}%)",
        dropped,
        100.0 * dropped as f64 / total_sent.max(1) as f64
    );
    println!("\n=== Example Complete ===");
}
