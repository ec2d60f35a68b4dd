//! Integration test: foreground producer and step consumer on separate threads.
//!
//! The producer appends, commits, claims and rolls back lines while the
//! consumer pops concurrently. The consumer must see every claimed value
//! exactly once and in order, and never a value from a rolled-back line.

use std::thread;

use laser_control::ring::PowerRing;

const SLOTS: usize = 64;
const LINES: usize = 2_000;
const PER_LINE: usize = 7;
/// Marker carried only by lines that are rolled back.
const ROLLED_BACK: u8 = 255;

/// Sequence value for the n-th claimed sample: cycles through 1..=250 so
/// that 0 (nothing claimed) and `ROLLED_BACK` never occur.
fn seq_value(n: usize) -> u8 {
    (n % 250) as u8 + 1
}

#[test]
fn producer_and_consumer_threads_agree() {
    let mut ring = PowerRing::<SLOTS>::new();
    let (mut writer, mut consumer) = ring.split();
    let total = LINES * PER_LINE;

    thread::scope(|s| {
        s.spawn(move || {
            let mut next = 0usize;
            for line in 0..LINES {
                // Wait for room; a stale `oldest` only under-reports space.
                while writer.ring().capacity() - writer.ring().len() < PER_LINE {
                    thread::yield_now();
                }

                if line % 5 == 4 {
                    let start = writer.write_cursor();
                    for _ in 0..PER_LINE {
                        assert!(writer.append(ROLLED_BACK));
                    }
                    let end = writer.commit_line();
                    writer.rollback_if_unclaimed(start, end).unwrap();
                    // Space freed by the rollback is reused by the next line.
                    while writer.ring().capacity() - writer.ring().len() < PER_LINE {
                        thread::yield_now();
                    }
                }

                for _ in 0..PER_LINE {
                    assert!(writer.append(seq_value(next)));
                    next += 1;
                }
                writer.commit_line();
                let span = writer.claim_for_move();
                assert_eq!(span.len, PER_LINE);
            }
        });

        s.spawn(move || {
            let mut received = 0usize;
            while received < total {
                let p = consumer.next_power();
                if p == 0 {
                    thread::yield_now();
                    continue;
                }
                assert_ne!(p, ROLLED_BACK, "consumed a rolled-back value");
                assert_eq!(p, seq_value(received), "out of order at {received}");
                received += 1;
            }
            assert_eq!(consumer.next_power(), 0);
        });
    });

    assert!(ring.is_empty());
    assert_eq!(ring.dropped(), 0);
    assert!(ring.cursors().all_equal());
}
