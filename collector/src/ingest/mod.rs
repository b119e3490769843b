//! # Ingest Module
//!
//! Delivery of shaped events to the New Relic events API.
//!
//! The API rejects payloads above 2000 events, so every category is split into ordered chunks of at most
//! [`MAX_EVENTS_PER_REQUEST`] events and each chunk is posted as its own request. A failed chunk is logged and does
//! not stop the remaining chunks.

mod newrelic;

pub use newrelic::NewRelicClient;

use std::ops::AddAssign;

/// Maximum number of events in a single request to the events API.
pub const MAX_EVENTS_PER_REQUEST: usize = 2000;

/// Splits `events` into request-sized chunks, preserving order. An empty slice yields no chunks.
pub fn batches<T>(events: &[T]) -> std::slice::Chunks<'_, T> {
    events.chunks(MAX_EVENTS_PER_REQUEST)
}

/// Outcome of posting one or more batches.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub sent: usize,
    pub failed: usize,
    pub events_sent: usize,
}

impl AddAssign for BatchReport {
    fn add_assign(&mut self, other: Self) {
        self.sent += other.sent;
        self.failed += other.failed;
        self.events_sent += other.events_sent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_events_no_batches() {
        assert_eq!(batches::<u32>(&[]).count(), 0);
    }

    #[test]
    fn chunks_preserve_order_and_cap() {
        for len in [1, 1999, 2000, 2001, 4000, 4001, 9999] {
            let events: Vec<usize> = (0..len).collect();
            let chunks: Vec<&[usize]> = batches(&events).collect();

            assert_eq!(chunks.len(), len.div_ceil(MAX_EVENTS_PER_REQUEST), "len {len}");
            assert!(chunks.iter().all(|chunk| !chunk.is_empty() && chunk.len() <= MAX_EVENTS_PER_REQUEST));
            assert_eq!(chunks.concat(), events, "len {len}");
        }
    }

    #[test]
    fn reports_add_up() {
        let mut total = BatchReport::default();
        total += BatchReport {
            sent: 1,
            failed: 0,
            events_sent: 2000,
        };
        total += BatchReport {
            sent: 0,
            failed: 1,
            events_sent: 0,
        };
        assert_eq!(
            total,
            BatchReport {
                sent: 1,
                failed: 1,
                events_sent: 2000,
            }
        );
    }
}
