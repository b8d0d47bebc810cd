//! Identifier sources for generated metadata

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Hands out ids for new `PageMetadata` records
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> u64;
}

/// Plain counter, handy when ids must be predictable
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// Millisecond timestamps, bumped by one when two calls land in the same millisecond
#[derive(Debug, Default)]
pub struct TimestampIds {
    last: AtomicU64,
}

impl IdSource for TimestampIds {
    fn next_id(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1)
    }
}
