//! Counters for the async worker queue
//!
//! Lets callers see how often the queue filled up and what that cost:
//! blocked callers under [`OverflowPolicy::Block`](super::OverflowPolicy::Block),
//! evicted records under [`OverflowPolicy::DropOldest`](super::OverflowPolicy::DropOldest).

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for one thread pool
///
/// # Example
///
/// ```
/// use llog::PoolMetrics;
///
/// let metrics = PoolMetrics::new();
/// metrics.record_enqueued();
/// metrics.record_overrun();
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.overruns(), 1);
/// ```
#[derive(Debug)]
pub struct PoolMetrics {
    /// Messages accepted into the queue
    enqueued: AtomicU64,

    /// Queued records evicted to make room for newer ones
    overruns: AtomicU64,

    /// Times a post found the queue full
    queue_full_events: AtomicU64,

    /// Times a caller had to wait for room
    block_events: AtomicU64,
}

impl PoolMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            overruns: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn overruns(&self) -> u64 {
        self.overruns.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_overrun(&self) -> u64 {
        self.overruns.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of accepted records later evicted, as a percentage (0.0 - 100.0)
    pub fn overrun_rate(&self) -> f64 {
        let enqueued = self.enqueued() as f64;
        if enqueued == 0.0 {
            0.0
        } else {
            (self.overruns() as f64 / enqueued) * 100.0
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.enqueued.store(0, Ordering::Relaxed);
        self.overruns.store(0, Ordering::Relaxed);
        self.queue_full_events.store(0, Ordering::Relaxed);
        self.block_events.store(0, Ordering::Relaxed);
    }
}

impl Default for PoolMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PoolMetrics {
    /// Create a snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            overruns: AtomicU64::new(self.overruns()),
            queue_full_events: AtomicU64::new(self.queue_full_events()),
            block_events: AtomicU64::new(self.block_events()),
        }
    }
}
