//! Shared worker pool for async loggers
//!
//! Async loggers do not own threads. They post their records onto the
//! bounded queue of a [`ThreadPool`], and the pool's workers hand each
//! record back to its logger's sinks.

use super::{
    error::{LoggerError, Result},
    logger::LoggerPtr,
    metrics::PoolMetrics,
    overflow_policy::OverflowPolicy,
    record::Record,
};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Largest accepted worker count
pub const MAX_THREADS: usize = 1000;

/// How long [`store::shutdown`](super::store::shutdown) waits for queued records
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) enum AsyncMsg {
    Log(LoggerPtr, Record),
    Flush(LoggerPtr),
    Terminate,
}

pub struct ThreadPool {
    sender: Sender<AsyncMsg>,
    /// Kept so `DropOldest` can evict from the head of the queue
    receiver: Receiver<AsyncMsg>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    /// Messages posted but not yet fully handled by a worker
    pending: Arc<AtomicUsize>,
    metrics: PoolMetrics,
    capacity: usize,
}

impl ThreadPool {
    /// Spawn `threads` workers over a queue holding at most `queue_size` messages
    ///
    /// # Errors
    ///
    /// Returns error if `queue_size` is zero, `threads` is not in
    /// `1..=MAX_THREADS`, or a worker thread cannot be spawned
    pub fn new(queue_size: usize, threads: usize) -> Result<Self> {
        if queue_size == 0 {
            return Err(LoggerError::config(
                "ThreadPool",
                "queue_size must be greater than zero",
            ));
        }
        if threads == 0 || threads > MAX_THREADS {
            return Err(LoggerError::config(
                "ThreadPool",
                format!("num_threads must be between 1 and {}", MAX_THREADS),
            ));
        }

        let (sender, receiver) = bounded(queue_size);
        let pending = Arc::new(AtomicUsize::new(0));
        let mut workers = Vec::with_capacity(threads);
        for index in 0..threads {
            let receiver = receiver.clone();
            let pending = Arc::clone(&pending);
            let handle = thread::Builder::new()
                .name(format!("llog-worker-{}", index))
                .spawn(move || worker_loop(receiver, pending))
                .map_err(|e| {
                    LoggerError::io_operation(
                        "spawn async worker",
                        format!("Failed to start worker #{}", index),
                        e,
                    )
                })?;
            workers.push(handle);
        }

        Ok(Self {
            sender,
            receiver,
            workers: Mutex::new(workers),
            pending,
            metrics: PoolMetrics::new(),
            capacity: queue_size,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn threads(&self) -> usize {
        self.workers.lock().len()
    }

    /// Messages currently waiting for a worker
    pub fn queue_len(&self) -> usize {
        self.sender.len()
    }

    /// Messages queued or being written right now
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Wait until every posted message has been handled
    ///
    /// Returns `false` if `timeout` passed first.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        loop {
            if self.pending() == 0 {
                return true;
            }
            if start.elapsed() >= timeout {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    /// Records evicted by `DropOldest` so far
    pub fn overrun_count(&self) -> u64 {
        self.metrics.overruns()
    }

    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }

    pub(crate) fn post_log(&self, logger: LoggerPtr, record: Record, policy: OverflowPolicy) {
        self.post(AsyncMsg::Log(logger, record), policy);
    }

    pub(crate) fn post_flush(&self, logger: LoggerPtr, policy: OverflowPolicy) {
        self.post(AsyncMsg::Flush(logger), policy);
    }

    fn post(&self, msg: AsyncMsg, policy: OverflowPolicy) {
        // Counted before sending so a fast worker never sees it go negative
        self.pending.fetch_add(1, Ordering::AcqRel);
        if self.enqueue(msg, policy) {
            self.metrics.record_enqueued();
        } else {
            self.pending.fetch_sub(1, Ordering::AcqRel);
        }
    }

    fn enqueue(&self, msg: AsyncMsg, policy: OverflowPolicy) -> bool {
        let mut msg = match self.sender.try_send(msg) {
            Ok(()) => return true,
            Err(TrySendError::Full(msg)) => msg,
            // Pool is shutting down
            Err(TrySendError::Disconnected(_)) => return false,
        };
        self.metrics.record_queue_full();

        match policy {
            OverflowPolicy::Block => {
                self.metrics.record_block();
                self.sender.send(msg).is_ok()
            }
            OverflowPolicy::DropOldest => loop {
                if self.receiver.try_recv().is_ok() {
                    self.metrics.record_overrun();
                    self.pending.fetch_sub(1, Ordering::AcqRel);
                }
                match self.sender.try_send(msg) {
                    Ok(()) => return true,
                    Err(TrySendError::Full(returned)) => msg = returned,
                    Err(TrySendError::Disconnected(_)) => return false,
                }
            },
        }
    }
}

fn worker_loop(receiver: Receiver<AsyncMsg>, pending: Arc<AtomicUsize>) {
    while let Ok(msg) = receiver.recv() {
        match msg {
            AsyncMsg::Log(logger, record) => logger.backend_log(&record),
            AsyncMsg::Flush(logger) => logger.backend_flush(),
            AsyncMsg::Terminate => break,
        }
        pending.fetch_sub(1, Ordering::AcqRel);
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        let current = thread::current().id();
        let workers = std::mem::take(self.workers.get_mut());

        // The last handle can be released by a worker finishing its final
        // record; that worker exits on its own once the channel closes
        let others: Vec<_> = workers
            .into_iter()
            .filter(|handle| handle.thread().id() != current)
            .collect();

        // Terminate messages queue behind pending records, so those drain first
        for _ in 0..others.len() {
            if self.sender.send(AsyncMsg::Terminate).is_err() {
                break;
            }
        }

        for handle in others {
            if let Err(e) = handle.join() {
                eprintln!("[LOGGER ERROR] Async worker thread panicked during shutdown: {:?}", e);
            }
        }
    }
}
