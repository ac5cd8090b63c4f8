//! Logger implementation
//!
//! A [`Logger`] is a named set of sinks with a severity threshold. It either
//! writes to its sinks on the calling thread (sync) or posts records to a
//! shared [`ThreadPool`] whose workers write them (async).

use super::{
    error::LoggerError,
    level::{AtomicLevel, Level},
    overflow_policy::OverflowPolicy,
    pattern::Pattern,
    record::{Record, SourceLoc},
    sink::SinkPtr,
    thread_pool::ThreadPool,
};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

pub type LoggerPtr = Arc<Logger>;

/// Callback for sink failures. Replaces the default stderr report.
pub type ErrorHandler = Arc<dyn Fn(&LoggerError) + Send + Sync>;

enum Dispatch {
    Sync,
    Async {
        pool: Arc<ThreadPool>,
        policy: OverflowPolicy,
    },
}

pub struct Logger {
    name: Arc<str>,
    sinks: Vec<SinkPtr>,
    level: AtomicLevel,
    flush_level: AtomicLevel,
    dispatch: Dispatch,
    error_handler: RwLock<Option<ErrorHandler>>,
    /// Handle to ourselves, so async records can carry the logger to a worker
    this: Weak<Logger>,
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use llog::prelude::*;
    ///
    /// let logger = Logger::builder("app")
    ///     .sink(ConsoleSink::stdout())
    ///     .level(Level::Debug)
    ///     .build();
    /// assert_eq!(logger.name(), "app");
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }

    /// Synchronous logger over `sinks` with default settings
    pub fn new(name: impl Into<String>, sinks: impl IntoIterator<Item = SinkPtr>) -> LoggerPtr {
        Self::builder(name).sinks(sinks).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        self.level.get()
    }

    pub fn set_level(&self, level: Level) {
        self.level.set(level);
    }

    #[inline]
    pub fn should_log(&self, level: Level) -> bool {
        level.passes(self.level.get())
    }

    pub fn flush_level(&self) -> Level {
        self.flush_level.get()
    }

    /// Flush every sink after each record at or above `level`
    pub fn flush_on(&self, level: Level) {
        self.flush_level.set(level);
    }

    /// Install a format pattern on every sink of this logger
    pub fn set_pattern(&self, pattern: &str) {
        let compiled = Pattern::new(pattern);
        for sink in &self.sinks {
            sink.set_pattern(compiled.clone());
        }
    }

    pub fn sinks(&self) -> &[SinkPtr] {
        &self.sinks
    }

    pub fn is_async(&self) -> bool {
        matches!(self.dispatch, Dispatch::Async { .. })
    }

    /// `None` for synchronous loggers
    pub fn overflow_policy(&self) -> Option<OverflowPolicy> {
        match &self.dispatch {
            Dispatch::Sync => None,
            Dispatch::Async { policy, .. } => Some(*policy),
        }
    }

    /// Pool an async logger posts to
    pub fn thread_pool(&self) -> Option<&Arc<ThreadPool>> {
        match &self.dispatch {
            Dispatch::Sync => None,
            Dispatch::Async { pool, .. } => Some(pool),
        }
    }

    pub fn set_error_handler(&self, handler: ErrorHandler) {
        *self.error_handler.write() = Some(handler);
    }

    /// Emit one record. Sink failures are reported to the error handler,
    /// never to the caller.
    pub fn log(&self, loc: SourceLoc, level: Level, message: impl Into<String>) {
        if !self.should_log(level) {
            return;
        }

        let record = Record::new(Arc::clone(&self.name), loc, level, message.into());
        match &self.dispatch {
            Dispatch::Sync => self.backend_log(&record),
            Dispatch::Async { pool, policy } => {
                if let Some(this) = self.this.upgrade() {
                    pool.post_log(this, record, *policy);
                }
            }
        }
    }

    /// Flush all sinks; async loggers queue the flush behind pending records
    pub fn flush(&self) {
        match &self.dispatch {
            Dispatch::Sync => self.backend_flush(),
            Dispatch::Async { pool, policy } => {
                if let Some(this) = self.this.upgrade() {
                    pool.post_flush(this, *policy);
                }
            }
        }
    }

    /// Write a record to every sink whose floor it meets
    ///
    /// **Per-sink panic isolation**: each sink is wrapped in catch_unwind so
    /// one failing sink does not keep the record from the others.
    pub(crate) fn backend_log(&self, record: &Record) {
        for (idx, sink) in self.sinks.iter().enumerate() {
            if !sink.should_log(record.level) {
                continue;
            }

            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.log(record)));
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => self.handle_error(&e),
                Err(panic_info) => {
                    let err = LoggerError::other(format!(
                        "Sink #{} ({}) panicked: {}",
                        idx,
                        sink.name(),
                        panic_message(panic_info.as_ref())
                    ));
                    self.handle_error(&err);
                }
            }
        }

        if record.level.passes(self.flush_level.get()) {
            self.backend_flush();
        }
    }

    pub(crate) fn backend_flush(&self) {
        for (idx, sink) in self.sinks.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.flush()));
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => self.handle_error(&e),
                Err(panic_info) => {
                    let err = LoggerError::other(format!(
                        "Sink #{} ({}) panicked during flush: {}",
                        idx,
                        sink.name(),
                        panic_message(panic_info.as_ref())
                    ));
                    self.handle_error(&err);
                }
            }
        }
    }

    fn handle_error(&self, err: &LoggerError) {
        let handler = self.error_handler.read().clone();
        match handler {
            Some(handler) => handler(err),
            None => eprintln!(
                "[*** LOG ERROR ***] [{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                self.name,
                err
            ),
        }
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(SourceLoc::caller(), Level::Trace, message);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(SourceLoc::caller(), Level::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(SourceLoc::caller(), Level::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(SourceLoc::caller(), Level::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(SourceLoc::caller(), Level::Error, message);
    }

    #[inline]
    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(SourceLoc::caller(), Level::Critical, message);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("sinks", &self.sinks.len())
            .field("async", &self.is_async())
            .finish()
    }
}

/// Builder for constructing a [`Logger`] with a fluent API
///
/// # Example
/// ```
/// use llog::prelude::*;
/// use std::sync::Arc;
///
/// let pool = Arc::new(ThreadPool::new(1024, 1).unwrap());
/// let logger = Logger::builder("worker")
///     .sink(ConsoleSink::stderr_color())
///     .level(Level::Trace)
///     .flush_on(Level::Error)
///     .pattern("%H:%M:%S %l %v")
///     .async_mode(pool, OverflowPolicy::DropOldest)
///     .build();
/// assert!(logger.is_async());
/// ```
pub struct LoggerBuilder {
    name: String,
    sinks: Vec<SinkPtr>,
    level: Level,
    flush_level: Level,
    pattern: Option<String>,
    async_mode: Option<(Arc<ThreadPool>, OverflowPolicy)>,
    error_handler: Option<ErrorHandler>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sinks: Vec::new(),
            level: Level::Info,
            flush_level: Level::Off,
            pattern: None,
            async_mode: None,
            error_handler: None,
        }
    }

    /// Add a sink
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: super::sink::Sink>(mut self, sink: S) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Add already shared sinks, keeping their order
    #[must_use = "builder methods return a new value"]
    pub fn sinks(mut self, sinks: impl IntoIterator<Item = SinkPtr>) -> Self {
        self.sinks.extend(sinks);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_on(mut self, level: Level) -> Self {
        self.flush_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Post records to `pool` instead of writing them on the calling thread
    ///
    /// If not called, the logger will use synchronous mode.
    #[must_use = "builder methods return a new value"]
    pub fn async_mode(mut self, pool: Arc<ThreadPool>, policy: OverflowPolicy) -> Self {
        self.async_mode = Some((pool, policy));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_handler(mut self, handler: ErrorHandler) -> Self {
        self.error_handler = Some(handler);
        self
    }

    /// Build the Logger
    pub fn build(self) -> LoggerPtr {
        let dispatch = match self.async_mode {
            Some((pool, policy)) => Dispatch::Async { pool, policy },
            None => Dispatch::Sync,
        };

        let logger = Arc::new_cyclic(|this| Logger {
            name: Arc::from(self.name),
            sinks: self.sinks,
            level: AtomicLevel::new(self.level),
            flush_level: AtomicLevel::new(self.flush_level),
            dispatch,
            error_handler: RwLock::new(self.error_handler),
            this: this.clone(),
        });

        if let Some(pattern) = self.pattern {
            logger.set_pattern(&pattern);
        }
        logger
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{wait_until, MemorySink};
    use super::*;
    use crate::core::error::Result;
    use crate::core::sink::Sink;
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FailingSink {
        panic: bool,
    }

    impl Sink for FailingSink {
        fn log(&self, _record: &Record) -> Result<()> {
            if self.panic {
                panic!("sink exploded");
            }
            Err(LoggerError::other("disk full"))
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn set_pattern(&self, _pattern: Pattern) {}

        fn level(&self) -> Level {
            Level::Trace
        }

        fn set_level(&self, _level: Level) {}

        fn name(&self) -> &str {
            "failing"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder("plain").build();
        assert_eq!(logger.name(), "plain");
        assert_eq!(logger.level(), Level::Info);
        assert_eq!(logger.flush_level(), Level::Off);
        assert!(!logger.is_async());
        assert!(logger.overflow_policy().is_none());
        assert!(logger.sinks().is_empty());
    }

    #[test]
    fn test_threshold_filters_records() {
        let sink = MemorySink::new();
        let logger = Logger::builder("filter")
            .sinks([sink.clone() as SinkPtr])
            .level(Level::Info)
            .build();

        logger.debug("hidden");
        logger.info("shown");
        logger.set_level(Level::Off);
        logger.critical("also hidden");

        assert_eq!(sink.lines(), vec!["info shown".to_string()]);
    }

    #[test]
    fn test_sink_floor_is_independent_of_logger() {
        let verbose = MemorySink::new();
        let quiet = MemorySink::new();
        quiet.set_level(Level::Error);

        let logger = Logger::builder("floors")
            .sinks([verbose.clone() as SinkPtr, quiet.clone() as SinkPtr])
            .level(Level::Trace)
            .build();

        logger.warn("w");
        logger.error("e");

        assert_eq!(verbose.lines().len(), 2);
        assert_eq!(quiet.lines(), vec!["error e".to_string()]);
    }

    #[test]
    fn test_flush_on_level() {
        let sink = MemorySink::new();
        let logger = Logger::builder("flushy")
            .sinks([sink.clone() as SinkPtr])
            .flush_on(Level::Warn)
            .build();

        logger.info("no flush");
        assert_eq!(*sink.flushes.lock(), 0);
        logger.warn("flush");
        assert_eq!(*sink.flushes.lock(), 1);
    }

    #[test]
    fn test_pattern_reaches_every_sink() {
        let a = MemorySink::new();
        let b = MemorySink::new();
        let logger = Logger::builder("pat")
            .sinks([a.clone() as SinkPtr, b.clone() as SinkPtr])
            .pattern("%n|%L|%v")
            .build();

        logger.info("x");
        assert_eq!(a.lines(), vec!["pat|I|x".to_string()]);
        assert_eq!(b.lines(), vec!["pat|I|x".to_string()]);
    }

    #[test]
    fn test_caller_location_is_recorded() {
        let sink = MemorySink::new();
        sink.set_pattern(Pattern::new("%s"));
        let logger = Logger::new("loc", [sink.clone() as SinkPtr]);

        logger.info("where");
        assert_eq!(sink.lines(), vec!["logger.rs".to_string()]);
    }

    #[test]
    fn test_failing_sink_does_not_starve_others() {
        let errors = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&errors);
        let healthy = MemorySink::new();

        let logger = Logger::builder("isolated")
            .sink(FailingSink { panic: false })
            .sink(FailingSink { panic: true })
            .sinks([healthy.clone() as SinkPtr])
            .error_handler(Arc::new(move |_err| {
                counter.fetch_add(1, Ordering::Relaxed);
            }))
            .build();

        logger.info("survives");

        assert_eq!(errors.load(Ordering::Relaxed), 2);
        assert_eq!(healthy.lines(), vec!["info survives".to_string()]);
    }

    #[test]
    fn test_async_logger_writes_on_worker() {
        let pool = Arc::new(ThreadPool::new(128, 1).unwrap());
        let sink = MemorySink::new();
        let logger = Logger::builder("async")
            .sinks([sink.clone() as SinkPtr])
            .async_mode(Arc::clone(&pool), OverflowPolicy::Block)
            .build();

        assert!(logger.is_async());
        assert_eq!(logger.overflow_policy(), Some(OverflowPolicy::Block));

        for i in 0..50 {
            logger.info(format!("Message {}", i));
        }
        logger.flush();

        assert!(wait_until(Duration::from_secs(5), || sink.lines().len() == 50));
        assert!(wait_until(Duration::from_secs(5), || *sink.flushes.lock() >= 1));
        assert_eq!(sink.lines()[0], "info Message 0");
        assert_eq!(pool.overrun_count(), 0);
    }

    #[test]
    fn test_drop_oldest_never_blocks() {
        let pool = Arc::new(ThreadPool::new(1, 1).unwrap());
        let sink = MemorySink::slow(Duration::from_millis(20));
        let logger = Logger::builder("lossy")
            .sinks([sink.clone() as SinkPtr])
            .async_mode(Arc::clone(&pool), OverflowPolicy::DropOldest)
            .build();

        let start = std::time::Instant::now();
        for i in 0..20 {
            logger.info(format!("Message {}", i));
        }
        assert!(start.elapsed() < Duration::from_millis(200));

        assert!(wait_until(Duration::from_secs(5), || pool.queue_len() == 0));
        std::thread::sleep(Duration::from_millis(100));

        assert!(pool.overrun_count() > 0);
        let lines = sink.lines();
        assert!(lines.len() < 20);
        // The newest record is never the one evicted
        assert_eq!(lines.last().map(String::as_str), Some("info Message 19"));
    }
}
