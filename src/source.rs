//! Where a call site gets its logger from
//!
//! A call site names its logger in one of three ways: an explicit handle,
//! an object that owns a logger, or nothing at all (the global logger).
//! [`LoggerSource`] captures that choice and [`LoggerSource::resolve`] is the
//! only place it is turned into a [`LoggerPtr`].

use crate::core::LoggerPtr;
use crate::registry;
use std::sync::Arc;

/// Capability of objects that carry their own logger
///
/// # Example
/// ```
/// use llog::{info, HasLogger, LoggerPtr, WithLogger};
///
/// struct Connection {
///     log: WithLogger,
///     peer: String,
/// }
///
/// impl HasLogger for Connection {
///     fn logger(&self) -> LoggerPtr {
///         self.log.logger()
///     }
/// }
///
/// let conn = Connection { log: WithLogger::new(), peer: "10.0.0.1".into() };
/// info!(logger: &conn, "connected to {}", conn.peer);
/// ```
pub trait HasLogger {
    fn logger(&self) -> LoggerPtr;
}

/// Embeddable logger holder
///
/// Starts with the global logger as it is at construction time; the owner
/// can swap in another one with [`WithLogger::set_logger`].
#[derive(Clone)]
pub struct WithLogger {
    logger: LoggerPtr,
}

impl WithLogger {
    pub fn new() -> Self {
        Self {
            logger: registry::global(),
        }
    }

    pub fn with(logger: LoggerPtr) -> Self {
        Self { logger }
    }

    pub fn set_logger(&mut self, logger: LoggerPtr) {
        self.logger = logger;
    }
}

impl Default for WithLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl HasLogger for WithLogger {
    fn logger(&self) -> LoggerPtr {
        Arc::clone(&self.logger)
    }
}

impl std::fmt::Debug for WithLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WithLogger")
            .field("logger", &self.logger.name())
            .finish()
    }
}

/// The logger a call site writes to
#[derive(Clone)]
pub enum LoggerSource<'a> {
    Handle(LoggerPtr),
    Owner(&'a dyn HasLogger),
    /// The global logger at the time of the call
    Implicit,
}

impl LoggerSource<'_> {
    pub fn resolve(&self) -> LoggerPtr {
        match self {
            LoggerSource::Handle(logger) => Arc::clone(logger),
            LoggerSource::Owner(owner) => owner.logger(),
            LoggerSource::Implicit => registry::global(),
        }
    }
}

/// Anything a call site accepts as its logger
///
/// Implemented for logger handles, every [`HasLogger`] type and
/// [`LoggerSource`] itself. The logging macros call it with method syntax,
/// so `&handle`, `&owner` and `owner` all work through auto-ref.
pub trait AsLoggerSource {
    fn as_logger_source(&self) -> LoggerSource<'_>;
}

impl AsLoggerSource for LoggerPtr {
    fn as_logger_source(&self) -> LoggerSource<'_> {
        LoggerSource::Handle(Arc::clone(self))
    }
}

impl<H: HasLogger> AsLoggerSource for H {
    fn as_logger_source(&self) -> LoggerSource<'_> {
        LoggerSource::Owner(self)
    }
}

impl AsLoggerSource for LoggerSource<'_> {
    fn as_logger_source(&self) -> LoggerSource<'_> {
        self.clone()
    }
}
