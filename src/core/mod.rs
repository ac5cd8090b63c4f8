//! Core engine types and traits

pub mod error;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod overflow_policy;
pub mod pattern;
pub mod record;
pub mod sink;
pub mod store;
pub mod thread_pool;

pub use error::{LoggerError, Result};
pub use level::Level;
pub use logger::{ErrorHandler, Logger, LoggerBuilder, LoggerPtr};
pub use metrics::PoolMetrics;
pub use overflow_policy::OverflowPolicy;
pub use pattern::{Pattern, DEFAULT_PATTERN};
pub use record::{Record, SourceLoc};
pub use sink::{Sink, SinkPtr};
pub use thread_pool::{ThreadPool, DEFAULT_SHUTDOWN_TIMEOUT};
