//! # llog
//!
//! A thin logging façade: declare sinks and loggers in a [`Config`], load it
//! once at startup, then log from anywhere through the global logger, a named
//! logger or an object that carries its own.
//!
//! ## Features
//!
//! - **Declarative setup**: console, file, rotating and daily sinks, sync or
//!   async loggers, all from plain data or JSON
//! - **Global registry**: a process-wide default logger plus lookup by name
//! - **Call-site macros**: `info!`, `warn!`, ... capture file, line and
//!   function, and format on the calling thread
//! - **Shared worker pool**: async loggers queue records to one bounded pool
//!   that either blocks or drops the oldest record when full
//!
//! ## Example
//!
//! ```
//! use llog::config::{Config, LoggerConfig, SinkConfig};
//! use llog::{info, load_config, lookup_or_global};
//!
//! let config = Config::default().with_logger(
//!     "global",
//!     LoggerConfig {
//!         sinks: vec![SinkConfig::stdout(true)],
//!         ..LoggerConfig::default()
//!     },
//! );
//! load_config(&config).unwrap();
//!
//! info!("ready on port {}", 8080);
//!
//! let db = lookup_or_global("db");
//! info!(logger: &db, "pool size {}", 16);
//! ```

pub mod call_site;
pub mod config;
pub mod core;
pub mod load;
pub mod macros;
pub mod registry;
pub mod sinks;
pub mod source;

pub mod prelude {
    pub use crate::config::{Config, LoggerConfig, SinkConfig, SinkType, SyncMode, ThreadPoolConfig};
    pub use crate::core::{
        Level, Logger, LoggerBuilder, LoggerError, LoggerPtr, OverflowPolicy, Result, Sink,
        SinkPtr, SourceLoc, ThreadPool,
    };
    pub use crate::load::load_config;
    pub use crate::registry::{global, lookup, lookup_or_global, set_global};
    pub use crate::sinks::{ConsoleSink, DailyFileSink, FileSink, RotatingFileSink};
    pub use crate::source::{AsLoggerSource, HasLogger, LoggerSource, WithLogger};
}

pub use config::Config;
pub use core::{
    store, ErrorHandler, Level, Logger, LoggerBuilder, LoggerError, LoggerPtr, OverflowPolicy,
    Pattern, PoolMetrics, Record, Result, Sink, SinkPtr, SourceLoc, ThreadPool, DEFAULT_PATTERN,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use load::{expand_home, load_config, load_logger, load_sink};
pub use registry::{global, lookup, lookup_or_global, set_global, GLOBAL_LOGGER_NAME};
pub use sinks::{ConsoleSink, ConsoleStream, DailyFileSink, FileSink, RotatingFileSink};
pub use source::{AsLoggerSource, HasLogger, LoggerSource, WithLogger};
