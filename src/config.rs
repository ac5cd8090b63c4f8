//! Declarative logger configuration
//!
//! A [`Config`] describes the shared thread pool and every named logger with
//! its sinks. It is plain data: build it in code, or read it from JSON with
//! [`Config::from_json_str`] / [`Config::from_path`], then hand it to
//! [`load_config`](crate::load::load_config).
//!
//! Every field has a default, so a partial document is accepted:
//!
//! ```
//! use llog::config::{Config, SinkType, SyncMode};
//! use llog::Level;
//!
//! let config = Config::from_json_str(r#"{
//!     "loggers": {
//!         "global": {
//!             "level": "debug",
//!             "sinks": [ { "type": "stdout", "colors": true } ]
//!         }
//!     }
//! }"#).unwrap();
//!
//! let global = &config.loggers["global"];
//! assert_eq!(global.level, Level::Debug);
//! assert_eq!(global.sync_mode, SyncMode::Sync);
//! assert_eq!(global.sinks[0].r#type, SinkType::Stdout);
//! assert_eq!(config.thread_pool.queue_size, 8192);
//! ```

use crate::core::{Level, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Size at which a rotating file is rotated, 1 MiB
pub const DEFAULT_MAX_SIZE: u64 = 1 << 20;

/// Rotated files kept beside the active one
pub const DEFAULT_MAX_NUM_FILES: usize = 5;

/// Capacity of the async queue
pub const DEFAULT_QUEUE_SIZE: usize = 8192;

/// Worker threads draining the async queue
pub const DEFAULT_NUM_THREADS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    #[default]
    Stdout,
    Stderr,
    File,
    RotatingFile,
    DailyFile,
}

impl SinkType {
    /// Whether this sink writes to `path`
    pub fn is_file(self) -> bool {
        matches!(self, Self::File | Self::RotatingFile | Self::DailyFile)
    }
}

/// How a logger hands records to its sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Sinks are written on the calling thread
    #[default]
    Sync,
    /// Queued to the thread pool; callers wait when the queue is full
    AsyncBlocking,
    /// Queued to the thread pool; the oldest queued record is dropped when full
    #[serde(alias = "async_drop_oldest")]
    AsyncOverflow,
}

impl SyncMode {
    pub fn is_async(self) -> bool {
        !matches!(self, Self::Sync)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SinkConfig {
    /// Minimum level this sink writes
    pub level: Level,
    pub r#type: SinkType,
    /// Console sinks only
    pub colors: bool,
    /// File sinks only. A leading `~` expands to `$HOME`.
    pub path: PathBuf,
    /// Daily rotation time, daily file sinks only
    pub hour: u32,
    pub minute: u32,
    /// Rotating file sinks only
    pub max_size: u64,
    pub max_num_files: usize,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            level: Level::Trace,
            r#type: SinkType::Stdout,
            colors: false,
            path: PathBuf::new(),
            hour: 0,
            minute: 0,
            max_size: DEFAULT_MAX_SIZE,
            max_num_files: DEFAULT_MAX_NUM_FILES,
        }
    }
}

impl SinkConfig {
    pub fn stdout(colors: bool) -> Self {
        Self {
            colors,
            ..Self::default()
        }
    }

    pub fn stderr(colors: bool) -> Self {
        Self {
            r#type: SinkType::Stderr,
            colors,
            ..Self::default()
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            r#type: SinkType::File,
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn rotating_file(path: impl Into<PathBuf>, max_size: u64, max_num_files: usize) -> Self {
        Self {
            r#type: SinkType::RotatingFile,
            path: path.into(),
            max_size,
            max_num_files,
            ..Self::default()
        }
    }

    pub fn daily_file(path: impl Into<PathBuf>, hour: u32, minute: u32) -> Self {
        Self {
            r#type: SinkType::DailyFile,
            path: path.into(),
            hour,
            minute,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub level: Level,
    /// Format pattern; empty keeps the engine's default
    pub format: String,
    pub sync_mode: SyncMode,
    /// Flush after every record
    pub force_flush: bool,
    pub sinks: Vec<SinkConfig>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            format: String::new(),
            sync_mode: SyncMode::Sync,
            force_flush: true,
            sinks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThreadPoolConfig {
    pub queue_size: usize,
    pub num_threads: usize,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            queue_size: DEFAULT_QUEUE_SIZE,
            num_threads: DEFAULT_NUM_THREADS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub thread_pool: ThreadPoolConfig,
    /// Keyed by logger name; loaded in key order
    pub loggers: BTreeMap<String, LoggerConfig>,
}

impl Config {
    /// Parse a JSON document
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::JsonError`](crate::LoggerError::JsonError) for
    /// malformed JSON, unknown fields or unknown enum values
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Serialize back to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[must_use]
    pub fn with_logger(mut self, name: impl Into<String>, logger: LoggerConfig) -> Self {
        self.loggers.insert(name.into(), logger);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerError;

    #[test]
    fn test_defaults() {
        let sink = SinkConfig::default();
        assert_eq!(sink.level, Level::Trace);
        assert_eq!(sink.r#type, SinkType::Stdout);
        assert!(!sink.colors);
        assert_eq!(sink.max_size, 1_048_576);
        assert_eq!(sink.max_num_files, 5);
        assert_eq!((sink.hour, sink.minute), (0, 0));

        let logger = LoggerConfig::default();
        assert_eq!(logger.level, Level::Info);
        assert!(logger.format.is_empty());
        assert_eq!(logger.sync_mode, SyncMode::Sync);
        assert!(logger.force_flush);
        assert!(logger.sinks.is_empty());

        let pool = ThreadPoolConfig::default();
        assert_eq!(pool.queue_size, 8192);
        assert_eq!(pool.num_threads, 1);
    }

    #[test]
    fn test_empty_document() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_document() {
        let config = Config::from_json_str(
            r#"{
                "thread_pool": { "queue_size": 1024, "num_threads": 2 },
                "loggers": {
                    "svc": {
                        "level": "warn",
                        "format": "%v",
                        "sync_mode": "async_blocking",
                        "force_flush": false,
                        "sinks": [
                            { "type": "rotating_file", "path": "~/logs/svc.log",
                              "max_size": 4096, "max_num_files": 3, "level": "err" },
                            { "type": "daily_file", "path": "/tmp/svc.log", "hour": 2, "minute": 30 }
                        ]
                    },
                    "lossy": { "sync_mode": "async_drop_oldest" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.thread_pool.queue_size, 1024);
        assert_eq!(config.thread_pool.num_threads, 2);

        let svc = &config.loggers["svc"];
        assert_eq!(svc.level, Level::Warn);
        assert_eq!(svc.sync_mode, SyncMode::AsyncBlocking);
        assert!(!svc.force_flush);
        assert_eq!(
            svc.sinks[0],
            SinkConfig::rotating_file("~/logs/svc.log", 4096, 3).with_level(Level::Error)
        );
        assert_eq!(svc.sinks[1], SinkConfig::daily_file("/tmp/svc.log", 2, 30));

        assert_eq!(config.loggers["lossy"].sync_mode, SyncMode::AsyncOverflow);
    }

    #[test]
    fn test_key_order_iteration() {
        let config = Config::default()
            .with_logger("zeta", LoggerConfig::default())
            .with_logger("alpha", LoggerConfig::default())
            .with_logger("global", LoggerConfig::default());

        let names: Vec<&str> = config.loggers.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["alpha", "global", "zeta"]);
    }

    #[test]
    fn test_rejects_unknown_fields_and_values() {
        let unknown_field = Config::from_json_str(r#"{ "loggers": { "a": { "colour": true } } }"#);
        assert!(matches!(unknown_field, Err(LoggerError::JsonError(_))));

        let unknown_type =
            Config::from_json_str(r#"{ "loggers": { "a": { "sinks": [ { "type": "syslog" } ] } } }"#);
        assert!(unknown_type.is_err());

        let unknown_level = Config::from_json_str(r#"{ "loggers": { "a": { "level": "loud" } } }"#);
        assert!(unknown_level.is_err());
    }

    #[test]
    fn test_json_roundtrip_preserves_config() {
        let config = Config::default().with_logger(
            "svc",
            LoggerConfig {
                sync_mode: SyncMode::AsyncOverflow,
                sinks: vec![SinkConfig::stderr(true), SinkConfig::file("svc.log")],
                ..LoggerConfig::default()
            },
        );

        let json = config.to_json_string().unwrap();
        assert!(json.contains("\"async_overflow\""));
        assert_eq!(Config::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logging.json");
        std::fs::write(&path, r#"{ "thread_pool": { "num_threads": 4 } }"#).unwrap();

        let config = Config::from_path(&path).unwrap();
        assert_eq!(config.thread_pool.num_threads, 4);
        assert_eq!(config.thread_pool.queue_size, DEFAULT_QUEUE_SIZE);

        assert!(Config::from_path(dir.path().join("missing.json")).is_err());
    }
}
