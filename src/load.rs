//! Turning a [`Config`] into live loggers
//!
//! [`load_config`] initializes the shared thread pool, builds and registers
//! every configured logger, and installs the one named
//! [`GLOBAL_LOGGER_NAME`] as the process default.

use crate::config::{Config, LoggerConfig, SinkConfig, SinkType, SyncMode};
use crate::core::{
    store, Level, Logger, LoggerError, LoggerPtr, OverflowPolicy, Result, SinkPtr,
};
use crate::registry::{self, GLOBAL_LOGGER_NAME};
use crate::sinks::{ConsoleSink, DailyFileSink, FileSink, RotatingFileSink};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load every logger described by `config`
///
/// The thread pool is (re)initialized first. Loggers are built in name
/// order and replace any logger already registered under the same name. If
/// a logger named `"global"` exists afterwards, it becomes the global logger.
///
/// # Errors
///
/// The first failure stops the load. Loggers registered before it stay
/// registered.
///
/// # Example
/// ```
/// use llog::config::{Config, LoggerConfig, SinkConfig};
/// use llog::{load_config, lookup, Level};
///
/// let config = Config::default().with_logger(
///     "doc-svc",
///     LoggerConfig {
///         level: Level::Warn,
///         sinks: vec![SinkConfig::stderr(false)],
///         ..LoggerConfig::default()
///     },
/// );
/// load_config(&config).unwrap();
///
/// assert_eq!(lookup("doc-svc").unwrap().level(), Level::Warn);
/// ```
pub fn load_config(config: &Config) -> Result<()> {
    store::init_thread_pool(config.thread_pool.queue_size, config.thread_pool.num_threads)?;

    for (name, logger_config) in &config.loggers {
        load_logger(name, logger_config)?;
    }

    if let Some(global) = store::get(GLOBAL_LOGGER_NAME) {
        registry::set_global(global);
    }
    Ok(())
}

/// Build one logger from `config` and register it under `name`
///
/// # Errors
///
/// Returns [`LoggerError::Load`] naming the logger (and the sink, when one
/// of them failed)
pub fn load_logger(name: &str, config: &LoggerConfig) -> Result<LoggerPtr> {
    let sinks = config
        .sinks
        .iter()
        .enumerate()
        .map(|(idx, sink)| load_sink(sink).map_err(|e| LoggerError::load(name, Some(idx), e)))
        .collect::<Result<Vec<SinkPtr>>>()?;

    let mut builder = Logger::builder(name).sinks(sinks).level(config.level);

    if config.sync_mode.is_async() {
        let pool = store::thread_pool().ok_or_else(|| {
            LoggerError::load(
                name,
                None,
                LoggerError::ThreadPoolNotInitialized {
                    logger: name.to_string(),
                },
            )
        })?;
        let policy = match config.sync_mode {
            SyncMode::AsyncOverflow => OverflowPolicy::DropOldest,
            _ => OverflowPolicy::Block,
        };
        builder = builder.async_mode(pool, policy);
    }

    if !config.format.is_empty() {
        builder = builder.pattern(config.format.as_str());
    }

    if config.force_flush {
        builder = builder.flush_on(Level::Trace);
    }

    let logger = builder.build();
    store::register_or_replace(Arc::clone(&logger));
    Ok(logger)
}

/// Build one sink from `config`
///
/// # Errors
///
/// Returns error for an empty file path, an unexpandable `~`, invalid
/// rotation settings or a file that cannot be opened
pub fn load_sink(config: &SinkConfig) -> Result<SinkPtr> {
    let sink: SinkPtr = match config.r#type {
        SinkType::Stdout if config.colors => Arc::new(ConsoleSink::stdout_color()),
        SinkType::Stdout => Arc::new(ConsoleSink::stdout()),
        SinkType::Stderr if config.colors => Arc::new(ConsoleSink::stderr_color()),
        SinkType::Stderr => Arc::new(ConsoleSink::stderr()),
        SinkType::File => Arc::new(FileSink::new(sink_path(config)?)?),
        SinkType::RotatingFile => Arc::new(RotatingFileSink::new(
            sink_path(config)?,
            config.max_size,
            config.max_num_files,
        )?),
        SinkType::DailyFile => Arc::new(DailyFileSink::new(
            sink_path(config)?,
            config.hour,
            config.minute,
        )?),
    };

    sink.set_level(config.level);
    Ok(sink)
}

fn sink_path(config: &SinkConfig) -> Result<PathBuf> {
    if config.path.as_os_str().is_empty() {
        return Err(LoggerError::config(
            format!("{:?} sink", config.r#type),
            "path must not be empty",
        ));
    }
    expand_home(&config.path)
}

/// Replace a leading `~` with `$HOME`
///
/// # Errors
///
/// Returns [`LoggerError::HomeDirectory`] when the path needs expanding and
/// `HOME` is unset
pub fn expand_home(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if !starts_with_tilde(path) {
        return Ok(path.to_path_buf());
    }

    match std::env::var_os("HOME") {
        Some(home) => Ok(expand_home_with(path, Path::new(&home))),
        None => Err(LoggerError::HomeDirectory {
            path: path.display().to_string(),
        }),
    }
}

/// [`expand_home`] with an explicit home directory
///
/// Only the first character is replaced, so `~/logs` becomes `<home>/logs`
/// and `~user` becomes `<home>user`.
pub fn expand_home_with(path: &Path, home: &Path) -> PathBuf {
    match path.to_str().and_then(|s| s.strip_prefix('~')) {
        Some(rest) => {
            let mut expanded = home.as_os_str().to_os_string();
            expanded.push(rest);
            PathBuf::from(expanded)
        }
        None => path.to_path_buf(),
    }
}

fn starts_with_tilde(path: &Path) -> bool {
    path.to_str().is_some_and(|s| s.starts_with('~'))
}
