//! Process-wide global logger and name-based lookup
//!
//! The global logger starts out as the engine's default logger and can be
//! replaced at any time with [`set_global`]; [`load_config`](crate::load_config)
//! does so for a logger named [`GLOBAL_LOGGER_NAME`]. Holders of the previous
//! global keep their handle.

use crate::core::{store, LoggerPtr};
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

/// A configured logger with this name becomes the global logger
pub const GLOBAL_LOGGER_NAME: &str = "global";

fn global_cell() -> &'static RwLock<LoggerPtr> {
    static GLOBAL: OnceLock<RwLock<LoggerPtr>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(store::default_logger()))
}

/// The current global logger
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// let a = llog::global();
/// let b = llog::global();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub fn global() -> LoggerPtr {
    Arc::clone(&global_cell().read())
}

/// Replace the global logger
pub fn set_global(logger: LoggerPtr) {
    *global_cell().write() = logger;
}

/// Logger registered under `name`
pub fn lookup(name: &str) -> Option<LoggerPtr> {
    store::get(name)
}

/// Logger registered under `name`, or the global logger if there is none
pub fn lookup_or_global(name: &str) -> LoggerPtr {
    lookup(name).unwrap_or_else(global)
}
