//! Process-wide logger store
//!
//! Holds every named logger, the engine's own default logger and the shared
//! thread pool async loggers are built on. All state lives behind
//! `parking_lot` locks in one lazily created store.

use super::{
    error::{LoggerError, Result},
    logger::{Logger, LoggerPtr},
    sink::SinkPtr,
    thread_pool::{ThreadPool, DEFAULT_SHUTDOWN_TIMEOUT},
};
use crate::sinks::ConsoleSink;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

struct Store {
    loggers: RwLock<HashMap<String, LoggerPtr>>,
    default_logger: RwLock<Option<LoggerPtr>>,
    thread_pool: RwLock<Option<Arc<ThreadPool>>>,
}

fn store() -> &'static Store {
    static STORE: OnceLock<Store> = OnceLock::new();
    STORE.get_or_init(|| Store {
        loggers: RwLock::new(HashMap::new()),
        default_logger: RwLock::new(None),
        thread_pool: RwLock::new(None),
    })
}

/// Register `logger` under its own name
///
/// # Errors
///
/// Returns [`LoggerError::LoggerExists`] if the name is taken
pub fn register_logger(logger: LoggerPtr) -> Result<()> {
    let mut loggers = store().loggers.write();
    if loggers.contains_key(logger.name()) {
        return Err(LoggerError::LoggerExists(logger.name().to_string()));
    }
    loggers.insert(logger.name().to_string(), logger);
    Ok(())
}

/// Register `logger`, returning whatever was registered under its name before
pub fn register_or_replace(logger: LoggerPtr) -> Option<LoggerPtr> {
    store()
        .loggers
        .write()
        .insert(logger.name().to_string(), logger)
}

pub fn get(name: &str) -> Option<LoggerPtr> {
    store().loggers.read().get(name).cloned()
}

/// Remove a logger from the store. Existing handles stay usable.
pub fn drop_logger(name: &str) -> Option<LoggerPtr> {
    store().loggers.write().remove(name)
}

pub fn drop_all() {
    store().loggers.write().clear();
}

/// Names of every registered logger, sorted
pub fn logger_names() -> Vec<String> {
    let mut names: Vec<String> = store().loggers.read().keys().cloned().collect();
    names.sort();
    names
}

/// The engine's fallback logger: colored stdout at `Info`, created on first use
pub fn default_logger() -> LoggerPtr {
    if let Some(logger) = store().default_logger.read().as_ref() {
        return Arc::clone(logger);
    }

    let mut slot = store().default_logger.write();
    Arc::clone(slot.get_or_insert_with(|| {
        Logger::new("", [Arc::new(ConsoleSink::stdout_color()) as SinkPtr])
    }))
}

/// Create the shared pool and install it, replacing any previous one
///
/// Async loggers already built on the old pool keep it alive until they are
/// dropped.
///
/// # Errors
///
/// Returns error if the sizes are out of range or a worker fails to start
pub fn init_thread_pool(queue_size: usize, threads: usize) -> Result<Arc<ThreadPool>> {
    let pool = Arc::new(ThreadPool::new(queue_size, threads)?);
    *store().thread_pool.write() = Some(Arc::clone(&pool));
    Ok(pool)
}

pub fn thread_pool() -> Option<Arc<ThreadPool>> {
    store().thread_pool.read().clone()
}

/// Flush every registered logger and the default logger
pub fn flush_all() {
    let loggers: Vec<LoggerPtr> = store().loggers.read().values().cloned().collect();
    for logger in loggers {
        logger.flush();
    }
    let default = store().default_logger.read().clone();
    if let Some(logger) = default {
        logger.flush();
    }
}

/// Flush everything, wait for queued records, then release every logger and
/// the pool
///
/// Returns `false` if some pool did not drain within
/// [`DEFAULT_SHUTDOWN_TIMEOUT`]; its remaining records may be lost.
pub fn shutdown() -> bool {
    flush_all();

    let mut pools: Vec<Arc<ThreadPool>> = thread_pool().into_iter().collect();
    for logger in store().loggers.read().values() {
        if let Some(pool) = logger.thread_pool() {
            if !pools.iter().any(|known| Arc::ptr_eq(known, pool)) {
                pools.push(Arc::clone(pool));
            }
        }
    }

    let mut drained = true;
    for pool in &pools {
        if !pool.wait_idle(DEFAULT_SHUTDOWN_TIMEOUT) {
            eprintln!(
                "[LOGGER WARNING] Async queue did not drain within {:?}. Some logs may be lost.",
                DEFAULT_SHUTDOWN_TIMEOUT
            );
            drained = false;
        }
    }

    drop_all();
    store().thread_pool.write().take();
    drained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::logger::test_support::MemorySink;
    use crate::core::Level;

    #[test]
    fn test_register_and_get() {
        let logger = Logger::new("store-register", []);
        register_logger(Arc::clone(&logger)).unwrap();

        let found = get("store-register").unwrap();
        assert!(Arc::ptr_eq(&found, &logger));
        assert!(logger_names().contains(&"store-register".to_string()));

        assert!(drop_logger("store-register").is_some());
        assert!(get("store-register").is_none());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        register_logger(Logger::new("store-dup", [])).unwrap();
        let err = register_logger(Logger::new("store-dup", [])).unwrap_err();
        assert!(matches!(err, LoggerError::LoggerExists(ref name) if name == "store-dup"));
        drop_logger("store-dup");
    }

    #[test]
    fn test_register_or_replace() {
        let first = Logger::new("store-replace", []);
        let second = Logger::new("store-replace", []);

        assert!(register_or_replace(Arc::clone(&first)).is_none());
        let previous = register_or_replace(Arc::clone(&second)).unwrap();

        assert!(Arc::ptr_eq(&previous, &first));
        assert!(Arc::ptr_eq(&get("store-replace").unwrap(), &second));
        drop_logger("store-replace");
    }

    #[test]
    fn test_default_logger_is_stable() {
        let a = default_logger();
        let b = default_logger();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.level(), Level::Info);
        assert_eq!(a.sinks().len(), 1);
    }

    #[test]
    fn test_thread_pool_slot() {
        let pool = init_thread_pool(32, 1).unwrap();
        assert_eq!(pool.capacity(), 32);
        assert!(thread_pool().is_some());
        assert!(init_thread_pool(0, 1).is_err());
    }

    #[test]
    fn test_flush_all_reaches_registered_loggers() {
        let sink = MemorySink::new();
        let logger = Logger::new("store-flush", [sink.clone() as SinkPtr]);
        register_or_replace(logger);

        flush_all();
        assert!(*sink.flushes.lock() >= 1);
        drop_logger("store-flush");
    }
}
