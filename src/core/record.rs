//! Log record and call-site location

use super::level::Level;
use chrono::{DateTime, Local};
use std::cell::RefCell;
use std::sync::Arc;

// Thread-local cache so the thread id is rendered once per thread
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<Arc<str>>> = const { RefCell::new(None) };
}

/// Numeric id of the current thread, computed and cached on first access
fn current_thread_id() -> Arc<str> {
    THREAD_ID_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        match cache.as_ref() {
            Some(id) => Arc::clone(id),
            None => {
                let debug = format!("{:?}", std::thread::current().id());
                let digits: String = debug.chars().filter(char::is_ascii_digit).collect();
                let id: Arc<str> = Arc::from(digits);
                *cache = Some(Arc::clone(&id));
                id
            }
        }
    })
}

/// Where a record was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLoc {
    pub file: &'static str,
    pub line: u32,
    pub function: &'static str,
}

impl SourceLoc {
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    pub const fn empty() -> Self {
        Self::new("", 0, "")
    }

    pub fn is_empty(&self) -> bool {
        self.line == 0
    }

    /// Location of the caller, without a function name.
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self::new(location.file(), location.line(), "")
    }

    /// File name without its directories
    pub fn basename(&self) -> &'static str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file)
    }
}

/// A fully formatted message on its way to the sinks.
#[derive(Debug, Clone)]
pub struct Record {
    pub logger_name: Arc<str>,
    pub level: Level,
    pub time: DateTime<Local>,
    pub message: String,
    pub loc: SourceLoc,
    pub thread_id: Arc<str>,
}

impl Record {
    pub fn new(logger_name: Arc<str>, loc: SourceLoc, level: Level, message: String) -> Self {
        Self {
            logger_name,
            level,
            time: Local::now(),
            message,
            loc,
            thread_id: current_thread_id(),
        }
    }

    #[must_use]
    pub fn with_time(mut self, time: DateTime<Local>) -> Self {
        self.time = time;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename() {
        let loc = SourceLoc::new("src/net/server.rs", 12, "server::run");
        assert_eq!(loc.basename(), "server.rs");
        assert_eq!(SourceLoc::new("main.rs", 1, "").basename(), "main.rs");
    }

    #[test]
    fn test_caller_location() {
        let loc = SourceLoc::caller();
        assert!(loc.file.ends_with("record.rs"));
        assert!(!loc.is_empty());
        assert!(SourceLoc::empty().is_empty());
    }

    #[test]
    fn test_thread_id_is_numeric_and_cached() {
        let first = Record::new(Arc::from("t"), SourceLoc::empty(), Level::Info, "a".into());
        let second = Record::new(Arc::from("t"), SourceLoc::empty(), Level::Info, "b".into());
        assert!(!first.thread_id.is_empty());
        assert!(first.thread_id.chars().all(|c| c.is_ascii_digit()));
        assert!(Arc::ptr_eq(&first.thread_id, &second.thread_id));
    }
}
