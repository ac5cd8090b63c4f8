//! Logging macros for call sites.
//!
//! Every macro captures `file!()`, `line!()` and the enclosing function at
//! the place it is written, and comes in four shapes:
//!
//! - `info!("template {}", args..)`: global logger, formatted message
//! - `info!(value)`: global logger, any `Display` value
//! - `info!(logger: src, "template {}", args..)`: explicit logger
//! - `info!(logger: src, value)`: explicit logger, any `Display` value
//!
//! `src` is a [`LoggerPtr`](crate::LoggerPtr), an object implementing
//! [`HasLogger`](crate::HasLogger), or a reference to either. A string
//! literal is always treated as a template, so `info!("100%")` is fine but
//! braces in a literal must be escaped. Other literals (`info!(42)`) are not
//! templates either; bind them to a variable first.
//!
//! # Examples
//!
//! ```
//! use llog::prelude::*;
//! use llog::{info, warn};
//!
//! let logger = Logger::builder("net").sink(ConsoleSink::stdout()).build();
//!
//! // Global logger
//! info!("Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger: &logger, "Server listening on port {}", port);
//!
//! // Any Display value
//! let err = std::io::Error::other("connection reset");
//! warn!(logger: logger, err);
//! ```

/// Name of the enclosing function, as a `&'static str` path
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let mut name = __type_name_of(__here);
        name = name.strip_suffix("::__here").unwrap_or(name);
        while let Some(outer) = name.strip_suffix("::{{closure}}") {
            name = outer;
        }
        name
    }};
}

/// Build a [`SourceLoc`](crate::SourceLoc) for the current position.
///
/// # Examples
///
/// ```
/// fn handler() -> llog::SourceLoc {
///     llog::source_loc!()
/// }
///
/// let loc = handler();
/// assert!(loc.function.ends_with("handler"));
/// assert!(loc.line > 0);
/// ```
#[macro_export]
macro_rules! source_loc {
    () => {
        $crate::SourceLoc::new(::std::file!(), ::std::line!(), $crate::__function_name!())
    };
}

/// Log a message at a given level.
///
/// # Examples
///
/// ```
/// use llog::prelude::*;
/// use llog::log;
///
/// let logger = Logger::builder("app").sink(ConsoleSink::stdout()).build();
/// log!(Level::Info, "Simple message");
/// log!(logger: &logger, Level::Error, "Error code: {}", 500);
/// let retries = 3;
/// log!(logger: &logger, Level::Warn, retries);
/// ```
#[macro_export]
macro_rules! log {
    (logger: $src:expr, $level:expr, $fmt:literal $($arg:tt)*) => {{
        use $crate::AsLoggerSource as _;
        match $src {
            ref __src => {
                let __source = (*__src).as_logger_source();
                $crate::call_site::log(
                    &__source,
                    $crate::source_loc!(),
                    $level,
                    ::std::format_args!($fmt $($arg)*),
                )
            }
        }
    }};
    (logger: $src:expr, $level:expr, $msg:expr $(,)?) => {{
        use $crate::AsLoggerSource as _;
        match $src {
            ref __src => {
                let __source = (*__src).as_logger_source();
                $crate::call_site::log_message(&__source, $crate::source_loc!(), $level, &$msg)
            }
        }
    }};
    ($level:expr, $fmt:literal $($arg:tt)*) => {
        $crate::call_site::log(
            &$crate::LoggerSource::Implicit,
            $crate::source_loc!(),
            $level,
            ::std::format_args!($fmt $($arg)*),
        )
    };
    ($level:expr, $msg:expr $(,)?) => {
        $crate::call_site::log_message(
            &$crate::LoggerSource::Implicit,
            $crate::source_loc!(),
            $level,
            &$msg,
        )
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// use llog::trace;
/// trace!("Entering function: calculate()");
/// trace!("Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    (logger: $src:expr, $($arg:tt)+) => {
        $crate::log!(logger: $src, $crate::Level::Trace, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// use llog::debug;
/// debug!("Debug information");
/// debug!("Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    (logger: $src:expr, $($arg:tt)+) => {
        $crate::log!(logger: $src, $crate::Level::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// use llog::info;
/// info!("Application started");
/// info!("Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    (logger: $src:expr, $($arg:tt)+) => {
        $crate::log!(logger: $src, $crate::Level::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// use llog::warn;
/// warn!("Low disk space");
/// warn!("Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    (logger: $src:expr, $($arg:tt)+) => {
        $crate::log!(logger: $src, $crate::Level::Warn, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// use llog::error;
/// error!("Failed to connect to database");
/// error!("Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    (logger: $src:expr, $($arg:tt)+) => {
        $crate::log!(logger: $src, $crate::Level::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Error, $($arg)+)
    };
}

/// Log a critical-level message.
///
/// # Examples
///
/// ```
/// use llog::critical;
/// critical!("Critical system failure");
/// critical!("Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! critical {
    (logger: $src:expr, $($arg:tt)+) => {
        $crate::log!(logger: $src, $crate::Level::Critical, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Critical, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::logger::test_support::MemorySink;
    use crate::core::{Level, Logger, LoggerPtr, Pattern, Sink, SinkPtr};
    use crate::source::{HasLogger, WithLogger};
    use std::sync::Arc;

    fn capture(name: &str, pattern: &str) -> (LoggerPtr, Arc<MemorySink>) {
        let sink = MemorySink::new();
        sink.set_pattern(Pattern::new(pattern));
        let logger = Logger::builder(name)
            .sinks([sink.clone() as SinkPtr])
            .level(Level::Trace)
            .build();
        (logger, sink)
    }

    #[test]
    fn test_log_macro() {
        let (logger, sink) = capture("macro-log", "%l %v");
        log!(logger: &logger, Level::Info, "Test message");
        log!(logger: &logger, Level::Info, "Formatted: {}", 42);
        let code = 7;
        log!(logger: logger, Level::Error, code);

        assert_eq!(
            sink.lines(),
            vec!["info Test message", "info Formatted: 42", "error 7"]
        );
    }

    #[test]
    fn test_level_macros() {
        let (logger, sink) = capture("macro-levels", "%L %v");
        trace!(logger: &logger, "t {}", 1);
        debug!(logger: &logger, "d {}", 2);
        info!(logger: &logger, "i {}", 3);
        warn!(logger: &logger, "w {}", 4);
        error!(logger: &logger, "e {}", 5);
        critical!(logger: &logger, "c {}", 6);

        assert_eq!(
            sink.lines(),
            vec!["T t 1", "D d 2", "I i 3", "W w 4", "E e 5", "C c 6"]
        );
    }

    #[test]
    fn test_named_and_inline_arguments() {
        let (logger, sink) = capture("macro-named", "%v");
        let user = "alice";
        info!(logger: &logger, "user={user} id={id}", id = 7);
        info!(logger: &logger, "trailing comma {}", 1,);

        assert_eq!(sink.lines(), vec!["user=alice id=7", "trailing comma 1"]);
    }

    #[test]
    fn test_single_message_forms() {
        let (logger, sink) = capture("macro-single", "%v");
        let owned = String::from("owned {not a template}");
        info!(logger: &logger, owned);
        let ratio = 3.5;
        info!(logger: &logger, ratio);
        info!(logger: &logger, "100%");

        assert_eq!(sink.lines(), vec!["owned {not a template}", "3.5", "100%"]);
    }

    #[test]
    fn test_owner_source() {
        struct Worker {
            log: WithLogger,
        }
        impl HasLogger for Worker {
            fn logger(&self) -> LoggerPtr {
                self.log.logger()
            }
        }

        let (logger, sink) = capture("macro-owner", "%n %v");
        let worker = Worker {
            log: WithLogger::with(logger),
        };
        info!(logger: &worker, "job {} done", 1);
        info!(logger: worker, "bye");

        assert_eq!(sink.lines(), vec!["macro-owner job 1 done", "macro-owner bye"]);
    }

    #[test]
    fn test_captures_call_site() {
        let (logger, sink) = capture("macro-loc", "%s|%!|%v");
        info!(logger: &logger, "here");
        assert_eq!(
            sink.lines(),
            vec!["macros.rs|llog::macros::tests::test_captures_call_site|here"]
        );

        let (loc, line) = (source_loc!(), line!());
        assert_eq!(loc.line, line);
        assert!(loc.file.ends_with("macros.rs"));
    }

    #[test]
    fn test_function_name_inside_closure() {
        let name = (|| __function_name!())();
        assert_eq!(name, "llog::macros::tests::test_function_name_inside_closure");
    }
}
