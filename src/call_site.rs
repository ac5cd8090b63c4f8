//! The generic call-site entry points behind the logging macros
//!
//! Both functions resolve the logger first and return early when it would
//! drop the record, so disabled levels cost one atomic load and no
//! formatting. Enabled messages are formatted here, on the calling thread,
//! before the logger (sync or async) sees them.
//!
//! The arguments of a disabled record are never formatted, so their
//! `Display`/`Debug` impls do not run at all. Code that relies on side
//! effects inside those impls sees them only for records that pass the
//! logger's level.

use crate::core::{Level, SourceLoc};
use crate::source::AsLoggerSource;
use std::fmt;

/// Format `args` and log them at `level`
///
/// # Example
/// ```
/// use llog::call_site;
/// use llog::{Level, LoggerSource, SourceLoc};
///
/// call_site::log(
///     &LoggerSource::Implicit,
///     SourceLoc::new(file!(), line!(), "main"),
///     Level::Info,
///     format_args!("{} workers ready", 4),
/// );
/// ```
pub fn log<S>(source: &S, loc: SourceLoc, level: Level, args: fmt::Arguments<'_>)
where
    S: AsLoggerSource + ?Sized,
{
    let logger = source.as_logger_source().resolve();
    if !logger.should_log(level) {
        return;
    }

    let message = match args.as_str() {
        Some(literal) => literal.to_string(),
        None => fmt::format(args),
    };
    logger.log(loc, level, message);
}

/// Log a single displayable value at `level`
pub fn log_message<S, M>(source: &S, loc: SourceLoc, level: Level, message: &M)
where
    S: AsLoggerSource + ?Sized,
    M: fmt::Display + ?Sized,
{
    let logger = source.as_logger_source().resolve();
    if !logger.should_log(level) {
        return;
    }
    logger.log(loc, level, message.to_string());
}
