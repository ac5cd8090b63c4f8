//! Record formatting patterns
//!
//! A pattern is a string of literal text and `%` flags, compiled once and
//! applied to every record a sink writes:
//!
//! | flag | output |
//! |------|--------|
//! | `%v` | message |
//! | `%n` | logger name |
//! | `%l` / `%L` | level name / one-letter level |
//! | `%t` / `%P` | thread id / process id |
//! | `%Y %y %m %d %H %M %S` | date and time fields |
//! | `%e %f %F` | milli-, micro-, nanoseconds of the second |
//! | `%T` / `%D` | `%H:%M:%S` / `%m/%d/%y` |
//! | `%z` | UTC offset |
//! | `%s %g %# %! %@` | source file name, path, line, function, `file:line` |
//! | `%^ %$` | start and end of the colored range |
//! | `%%` | a literal `%` |
//!
//! Unknown flags are written out unchanged.

use super::record::Record;
use chrono::{Datelike, Timelike};
use std::fmt::Write;
use std::ops::Range;

/// Pattern used when a logger is configured without one
pub const DEFAULT_PATTERN: &str = "[%Y-%m-%d %H:%M:%S.%e] [%n] [%^%l%$] %v";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Message,
    LoggerName,
    Level,
    ShortLevel,
    ThreadId,
    ProcessId,
    Year,
    ShortYear,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millis,
    Micros,
    Nanos,
    Time,
    Date,
    UtcOffset,
    SourceBasename,
    SourcePath,
    SourceLine,
    SourceFunction,
    SourceLocation,
    ColorStart,
    ColorEnd,
}

impl Flag {
    fn from_char(c: char) -> Option<Self> {
        let flag = match c {
            'v' => Flag::Message,
            'n' => Flag::LoggerName,
            'l' => Flag::Level,
            'L' => Flag::ShortLevel,
            't' => Flag::ThreadId,
            'P' => Flag::ProcessId,
            'Y' => Flag::Year,
            'y' => Flag::ShortYear,
            'm' => Flag::Month,
            'd' => Flag::Day,
            'H' => Flag::Hour,
            'M' => Flag::Minute,
            'S' => Flag::Second,
            'e' => Flag::Millis,
            'f' => Flag::Micros,
            'F' => Flag::Nanos,
            'T' => Flag::Time,
            'D' => Flag::Date,
            'z' => Flag::UtcOffset,
            's' => Flag::SourceBasename,
            'g' => Flag::SourcePath,
            '#' => Flag::SourceLine,
            '!' => Flag::SourceFunction,
            '@' => Flag::SourceLocation,
            '^' => Flag::ColorStart,
            '$' => Flag::ColorEnd,
            _ => return None,
        };
        Some(flag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Flag(Flag),
}

/// A compiled formatting pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    pieces: Vec<Piece>,
}

impl Default for Pattern {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

impl Pattern {
    /// Compile a pattern string. Compilation never fails.
    pub fn new(pattern: &str) -> Self {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            match chars.next() {
                Some('%') => literal.push('%'),
                Some(next) => match Flag::from_char(next) {
                    Some(flag) => {
                        if !literal.is_empty() {
                            pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                        }
                        pieces.push(Piece::Flag(flag));
                    }
                    None => {
                        literal.push('%');
                        literal.push(next);
                    }
                },
                None => literal.push('%'),
            }
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Self {
            source: pattern.to_string(),
            pieces,
        }
    }

    /// The pattern string this was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Append the formatted record to `out`.
    ///
    /// Returns the byte range between `%^` and `%$` if the pattern has one.
    /// A `%^` without a matching `%$` colors up to the end of the output.
    pub fn format_into(&self, record: &Record, out: &mut String) -> Option<Range<usize>> {
        let mut color_start = None;
        let mut color_end = None;
        let time = &record.time;

        for piece in &self.pieces {
            // Writing into a String cannot fail
            let _ = match piece {
                Piece::Literal(text) => {
                    out.push_str(text);
                    Ok(())
                }
                Piece::Flag(flag) => match flag {
                    Flag::Message => {
                        out.push_str(&record.message);
                        Ok(())
                    }
                    Flag::LoggerName => {
                        out.push_str(&record.logger_name);
                        Ok(())
                    }
                    Flag::Level => {
                        out.push_str(record.level.as_str());
                        Ok(())
                    }
                    Flag::ShortLevel => {
                        out.push_str(record.level.short_name());
                        Ok(())
                    }
                    Flag::ThreadId => {
                        out.push_str(&record.thread_id);
                        Ok(())
                    }
                    Flag::ProcessId => write!(out, "{}", std::process::id()),
                    Flag::Year => write!(out, "{:04}", time.year()),
                    Flag::ShortYear => write!(out, "{:02}", time.year().rem_euclid(100)),
                    Flag::Month => write!(out, "{:02}", time.month()),
                    Flag::Day => write!(out, "{:02}", time.day()),
                    Flag::Hour => write!(out, "{:02}", time.hour()),
                    Flag::Minute => write!(out, "{:02}", time.minute()),
                    Flag::Second => write!(out, "{:02}", time.second()),
                    Flag::Millis => write!(out, "{:03}", time.nanosecond() % 1_000_000_000 / 1_000_000),
                    Flag::Micros => write!(out, "{:06}", time.nanosecond() % 1_000_000_000 / 1_000),
                    Flag::Nanos => write!(out, "{:09}", time.nanosecond() % 1_000_000_000),
                    Flag::Time => write!(
                        out,
                        "{:02}:{:02}:{:02}",
                        time.hour(),
                        time.minute(),
                        time.second()
                    ),
                    Flag::Date => write!(
                        out,
                        "{:02}/{:02}/{:02}",
                        time.month(),
                        time.day(),
                        time.year().rem_euclid(100)
                    ),
                    Flag::UtcOffset => write!(out, "{}", time.format("%:z")),
                    Flag::SourceBasename => {
                        out.push_str(record.loc.basename());
                        Ok(())
                    }
                    Flag::SourcePath => {
                        out.push_str(record.loc.file);
                        Ok(())
                    }
                    Flag::SourceLine => {
                        if record.loc.is_empty() {
                            Ok(())
                        } else {
                            write!(out, "{}", record.loc.line)
                        }
                    }
                    Flag::SourceFunction => {
                        out.push_str(record.loc.function);
                        Ok(())
                    }
                    Flag::SourceLocation => {
                        if record.loc.is_empty() {
                            Ok(())
                        } else {
                            write!(out, "{}:{}", record.loc.basename(), record.loc.line)
                        }
                    }
                    Flag::ColorStart => {
                        color_start = Some(out.len());
                        Ok(())
                    }
                    Flag::ColorEnd => {
                        color_end = Some(out.len());
                        Ok(())
                    }
                },
            };
        }

        color_start.map(|start| start..color_end.filter(|end| *end >= start).unwrap_or(out.len()))
    }

    /// Format a record into a new string, without the color range.
    pub fn format(&self, record: &Record) -> String {
        let mut out = String::with_capacity(record.message.len() + 64);
        self.format_into(record, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::core::record::SourceLoc;
    use chrono::{Local, TimeZone};
    use std::sync::Arc;

    fn fixed_record() -> Record {
        let time = Local
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456);
        Record::new(
            Arc::from("svc"),
            SourceLoc::new("src/net/server.rs", 42, "server::accept"),
            Level::Warn,
            "disk almost full".to_string(),
        )
        .with_time(time)
    }

    #[test]
    fn test_default_pattern() {
        let line = Pattern::default().format(&fixed_record());
        assert_eq!(
            line,
            "[2025-01-08 10:30:45.123] [svc] [warning] disk almost full"
        );
    }

    #[test]
    fn test_time_fields() {
        let pattern = Pattern::new("%y|%T|%D|%f|%F");
        assert_eq!(
            pattern.format(&fixed_record()),
            "25|10:30:45|01/08/25|123456|123456000"
        );
    }

    #[test]
    fn test_source_flags() {
        let pattern = Pattern::new("%s %g %# %! %@");
        assert_eq!(
            pattern.format(&fixed_record()),
            "server.rs src/net/server.rs 42 server::accept server.rs:42"
        );
    }

    #[test]
    fn test_empty_location_renders_nothing() {
        let mut record = fixed_record();
        record.loc = SourceLoc::empty();
        assert_eq!(Pattern::new("<%@><%#>").format(&record), "<><>");
    }

    #[test]
    fn test_short_level_and_escapes() {
        let pattern = Pattern::new("%L 100%% %q %");
        assert_eq!(pattern.format(&fixed_record()), "W 100% %q %");
    }

    #[test]
    fn test_color_range() {
        let pattern = Pattern::new("[%^%l%$] %v");
        let mut out = String::new();
        let range = pattern.format_into(&fixed_record(), &mut out);
        assert_eq!(range, Some(1..8));
        assert_eq!(&out[1..8], "warning");

        let unterminated = Pattern::new("%^%L %v");
        let mut out = String::new();
        let range = unterminated.format_into(&fixed_record(), &mut out);
        assert_eq!(range, Some(0..out.len()));

        assert_eq!(Pattern::new("%v").format_into(&fixed_record(), &mut String::new()), None);
    }

    #[test]
    fn test_as_str_keeps_source() {
        assert_eq!(Pattern::new("%v").as_str(), "%v");
        assert_eq!(Pattern::default().as_str(), DEFAULT_PATTERN);
    }
}
