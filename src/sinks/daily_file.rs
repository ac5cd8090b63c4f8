//! Daily rotating file sink
//!
//! Each day gets its own file, `app_YYYY-MM-DD.log`. A new file is opened
//! by the first record at or after the configured `hour:minute`.

use super::file::open_log_file;
use super::rotating_file::split_by_extension;
use crate::core::level::AtomicLevel;
use crate::core::{Level, LoggerError, Pattern, Record, Result, Sink};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone};
use parking_lot::Mutex;
use std::any::Any;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// `logs/app.log` on 2025-01-08 is `logs/app_2025-01-08.log`
pub fn daily_path(base: &Path, date: NaiveDate) -> PathBuf {
    let (stem, ext) = split_by_extension(base);
    PathBuf::from(format!(
        "{}_{:04}-{:02}-{:02}{}",
        stem,
        date.year(),
        date.month(),
        date.day(),
        ext
    ))
}

struct State {
    writer: BufWriter<File>,
    current_path: PathBuf,
    rotation_time: DateTime<Local>,
    pattern: Pattern,
    buffer: String,
}

pub struct DailyFileSink {
    base_path: PathBuf,
    rotation_hour: u32,
    rotation_minute: u32,
    level: AtomicLevel,
    state: Mutex<State>,
}

impl DailyFileSink {
    /// # Errors
    ///
    /// Returns error if `hour > 23`, `minute > 59`, or the file cannot be opened
    pub fn new(path: impl Into<PathBuf>, hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(LoggerError::config(
                "DailyFileSink",
                format!("invalid rotation time {:02}:{:02}", hour, minute),
            ));
        }

        let base_path = path.into();
        let now = Local::now();
        let current_path = daily_path(&base_path, now.date_naive());
        let writer = open_log_file(&current_path, false)?;

        Ok(Self {
            base_path,
            rotation_hour: hour,
            rotation_minute: minute,
            level: AtomicLevel::new(Level::Trace),
            state: Mutex::new(State {
                writer,
                current_path,
                rotation_time: next_rotation(now, hour, minute),
                pattern: Pattern::default(),
                buffer: String::new(),
            }),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn rotation_hour(&self) -> u32 {
        self.rotation_hour
    }

    #[must_use]
    pub fn rotation_minute(&self) -> u32 {
        self.rotation_minute
    }

    /// File currently being written
    #[must_use]
    pub fn current_path(&self) -> PathBuf {
        self.state.lock().current_path.clone()
    }

    /// When the next record will open a new file
    #[must_use]
    pub fn next_rotation_time(&self) -> DateTime<Local> {
        self.state.lock().rotation_time
    }
}

/// First `hour:minute` strictly after `now`
fn next_rotation(now: DateTime<Local>, hour: u32, minute: u32) -> DateTime<Local> {
    let at = |date: NaiveDate| {
        date.and_hms_opt(hour, minute, 0)
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
    };

    match at(now.date_naive()) {
        Some(today) if today > now => today,
        _ => {
            let tomorrow = now.date_naive() + Duration::days(1);
            // A DST gap can swallow the wall-clock time; fall back to a day from now
            at(tomorrow).unwrap_or(now + Duration::days(1))
        }
    }
}

impl Sink for DailyFileSink {
    fn log(&self, record: &Record) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        if record.time >= state.rotation_time {
            let next_path = daily_path(&self.base_path, record.time.date_naive());
            let writer = open_log_file(&next_path, false).map_err(|e| {
                LoggerError::file_rotation(self.base_path.display().to_string(), e.to_string())
            })?;
            let _ = state.writer.flush();
            state.writer = writer;
            state.current_path = next_path;
            state.rotation_time =
                next_rotation(record.time, self.rotation_hour, self.rotation_minute);
        }

        state.buffer.clear();
        state.pattern.format_into(record, &mut state.buffer);
        state.buffer.push('\n');

        state.writer.write_all(state.buffer.as_bytes()).map_err(|e| {
            LoggerError::file_sink(
                state.current_path.display().to_string(),
                format!("Failed to write log record: {}", e),
            )
        })
    }

    fn flush(&self) -> Result<()> {
        self.state.lock().writer.flush()?;
        Ok(())
    }

    fn set_pattern(&self, pattern: Pattern) {
        self.state.lock().pattern = pattern;
    }

    fn level(&self) -> Level {
        self.level.get()
    }

    fn set_level(&self, level: Level) {
        self.level.set(level);
    }

    fn name(&self) -> &str {
        "daily_file"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for DailyFileSink {
    fn drop(&mut self) {
        let _ = self.state.get_mut().writer.flush();
    }
}
