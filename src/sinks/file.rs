//! Append-only single file sink

use crate::core::level::AtomicLevel;
use crate::core::{Level, LoggerError, Pattern, Record, Result, Sink};
use parking_lot::Mutex;
use std::any::Any;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Open `path` for appending (or truncate it), creating parent directories.
pub(crate) fn open_log_file(path: &Path, truncate: bool) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", parent.display()),
                e,
            )
        })?;
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if truncate {
        options.write(true).truncate(true);
    } else {
        options.append(true);
    }

    let file = options.open(path).map_err(|e| {
        LoggerError::file_sink(path.display().to_string(), format!("Failed to open: {}", e))
    })?;
    Ok(BufWriter::new(file))
}

struct State {
    writer: BufWriter<File>,
    pattern: Pattern,
    buffer: String,
}

pub struct FileSink {
    path: PathBuf,
    level: AtomicLevel,
    state: Mutex<State>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_truncate(path, false)
    }

    /// Open the file, discarding previous contents when `truncate` is set
    pub fn with_truncate(path: impl Into<PathBuf>, truncate: bool) -> Result<Self> {
        let path = path.into();
        let writer = open_log_file(&path, truncate)?;

        Ok(Self {
            path,
            level: AtomicLevel::new(Level::Trace),
            state: Mutex::new(State {
                writer,
                pattern: Pattern::default(),
                buffer: String::new(),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn log(&self, record: &Record) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        state.buffer.clear();
        state.pattern.format_into(record, &mut state.buffer);
        state.buffer.push('\n');

        state.writer.write_all(state.buffer.as_bytes()).map_err(|e| {
            LoggerError::file_sink(
                self.path.display().to_string(),
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
        "file"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.state.get_mut().writer.flush();
    }
}
