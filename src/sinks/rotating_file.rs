//! Size-based rotating file sink
//!
//! Writes to `base` until the next record would push the file past
//! `max_size` bytes, then shifts the history (`app.1.log` becomes
//! `app.2.log`, and so on), moves `app.log` to `app.1.log` and starts a
//! fresh `app.log`. At most `max_files` historical files are kept.

use super::file::open_log_file;
use crate::core::level::AtomicLevel;
use crate::core::{Level, LoggerError, Pattern, Record, Result, Sink};
use parking_lot::Mutex;
use std::any::Any;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Upper bound on retained history
pub const MAX_ROTATED_FILES: usize = 200_000;

/// Split `dir/app.log` into (`dir/app`, `.log`).
///
/// Hidden files (`.profile`) and names without a dot have no extension.
pub(crate) fn split_by_extension(path: &Path) -> (String, String) {
    let full = path.to_string_lossy().into_owned();
    let name_start = full
        .rfind(['/', '\\'])
        .map(|i| i + 1)
        .unwrap_or(0);

    match full[name_start..].rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < full.len() - name_start => {
            let split = name_start + dot;
            (full[..split].to_string(), full[split..].to_string())
        }
        _ => (full, String::new()),
    }
}

/// `app.log` with index 3 is `app.3.log`; index 0 is the base file itself
pub fn rotated_path(base: &Path, index: usize) -> PathBuf {
    if index == 0 {
        return base.to_path_buf();
    }
    let (stem, ext) = split_by_extension(base);
    PathBuf::from(format!("{}.{}{}", stem, index, ext))
}

struct State {
    writer: Option<BufWriter<File>>,
    current_size: u64,
    pattern: Pattern,
    buffer: String,
}

pub struct RotatingFileSink {
    base_path: PathBuf,
    max_size: u64,
    max_files: usize,
    level: AtomicLevel,
    state: Mutex<State>,
}

impl RotatingFileSink {
    /// Create a new rotating file sink
    ///
    /// # Errors
    ///
    /// Returns error if `max_size` is zero, `max_files` exceeds
    /// [`MAX_ROTATED_FILES`], or the file cannot be opened
    pub fn new(path: impl Into<PathBuf>, max_size: u64, max_files: usize) -> Result<Self> {
        let base_path = path.into();

        if max_size == 0 {
            return Err(LoggerError::config(
                "RotatingFileSink",
                "max_size must be greater than zero",
            ));
        }
        if max_files > MAX_ROTATED_FILES {
            return Err(LoggerError::config(
                "RotatingFileSink",
                format!("max_files must not exceed {}", MAX_ROTATED_FILES),
            ));
        }

        let writer = open_log_file(&base_path, false)?;
        let current_size = writer
            .get_ref()
            .metadata()
            .map_err(|e| {
                LoggerError::file_sink(
                    base_path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok(Self {
            base_path,
            max_size,
            max_files,
            level: AtomicLevel::new(Level::Trace),
            state: Mutex::new(State {
                writer: Some(writer),
                current_size,
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
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    #[must_use]
    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Bytes written to the active file so far
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.state.lock().current_size
    }

    /// Shift the history by one and reopen the base file empty
    fn rotate(&self, state: &mut State) -> Result<()> {
        // Close the active file before renaming it
        if let Some(mut writer) = state.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        for i in (1..=self.max_files).rev() {
            let src = rotated_path(&self.base_path, i - 1);
            if !src.exists() {
                continue;
            }
            let target = rotated_path(&self.base_path, i);
            if target.exists() {
                // Best effort; rename below reports the real failure
                let _ = fs::remove_file(&target);
            }
            fs::rename(&src, &target).map_err(|e| {
                LoggerError::file_rotation(
                    src.display().to_string(),
                    format!("Failed to rename to '{}': {}", target.display(), e),
                )
            })?;
        }

        state.writer = Some(open_log_file(&self.base_path, true)?);
        state.current_size = 0;
        Ok(())
    }
}

impl Sink for RotatingFileSink {
    fn log(&self, record: &Record) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        state.buffer.clear();
        state.pattern.format_into(record, &mut state.buffer);
        state.buffer.push('\n');
        let len = state.buffer.len() as u64;

        if state.current_size > 0 && state.current_size + len > self.max_size {
            if let Err(e) = self.rotate(state) {
                eprintln!("[WARN] Log rotation failed: {}. Continuing with current file.", e);

                if state.writer.is_none() {
                    state.writer = Some(open_log_file(&self.base_path, false)?);
                }
                // Let the file grow past the limit rather than retrying every record
                state.current_size = 0;
            }
        }

        let writer = state
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::file_sink(self.base_path.display().to_string(), "Writer not initialized"))?;
        writer.write_all(state.buffer.as_bytes()).map_err(|e| {
            LoggerError::file_sink(
                self.base_path.display().to_string(),
                format!("Failed to write log record: {}", e),
            )
        })?;
        state.current_size += len;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        if let Some(writer) = self.state.lock().writer.as_mut() {
            writer.flush().map_err(|e| {
                LoggerError::file_sink(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
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
        "rotating_file"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(writer) = self.state.get_mut().writer.as_mut() {
            let _ = writer.flush();
        }
    }
}
