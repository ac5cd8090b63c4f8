//! Console sinks for standard output and standard error

use crate::core::level::AtomicLevel;
use crate::core::{Level, Pattern, Record, Result, Sink};
use colored::Colorize;
use parking_lot::Mutex;
use std::any::Any;
use std::io::{self, Write};

/// Which standard stream a [`ConsoleSink`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

enum Target {
    Stream(ConsoleStream),
    Writer(Box<dyn Write + Send>),
}

struct State {
    target: Target,
    pattern: Pattern,
    buffer: String,
}

pub struct ConsoleSink {
    name: &'static str,
    use_colors: bool,
    level: AtomicLevel,
    state: Mutex<State>,
}

impl ConsoleSink {
    fn with_target(name: &'static str, target: Target, use_colors: bool) -> Self {
        Self {
            name,
            use_colors,
            level: AtomicLevel::new(Level::Trace),
            state: Mutex::new(State {
                target,
                pattern: Pattern::default(),
                buffer: String::new(),
            }),
        }
    }

    pub fn new(stream: ConsoleStream, use_colors: bool) -> Self {
        let name = match (stream, use_colors) {
            (ConsoleStream::Stdout, false) => "stdout",
            (ConsoleStream::Stdout, true) => "stdout_color",
            (ConsoleStream::Stderr, false) => "stderr",
            (ConsoleStream::Stderr, true) => "stderr_color",
        };
        Self::with_target(name, Target::Stream(stream), use_colors)
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout, false)
    }

    pub fn stdout_color() -> Self {
        Self::new(ConsoleStream::Stdout, true)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleStream::Stderr, false)
    }

    pub fn stderr_color() -> Self {
        Self::new(ConsoleStream::Stderr, true)
    }

    /// Write to an arbitrary stream instead of a standard one.
    ///
    /// # Example
    ///
    /// ```
    /// use llog::sinks::ConsoleSink;
    ///
    /// let sink = ConsoleSink::from_writer(Vec::<u8>::new(), false);
    /// assert_eq!(sink.stream(), None);
    /// ```
    pub fn from_writer<W: Write + Send + 'static>(writer: W, use_colors: bool) -> Self {
        Self::with_target("ostream", Target::Writer(Box::new(writer)), use_colors)
    }

    pub fn uses_colors(&self) -> bool {
        self.use_colors
    }

    pub fn stream(&self) -> Option<ConsoleStream> {
        match self.state.lock().target {
            Target::Stream(stream) => Some(stream),
            Target::Writer(_) => None,
        }
    }
}

fn write_target(target: &mut Target, bytes: &[u8]) -> io::Result<()> {
    match target {
        Target::Stream(ConsoleStream::Stdout) => io::stdout().lock().write_all(bytes),
        Target::Stream(ConsoleStream::Stderr) => io::stderr().lock().write_all(bytes),
        Target::Writer(writer) => writer.write_all(bytes),
    }
}

impl Sink for ConsoleSink {
    fn log(&self, record: &Record) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        state.buffer.clear();
        let range = state.pattern.format_into(record, &mut state.buffer);
        state.buffer.push('\n');

        match range {
            Some(range) if self.use_colors && !range.is_empty() => {
                let colored = state.buffer[range.clone()]
                    .color(record.level.color_code())
                    .to_string();
                let mut line = String::with_capacity(state.buffer.len() + 16);
                line.push_str(&state.buffer[..range.start]);
                line.push_str(&colored);
                line.push_str(&state.buffer[range.end..]);
                write_target(&mut state.target, line.as_bytes())?;
            }
            _ => write_target(&mut state.target, state.buffer.as_bytes())?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        match &mut self.state.lock().target {
            Target::Stream(ConsoleStream::Stdout) => io::stdout().flush()?,
            Target::Stream(ConsoleStream::Stderr) => io::stderr().flush()?,
            Target::Writer(writer) => writer.flush()?,
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
        self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
