//! Sink implementations

pub mod console;
pub mod daily_file;
pub mod file;
pub mod rotating_file;

pub use console::{ConsoleSink, ConsoleStream};
pub use daily_file::DailyFileSink;
pub use file::FileSink;
pub use rotating_file::RotatingFileSink;

pub use crate::core::{Sink, SinkPtr};
