//! Sink trait for log output destinations

use super::{error::Result, level::Level, pattern::Pattern, record::Record};
use std::any::Any;
use std::sync::Arc;

/// A destination for formatted records.
///
/// Sinks are shared between loggers and threads, so every method takes
/// `&self`; implementations serialize their own writes.
pub trait Sink: Send + Sync + 'static {
    /// Format and write one record. The caller has already checked
    /// [`Sink::should_log`].
    fn log(&self, record: &Record) -> Result<()>;

    fn flush(&self) -> Result<()>;

    fn set_pattern(&self, pattern: Pattern);

    fn level(&self) -> Level;

    fn set_level(&self, level: Level);

    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;

    #[inline]
    fn should_log(&self, level: Level) -> bool {
        level.passes(self.level())
    }
}

pub type SinkPtr = Arc<dyn Sink>;

impl dyn Sink {
    /// Borrow the concrete sink type, if it is `T`
    pub fn downcast_ref<T: Sink>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}
