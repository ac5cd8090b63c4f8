//! Overflow policies for the async worker queue
//!
//! When the shared queue is full, the policy decides whether the caller
//! waits or the oldest queued record is sacrificed.

use std::fmt;

/// Policy for handling queue overflow in async logging
///
/// # Example
///
/// ```
/// use llog::OverflowPolicy;
///
/// // Default behavior: wait for room
/// assert_eq!(OverflowPolicy::default(), OverflowPolicy::Block);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Block the logging thread until the queue has room
    ///
    /// Nothing is lost, at the cost of back-pressure on the application.
    #[default]
    Block,

    /// Evict the oldest queued record to make room for the new one
    ///
    /// The logging thread never waits; evictions are counted as overruns.
    DropOldest,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::DropOldest => write!(f, "DropOldest"),
        }
    }
}
