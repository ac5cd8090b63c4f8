//! Basic logger usage example
//!
//! Demonstrates the global logger, a named logger built in code, an object
//! that carries its own logger, and the four macro shapes.
//!
//! Run with: cargo run --example basic_usage

use llog::prelude::*;
use llog::{critical, debug, error, info, trace, warn};

struct Database {
    log: WithLogger,
    url: String,
}

impl HasLogger for Database {
    fn logger(&self) -> LoggerPtr {
        self.log.logger()
    }
}

impl Database {
    fn connect(&self) {
        // Records carry this function's path
        info!(logger: self, "connecting to {}", self.url);
    }
}

fn main() -> Result<()> {
    println!("=== llog - Basic Usage Example ===\n");

    println!("1. The global logger works without any setup:");
    info!("This is an info message");
    warn!("Retry attempt {} of {}", 3, 5);
    debug!("Debug message (hidden, the default level is info)");

    println!("\n2. A named logger with its own sink and pattern:");
    let logger = Logger::builder("app")
        .sink(ConsoleSink::stdout_color())
        .level(Level::Trace)
        .pattern("[%H:%M:%S.%e] [%n] [%^%l%$] [%s:%#] %v")
        .build();

    trace!(logger: &logger, "This is a trace message");
    debug!(logger: &logger, "This is a debug message");
    info!(logger: &logger, "This is an info message");
    warn!(logger: &logger, "This is a warning message");
    error!(logger: &logger, "This is an error message");
    critical!(logger: &logger, "This is a critical message");

    let err = std::io::Error::other("disk full");
    error!(logger: &logger, err);

    println!("\n3. Changing the level at runtime:");
    logger.set_level(Level::Warn);
    info!(logger: &logger, "Info message (hidden)");
    warn!(logger: &logger, "Warning message (visible)");

    println!("\n4. Objects that carry a logger:");
    let mut db = Database {
        log: WithLogger::new(),
        url: "postgres://localhost/app".to_string(),
    };
    db.connect();

    logger.set_level(Level::Info);
    db.log.set_logger(logger);
    db.connect();

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
