//! Configuration loading example
//!
//! Loads a JSON configuration with a colored console logger as the global
//! logger, a rotating file logger and an async daily file logger, then logs
//! through each of them.
//!
//! Run with: cargo run --example config_loading

use llog::prelude::*;
use llog::{info, store, warn};

const CONFIG: &str = r#"{
    "thread_pool": { "queue_size": 1024, "num_threads": 1 },
    "loggers": {
        "global": {
            "level": "debug",
            "sinks": [ { "type": "stdout", "colors": true } ]
        },
        "audit": {
            "format": "[%Y-%m-%d %H:%M:%S] [%l] %v",
            "sinks": [
                { "type": "rotating_file", "path": "LOG_DIR/audit.log",
                  "max_size": 4096, "max_num_files": 3 }
            ]
        },
        "requests": {
            "sync_mode": "async_blocking",
            "force_flush": false,
            "sinks": [
                { "type": "daily_file", "path": "LOG_DIR/requests.log", "hour": 0, "minute": 0 },
                { "type": "stderr", "level": "warning" }
            ]
        }
    }
}"#;

fn main() -> Result<()> {
    println!("=== llog - Configuration Loading Example ===\n");

    let log_dir = std::env::temp_dir().join("llog_demo");
    let json = CONFIG.replace("LOG_DIR", &log_dir.display().to_string());

    let config = Config::from_json_str(&json)?;
    load_config(&config)?;
    println!("Loaded loggers: {:?}\n", store::logger_names());

    info!("The global logger now comes from the configuration");

    let audit = lookup_or_global("audit");
    for user in ["alice", "bob", "carol"] {
        info!(logger: &audit, "user {} logged in", user);
    }

    let requests = lookup_or_global("requests");
    for i in 0..100 {
        info!(logger: &requests, "GET /items/{} 200", i);
    }
    warn!(logger: &requests, "slow request: GET /report took {}ms", 1800);

    if !store::shutdown() {
        eprintln!("Warning: some queued records were not written");
    }

    println!("\nLog files written to {}", log_dir.display());
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
