//! `~` expansion against the real `HOME` variable
//!
//! Kept in its own binary with a single test because it rewrites the
//! process environment.

use llog::config::{Config, LoggerConfig, SinkConfig};
use llog::{load_config, load_sink, lookup, FileSink, LoggerError};
use tempfile::TempDir;

#[test]
fn test_home_expansion_follows_environment() {
    let home = TempDir::new().expect("Failed to create temp dir");
    std::env::set_var("HOME", home.path());

    // A leading `~` resolves against HOME at load time
    let sink = load_sink(&SinkConfig::file("~/logs/app.log")).expect("Failed to load sink");
    let file = sink.downcast_ref::<FileSink>().expect("file sink");
    assert_eq!(file.path(), home.path().join("logs/app.log").as_path());
    assert!(home.path().join("logs/app.log").exists());

    // Without HOME the sink cannot be built and the logger is not registered
    std::env::remove_var("HOME");
    let config = Config::default().with_logger(
        "home-missing",
        LoggerConfig {
            sinks: vec![SinkConfig::file("~/x.log")],
            ..LoggerConfig::default()
        },
    );
    let err = load_config(&config).unwrap_err();

    match &err {
        LoggerError::Load {
            logger,
            sink,
            source,
        } => {
            assert_eq!(logger, "home-missing");
            assert_eq!(*sink, Some(0));
            assert!(
                matches!(source.as_ref(), LoggerError::HomeDirectory { path } if path == "~/x.log"),
                "unexpected source: {source:?}"
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("HOME is not set"));
    assert!(lookup("home-missing").is_none());

    // Paths without a tilde never look at HOME
    let plain = home.path().join("plain.log");
    assert!(load_sink(&SinkConfig::file(&plain)).is_ok());
}
