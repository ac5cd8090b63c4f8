//! Error types for the logging facade and its engine

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration document could not be parsed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileSinkError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// `~` expansion needs a home directory
    #[error("Cannot expand '{path}': HOME is not set")]
    HomeDirectory { path: String },

    /// An async logger was requested before the worker pool existed
    #[error("Async logger '{logger}' requires an initialized thread pool")]
    ThreadPoolNotInitialized { logger: String },

    /// Name already taken in the logger store
    #[error("Logger with name '{0}' already exists")]
    LoggerExists(String),

    /// Failure while materializing one logger from configuration
    #[error("Failed to load logger '{logger}'{}: {source}", sink_suffix(.sink))]
    Load {
        logger: String,
        sink: Option<usize>,
        #[source]
        source: Box<LoggerError>,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

fn sink_suffix(sink: &Option<usize>) -> String {
    match sink {
        Some(index) => format!(" (sink #{})", index),
        None => String::new(),
    }
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileSinkError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Attach the logger name and sink index a load failure came from
    pub fn load(logger: impl Into<String>, sink: Option<usize>, source: LoggerError) -> Self {
        LoggerError::Load {
            logger: logger.into(),
            sink,
            source: Box::new(source),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("ThreadPool", "num_threads must be at least 1");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::file_sink("/var/log/app.log", "Permission denied");
        assert!(matches!(err, LoggerError::FileSinkError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::file_rotation("/var/log/app.log", "Disk full");
        assert_eq!(
            err.to_string(),
            "File rotation failed for '/var/log/app.log': Disk full"
        );

        let err = LoggerError::LoggerExists("svc".to_string());
        assert_eq!(err.to_string(), "Logger with name 'svc' already exists");
    }

    #[test]
    fn test_load_error_names_logger_and_sink() {
        let inner = LoggerError::config("sink", "path is required");
        let err = LoggerError::load("svc", Some(2), inner);
        let text = err.to_string();
        assert!(text.contains("'svc'"));
        assert!(text.contains("sink #2"));
        assert!(text.contains("path is required"));

        let err = LoggerError::load(
            "svc",
            None,
            LoggerError::ThreadPoolNotInitialized {
                logger: "svc".to_string(),
            },
        );
        assert!(!err.to_string().contains("sink #"));
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("opening log file", "cannot open file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log file"));
    }
}
