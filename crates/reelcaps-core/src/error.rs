//! Error types module
//!
//! All failures of the session workflow are unified under [`SessionError`].
//! Each variant self-describes how it should be logged and whether the
//! operator can retry, so callers never have to match on variants to decide.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like remote failures
    Warn,
    /// Error level - for invariant violations
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Remote request failed with status {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("No session id available for {operation}")]
    MissingSession { operation: &'static str },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Static metadata for each variant: (error_code, recoverable, log_level).
fn session_error_static_metadata(err: &SessionError) -> (&'static str, bool, LogLevel) {
    match err {
        SessionError::FileTooLarge { .. } => ("FILE_TOO_LARGE", false, LogLevel::Debug),
        SessionError::Network { .. } => ("NETWORK_ERROR", true, LogLevel::Warn),
        SessionError::Remote { .. } => ("REMOTE_ERROR", true, LogLevel::Warn),
        SessionError::Timeout { .. } => ("TIMEOUT", true, LogLevel::Warn),
        SessionError::MissingSession { .. } => ("MISSING_SESSION", false, LogLevel::Error),
        SessionError::Decode(_) => ("DECODE_ERROR", true, LogLevel::Warn),
        SessionError::Io(_) => ("IO_ERROR", false, LogLevel::Warn),
        SessionError::Config(_) => ("CONFIG_ERROR", false, LogLevel::Error),
    }
}

impl SessionError {
    pub fn network(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        SessionError::Network {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Machine-readable error code (e.g. "REMOTE_ERROR")
    pub fn error_code(&self) -> &'static str {
        session_error_static_metadata(self).0
    }

    /// Whether the operator may retry the same action
    pub fn is_recoverable(&self) -> bool {
        session_error_static_metadata(self).1
    }

    pub fn log_level(&self) -> LogLevel {
        session_error_static_metadata(self).2
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_file_too_large() {
        let err = SessionError::FileTooLarge {
            size: 12 * 1024 * 1024,
            limit: 10 * 1024 * 1024,
        };
        assert_eq!(err.error_code(), "FILE_TOO_LARGE");
        assert!(!err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Debug);
        assert!(err.to_string().contains("12582912"));
    }

    #[test]
    fn test_error_metadata_remote() {
        let err = SessionError::Remote {
            status: 500,
            body: "render crashed".to_string(),
        };
        assert_eq!(err.error_code(), "REMOTE_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_error_metadata_missing_session() {
        let err = SessionError::MissingSession {
            operation: "process-video",
        };
        assert_eq!(err.error_code(), "MISSING_SESSION");
        assert_eq!(err.log_level(), LogLevel::Error);
        assert!(err.to_string().contains("process-video"));
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let err = SessionError::network(
            "Failed to send request",
            anyhow::anyhow!("connection refused"),
        );
        let details = err.detailed_message();
        assert!(details.starts_with("Network error: Failed to send request"));
        assert!(details.contains("Caused by: connection refused"));
    }
}
