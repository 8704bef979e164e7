//! Error types for the drivelib library.

use thiserror::Error;

/// Main error type for drivelib operations.
#[derive(Error, Debug)]
pub enum DriveError {
    /// The service could not be reached (connect failure, timeout, aborted request).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a failure status.
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    /// Rejected on the client before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response parsed but did not have the expected shape.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Base URL or endpoint could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Local file error while reading an upload or writing a download.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Custom error message.
    #[error("{0}")]
    Custom(String),
}

impl DriveError {
    /// True if no response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, DriveError::Network(_))
    }

    /// True if the service rejected the request.
    pub fn is_server(&self) -> bool {
        matches!(self, DriveError::Server { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DriveError::Validation(_))
    }

    /// HTTP status of a server rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            DriveError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for drivelib operations.
pub type Result<T> = std::result::Result<T, DriveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let server = DriveError::Server {
            status: 404,
            message: "Folder not found".to_string(),
        };
        assert!(server.is_server());
        assert!(!server.is_network());
        assert_eq!(server.status(), Some(404));
        assert_eq!(server.to_string(), "Server error: 404 - Folder not found");

        let validation = DriveError::Validation("Folder name is empty".to_string());
        assert!(validation.is_validation());
        assert!(!validation.is_server());
        assert_eq!(validation.status(), None);
    }

    #[test]
    fn test_json_error_conversion() {
        let err: DriveError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, DriveError::Json(_)));
    }
}
