//! Error types for feedrelay.

use thiserror::Error;

/// Common error type for feedrelay.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Feed download or parse error.
    #[error("feed error: {0}")]
    Feed(String),

    /// Media (image or torrent) download error.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Platform upload rejection.
    #[error("upload error: {0}")]
    Upload(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for feedrelay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_error_display() {
        let err = RelayError::Feed("feed parsing failed".to_string());
        assert_eq!(err.to_string(), "feed error: feed parsing failed");
    }

    #[test]
    fn test_fetch_error_display() {
        let err = RelayError::Fetch("connection reset".to_string());
        assert_eq!(err.to_string(), "fetch error: connection reset");
    }

    #[test]
    fn test_upload_error_display() {
        let err = RelayError::Upload("image rejected".to_string());
        assert_eq!(err.to_string(), "upload error: image rejected");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RelayError = io_err.into();
        assert!(matches!(err, RelayError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = RelayError::Validation("limit must be positive".to_string());
        assert_eq!(err.to_string(), "validation error: limit must be positive");
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(RelayError::Fetch("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
