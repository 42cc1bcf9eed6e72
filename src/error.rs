//! Error types for parseview library.

use std::io;
use thiserror::Error;

/// Result type alias for parseview operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while normalizing or rendering a parse result.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The parse result is not valid JSON or does not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The producer value could not be converted to a structured mapping.
    #[error("Unsupported input type: {0}")]
    UnsupportedInput(String),

    /// The mapping was structured but its document section is malformed.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A page image could not be read or probed.
    #[error("Image error: {path}: {reason}")]
    Image {
        /// Path or URI of the image
        path: String,
        /// What went wrong
        reason: String,
    },

    /// Error while composing the HTML view.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an image error for the given path.
    pub fn image(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Image {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            _ => Error::Other(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedInput("array".to_string());
        assert_eq!(err.to_string(), "Unsupported input type: array");

        let err = Error::image("/tmp/page_1.png", "file not found");
        assert_eq!(err.to_string(), "Image error: /tmp/page_1.png: file not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
