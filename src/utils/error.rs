//! Error types and handling
//!
//! Common error types used across the crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("audio stream error: {0}")]
    Stream(String),
}

/// Error response for the UI layer
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        let code = match &error {
            AppError::Io(_) => "IO_ERROR",
            AppError::Decode(_) => "DECODE_ERROR",
            AppError::NoOutputDevice => "NO_OUTPUT_DEVICE",
            AppError::Stream(_) => "STREAM_ERROR",
        };

        ErrorResponse {
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_codes() {
        let response: ErrorResponse = AppError::Decode("bad header".into()).into();
        assert_eq!(response.code, "DECODE_ERROR");
        assert!(response.message.contains("bad header"));

        let response: ErrorResponse = AppError::NoOutputDevice.into();
        assert_eq!(response.code, "NO_OUTPUT_DEVICE");
    }
}
