use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Uploaded file is not plain text (wrong media type and extension)
    #[error("Invalid file format: {filename} is not a plain-text file. Please upload a .txt file")]
    UnsupportedFormat { filename: String },

    /// Neither a file nor an inline text field was supplied
    #[error("No valid text input or file was supplied")]
    MissingInput,

    /// Resolved text content is empty or whitespace-only
    #[error("Text content is empty")]
    EmptyContent,

    /// Malformed request payload (e.g. unparseable multipart data)
    #[error("{message}")]
    BadRequest { message: String },

    /// Uploaded bytes are not valid UTF-8 text
    #[error("Failed to read uploaded file: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::UnsupportedFormat { .. } => StatusCode::BAD_REQUEST,
            Error::MissingInput => StatusCode::BAD_REQUEST,
            Error::EmptyContent => StatusCode::BAD_REQUEST,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            // Decode failures surface the underlying cause so callers can fix their input
            Error::Decode(source) => format!("Failed to read uploaded file: {source}"),
            Error::Internal { .. } | Error::Other(_) => "An internal error occurred during conversion".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Decode(_) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::UnsupportedFormat { .. } | Error::MissingInput | Error::EmptyContent | Error::BadRequest { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
