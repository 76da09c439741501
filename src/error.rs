//! Error types for the sale audit service
//!
//! One `thiserror` enum per processing concern. Only intake errors ever reach
//! the HTTP caller; generation and delivery errors are absorbed by their
//! own steps and surface as fallback text or a failed delivery outcome.

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

/// The main error type for sale audit operations
#[derive(Error, Debug)]
pub enum Error {
    /// Request intake errors
    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    /// Text generation errors
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Email delivery errors
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that terminate a request before any outbound call is made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    /// Anything other than POST
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Body could not be decoded as form data
    #[error("Invalid data format")]
    InvalidFormat(String),

    /// No recipient to deliver the audit to
    #[error("Missing customer email")]
    MissingEmail,
}

impl IntakeError {
    /// HTTP status reported for this error
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidFormat(_) | Self::MissingEmail => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Text generation provider errors
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Provider answered with a non-2xx status
    #[error("Generation API error {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, as returned
        body: String,
    },

    /// Request never completed
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the expected schema
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Email provider errors
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Provider returned an error object
    #[error("{name}: {message}")]
    Provider {
        /// Provider error name
        name: String,
        /// Provider error message
        message: String,
    },

    /// Request never completed
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the expected schema
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Startup configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable is unset or empty
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),
}

/// Result type alias for sale audit operations
pub type Result<T> = std::result::Result<T, Error>;
