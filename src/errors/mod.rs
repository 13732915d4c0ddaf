//! Error handling module for the mention backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.
//! An empty search result is never an error; only the data fetch and malformed input fail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const FETCH_ERROR: &str = "FETCH_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Search backend unreachable, rejected the credentials, or returned malformed records
    Fetch(String),
    /// Configuration could not be parsed
    Config(String),
    /// Validation error
    Validation(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Fetch(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => codes::FETCH_ERROR,
            AppError::Config(_) => codes::CONFIG_ERROR,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            AppError::Fetch(msg)
            | AppError::Config(msg)
            | AppError::Validation(msg) => msg,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Search backend error: {:?}", err);
        AppError::Fetch(format!("Search backend error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Malformed search response: {:?}", err);
        AppError::Fetch(format!("Malformed search response: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
    pub generation: u64,
}

impl ErrorResponse {
    pub fn new(error: &AppError, generation: u64) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message().to_string(),
            },
            generation,
        }
    }
}

/// Wrapper type for errors that carry the index generation they were raised against.
pub struct AppErrorWithGeneration {
    pub error: AppError,
    pub generation: u64,
}

impl IntoResponse for AppErrorWithGeneration {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = ErrorResponse::new(&self.error, self.generation);
        (status, Json(body)).into_response()
    }
}
