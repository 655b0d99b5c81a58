//! Centralized helpers for HTTP and WebSocket error responses.
//!
//! Every error body carries the stable code of the rejection and a human-readable
//! message, so clients can branch on the code and show the message.
use actix::MailboxError;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use log::debug;
use serde_json::json;
use thiserror::Error;

use crate::game::{ErrorKind, GameError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Missing or invalid bearer credential.")]
    Unauthenticated,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// The match actor could not be reached; no state was touched.
    #[error("Service temporarily unavailable, please retry.")]
    Unavailable(#[from] MailboxError),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Game(err) => err.code(),
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unavailable(_) => "UNAVAILABLE",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Game(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::Authorization => StatusCode::FORBIDDEN,
                ErrorKind::Capacity | ErrorKind::State => StatusCode::CONFLICT,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
            },
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        debug!("[Api] Rejected with {} ({})", self.code(), self.status_code());
        HttpResponse::build(self.status_code()).json(json!({
            "status": "error",
            "code": self.code(),
            "message": self.to_string(),
        }))
    }
}

/// Formats a WebSocket error frame as a JSON string.
///
/// # Arguments
/// - `code`: Unique error code (e.g. "INVALID_MESSAGE").
/// - `message`: Human-readable error message.
pub fn ws_error_message(code: &str, message: &str) -> String {
    json!({
        "action": "Error",
        "data": { "code": code, "message": message },
    })
    .to_string()
}
