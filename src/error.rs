use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::crypto::token::TokenError;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection pool error.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// An I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A session token error.
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Bad login credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// No usable session token on a guarded request.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but the action is not permitted.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A resource not found error.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A uniqueness conflict.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A multipart error.
    #[error("Multipart error: {0}")]
    Multipart(String),

    /// The image store or the description generator failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A missing or unusable configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// The JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// A short label for the error class.
    #[schema(example = "Unauthorized")]
    pub error: String,
    /// A message safe to show to the caller.
    #[schema(example = "Authentication token required")]
    pub message: String,
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Maps a unique-index violation to a `Conflict` with the given message,
    /// leaving every other database error untouched.
    pub fn conflict_on_unique(error: tokio_postgres::Error, message: &str) -> Self {
        if error.code() == Some(&tokio_postgres::error::SqlState::UNIQUE_VIOLATION) {
            AppError::Conflict(message.to_string())
        } else {
            AppError::Database(error)
        }
    }

    /// The message shown to a human operator, with internal detail withheld.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Authentication(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::Multipart(msg) => msg.clone(),
            AppError::Token(e) if !e.is_server_side() => "Invalid or expired token".to_string(),
            AppError::Upstream(_) => "An external service failed, please try again".to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    /// Logs the error at a level matching its severity.
    pub fn log(&self) {
        match self {
            AppError::Database(e) => tracing::error!("Database error: {}", e),
            AppError::Pool(e) => tracing::error!("Pool error: {}", e),
            AppError::Io(e) => tracing::error!("IO error: {}", e),
            AppError::Token(e) if e.is_server_side() => tracing::error!("Token error: {}", e),
            AppError::Token(e) => tracing::warn!("Token rejected: {}", e),
            AppError::Authentication(msg) => tracing::warn!("Authentication failed: {}", msg),
            AppError::Unauthorized(msg) => tracing::warn!("Unauthorized: {}", msg),
            AppError::Forbidden(msg) => tracing::warn!("Forbidden: {}", msg),
            AppError::NotFound(msg) => tracing::debug!("Not found: {}", msg),
            AppError::Validation(msg) => tracing::debug!("Validation error: {}", msg),
            AppError::Conflict(msg) => tracing::debug!("Conflict: {}", msg),
            AppError::Multipart(msg) => tracing::warn!("Multipart error: {}", msg),
            AppError::Upstream(msg) => tracing::error!("Upstream error: {}", msg),
            AppError::Config(msg) => tracing::error!("Configuration error: {}", msg),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let (status, label) = match self {
            AppError::Token(ref e) if e.is_server_side() => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
            AppError::Authentication(_) | AppError::Unauthorized(_) | AppError::Token(_) => {
                (StatusCode::UNAUTHORIZED, "Unauthorized")
            }
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
            AppError::Validation(_) | AppError::Multipart(_) => {
                (StatusCode::BAD_REQUEST, "Validation error")
            }
            AppError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, "Upstream error"),
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Io(_)
            | AppError::Config(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error"),
        };

        let body = sonic_rs::to_string(&ErrorBody {
            error: label.to_string(),
            message: self.public_message(),
        })
        .unwrap_or_else(|_| r#"{"error":"Server error"}"#.to_string());

        (
            status,
            [(http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
