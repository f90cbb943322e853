use std::fmt::Display;

use serde_json::Value;
use thiserror::Error;

/// Errors surfaced to API clients. Each variant maps to one HTTP status and a
/// JSON-API error document.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete request payload.
    #[error("{0}")]
    Validation(String),

    /// The request clashes with existing state (duplicate account, id or type mismatch).
    #[error("{0}")]
    Conflict(String),

    /// The model rejected a value on save.
    #[error("{0}")]
    InvalidModelValue(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("notification failed: {0}")]
    Notify(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// Server-side failure outside the database, with its context.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Validation(_) | ApiError::InvalidModelValue(_) => 400,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::Notify(_) => 502,
            ApiError::Database(_) | ApiError::Config(_) | ApiError::Internal(_) => 500,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "invalid",
            ApiError::Conflict(_) => "conflict",
            ApiError::InvalidModelValue(_) => "invalid_value",
            ApiError::NotFound(_) => "not_found",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Notify(_) => "notification_failed",
            ApiError::Database(_) | ApiError::Config(_) | ApiError::Internal(_) => "internal_error",
        }
    }

    /// Client-facing message. Server-side failures are not echoed back.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Database(_) | ApiError::Config(_) | ApiError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// `{"errors": [{"status", "code", "detail"}]}`.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "errors": [{
                "status": self.status().to_string(),
                "code": self.code(),
                "detail": self.detail(),
            }]
        })
    }
}

/// Log a server-side failure with context and convert it for the client.
pub fn internal_error<E: Display>(context: &str, err: E) -> ApiError {
    tracing::error!(error = %err, "{context}");
    ApiError::Internal(format!("{context}: {err}"))
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_is_distinct_from_validation() {
        let conflict = ApiError::Conflict("dup".into());
        let invalid = ApiError::Validation("bad".into());
        assert_eq!(conflict.status(), 409);
        assert_eq!(invalid.status(), 400);
        assert_ne!(conflict.code(), invalid.code());
    }

    #[test]
    fn error_document_carries_status_and_detail() {
        let body = ApiError::InvalidModelValue("Full name is required".into()).to_json();
        assert_eq!(body["errors"][0]["status"], "400");
        assert_eq!(body["errors"][0]["code"], "invalid_value");
        assert_eq!(body["errors"][0]["detail"], "Full name is required");
    }

    #[test]
    fn database_errors_are_not_leaked() {
        let err = ApiError::from(sea_orm::DbErr::Custom("disk I/O error".into()));
        assert_eq!(err.status(), 500);
        assert_eq!(err.to_json()["errors"][0]["detail"], "Internal server error");
    }

    #[test]
    fn internal_errors_keep_context_but_hide_it_from_clients() {
        let err = internal_error("Failed to apply migrations", "boom");
        assert!(matches!(&err, ApiError::Internal(msg) if msg == "Failed to apply migrations: boom"));
        assert_eq!(err.status(), 500);
        assert_eq!(err.to_json()["errors"][0]["detail"], "Internal server error");
    }
}
