use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Payout already exists for this period")]
    DuplicatePayout,
    #[error("Client-supplied price field rejected")]
    PriceManipulation,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Account synchronization failed: {0}")]
    AccountSyncFailure(String),
    #[error("Identifier collision, retry the request")]
    InsertConflict,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    /// Returns the driver message when the wrapped sqlx error is a
    /// unique-constraint violation.
    ///
    /// 2067/1555 = SQLite unique/primary-key constraint, 23505 = Postgres
    /// unique violation. The message names the offending column or index,
    /// which callers use to decide how to converge.
    pub fn unique_violation_message(&self) -> Option<String> {
        let AppError::Database(e) = self else {
            return None;
        };
        let db_err = e.as_database_error()?;
        let code = db_err.code().unwrap_or_default();
        if code == "2067" || code == "1555" || code == "23505" {
            Some(db_err.message().to_string())
        } else {
            None
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.unique_violation_message().is_some()
    }
}

/// Splits storage failures into "retry later" (transport) and "contact
/// support" (missing schema) so the caller can offer the right action.
fn classify_db_error(e: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => (
            StatusCode::SERVICE_UNAVAILABLE,
            "storage_unavailable",
            "Storage temporarily unavailable, retry later".to_string(),
        ),
        _ => {
            if let Some(db_err) = e.as_database_error() {
                let code = db_err.code().unwrap_or_default();
                let msg = db_err.message();

                if code == "2067" || code == "1555" || code == "23505" {
                    return (
                        StatusCode::CONFLICT,
                        "conflict",
                        "Resource already exists (duplicate entry)".to_string(),
                    );
                }
                // 42P01 = Postgres undefined_table; SQLite says "no such table"
                if code == "42P01" || msg.contains("no such table") {
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "schema_missing",
                        "Storage schema missing, contact support".to_string(),
                    );
                }
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "Internal server error".to_string(),
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Database(e) => {
                let classified = classify_db_error(e);
                if classified.1 != "conflict" {
                    error!("Database error: {:?}", e);
                }
                classified
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "Unauthorized".to_string(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::InvalidState(msg) => (StatusCode::CONFLICT, "invalid_state", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "invalid_input", msg.clone()),
            AppError::DuplicatePayout => (
                StatusCode::CONFLICT,
                "duplicate_payout",
                "Payout already exists for this period".to_string(),
            ),
            AppError::PriceManipulation => (
                StatusCode::BAD_REQUEST,
                "price_manipulation",
                "Price fields must not be supplied by the client".to_string(),
            ),
            AppError::InvalidAmount(msg) => (StatusCode::BAD_REQUEST, "invalid_amount", msg.clone()),
            AppError::AccountSyncFailure(msg) => {
                error!("Account sync failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "account_sync_failure",
                    "Account could not be provisioned, please retry".to_string(),
                )
            }
            AppError::InsertConflict => (
                StatusCode::CONFLICT,
                "insert_conflict",
                "Identifier collision, retry the request".to_string(),
            ),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}
