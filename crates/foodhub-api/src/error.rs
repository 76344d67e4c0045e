//! # API Error Types
//!
//! The single error type every handler returns. Validation failures from
//! foodhub-core, database errors from sqlx, and registry outages all
//! collapse into [`AppError`], which renders as a JSON body carrying a
//! machine-readable code. Messages for 500s stay in the server log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// JSON body returned with every non-2xx response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Error code plus human-readable message. The code is stable across
/// releases; the message wording is not.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Errors a catalog handler can surface.
///
/// Every variant carries a client-facing message except `Internal`, whose
/// message is logged and replaced with a generic one.
#[derive(Error, Debug)]
pub enum AppError {
    /// The path names a row that does not exist (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// A field failed foodhub-core validation, or the request body
    /// references a row that does not exist (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// A unique name or EAN is already taken, or a delete would orphan
    /// referencing rows (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Database or filesystem failure (500). Details never reach the client.
    #[error("internal error: {0}")]
    Internal(String),

    /// Product intake cannot proceed: no registry client is configured,
    /// the registry is unreachable, or its record is unusable (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }

    /// 404 with the given message.
    pub fn not_found(msg: String) -> Self {
        Self::NotFound(msg)
    }

    /// 503 with the given message.
    pub fn service_unavailable(msg: &str) -> Self {
        Self::ServiceUnavailable(msg.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Internal messages name tables and connections; clients get a
        // fixed string instead.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<foodhub_core::ValidationError> for AppError {
    fn from(err: foodhub_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound("record not found".to_string()),
            sqlx::Error::Database(db_err) => {
                constraint_conflict(db_err.code().as_deref(), db_err.constraint())
                    .unwrap_or_else(|| Self::Internal(format!("database error: {err}")))
            }
            _ => Self::Internal(format!("database error: {err}")),
        }
    }
}

/// Map a Postgres unique (23505) or foreign-key (23503) violation to a 409
/// naming the constraint. Other codes map to `None` and the caller falls
/// back to a 500.
fn constraint_conflict(code: Option<&str>, constraint: Option<&str>) -> Option<AppError> {
    match code {
        Some("23505") => Some(AppError::Conflict(format!(
            "duplicate value violates {}",
            constraint.unwrap_or("unique constraint")
        ))),
        Some("23503") => Some(AppError::Conflict(format!(
            "operation violates {}",
            constraint.unwrap_or("foreign key constraint")
        ))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_status_codes() {
        let cases = [
            (
                AppError::NotFound("product 7".into()),
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (
                AppError::Validation("ean must be 13 digits".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
            ),
            (
                AppError::Conflict("country name taken".into()),
                StatusCode::CONFLICT,
                "CONFLICT",
            ),
        ];
        for (err, want_status, want_code) in cases {
            let (status, code) = err.status_and_code();
            assert_eq!(status, want_status);
            assert_eq!(code, want_code);
        }
    }

    #[test]
    fn server_error_status_codes() {
        let (status, code) = AppError::Internal("pool exhausted".into()).status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");

        let (status, code) =
            AppError::service_unavailable("product lookup is not configured").status_and_code();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "SERVICE_UNAVAILABLE");
    }

    #[test]
    fn display_carries_the_message() {
        let err = AppError::Conflict("EAN already registered".into());
        assert_eq!(err.to_string(), "conflict: EAN already registered");
    }

    #[test]
    fn invalid_ean_becomes_validation() {
        let core_err = foodhub_core::ValidationError::InvalidEan("12AB".to_string());
        match AppError::from(core_err) {
            AppError::Validation(msg) => assert!(msg.contains("12AB"), "got: {msg}"),
            other => panic!("expected Validation, got: {other:?}"),
        }
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let (status, _) = AppError::from(sqlx::Error::RowNotFound).status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn pool_timeout_stays_internal() {
        let (status, _) = AppError::from(sqlx::Error::PoolTimedOut).status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unique_violation_names_the_constraint() {
        match constraint_conflict(Some("23505"), Some("countries_name_key")) {
            Some(AppError::Conflict(msg)) => {
                assert!(msg.contains("countries_name_key"), "got: {msg}")
            }
            other => panic!("expected Conflict, got: {other:?}"),
        }
    }

    #[test]
    fn foreign_key_violation_names_the_constraint() {
        match constraint_conflict(Some("23503"), Some("companies_country_id_fkey")) {
            Some(AppError::Conflict(msg)) => {
                assert!(msg.contains("companies_country_id_fkey"), "got: {msg}")
            }
            other => panic!("expected Conflict, got: {other:?}"),
        }
    }

    #[test]
    fn other_db_codes_fall_through() {
        assert!(constraint_conflict(Some("42P01"), None).is_none());
        assert!(constraint_conflict(None, None).is_none());
    }

    #[test]
    fn error_body_wire_shape() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "CONFLICT".to_string(),
                message: "country name taken".to_string(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": {"code": "CONFLICT", "message": "country name taken"}})
        );
    }

    // ── rendered responses ───────────────────────────────────────

    use http_body_util::BodyExt;

    async fn rendered(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_body_keeps_the_message() {
        let (status, body) =
            rendered(AppError::not_found("product 42 does not exist".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.code, "NOT_FOUND");
        assert!(body.error.message.contains("product 42"));
    }

    #[tokio::test]
    async fn unavailable_body_keeps_the_message() {
        let (status, body) =
            rendered(AppError::service_unavailable("product lookup is not configured")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.error.code, "SERVICE_UNAVAILABLE");
        assert!(body.error.message.contains("not configured"));
    }

    #[tokio::test]
    async fn internal_body_hides_the_cause() {
        let (status, body) =
            rendered(AppError::Internal("relation products is locked".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert_eq!(body.error.message, "An internal error occurred");
        assert!(!body.error.message.contains("products"));
    }
}
