//! HTTP Error Types
//!
//! Maps application errors to status codes and the `{message, error?}` body.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use waitlist_core::error::AppError;

/// Error body returned by every failing route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                message: message.into(),
                error: None,
            },
        }
    }

    /// Replace the headline message, keeping status and detail
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.body.message = message.into();
        self
    }
}

/// Status code for an application error
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::Validation(_) | AppError::Domain(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Storage(_)
        | AppError::Config(_)
        | AppError::Internal(_)
        | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status = status_for(&err);
        let body = match err {
            AppError::Validation(msg) | AppError::NotFound(msg) | AppError::Conflict(msg) => {
                ErrorBody {
                    message: msg,
                    error: None,
                }
            }
            AppError::Domain(e) => ErrorBody {
                message: e.to_string(),
                error: None,
            },
            other => ErrorBody {
                message: "Internal server error".to_string(),
                error: Some(other.to_string()),
            },
        };
        Self { status, body }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                message: "Invalid request body".to_string(),
                error: Some(rejection.body_text()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                status = self.status.as_u16(),
                message = %self.body.message,
                error = ?self.body.error,
                "Request failed"
            );
        } else {
            warn!(
                status = self.status.as_u16(),
                message = %self.body.message,
                "Request rejected"
            );
        }
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waitlist_core::domain::DomainError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Domain(DomainError::EmptyName),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                AppError::Storage("disk I/O error".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(status_for(&err), expected, "{:?}", err);
        }
    }

    #[test]
    fn test_client_error_body_has_no_detail() {
        let api: ApiError = AppError::Domain(DomainError::EmptyActivities).into();
        assert_eq!(api.body.message, "Please select at least one activity");
        assert_eq!(api.body.error, None);
    }

    #[test]
    fn test_server_error_body_carries_detail() {
        let api: ApiError = AppError::Storage("Database locked (SQLITE_BUSY)".into()).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(api.body.error.unwrap().contains("SQLITE_BUSY"));
    }

    #[test]
    fn test_error_body_omits_empty_detail() {
        let json = serde_json::to_value(ErrorBody {
            message: "nope".into(),
            error: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"message": "nope"}));
    }
}
