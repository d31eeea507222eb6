/// Error type shared by every handler
///
/// Handlers return `Result<T, ApiError>`; the `IntoResponse` impl turns the
/// error into a JSON envelope of `{error, message, details?}` with the
/// matching status code. `From` conversions exist for the failure sources
/// handlers actually hit (database, token, password hashing, extractors), so
/// most call sites get away with `?`.
///
/// # Status mapping
///
/// - `BadRequest`, `ValidationError` -> 400
/// - `Unauthorized` -> 401
/// - `NotFound` -> 404 (also used for rows owned by another organisation)
/// - `Conflict` -> 409
/// - `InternalError` -> 500
///
/// # Example
///
/// ```no_run
/// use crewdesk_api::error::ApiResult;
/// use axum::Json;
/// use serde_json::{json, Value};
///
/// async fn handler() -> ApiResult<Json<Value>> {
///     Ok(Json(json!({ "ok": true })))
/// }
/// ```

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crewdesk_shared::auth::{jwt::JwtError, password::PasswordError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handler result alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Everything a handler can fail with
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request (400)
    BadRequest(String),

    /// Missing or bad credentials (401)
    Unauthorized(String),

    /// Row absent or owned by another organisation (404)
    NotFound(String),

    /// Duplicate email or duplicate assignment (409)
    Conflict(String),

    /// Per-field validation failures (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Anything unexpected (500)
    InternalError(String),
}

/// One failed field in a validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Name of the offending field
    pub field: String,

    /// What was wrong with it
    pub message: String,
}

/// JSON envelope every error response uses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable code such as `not_found` or `conflict`
    pub error: String,

    /// Human-readable description
    pub message: String,

    /// Field-level details, present for validation errors only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// Status code this error responds with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable code placed in the envelope's `error` field
    fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::ValidationError(_) => "validation_error",
            Self::InternalError(_) => "internal_error",
        }
    }

    /// Flattens `validator` output into per-field details
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: match &error.message {
                        Some(message) => message.to_string(),
                        None => "Invalid value".to_string(),
                    },
                })
            })
            .collect();

        Self::ValidationError(details)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Self::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            Self::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let (message, details) = match self {
            Self::ValidationError(errors) => {
                ("Request validation failed".to_string(), Some(errors))
            }
            Self::InternalError(msg) => {
                // The real cause goes to the log; the response only carries
                // it in debug builds
                tracing::error!("Internal error: {}", msg);
                let message = if cfg!(debug_assertions) {
                    msg
                } else {
                    "An internal error occurred".to_string()
                };
                (message, None)
            }
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg) => (msg, None),
        };

        let body = ErrorResponse {
            error: code.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Maps a violated unique constraint to the public conflict message
///
/// Uses the same messages the handlers' pre-checks use, so a lost race and a
/// plain duplicate are indistinguishable to clients.
fn conflict_for_constraint(constraint: &str) -> ApiError {
    if constraint.contains("email") {
        return ApiError::Conflict("Email already registered".to_string());
    }
    if constraint.contains("employee_teams") {
        return ApiError::Conflict("Employee already assigned to this team".to_string());
    }
    ApiError::Conflict(format!("Constraint violation: {}", constraint))
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.constraint() {
                Some(constraint) => conflict_for_constraint(constraint),
                None => Self::InternalError(format!("Database error: {}", db_err)),
            },
            other => Self::InternalError(format!("Database error: {}", other)),
        }
    }
}

/// Body extraction failures surface as 400s with axum's own description
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Query string parse failures surface as 400s
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Token failures are all 401s; only creation failures are server faults
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => {
                Self::Unauthorized("Invalid token issuer".to_string())
            }
            JwtError::CreateError(msg) => {
                Self::InternalError(format!("Token creation failed: {}", msg))
            }
            _ => Self::Unauthorized("Invalid token".to_string()),
        }
    }
}
