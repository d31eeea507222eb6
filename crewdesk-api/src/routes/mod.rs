/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `employees`: Employee CRUD
/// - `teams`: Team CRUD and assignment endpoints
/// - `logs`: Audit log reads
///
/// It also carries the request plumbing the handlers share: a `Json`
/// extractor whose rejections map to our 400 error shape instead of axum's
/// default 422, and the `double_option` deserializer that distinguishes an
/// omitted field from an explicit null in partial updates.

use axum::extract::{FromRequest, FromRequestParts};
use axum::response::IntoResponse;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

pub mod auth;
pub mod employees;
pub mod health;
pub mod logs;
pub mod teams;

/// JSON body extractor with our error shape
///
/// Same as `axum::Json` except malformed bodies, wrong types, and missing
/// required fields all come back as a 400 `bad_request` response.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self.0).into_response()
    }
}

/// Query string extractor with our error shape
///
/// An unparseable parameter (say `?limit=abc`) becomes a 400 JSON error
/// rather than axum's plain-text rejection.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

/// Response body for endpoints that only confirm an outcome
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Deserializes `Option<Option<T>>` so updates can tell "field omitted"
/// (outer None) apart from "field set to null" (Some(None))
///
/// Use together with `#[serde(default)]`: serde only calls this when the
/// key is present, so an absent key stays at the outer None default.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::double_option")]
        email: Option<Option<String>>,
    }

    #[test]
    fn test_double_option_distinguishes_omitted_from_null() {
        let omitted: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(omitted.email, None);

        let cleared: Probe = serde_json::from_str(r#"{"email": null}"#).unwrap();
        assert_eq!(cleared.email, Some(None));

        let set: Probe = serde_json::from_str(r#"{"email": "a@b.c"}"#).unwrap();
        assert_eq!(set.email, Some(Some("a@b.c".to_string())));
    }
}
