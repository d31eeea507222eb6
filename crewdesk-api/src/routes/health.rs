/// Health check endpoint
///
/// Liveness only: reports that the process is up and accepting requests. It
/// deliberately does not touch the database, so a store outage doesn't take
/// the health endpoint down with it.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// { "message": "Server is running" }
/// ```

use super::{Json, MessageResponse};

/// Health check handler
pub async fn health_check() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Server is running".to_string(),
    })
}
