/// Audit log endpoints
///
/// Read-only access to the organisation's audit trail. Entries are
/// immutable once written; there is no endpoint that modifies or deletes
/// them.
///
/// # Endpoints
///
/// - `GET /logs` - List audit entries, newest first

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension};
use crewdesk_shared::{
    auth::middleware::AuthContext,
    models::audit_log::{AuditLog, AuditLogFilter, AuditLogWithActor},
};
use serde::{Deserialize, Serialize};

use super::{Json, Query};

/// Largest page a caller can request
const MAX_PAGE_SIZE: i64 = 100;

/// Page size when the caller doesn't pick one
const DEFAULT_PAGE_SIZE: i64 = 50;

/// Query parameters for listing audit entries
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    /// Only entries with this exact action name (e.g. `employee_created`)
    pub action: Option<String>,

    /// Page size, capped at 100
    pub limit: Option<i64>,

    /// Rows to skip
    pub offset: Option<i64>,
}

/// Audit log listing response
#[derive(Debug, Serialize)]
pub struct LogsResponse {
    /// One page of entries, newest first, each with its actor if the
    /// user still exists
    pub logs: Vec<AuditLogWithActor>,

    /// Total matching entries across all pages
    pub total: i64,

    /// The limit actually applied
    pub limit: i64,

    /// The offset actually applied
    pub offset: i64,
}

/// List audit entries for the organisation
///
/// Newest first, optionally filtered by action name. The response echoes
/// the limit and offset that were applied after capping, so callers can
/// page reliably even when they ask for too much.
///
/// # Endpoint
///
/// ```text
/// GET /logs?action=employee_created&limit=50&offset=0
/// Authorization: Bearer <token>
/// ```
///
/// # Response
///
/// ```json
/// {
///   "logs": [
///     {
///       "id": "...",
///       "organisationId": "...",
///       "userId": "...",
///       "action": "employee_created",
///       "meta": { "employeeId": "...", "firstName": "John", "lastName": "Doe" },
///       "timestamp": "2025-01-15T12:00:00Z",
///       "user": { "id": "...", "email": "admin@techcompany.com", "name": "Admin User" }
///     }
///   ],
///   "total": 60,
///   "limit": 50,
///   "offset": 0
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Unparseable limit/offset
/// - `401 Unauthorized`: Missing or invalid token
pub async fn list_logs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<LogsQuery>,
) -> ApiResult<Json<LogsResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let filter = AuditLogFilter {
        action: query.action,
        limit,
        offset,
    };

    let logs = AuditLog::list(&state.db, auth.organisation_id, &filter).await?;
    let total = AuditLog::count(&state.db, auth.organisation_id, filter.action.as_deref()).await?;

    Ok(Json(LogsResponse {
        logs,
        total,
        limit,
        offset,
    }))
}
