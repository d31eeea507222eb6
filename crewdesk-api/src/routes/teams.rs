/// Team management and assignment endpoints
///
/// CRUD for teams plus the two membership operations. Assignments live
/// under the team: the team ID comes from the path, the employee ID from
/// the body. Both sides are resolved within the caller's organisation
/// before anything is written.
///
/// # Endpoints
///
/// - `GET /teams` - List teams with their employees
/// - `GET /teams/:team_id` - Get a single team with its employees
/// - `POST /teams` - Create team
/// - `PUT /teams/:team_id` - Partially update team
/// - `DELETE /teams/:team_id` - Delete team
/// - `POST /teams/:team_id/assign` - Assign an employee to the team
/// - `POST /teams/:team_id/unassign` - Remove an employee from the team

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use crewdesk_shared::{
    auth::middleware::AuthContext,
    models::{
        audit_log::{AuditAction, AuditLog, NewAuditEntry},
        employee::Employee,
        membership::{CreateMembership, Membership},
        team::{CreateTeam, Team, TeamWithEmployees, UpdateTeam},
    },
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::{Json, MessageResponse};

const TEAM_NOT_FOUND: &str = "Team not found";

/// Create team request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, message = "Team name is required"))]
    pub name: String,

    pub description: Option<String>,
}

/// Update team request
///
/// `description` can be cleared with an explicit `null`; an absent key
/// keeps the stored value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, message = "Team name cannot be empty"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub description: Option<Option<String>>,
}

/// Assign/unassign request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    /// The employee to assign or unassign
    pub employee_id: Uuid,
}

/// List teams response
#[derive(Debug, Serialize)]
pub struct ListTeamsResponse {
    /// Teams of the organisation, each with its members
    pub teams: Vec<TeamWithEmployees>,
}

/// Single team response with members
#[derive(Debug, Serialize)]
pub struct TeamDetailResponse {
    pub team: TeamWithEmployees,
}

/// Team response for create/update
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub team: Team,
}

/// Assignment response
#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub assignment: Membership,
}

/// List all teams of the organisation
///
/// Each team carries its members, oldest assignment first.
pub async fn list_teams(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListTeamsResponse>> {
    let teams = Team::list_with_employees(&state.db, auth.organisation_id).await?;

    Ok(Json(ListTeamsResponse { teams }))
}

/// Get a single team with its members
///
/// # Errors
///
/// - `404 Not Found`: No such team in this organisation
pub async fn get_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<TeamDetailResponse>> {
    let team = Team::find_with_employees(&state.db, team_id, auth.organisation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(TEAM_NOT_FOUND.to_string()))?;

    Ok(Json(TeamDetailResponse { team }))
}

/// Create a new team
///
/// # Errors
///
/// - `400 Bad Request`: Missing or empty name
pub async fn create_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<TeamResponse>)> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    let mut tx = state.db.begin().await?;

    let team = Team::create(
        &mut tx,
        CreateTeam {
            organisation_id: auth.organisation_id,
            name: req.name,
            description: req.description,
        },
    )
    .await?;

    AuditLog::append(
        &mut tx,
        NewAuditEntry {
            organisation_id: auth.organisation_id,
            user_id: auth.user_id,
            action: AuditAction::TeamCreated,
            meta: json!({
                "teamId": team.id,
                "name": team.name,
            }),
        },
    )
    .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(TeamResponse { team })))
}

/// Partially update a team
///
/// # Errors
///
/// - `400 Bad Request`: Empty name
/// - `404 Not Found`: No such team in this organisation
pub async fn update_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<Uuid>,
    Json(req): Json<UpdateTeamRequest>,
) -> ApiResult<Json<TeamResponse>> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    let mut changes = serde_json::Map::new();
    if let Some(name) = &req.name {
        changes.insert("name".to_string(), json!(name));
    }
    if let Some(description) = &req.description {
        changes.insert("description".to_string(), json!(description));
    }

    let mut tx = state.db.begin().await?;

    let team = Team::update(
        &mut tx,
        team_id,
        auth.organisation_id,
        UpdateTeam {
            name: req.name,
            description: req.description,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(TEAM_NOT_FOUND.to_string()))?;

    AuditLog::append(
        &mut tx,
        NewAuditEntry {
            organisation_id: auth.organisation_id,
            user_id: auth.user_id,
            action: AuditAction::TeamUpdated,
            meta: json!({
                "teamId": team.id,
                "changes": changes,
            }),
        },
    )
    .await?;

    tx.commit().await?;

    Ok(Json(TeamResponse { team }))
}

/// Delete a team
///
/// Assignments are removed with the row.
///
/// # Errors
///
/// - `404 Not Found`: No such team in this organisation
pub async fn delete_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let mut tx = state.db.begin().await?;

    let deleted = Team::delete(&mut tx, team_id, auth.organisation_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(TEAM_NOT_FOUND.to_string()));
    }

    AuditLog::append(
        &mut tx,
        NewAuditEntry {
            organisation_id: auth.organisation_id,
            user_id: auth.user_id,
            action: AuditAction::TeamDeleted,
            meta: json!({ "teamId": team_id }),
        },
    )
    .await?;

    tx.commit().await?;

    Ok(Json(MessageResponse {
        message: "Team deleted successfully".to_string(),
    }))
}

/// Assign an employee to a team
///
/// Both IDs must resolve inside the caller's organisation. The
/// pre-check makes the common duplicate a clean 409; two racing assigns
/// are decided by the unique constraint, and the loser gets the same 409.
///
/// # Endpoint
///
/// ```text
/// POST /teams/:team_id/assign
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "employeeId": "..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing employee ID
/// - `404 Not Found`: Team or employee not in this organisation
/// - `409 Conflict`: Employee already assigned to this team
pub async fn assign_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<Uuid>,
    Json(req): Json<AssignRequest>,
) -> ApiResult<(StatusCode, Json<AssignmentResponse>)> {
    Team::find_by_id(&state.db, team_id, auth.organisation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(TEAM_NOT_FOUND.to_string()))?;

    Employee::find_by_id(&state.db, req.employee_id, auth.organisation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    if Membership::exists(&state.db, req.employee_id, team_id).await? {
        return Err(ApiError::Conflict(
            "Employee already assigned to this team".to_string(),
        ));
    }

    let mut tx = state.db.begin().await?;

    let assignment = Membership::create(
        &mut tx,
        CreateMembership {
            employee_id: req.employee_id,
            team_id,
        },
    )
    .await?;

    AuditLog::append(
        &mut tx,
        NewAuditEntry {
            organisation_id: auth.organisation_id,
            user_id: auth.user_id,
            action: AuditAction::EmployeeAssignedToTeam,
            meta: json!({
                "employeeId": req.employee_id,
                "teamId": team_id,
            }),
        },
    )
    .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(AssignmentResponse { assignment })))
}

/// Remove an employee from a team
///
/// # Errors
///
/// - `400 Bad Request`: Missing employee ID
/// - `404 Not Found`: Team not in this organisation, or no such assignment
pub async fn unassign_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<Uuid>,
    Json(req): Json<AssignRequest>,
) -> ApiResult<Json<MessageResponse>> {
    Team::find_by_id(&state.db, team_id, auth.organisation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(TEAM_NOT_FOUND.to_string()))?;

    let mut tx = state.db.begin().await?;

    let removed = Membership::delete(&mut tx, req.employee_id, team_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Assignment not found".to_string()));
    }

    AuditLog::append(
        &mut tx,
        NewAuditEntry {
            organisation_id: auth.organisation_id,
            user_id: auth.user_id,
            action: AuditAction::EmployeeUnassignedFromTeam,
            meta: json!({
                "employeeId": req.employee_id,
                "teamId": team_id,
            }),
        },
    )
    .await?;

    tx.commit().await?;

    Ok(Json(MessageResponse {
        message: "Employee unassigned from team successfully".to_string(),
    }))
}
