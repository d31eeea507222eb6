/// Employee management endpoints
///
/// CRUD for the employee records of the caller's organisation. Every
/// lookup is scoped to the organisation in the token, so an ID from
/// another tenant just yields a 404. Writes pair the row mutation with an
/// audit entry in one transaction.
///
/// # Endpoints
///
/// - `GET /employees` - List employees with their teams
/// - `GET /employees/:id` - Get a single employee with its teams
/// - `POST /employees` - Create employee
/// - `PUT /employees/:id` - Partially update employee
/// - `DELETE /employees/:id` - Delete employee

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
        employee::{CreateEmployee, Employee, EmployeeWithTeams, UpdateEmployee},
    },
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::{Json, MessageResponse};

const EMPLOYEE_NOT_FOUND: &str = "Employee not found";

/// Create employee request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    /// Contact email; no uniqueness is enforced for employees
    pub email: Option<String>,

    pub phone: Option<String>,
}

/// Update employee request
///
/// Only the fields present in the body are changed. For the nullable
/// fields an explicit `null` clears the value, while leaving the key out
/// keeps it.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub email: Option<Option<String>>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub phone: Option<Option<String>>,
}

/// List employees response
#[derive(Debug, Serialize)]
pub struct ListEmployeesResponse {
    /// Employees of the organisation, each with its teams
    pub employees: Vec<EmployeeWithTeams>,
}

/// Single employee response with team assignments
#[derive(Debug, Serialize)]
pub struct EmployeeDetailResponse {
    pub employee: EmployeeWithTeams,
}

/// Employee response for create/update
#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub employee: Employee,
}

/// List all employees of the organisation
///
/// Each employee carries its team assignments, oldest first.
pub async fn list_employees(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListEmployeesResponse>> {
    let employees = Employee::list_with_teams(&state.db, auth.organisation_id).await?;

    Ok(Json(ListEmployeesResponse { employees }))
}

/// Get a single employee with its team assignments
///
/// # Errors
///
/// - `404 Not Found`: No such employee in this organisation
pub async fn get_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<EmployeeDetailResponse>> {
    let employee = Employee::find_with_teams(&state.db, id, auth.organisation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(EMPLOYEE_NOT_FOUND.to_string()))?;

    Ok(Json(EmployeeDetailResponse { employee }))
}

/// Create a new employee
///
/// The row and its `employee_created` audit entry are written in one
/// transaction.
///
/// # Endpoint
///
/// ```text
/// POST /employees
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "firstName": "John",
///   "lastName": "Doe",
///   "email": "john@example.com",
///   "phone": "123-456-7890"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing or empty first/last name
/// - `401 Unauthorized`: Missing or invalid token
pub async fn create_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateEmployeeRequest>,
) -> ApiResult<(StatusCode, Json<EmployeeResponse>)> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    let mut tx = state.db.begin().await?;

    let employee = Employee::create(
        &mut tx,
        CreateEmployee {
            organisation_id: auth.organisation_id,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
        },
    )
    .await?;

    AuditLog::append(
        &mut tx,
        NewAuditEntry {
            organisation_id: auth.organisation_id,
            user_id: auth.user_id,
            action: AuditAction::EmployeeCreated,
            meta: json!({
                "employeeId": employee.id,
                "firstName": employee.first_name,
                "lastName": employee.last_name,
            }),
        },
    )
    .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(EmployeeResponse { employee })))
}

/// Partially update an employee
///
/// The audit entry records only the fields the caller sent, cleared
/// fields show up as `null`.
///
/// # Errors
///
/// - `400 Bad Request`: Empty first/last name
/// - `404 Not Found`: No such employee in this organisation
pub async fn update_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> ApiResult<Json<EmployeeResponse>> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    // Snapshot the provided fields for the audit entry before the
    // request is consumed
    let mut changes = serde_json::Map::new();
    if let Some(first_name) = &req.first_name {
        changes.insert("firstName".to_string(), json!(first_name));
    }
    if let Some(last_name) = &req.last_name {
        changes.insert("lastName".to_string(), json!(last_name));
    }
    if let Some(email) = &req.email {
        changes.insert("email".to_string(), json!(email));
    }
    if let Some(phone) = &req.phone {
        changes.insert("phone".to_string(), json!(phone));
    }

    let mut tx = state.db.begin().await?;

    let employee = Employee::update(
        &mut tx,
        id,
        auth.organisation_id,
        UpdateEmployee {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(EMPLOYEE_NOT_FOUND.to_string()))?;

    AuditLog::append(
        &mut tx,
        NewAuditEntry {
            organisation_id: auth.organisation_id,
            user_id: auth.user_id,
            action: AuditAction::EmployeeUpdated,
            meta: json!({
                "employeeId": employee.id,
                "changes": changes,
            }),
        },
    )
    .await?;

    tx.commit().await?;

    Ok(Json(EmployeeResponse { employee }))
}

/// Delete an employee
///
/// Team assignments are removed with the row. The audit entry survives,
/// it has no foreign key on the employee.
///
/// # Errors
///
/// - `404 Not Found`: No such employee in this organisation
pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let mut tx = state.db.begin().await?;

    let deleted = Employee::delete(&mut tx, id, auth.organisation_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(EMPLOYEE_NOT_FOUND.to_string()));
    }

    AuditLog::append(
        &mut tx,
        NewAuditEntry {
            organisation_id: auth.organisation_id,
            user_id: auth.user_id,
            action: AuditAction::EmployeeDeleted,
            meta: json!({ "employeeId": id }),
        },
    )
    .await?;

    tx.commit().await?;

    Ok(Json(MessageResponse {
        message: "Employee deleted successfully".to_string(),
    }))
}
