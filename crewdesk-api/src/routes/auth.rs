/// Registration and login
///
/// Registration bootstraps a tenant: one request atomically creates the
/// organisation, its admin user, and the first audit entry. Login verifies
/// credentials and issues the 8 hour session token.
///
/// # Endpoints
///
/// - `POST /auth/register` - Register an organisation with its admin account
/// - `POST /auth/login` - Login and get a session token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode};
use crewdesk_shared::{
    auth::{jwt, password},
    models::{
        audit_log::{AuditAction, AuditLog, NewAuditEntry},
        organisation::{CreateOrganisation, Organisation},
        user::{CreateUser, User},
    },
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::Json;

/// The one message used for every failed login, whether the email is
/// unknown or the password is wrong
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Body for `POST /auth/register`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Name for the new organisation
    #[validate(length(min = 1, message = "Organisation name is required"))]
    pub org_name: String,

    /// Display name for the admin account
    #[validate(length(min = 1, message = "Admin name is required"))]
    pub admin_name: String,

    /// Admin login email, globally unique
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    /// Admin password, stored only as an Argon2id hash
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body for `POST /auth/login`
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response body shared by register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Session token, valid for 8 hours
    pub token: String,

    pub user: UserSummary,

    pub organisation: OrganisationSummary,
}

/// The authenticated user, without the password hash
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

/// The user's organisation
#[derive(Debug, Serialize)]
pub struct OrganisationSummary {
    pub id: Uuid,
    pub name: String,
}

/// Register a new organisation with its admin account
///
/// The organisation, the admin user, and the `organisation_created` audit
/// entry are written in one transaction: a duplicate email leaves no
/// orphaned organisation behind.
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "orgName": "Tech Company Inc.",
///   "adminName": "Admin User",
///   "email": "admin@techcompany.com",
///   "password": "password123"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with a session token and summaries of the new user and
/// organisation.
///
/// # Errors
///
/// - `400 Bad Request`: Missing or empty field
/// - `409 Conflict`: Email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    // Friendly pre-check; the unique constraint still decides races
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    // Hash outside the transaction, it's the expensive part
    let password_hash = password::hash_password(&req.password)?;

    let mut tx = state.db.begin().await?;

    let organisation = Organisation::create(
        &mut tx,
        CreateOrganisation {
            name: req.org_name,
        },
    )
    .await?;

    let user = User::create(
        &mut tx,
        CreateUser {
            organisation_id: organisation.id,
            email: req.email,
            password_hash,
            name: Some(req.admin_name),
        },
    )
    .await?;

    AuditLog::append(
        &mut tx,
        NewAuditEntry {
            organisation_id: organisation.id,
            user_id: user.id,
            action: AuditAction::OrganisationCreated,
            meta: json!({
                "organisationId": organisation.id,
                "userId": user.id,
            }),
        },
    )
    .await?;

    tx.commit().await?;

    let claims = jwt::Claims::new(user.id, organisation.id);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserSummary {
                id: user.id,
                email: user.email,
                name: user.name,
            },
            organisation: OrganisationSummary {
                id: organisation.id,
                name: organisation.name,
            },
        }),
    ))
}

/// Login and get a session token
///
/// Unknown email and wrong password return the same 401, so the endpoint
/// doesn't reveal which emails are registered. A successful login is
/// recorded in the audit log.
///
/// # Errors
///
/// - `400 Bad Request`: Missing or empty field
/// - `401 Unauthorized`: Credentials rejected
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let organisation = Organisation::find_by_id(&state.db, user.organisation_id)
        .await?
        .ok_or_else(|| {
            ApiError::InternalError(format!("Organisation {} missing for user", user.organisation_id))
        })?;

    let mut tx = state.db.begin().await?;
    AuditLog::append(
        &mut tx,
        NewAuditEntry {
            organisation_id: organisation.id,
            user_id: user.id,
            action: AuditAction::UserLogin,
            meta: json!({ "userId": user.id }),
        },
    )
    .await?;
    tx.commit().await?;

    let claims = jwt::Claims::new(user.id, organisation.id);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(AuthResponse {
        token,
        user: UserSummary {
            id: user.id,
            email: user.email,
            name: user.name,
        },
        organisation: OrganisationSummary {
            id: organisation.id,
            name: organisation.name,
        },
    }))
}
