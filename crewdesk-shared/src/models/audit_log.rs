/// Audit log model and database operations
///
/// The audit log is append-only: rows are inserted on the same transaction
/// as the mutation they describe and are never updated or deleted by the
/// application. Reads are paginated, newest first, and join the acting user
/// so consumers see who did what without a second lookup.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE audit_logs (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organisation_id UUID,
///     user_id UUID,
///     action VARCHAR(50) NOT NULL,
///     meta JSONB,
///     timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// There are deliberately no foreign keys: an entry must survive the rows it
/// refers to, including the acting user.
///
/// # Example
///
/// ```no_run
/// use crewdesk_shared::models::audit_log::{AuditAction, AuditLog, NewAuditEntry};
/// use serde_json::json;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, org_id: Uuid, user_id: Uuid, employee_id: Uuid) -> Result<(), sqlx::Error> {
/// let mut tx = pool.begin().await?;
/// // ... perform the employee insert on the same transaction ...
/// AuditLog::append(
///     &mut tx,
///     NewAuditEntry {
///         organisation_id: org_id,
///         user_id,
///         action: AuditAction::EmployeeCreated,
///         meta: json!({ "employeeId": employee_id }),
///     },
/// )
/// .await?;
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// The fixed vocabulary of audited actions
///
/// Every mutating operation maps to exactly one of these. The set is
/// closed; queries filter on the raw string, so an unknown filter value
/// simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Organisation and admin account registered
    OrganisationCreated,

    /// Successful login
    UserLogin,

    /// Employee record created
    EmployeeCreated,

    /// Employee record updated
    EmployeeUpdated,

    /// Employee record deleted
    EmployeeDeleted,

    /// Team created
    TeamCreated,

    /// Team updated
    TeamUpdated,

    /// Team deleted
    TeamDeleted,

    /// Employee assigned to a team
    EmployeeAssignedToTeam,

    /// Employee removed from a team
    EmployeeUnassignedFromTeam,
}

impl AuditAction {
    /// Converts the action to its string form for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::OrganisationCreated => "organisation_created",
            AuditAction::UserLogin => "user_login",
            AuditAction::EmployeeCreated => "employee_created",
            AuditAction::EmployeeUpdated => "employee_updated",
            AuditAction::EmployeeDeleted => "employee_deleted",
            AuditAction::TeamCreated => "team_created",
            AuditAction::TeamUpdated => "team_updated",
            AuditAction::TeamDeleted => "team_deleted",
            AuditAction::EmployeeAssignedToTeam => "employee_assigned_to_team",
            AuditAction::EmployeeUnassignedFromTeam => "employee_unassigned_from_team",
        }
    }

    /// Parses an action from its stored string form
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "organisation_created" => Some(AuditAction::OrganisationCreated),
            "user_login" => Some(AuditAction::UserLogin),
            "employee_created" => Some(AuditAction::EmployeeCreated),
            "employee_updated" => Some(AuditAction::EmployeeUpdated),
            "employee_deleted" => Some(AuditAction::EmployeeDeleted),
            "team_created" => Some(AuditAction::TeamCreated),
            "team_updated" => Some(AuditAction::TeamUpdated),
            "team_deleted" => Some(AuditAction::TeamDeleted),
            "employee_assigned_to_team" => Some(AuditAction::EmployeeAssignedToTeam),
            "employee_unassigned_from_team" => Some(AuditAction::EmployeeUnassignedFromTeam),
            _ => None,
        }
    }
}

/// Audit log row
///
/// `organisation_id` and `user_id` are nullable at the schema level because
/// entries outlive the rows they reference.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    /// Unique entry ID (UUID v4)
    pub id: Uuid,

    /// Organisation the action happened in
    pub organisation_id: Option<Uuid>,

    /// User who performed the action
    pub user_id: Option<Uuid>,

    /// Action name, one of the [`AuditAction`] strings
    pub action: String,

    /// Action-specific payload (entity ids, changed fields)
    pub meta: Option<JsonValue>,

    /// When the action happened
    pub timestamp: DateTime<Utc>,
}

/// The acting user as embedded in audit log reads
#[derive(Debug, Clone, Serialize)]
pub struct AuditActor {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

/// An audit log entry joined with its acting user
///
/// `user` is None when the acting user has since been deleted.
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogWithActor {
    #[serde(flatten)]
    pub log: AuditLog,

    /// Summary of the acting user, if that user still exists
    pub user: Option<AuditActor>,
}

/// Input for appending a new audit entry
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub organisation_id: Uuid,
    pub user_id: Uuid,
    pub action: AuditAction,
    pub meta: JsonValue,
}

/// Pagination and filtering options for audit log reads
#[derive(Debug, Clone)]
pub struct AuditLogFilter {
    /// Raw action string to filter on; unknown values match nothing
    pub action: Option<String>,

    /// Page size, already clamped by the caller
    pub limit: i64,

    /// Rows to skip
    pub offset: i64,
}

impl Default for AuditLogFilter {
    fn default() -> Self {
        Self {
            action: None,
            limit: 50,
            offset: 0,
        }
    }
}

/// Row shape for the log/actor join
#[derive(sqlx::FromRow)]
struct AuditLogActorRow {
    id: Uuid,
    organisation_id: Option<Uuid>,
    user_id: Option<Uuid>,
    action: String,
    meta: Option<JsonValue>,
    timestamp: DateTime<Utc>,
    actor_id: Option<Uuid>,
    actor_email: Option<String>,
    actor_name: Option<String>,
}

impl From<AuditLogActorRow> for AuditLogWithActor {
    fn from(row: AuditLogActorRow) -> Self {
        let user = row.actor_id.map(|id| AuditActor {
            id,
            email: row.actor_email.unwrap_or_default(),
            name: row.actor_name,
        });

        AuditLogWithActor {
            log: AuditLog {
                id: row.id,
                organisation_id: row.organisation_id,
                user_id: row.user_id,
                action: row.action,
                meta: row.meta,
                timestamp: row.timestamp,
            },
            user,
        }
    }
}

impl AuditLog {
    /// Appends an audit entry on the caller's transaction
    ///
    /// The caller commits the entry together with the mutation it describes,
    /// so either both land or neither does.
    pub async fn append(
        tx: &mut Transaction<'_, Postgres>,
        entry: NewAuditEntry,
    ) -> Result<Self, sqlx::Error> {
        let log = sqlx::query_as::<_, AuditLog>(
            r#"
            INSERT INTO audit_logs (organisation_id, user_id, action, meta)
            VALUES ($1, $2, $3, $4)
            RETURNING id, organisation_id, user_id, action, meta, timestamp
            "#,
        )
        .bind(entry.organisation_id)
        .bind(entry.user_id)
        .bind(entry.action.as_str())
        .bind(entry.meta)
        .fetch_one(&mut **tx)
        .await?;

        Ok(log)
    }

    /// Lists audit entries for an organisation, newest first
    ///
    /// Joins the acting user so each entry carries an actor summary. The
    /// join is a LEFT JOIN: entries whose user has been deleted still come
    /// back, with `user` set to None.
    pub async fn list(
        pool: &PgPool,
        organisation_id: Uuid,
        filter: &AuditLogFilter,
    ) -> Result<Vec<AuditLogWithActor>, sqlx::Error> {
        let rows: Vec<AuditLogActorRow> = if let Some(ref action) = filter.action {
            sqlx::query_as(
                r#"
                SELECT a.id, a.organisation_id, a.user_id, a.action, a.meta, a.timestamp,
                       u.id AS actor_id, u.email AS actor_email, u.name AS actor_name
                FROM audit_logs a
                LEFT JOIN users u ON u.id = a.user_id
                WHERE a.organisation_id = $1 AND a.action = $2
                ORDER BY a.timestamp DESC, a.id DESC
                LIMIT $3 OFFSET $4
                "#,
            )
            .bind(organisation_id)
            .bind(action)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await?
        } else {
            sqlx::query_as(
                r#"
                SELECT a.id, a.organisation_id, a.user_id, a.action, a.meta, a.timestamp,
                       u.id AS actor_id, u.email AS actor_email, u.name AS actor_name
                FROM audit_logs a
                LEFT JOIN users u ON u.id = a.user_id
                WHERE a.organisation_id = $1
                ORDER BY a.timestamp DESC, a.id DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(organisation_id)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await?
        };

        Ok(rows.into_iter().map(AuditLogWithActor::from).collect())
    }

    /// Counts audit entries for an organisation, with the same action filter
    /// semantics as [`AuditLog::list`]
    pub async fn count(
        pool: &PgPool,
        organisation_id: Uuid,
        action: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = if let Some(action) = action {
            sqlx::query_as(
                "SELECT COUNT(*) FROM audit_logs WHERE organisation_id = $1 AND action = $2",
            )
            .bind(organisation_id)
            .bind(action)
            .fetch_one(pool)
            .await?
        } else {
            sqlx::query_as("SELECT COUNT(*) FROM audit_logs WHERE organisation_id = $1")
                .bind(organisation_id)
                .fetch_one(pool)
                .await?
        };

        Ok(count.0)
    }
}
