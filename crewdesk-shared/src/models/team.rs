/// Team model and database operations
///
/// Teams group employees within an organisation. Assignment rows live in the
/// `membership` model; this module covers the teams themselves plus the
/// joined reads that return a team with its members.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organisation_id UUID NOT NULL REFERENCES organisations(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::employee::Employee;

/// Team model
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Unique team ID (UUID v4)
    pub id: Uuid,

    /// Organisation that owns this team
    pub organisation_id: Uuid,

    /// Team name, required but not unique
    pub name: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// When the team was created
    pub created_at: DateTime<Utc>,
}

/// A team together with its member employees
#[derive(Debug, Clone, Serialize)]
pub struct TeamWithEmployees {
    #[serde(flatten)]
    pub team: Team,

    /// Employees assigned to this team, oldest assignment first
    pub employees: Vec<Employee>,
}

/// Input for creating a new team
#[derive(Debug, Clone)]
pub struct CreateTeam {
    pub organisation_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// Input for partially updating a team
///
/// `name` cannot be cleared (required column), so omitted and null both mean
/// keep. `description` uses the nested `Option` so it can be nulled out.
#[derive(Debug, Clone, Default)]
pub struct UpdateTeam {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl UpdateTeam {
    /// True if at least one field was provided
    pub fn has_changes(&self) -> bool {
        self.name.is_some() || self.description.is_some()
    }
}

/// Row shape for the team/employee join used by the `*_with_employees` readers
#[derive(sqlx::FromRow)]
struct TeamEmployeeRow {
    team_id: Uuid,
    id: Uuid,
    organisation_id: Uuid,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<TeamEmployeeRow> for Employee {
    fn from(row: TeamEmployeeRow) -> Self {
        Employee {
            id: row.id,
            organisation_id: row.organisation_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

impl Team {
    /// Creates a new team
    ///
    /// Runs on a transaction so the caller can pair it with the audit entry.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        data: CreateTeam,
    ) -> Result<Self, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (organisation_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, organisation_id, name, description, created_at
            "#,
        )
        .bind(data.organisation_id)
        .bind(data.name)
        .bind(data.description)
        .fetch_one(&mut **tx)
        .await?;

        Ok(team)
    }

    /// Finds a team by ID within an organisation
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
        organisation_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, organisation_id, name, description, created_at
            FROM teams
            WHERE id = $1 AND organisation_id = $2
            "#,
        )
        .bind(id)
        .bind(organisation_id)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Finds a team together with its member employees
    pub async fn find_with_employees(
        pool: &PgPool,
        id: Uuid,
        organisation_id: Uuid,
    ) -> Result<Option<TeamWithEmployees>, sqlx::Error> {
        let team = match Self::find_by_id(pool, id, organisation_id).await? {
            Some(team) => team,
            None => return Ok(None),
        };

        let employees: Vec<Employee> = sqlx::query_as::<_, TeamEmployeeRow>(
            r#"
            SELECT et.team_id, e.id, e.organisation_id, e.first_name, e.last_name,
                   e.email, e.phone, e.created_at
            FROM employees e
            JOIN employee_teams et ON et.employee_id = e.id
            WHERE et.team_id = $1
            ORDER BY et.assigned_at ASC
            "#,
        )
        .bind(id)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Employee::from)
        .collect();

        Ok(Some(TeamWithEmployees { team, employees }))
    }

    /// Lists all teams of an organisation with their member employees
    pub async fn list_with_employees(
        pool: &PgPool,
        organisation_id: Uuid,
    ) -> Result<Vec<TeamWithEmployees>, sqlx::Error> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, organisation_id, name, description, created_at
            FROM teams
            WHERE organisation_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(organisation_id)
        .fetch_all(pool)
        .await?;

        let rows = sqlx::query_as::<_, TeamEmployeeRow>(
            r#"
            SELECT et.team_id, e.id, e.organisation_id, e.first_name, e.last_name,
                   e.email, e.phone, e.created_at
            FROM employees e
            JOIN employee_teams et ON et.employee_id = e.id
            JOIN teams t ON t.id = et.team_id
            WHERE t.organisation_id = $1
            ORDER BY et.assigned_at ASC
            "#,
        )
        .bind(organisation_id)
        .fetch_all(pool)
        .await?;

        let mut employees_by_team: HashMap<Uuid, Vec<Employee>> = HashMap::new();
        for row in rows {
            let team_id = row.team_id;
            employees_by_team
                .entry(team_id)
                .or_default()
                .push(Employee::from(row));
        }

        Ok(teams
            .into_iter()
            .map(|team| {
                let employees = employees_by_team.remove(&team.id).unwrap_or_default();
                TeamWithEmployees { team, employees }
            })
            .collect())
    }

    /// Partially updates a team
    ///
    /// Only provided fields are written; with nothing provided the row comes
    /// back unchanged. Returns None if the team doesn't exist in this
    /// organisation.
    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        organisation_id: Uuid,
        data: UpdateTeam,
    ) -> Result<Option<Self>, sqlx::Error> {
        if !data.has_changes() {
            return sqlx::query_as::<_, Team>(
                r#"
                SELECT id, organisation_id, name, description, created_at
                FROM teams
                WHERE id = $1 AND organisation_id = $2
                "#,
            )
            .bind(id)
            .bind(organisation_id)
            .fetch_optional(&mut **tx)
            .await;
        }

        let mut assignments: Vec<String> = Vec::new();
        let mut bind_count = 2;

        if data.name.is_some() {
            bind_count += 1;
            assignments.push(format!("name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            assignments.push(format!("description = ${}", bind_count));
        }

        let query = format!(
            "UPDATE teams SET {} WHERE id = $1 AND organisation_id = $2 \
             RETURNING id, organisation_id, name, description, created_at",
            assignments.join(", ")
        );

        let mut q = sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .bind(organisation_id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        let team = q.fetch_optional(&mut **tx).await?;

        Ok(team)
    }

    /// Deletes a team
    ///
    /// Assignments go with it via ON DELETE CASCADE; employees are untouched.
    /// Returns true if a row was deleted.
    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        organisation_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1 AND organisation_id = $2")
            .bind(id)
            .bind(organisation_id)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
