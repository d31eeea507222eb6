/// Membership model and database operations
///
/// A membership is one employee-team assignment. The pair is unique at the
/// database level, so a concurrent duplicate assign loses with a constraint
/// violation rather than inserting a second row.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE employee_teams (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     assigned_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT employee_teams_employee_id_team_id_key UNIQUE (employee_id, team_id)
/// );
/// ```
///
/// Tenant scoping happens one level up: handlers resolve the team and the
/// employee within the caller's organisation before touching this table, so
/// both sides of a row are always from the same organisation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Membership model representing one employee-team assignment
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    /// Unique assignment ID (UUID v4)
    pub id: Uuid,

    /// The assigned employee
    pub employee_id: Uuid,

    /// The team the employee was assigned to
    pub team_id: Uuid,

    /// When the assignment was made
    pub assigned_at: DateTime<Utc>,
}

/// Input for creating a new assignment
#[derive(Debug, Clone)]
pub struct CreateMembership {
    pub employee_id: Uuid,
    pub team_id: Uuid,
}

impl Membership {
    /// Creates a new assignment
    ///
    /// Fails with a unique constraint violation if the pair already exists;
    /// callers pre-check with [`Membership::exists`] and treat the violation
    /// as the concurrent-duplicate backstop.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        data: CreateMembership,
    ) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO employee_teams (employee_id, team_id)
            VALUES ($1, $2)
            RETURNING id, employee_id, team_id, assigned_at
            "#,
        )
        .bind(data.employee_id)
        .bind(data.team_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(membership)
    }

    /// Checks whether an assignment already exists
    pub async fn exists(
        pool: &PgPool,
        employee_id: Uuid,
        team_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM employee_teams
                WHERE employee_id = $1 AND team_id = $2
            )
            "#,
        )
        .bind(employee_id)
        .bind(team_id)
        .fetch_one(pool)
        .await?;

        Ok(exists.0)
    }

    /// Deletes an assignment
    ///
    /// Returns true if a row was deleted, false if no such assignment
    /// existed.
    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        employee_id: Uuid,
        team_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM employee_teams WHERE employee_id = $1 AND team_id = $2")
                .bind(employee_id)
                .bind(team_id)
                .execute(&mut **tx)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
