/// Organisation model and database operations
///
/// An organisation is the tenant boundary in CrewDesk. Users, employees, and
/// teams all carry its id, and every query filters on it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organisations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Organisation model representing a single tenant
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Organisation {
    /// Unique organisation ID (UUID v4)
    pub id: Uuid,

    /// Display name, not unique
    pub name: String,

    /// When the organisation was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new organisation
#[derive(Debug, Clone)]
pub struct CreateOrganisation {
    pub name: String,
}

impl Organisation {
    /// Creates a new organisation
    ///
    /// Runs on a transaction so registration can create the organisation, its
    /// admin user, and the audit entry atomically.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        data: CreateOrganisation,
    ) -> Result<Self, sqlx::Error> {
        let organisation = sqlx::query_as::<_, Organisation>(
            r#"
            INSERT INTO organisations (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(data.name)
        .fetch_one(&mut **tx)
        .await?;

        Ok(organisation)
    }

    /// Finds an organisation by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let organisation = sqlx::query_as::<_, Organisation>(
            r#"
            SELECT id, name, created_at
            FROM organisations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(organisation)
    }

    /// Deletes an organisation and, via ON DELETE CASCADE, everything it owns
    ///
    /// Audit log entries are not cascaded; they have no foreign keys.
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM organisations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
