/// Login accounts
///
/// Users are the accounts that can log in. Each user belongs to exactly one
/// organisation; the first (and so far only) user is created during
/// registration as the organisation's admin.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organisation_id UUID NOT NULL REFERENCES organisations(id) ON DELETE CASCADE,
///     email VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     name VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_email_key UNIQUE (email)
/// );
/// ```
///
/// Email uniqueness is global, not per organisation: an email can register
/// only one organisation across the whole system.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// An account that can log in
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Primary key
    pub id: Uuid,

    /// Organisation this user belongs to
    pub organisation_id: Uuid,

    /// Email address, globally unique
    pub email: String,

    /// Argon2id password hash, never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Display name, if one was given at registration
    pub name: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub organisation_id: Uuid,

    pub email: String,

    /// Argon2id hash, not the plaintext password
    pub password_hash: String,

    pub name: Option<String>,
}

impl User {
    /// Creates a new user
    ///
    /// Runs on a transaction so registration stays atomic. Fails with a
    /// unique constraint violation if the email is already registered.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        data: CreateUser,
    ) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (organisation_id, email, password_hash, name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, organisation_id, email, password_hash, name, created_at
            "#,
        )
        .bind(data.organisation_id)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .fetch_one(&mut **tx)
        .await?;

        Ok(user)
    }

    /// Looks up the account registered under an email, if any
    ///
    /// Lookup is exact (case-sensitive), matching how the unique constraint
    /// stores emails.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, organisation_id, email, password_hash, name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
