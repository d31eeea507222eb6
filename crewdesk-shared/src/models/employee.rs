/// Employee model and database operations
///
/// Employees are records an organisation manages; they are not login
/// accounts. Every operation here is scoped by `organisation_id`, so a row
/// belonging to another organisation behaves exactly like a missing row.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE employees (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organisation_id UUID NOT NULL REFERENCES organisations(id) ON DELETE CASCADE,
///     first_name VARCHAR(100) NOT NULL,
///     last_name VARCHAR(100) NOT NULL,
///     email VARCHAR(255),
///     phone VARCHAR(50),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use crewdesk_shared::models::employee::{CreateEmployee, Employee};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, organisation_id: Uuid) -> Result<(), sqlx::Error> {
/// let mut tx = pool.begin().await?;
///
/// let employee = Employee::create(
///     &mut tx,
///     CreateEmployee {
///         organisation_id,
///         first_name: "Ada".to_string(),
///         last_name: "Lovelace".to_string(),
///         email: Some("ada@example.com".to_string()),
///         phone: None,
///     },
/// )
/// .await?;
///
/// tx.commit().await?;
/// println!("Created employee: {}", employee.id);
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::team::Team;

/// Employee model
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique employee ID (UUID v4)
    pub id: Uuid,

    /// Organisation that owns this record
    pub organisation_id: Uuid,

    /// First name, required
    pub first_name: String,

    /// Last name, required
    pub last_name: String,

    /// Optional contact email, not unique
    pub email: Option<String>,

    /// Optional phone number
    pub phone: Option<String>,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// An employee together with the teams it is assigned to
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeWithTeams {
    #[serde(flatten)]
    pub employee: Employee,

    /// Teams this employee belongs to, oldest assignment first
    pub teams: Vec<Team>,
}

/// Input for creating a new employee
#[derive(Debug, Clone)]
pub struct CreateEmployee {
    pub organisation_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Input for partially updating an employee
///
/// Names use a single `Option`: omitted (or null) means keep the current
/// value, since a required column cannot be cleared. Email and phone use a
/// nested `Option` so `Some(None)` can null the column out while a plain
/// `None` leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
}

impl UpdateEmployee {
    /// True if at least one field was provided
    pub fn has_changes(&self) -> bool {
        self.first_name.is_some()
            || self.last_name.is_some()
            || self.email.is_some()
            || self.phone.is_some()
    }
}

/// Row shape for the employee/team join used by the `*_with_teams` readers
#[derive(sqlx::FromRow)]
struct EmployeeTeamRow {
    employee_id: Uuid,
    id: Uuid,
    organisation_id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<EmployeeTeamRow> for Team {
    fn from(row: EmployeeTeamRow) -> Self {
        Team {
            id: row.id,
            organisation_id: row.organisation_id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

impl Employee {
    /// Creates a new employee
    ///
    /// Runs on a transaction so the caller can pair it with the audit entry.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        data: CreateEmployee,
    ) -> Result<Self, sqlx::Error> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (organisation_id, first_name, last_name, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, organisation_id, first_name, last_name, email, phone, created_at
            "#,
        )
        .bind(data.organisation_id)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(data.phone)
        .fetch_one(&mut **tx)
        .await?;

        Ok(employee)
    }

    /// Finds an employee by ID within an organisation
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
        organisation_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, organisation_id, first_name, last_name, email, phone, created_at
            FROM employees
            WHERE id = $1 AND organisation_id = $2
            "#,
        )
        .bind(id)
        .bind(organisation_id)
        .fetch_optional(pool)
        .await?;

        Ok(employee)
    }

    /// Finds an employee together with its team assignments
    pub async fn find_with_teams(
        pool: &PgPool,
        id: Uuid,
        organisation_id: Uuid,
    ) -> Result<Option<EmployeeWithTeams>, sqlx::Error> {
        let employee = match Self::find_by_id(pool, id, organisation_id).await? {
            Some(employee) => employee,
            None => return Ok(None),
        };

        let teams: Vec<Team> = sqlx::query_as::<_, EmployeeTeamRow>(
            r#"
            SELECT et.employee_id, t.id, t.organisation_id, t.name, t.description, t.created_at
            FROM teams t
            JOIN employee_teams et ON et.team_id = t.id
            WHERE et.employee_id = $1
            ORDER BY et.assigned_at ASC
            "#,
        )
        .bind(id)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Team::from)
        .collect();

        Ok(Some(EmployeeWithTeams { employee, teams }))
    }

    /// Lists all employees of an organisation with their team assignments
    ///
    /// Two queries: one for the employees, one for the join rows, grouped in
    /// memory. Returns employees oldest first.
    pub async fn list_with_teams(
        pool: &PgPool,
        organisation_id: Uuid,
    ) -> Result<Vec<EmployeeWithTeams>, sqlx::Error> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, organisation_id, first_name, last_name, email, phone, created_at
            FROM employees
            WHERE organisation_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(organisation_id)
        .fetch_all(pool)
        .await?;

        let rows = sqlx::query_as::<_, EmployeeTeamRow>(
            r#"
            SELECT et.employee_id, t.id, t.organisation_id, t.name, t.description, t.created_at
            FROM teams t
            JOIN employee_teams et ON et.team_id = t.id
            JOIN employees e ON e.id = et.employee_id
            WHERE e.organisation_id = $1
            ORDER BY et.assigned_at ASC
            "#,
        )
        .bind(organisation_id)
        .fetch_all(pool)
        .await?;

        let mut teams_by_employee: HashMap<Uuid, Vec<Team>> = HashMap::new();
        for row in rows {
            let employee_id = row.employee_id;
            teams_by_employee
                .entry(employee_id)
                .or_default()
                .push(Team::from(row));
        }

        Ok(employees
            .into_iter()
            .map(|employee| {
                let teams = teams_by_employee.remove(&employee.id).unwrap_or_default();
                EmployeeWithTeams { employee, teams }
            })
            .collect())
    }

    /// Partially updates an employee
    ///
    /// Only provided fields are written. When nothing was provided the row is
    /// returned unchanged. Returns None if the employee doesn't exist in this
    /// organisation.
    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        organisation_id: Uuid,
        data: UpdateEmployee,
    ) -> Result<Option<Self>, sqlx::Error> {
        if !data.has_changes() {
            return sqlx::query_as::<_, Employee>(
                r#"
                SELECT id, organisation_id, first_name, last_name, email, phone, created_at
                FROM employees
                WHERE id = $1 AND organisation_id = $2
                "#,
            )
            .bind(id)
            .bind(organisation_id)
            .fetch_optional(&mut **tx)
            .await;
        }

        // Build the update dynamically from the provided fields
        let mut assignments: Vec<String> = Vec::new();
        let mut bind_count = 2;

        if data.first_name.is_some() {
            bind_count += 1;
            assignments.push(format!("first_name = ${}", bind_count));
        }
        if data.last_name.is_some() {
            bind_count += 1;
            assignments.push(format!("last_name = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            assignments.push(format!("email = ${}", bind_count));
        }
        if data.phone.is_some() {
            bind_count += 1;
            assignments.push(format!("phone = ${}", bind_count));
        }

        let query = format!(
            "UPDATE employees SET {} WHERE id = $1 AND organisation_id = $2 \
             RETURNING id, organisation_id, first_name, last_name, email, phone, created_at",
            assignments.join(", ")
        );

        let mut q = sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(organisation_id);

        if let Some(first_name) = data.first_name {
            q = q.bind(first_name);
        }
        if let Some(last_name) = data.last_name {
            q = q.bind(last_name);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(phone) = data.phone {
            q = q.bind(phone);
        }

        let employee = q.fetch_optional(&mut **tx).await?;

        Ok(employee)
    }

    /// Deletes an employee
    ///
    /// Team assignments go with it via ON DELETE CASCADE. Returns true if a
    /// row was deleted.
    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        organisation_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1 AND organisation_id = $2")
            .bind(id)
            .bind(organisation_id)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
