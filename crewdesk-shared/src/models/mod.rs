/// Database models for CrewDesk
///
/// This module contains all database models and their CRUD operations. Reads
/// take a `&PgPool`; writes take a `&mut Transaction` so each mutation can be
/// committed together with its audit log entry.
///
/// All wire-facing models serialize with camelCase keys.
///
/// # Models
///
/// - `organisation`: Tenant boundary; everything else hangs off it
/// - `user`: Admin accounts that can log in
/// - `employee`: Employee records owned by an organisation
/// - `team`: Teams owned by an organisation
/// - `membership`: Employee-team assignments (many-to-many)
/// - `audit_log`: Append-only audit trail of every mutation
///
/// # Example
///
/// ```no_run
/// use crewdesk_shared::db::pool::{create_pool, DatabaseConfig};
/// use crewdesk_shared::models::employee::Employee;
/// use uuid::Uuid;
///
/// # async fn example(organisation_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let employees = Employee::list_with_teams(&pool, organisation_id).await?;
/// # Ok(())
/// # }
/// ```

pub mod audit_log;
pub mod employee;
pub mod membership;
pub mod organisation;
pub mod team;
pub mod user;
