//! Development database seeder
//!
//! Creates a demo organisation with an admin account, three employees, two
//! teams, and a few assignments. Safe to run repeatedly: if the admin
//! account already exists the seeder leaves the database alone.
//!
//! ```bash
//! cargo run -p crewdesk-api --bin crewdesk-seed
//! ```

use crewdesk_api::config::Config;
use crewdesk_shared::auth::password;
use crewdesk_shared::db::migrations::{ensure_database_exists, run_migrations};
use crewdesk_shared::db::pool::{self, close_pool, create_pool};
use crewdesk_shared::models::{
    employee::{CreateEmployee, Employee},
    membership::{CreateMembership, Membership},
    organisation::{CreateOrganisation, Organisation},
    team::{CreateTeam, Team},
    user::{CreateUser, User},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ADMIN_EMAIL: &str = "admin@techcompany.com";
const ADMIN_PASSWORD: &str = "password123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crewdesk_seed=info,crewdesk_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    ensure_database_exists(&config.database.url).await?;

    let db = create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&db).await?;

    if User::find_by_email(&db, ADMIN_EMAIL).await?.is_some() {
        tracing::info!("Seed data already present, nothing to do");
        close_pool(db).await;
        return Ok(());
    }

    let mut tx = db.begin().await?;

    let organisation = Organisation::create(
        &mut tx,
        CreateOrganisation {
            name: "Tech Company Inc.".to_string(),
        },
    )
    .await?;
    tracing::info!("Organisation created: {}", organisation.id);

    let password_hash = password::hash_password(ADMIN_PASSWORD)?;
    let user = User::create(
        &mut tx,
        CreateUser {
            organisation_id: organisation.id,
            email: ADMIN_EMAIL.to_string(),
            password_hash,
            name: Some("Admin User".to_string()),
        },
    )
    .await?;
    tracing::info!("User created: {}", user.id);

    let john = Employee::create(
        &mut tx,
        CreateEmployee {
            organisation_id: organisation.id,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: Some("john@example.com".to_string()),
            phone: Some("123-456-7890".to_string()),
        },
    )
    .await?;

    let jane = Employee::create(
        &mut tx,
        CreateEmployee {
            organisation_id: organisation.id,
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            email: Some("jane@example.com".to_string()),
            phone: Some("123-456-7891".to_string()),
        },
    )
    .await?;

    let bob = Employee::create(
        &mut tx,
        CreateEmployee {
            organisation_id: organisation.id,
            first_name: "Bob".to_string(),
            last_name: "Johnson".to_string(),
            email: Some("bob@example.com".to_string()),
            phone: Some("123-456-7892".to_string()),
        },
    )
    .await?;
    tracing::info!("Employees created: {}, {}, {}", john.id, jane.id, bob.id);

    let engineering = Team::create(
        &mut tx,
        CreateTeam {
            organisation_id: organisation.id,
            name: "Engineering".to_string(),
            description: Some("Software Engineering team".to_string()),
        },
    )
    .await?;

    let marketing = Team::create(
        &mut tx,
        CreateTeam {
            organisation_id: organisation.id,
            name: "Marketing".to_string(),
            description: Some("Marketing and Communications team".to_string()),
        },
    )
    .await?;
    tracing::info!("Teams created: {}, {}", engineering.id, marketing.id);

    for (employee_id, team_id) in [
        (john.id, engineering.id),
        (jane.id, engineering.id),
        (jane.id, marketing.id),
        (bob.id, marketing.id),
    ] {
        Membership::create(
            &mut tx,
            CreateMembership {
                employee_id,
                team_id,
            },
        )
        .await?;
    }
    tracing::info!("Assignments created");

    tx.commit().await?;

    tracing::info!("Database seeding completed");
    tracing::info!("Test credentials: {} / {}", ADMIN_EMAIL, ADMIN_PASSWORD);

    close_pool(db).await;

    Ok(())
}
