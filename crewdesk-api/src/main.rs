//! # CrewDesk API Server
//!
//! HTTP backend for CrewDesk, a multi-tenant employee and team management
//! service. Each organisation registers itself, manages its own employees
//! and teams, and gets an append-only audit trail of every change.
//!
//! ## Architecture
//!
//! The server is built with Axum and provides:
//! - Organisation registration and login (JWT sessions, 8 hour lifetime)
//! - Employee and team CRUD, scoped to the caller's organisation
//! - Team assignment management
//! - Audit log queries with action filter and pagination
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p crewdesk-api
//! ```

use crewdesk_api::app::{build_router, AppState};
use crewdesk_api::config::Config;
use crewdesk_shared::db::migrations::run_migrations;
use crewdesk_shared::db::pool::{self, close_pool, create_pool};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crewdesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "CrewDesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&db).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(db.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(db).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
