/// Router assembly and shared state
///
/// Everything the handlers need at runtime lives in [`AppState`];
/// [`build_router`] wires the route tree and the middleware around it. The
/// session auth layer defined here is what turns a bearer token into the
/// `AuthContext` each protected handler receives.
///
/// # Example
///
/// ```no_run
/// use crewdesk_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = crewdesk_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use crewdesk_shared::auth::{jwt, middleware::AuthContext};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// State shared by all handlers
///
/// Cheap to clone: the pool is internally reference counted and the config
/// sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Loaded application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Signing key for session tokens
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the full application router
///
/// # Route tree
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// ├── /auth/
/// │   ├── POST /register            # Create organisation + admin (public)
/// │   └── POST /login               # Issue session token (public)
/// ├── /employees/                   # Employee CRUD (authenticated)
/// ├── /teams/                       # Team CRUD + assignments (authenticated)
/// │   ├── POST /:team_id/assign
/// │   └── POST /:team_id/unassign
/// └── /logs                         # Audit log reads (authenticated)
/// ```
///
/// Tracing, CORS, and the security headers wrap the whole tree; the session
/// auth layer wraps only the protected groups.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let employee_routes = Router::new()
        .route("/", get(routes::employees::list_employees))
        .route("/", post(routes::employees::create_employee))
        .route("/:id", get(routes::employees::get_employee))
        .route("/:id", put(routes::employees::update_employee))
        .route("/:id", delete(routes::employees::delete_employee));

    let team_routes = Router::new()
        .route("/", get(routes::teams::list_teams))
        .route("/", post(routes::teams::create_team))
        .route("/:team_id", get(routes::teams::get_team))
        .route("/:team_id", put(routes::teams::update_team))
        .route("/:team_id", delete(routes::teams::delete_team))
        .route("/:team_id/assign", post(routes::teams::assign_employee))
        .route("/:team_id/unassign", post(routes::teams::unassign_employee));

    let log_routes = Router::new().route("/", get(routes::logs::list_logs));

    // Everything tenant-scoped sits behind the session auth layer
    let protected_routes = Router::new()
        .nest("/employees", employee_routes)
        .nest("/teams", team_routes)
        .nest("/logs", log_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Builds the CORS layer from the configured origin list
///
/// A `*` entry means a permissive development setup. Anything else becomes
/// an explicit allow list with credentials enabled for the frontend.
fn cors_layer(configured: &[String]) -> CorsLayer {
    if configured.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = configured
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Pulls the token out of an `Authorization: Bearer <token>` header
fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Session authentication layer for the protected route groups
///
/// Validates the bearer token and stores the resulting [`AuthContext`] in
/// request extensions. Every failure mode (missing header, malformed
/// header, bad signature, expired token) is a 401; none of them reveal
/// which check failed beyond the message.
async fn session_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req)
        .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut()
        .insert(AuthContext::from_claims(&claims));

    Ok(next.run(req).await)
}
