/// Middleware modules for the API server
///
/// Custom tower middleware. Auth lives in `app` (it needs AppState); CORS
/// and request tracing come from tower-http.

pub mod security;
