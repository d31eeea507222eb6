/// Request identity for authenticated routes
///
/// The API's auth layer validates the bearer token and inserts an
/// [`AuthContext`] into request extensions. Handlers extract it with Axum's
/// `Extension` extractor and use `organisation_id` to scope every query; the
/// organisation is never taken from request input.
///
/// # Example
///
/// ```
/// use crewdesk_shared::auth::jwt::Claims;
/// use crewdesk_shared::auth::middleware::AuthContext;
/// use uuid::Uuid;
///
/// let claims = Claims::new(Uuid::new_v4(), Uuid::new_v4());
/// let auth = AuthContext::from_claims(&claims);
/// assert_eq!(auth.user_id, claims.sub);
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;

/// Authentication context added to request extensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Organisation the user belongs to
    pub organisation_id: Uuid,
}

impl AuthContext {
    /// Creates an auth context from validated token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            organisation_id: claims.org_id,
        }
    }
}
