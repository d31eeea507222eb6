/// Session token generation and validation
///
/// CrewDesk issues a single kind of JWT: an HS256-signed session token with a
/// fixed 8 hour lifetime. There is no refresh flow; when a token expires the
/// client logs in again.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC-SHA256)
/// - **Expiration**: 8 hours, not renewable
/// - **Validation**: Signature, expiration, nbf, and issuer checks
/// - **Secret**: At least 32 bytes (enforced at config load)
///
/// # Example
///
/// ```
/// use crewdesk_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let organisation_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, organisation_id);
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes!!")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes!!")?;
/// assert_eq!(validated.sub, user_id);
/// assert_eq!(validated.org_id, organisation_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim stamped into every token
const ISSUER: &str = "crewdesk";

/// How long a session token stays valid
const SESSION_LIFETIME_HOURS: i64 = 8;

/// What can go wrong when minting or checking a token
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Signing or claim serialization failed
    #[error("Could not create token: {0}")]
    CreateError(String),

    /// Signature, structure, or claim checks failed
    #[error("Could not validate token: {0}")]
    ValidationError(String),

    /// The `exp` claim lies in the past
    #[error("Session token expired")]
    Expired,

    /// The `iss` claim does not match ours
    #[error("Unexpected token issuer, wanted {expected}")]
    InvalidIssuer { expected: String },
}

/// Payload carried by a session token
///
/// The registered claims (`sub`, `iss`, `iat`, `exp`, `nbf`) follow RFC 7519.
/// The one custom claim is `org_id`: the organisation the user belongs to.
/// Every authenticated request is scoped to it, and it is never taken from
/// request input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID this session belongs to
    pub sub: Uuid,

    /// Always "crewdesk"
    pub iss: String,

    /// When the token was minted (Unix seconds)
    pub iat: i64,

    /// When the token stops working (Unix seconds)
    pub exp: i64,

    /// Earliest moment the token is usable (Unix seconds)
    pub nbf: i64,

    /// Organisation the user belongs to
    pub org_id: Uuid,
}

impl Claims {
    /// Creates claims for a new session with the standard 8 hour lifetime
    ///
    /// # Example
    ///
    /// ```
    /// use crewdesk_shared::auth::jwt::Claims;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::new(Uuid::new_v4(), Uuid::new_v4());
    /// ```
    pub fn new(user_id: Uuid, organisation_id: Uuid) -> Self {
        Self::with_expiration(user_id, organisation_id, Duration::hours(SESSION_LIFETIME_HOURS))
    }

    /// Creates claims with a custom expiration
    ///
    /// Mainly useful in tests, where a negative duration produces an already
    /// expired token.
    pub fn with_expiration(user_id: Uuid, organisation_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();
        let issued_at = now.timestamp();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: issued_at,
            exp: (now + expires_in).timestamp(),
            nbf: issued_at,
            org_id: organisation_id,
        }
    }

    /// Whether the expiration moment has passed
    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}

/// Creates a signed session token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a session token and extracts its claims
///
/// Verifies the signature, expiration, nbf window, and issuer.
///
/// # Errors
///
/// Returns `JwtError::Expired` for expired tokens and
/// `JwtError::ValidationError` for every other invalid token.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(decode_error)
}

/// Collapses the jsonwebtoken error tree into our three failure shapes
fn decode_error(e: jsonwebtoken::errors::Error) -> JwtError {
    use jsonwebtoken::errors::ErrorKind;

    match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: ISSUER.to_string(),
        },
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    }
}
