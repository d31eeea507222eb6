/// Authentication primitives for CrewDesk
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Session token generation and validation
/// - [`middleware`]: The per-request identity extracted from a validated token
///
/// # Security Notes
///
/// - Passwords are hashed with Argon2id (64 MB memory, 3 iterations) and are
///   never stored or logged in plaintext
/// - Session tokens are HS256 JWTs with a fixed 8 hour lifetime and no
///   refresh mechanism
///
/// # Example
///
/// ```no_run
/// use crewdesk_shared::auth::jwt::{create_token, validate_token, Claims};
/// use crewdesk_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), Uuid::new_v4());
/// let token = create_token(&claims, "a-secret-of-at-least-32-characters!!")?;
/// let validated = validate_token(&token, "a-secret-of-at-least-32-characters!!")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
