/// JWT session tokens
///
/// Two token kinds are signed with one shared HS256 secret:
///
/// - **Access token**: short-lived, carries the user's id, username and email
/// - **Refresh token**: long-lived, carries only the user's id
///
/// Tokens are stateless. A token stays valid until its `exp` second passes, so
/// clearing cookies on logout does not revoke tokens already handed out.
///
/// # Validation
///
/// - **Algorithm**: HS256 only; tokens signed with anything else are rejected
/// - **Expiration**: `exp` is required and checked with zero leeway
/// - **Issuer**: must be `taskman`
/// - **Type**: access and refresh tokens are not interchangeable
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use taskman_shared::auth::jwt::TokenService;
/// use taskman_shared::models::user::User;
///
/// # fn example(user: &User) -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new(
///     "your-secret-key-at-least-32-bytes-long",
///     Duration::minutes(15),
///     Duration::days(30),
/// );
///
/// let access = tokens.issue_access(user)?;
/// let claims = tokens.validate_access(&access)?;
/// assert_eq!(claims.sub, user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::User;

/// Issuer claim stamped on and required from every token
pub const ISSUER: &str = "taskman";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format or claim validation failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was signed with an algorithm other than HS256
    #[error("Unexpected signing algorithm")]
    InvalidAlgorithm,

    /// A required claim (such as `exp`) is absent
    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    /// Issuer is not `taskman`
    #[error("Invalid issuer")]
    InvalidIssuer,

    /// Token kind does not match the one requested
    #[error("Expected {expected} token, got {actual} token")]
    WrongTokenType {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token (short-lived)
    Access,

    /// Refresh token (long-lived)
    Refresh,
}

impl TokenType {
    /// Gets token type as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Claims carried by an access token
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "taskman")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
///
/// # Custom Claims
///
/// - `name`: Username
/// - `email`: Email address, used to re-resolve the user on each request
/// - `token_type`: Always `access`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Username
    pub name: String,

    /// Email address
    pub email: String,

    /// Issuer - Always "taskman"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token type
    pub token_type: TokenType,
}

impl AccessClaims {
    /// Creates access claims for a user expiring `expires_in` from now
    ///
    /// # Errors
    ///
    /// Returns `JwtError::CreateError` if the expiry is out of range
    pub fn for_user(user: &User, expires_in: Duration) -> Result<Self, JwtError> {
        let now = Utc::now();

        Ok(Self {
            sub: user.id,
            name: user.username.clone(),
            email: user.email.clone(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiry(now, expires_in)?,
            token_type: TokenType::Access,
        })
    }
}

/// Claims carried by a refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer - Always "taskman"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token type
    pub token_type: TokenType,
}

impl RefreshClaims {
    /// Creates refresh claims for a user id expiring `expires_in` from now
    pub fn for_subject(user_id: Uuid, expires_in: Duration) -> Result<Self, JwtError> {
        let now = Utc::now();

        Ok(Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiry(now, expires_in)?,
            token_type: TokenType::Refresh,
        })
    }
}

fn expiry(now: DateTime<Utc>, expires_in: Duration) -> Result<i64, JwtError> {
    now.checked_add_signed(expires_in)
        .map(|at| at.timestamp())
        .ok_or_else(|| JwtError::CreateError("Token lifetime out of range".to_string()))
}

/// Signs claims into a JWT using HS256
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token<T: Serialize>(claims: &T, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies a JWT and decodes its claims
///
/// Checks the HS256 signature, requires `exp`, `sub` and `iss`, rejects
/// tokens whose `exp` lies in the past and tokens from another issuer.
pub fn validate_token<T: DeserializeOwned>(token: &str, secret: &str) -> Result<T, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);
    validation.validate_exp = true;
    validation.leeway = 0;

    // Registered claims are validated on the raw payload before typed decoding
    let token_data =
        decode::<serde_json::Value>(token, &key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
            ErrorKind::InvalidAlgorithm => JwtError::InvalidAlgorithm,
            ErrorKind::MissingRequiredClaim(claim) => JwtError::MissingClaim(claim.clone()),
            _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
        })?;

    serde_json::from_value(token_data.claims)
        .map_err(|e| JwtError::ValidationError(format!("Invalid token claims: {}", e)))
}

fn expect_type(expected: TokenType, actual: TokenType) -> Result<(), JwtError> {
    if expected != actual {
        return Err(JwtError::WrongTokenType {
            expected: expected.as_str(),
            actual: actual.as_str(),
        });
    }
    Ok(())
}

/// Issues and validates session tokens with one secret and fixed lifetimes
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a token service
    pub fn new(secret: impl Into<String>, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Lifetime of newly issued access tokens
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Lifetime of newly issued refresh tokens
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Issues an access token carrying username, email and id
    pub fn issue_access(&self, user: &User) -> Result<String, JwtError> {
        create_token(&AccessClaims::for_user(user, self.access_ttl)?, &self.secret)
    }

    /// Issues a refresh token carrying only the user id
    pub fn issue_refresh(&self, user: &User) -> Result<String, JwtError> {
        create_token(&RefreshClaims::for_subject(user.id, self.refresh_ttl)?, &self.secret)
    }

    /// Validates an access token and returns its claims
    pub fn validate_access(&self, token: &str) -> Result<AccessClaims, JwtError> {
        let claims: AccessClaims = validate_token(token, &self.secret)?;
        expect_type(TokenType::Access, claims.token_type)?;
        Ok(claims)
    }

    /// Validates a refresh token and returns its claims
    pub fn validate_refresh(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        let claims: RefreshClaims = validate_token(token, &self.secret)?;
        expect_type(TokenType::Refresh, claims.token_type)?;
        Ok(claims)
    }
}
