/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Access/refresh session token issuance and validation
/// - [`cookies`]: Sealed (AES-GCM) session cookies
///
/// # Example
///
/// ```no_run
/// use taskman_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod cookies;
pub mod jwt;
pub mod password;
