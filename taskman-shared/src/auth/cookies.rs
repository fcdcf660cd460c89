/// Sealed session cookies.
///
/// Token cookies are encrypted with AES-GCM before they leave the server. The
/// key comes from `ENCRYPT_COOKIE_KEY` and may be 16, 24 or 32 bytes
/// (AES-128/192/256).
///
/// Sealed value layout: `base64url(nonce[12] || ciphertext || tag[16])`.

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

type Aes192Gcm = AesGcm<Aes192, U12>;

const NONCE_SIZE: usize = 12;

/// Name of the cookie holding the access token
pub const ACCESS_COOKIE: &str = "accessToken";

/// Name of the cookie holding the refresh token
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Error type for cookie sealing
#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    /// Key is not 16, 24 or 32 bytes
    #[error("AES key must be 16, 24 or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// Encryption failed
    #[error("Failed to seal cookie value")]
    Seal,

    /// Value is not valid base64, is truncated, or fails authentication
    #[error("Failed to open cookie value")]
    Open,
}

enum Cipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

/// Encrypts and decrypts cookie values with a process-wide AES-GCM key
pub struct CookieSealer {
    cipher: Cipher,
}

impl std::fmt::Debug for CookieSealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bits = match self.cipher {
            Cipher::Aes128(_) => 128,
            Cipher::Aes192(_) => 192,
            Cipher::Aes256(_) => 256,
        };
        write!(f, "CookieSealer(AES-{bits}-GCM)")
    }
}

impl CookieSealer {
    /// Creates a sealer from raw key bytes
    pub fn new(key: &[u8]) -> Result<Self, CookieError> {
        let invalid = || CookieError::InvalidKeyLength(key.len());
        let cipher = match key.len() {
            16 => Cipher::Aes128(Aes128Gcm::new_from_slice(key).map_err(|_| invalid())?),
            24 => Cipher::Aes192(Aes192Gcm::new_from_slice(key).map_err(|_| invalid())?),
            32 => Cipher::Aes256(Aes256Gcm::new_from_slice(key).map_err(|_| invalid())?),
            _ => return Err(invalid()),
        };
        Ok(Self { cipher })
    }

    /// Encrypts a cookie value under a fresh random nonce
    pub fn seal(&self, plaintext: &str) -> Result<String, CookieError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = match &self.cipher {
            Cipher::Aes128(c) => c.encrypt(nonce, plaintext.as_bytes()),
            Cipher::Aes192(c) => c.encrypt(nonce, plaintext.as_bytes()),
            Cipher::Aes256(c) => c.encrypt(nonce, plaintext.as_bytes()),
        }
        .map_err(|_| CookieError::Seal)?;

        let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(combined))
    }

    /// Decrypts a value produced by [`CookieSealer::seal`]
    pub fn open(&self, sealed: &str) -> Result<String, CookieError> {
        let combined = URL_SAFE_NO_PAD
            .decode(sealed)
            .map_err(|_| CookieError::Open)?;

        if combined.len() < NONCE_SIZE {
            return Err(CookieError::Open);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = match &self.cipher {
            Cipher::Aes128(c) => c.decrypt(nonce, ciphertext),
            Cipher::Aes192(c) => c.decrypt(nonce, ciphertext),
            Cipher::Aes256(c) => c.decrypt(nonce, ciphertext),
        }
        .map_err(|_| CookieError::Open)?;

        String::from_utf8(plaintext).map_err(|_| CookieError::Open)
    }
}

/// Interprets a configured cookie key
///
/// The value is base64-decoded when possible, otherwise taken as raw bytes.
/// Returns `None` unless the result is a valid AES key length.
pub fn parse_key(raw: &str) -> Option<Vec<u8>> {
    let bytes = STANDARD
        .decode(raw)
        .unwrap_or_else(|_| raw.as_bytes().to_vec());

    match bytes.len() {
        16 | 24 | 32 => Some(bytes),
        _ => None,
    }
}

/// Generates a random 256-bit cookie key
pub fn generate_key() -> Vec<u8> {
    let mut key = vec![0u8; 32];
    OsRng.fill_bytes(&mut key);
    key
}

/// Builds a `Set-Cookie` value for an http-only session cookie
pub fn session_cookie(name: &str, value: &str, max_age_seconds: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age_seconds.max(0)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Builds a `Set-Cookie` value that removes a session cookie
pub fn clear_cookie(name: &str, secure: bool) -> String {
    session_cookie(name, "", 0, secure)
}

/// Finds a cookie by name in a `Cookie` request header value
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim())
    })
}
