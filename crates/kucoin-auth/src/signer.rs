//! HMAC-SHA256 request and passphrase signing
//!
//! KuCoin signature algorithm:
//! 1. HMAC-SHA256(api_secret, canonical_string)
//! 2. Base64 encode the raw digest (standard alphabet, padded)
//!
//! Key version 2 additionally runs the passphrase through the same transform.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::credentials::KeyVersion;
use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Sign a canonical request string
///
/// # Arguments
/// * `canonical` - `timestamp + method + path_with_query + body`
/// * `secret` - Raw API secret bytes
///
/// # Returns
/// Base64-encoded HMAC-SHA256 digest
pub fn sign(canonical: &str, secret: &[u8]) -> AuthResult<String> {
    if secret.is_empty() {
        return Err(AuthError::Signing("empty API secret".to_string()));
    }
    if canonical.is_empty() {
        return Err(AuthError::Signing("empty canonical string".to_string()));
    }
    hmac_base64(canonical.as_bytes(), secret)
}

/// Produce the `KC-API-PASSPHRASE` header value
///
/// Version 1 keys send the passphrase as-is. Version 2 keys send
/// base64(HMAC-SHA256(secret, passphrase)), computed with its own MAC
/// instance.
pub fn encrypt_passphrase(
    passphrase: &str,
    secret: &[u8],
    key_version: KeyVersion,
) -> AuthResult<String> {
    match key_version {
        KeyVersion::V1 => Ok(passphrase.to_string()),
        KeyVersion::V2 => {
            if secret.is_empty() {
                return Err(AuthError::Signing("empty API secret".to_string()));
            }
            hmac_base64(passphrase.as_bytes(), secret)
        }
    }
}

fn hmac_base64(message: &[u8], secret: &[u8]) -> AuthResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AuthError::Signing(format!("invalid HMAC key: {}", e)))?;
    mac.update(message);
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
