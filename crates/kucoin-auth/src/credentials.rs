//! API credentials for KuCoin private endpoints
//!
//! # Security
//!
//! The API secret and passphrase are stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::str::FromStr;

use crate::error::{AuthError, AuthResult};
use crate::signer;

/// Production REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.kucoin.com";

const ENV_API_KEY: &str = "KUCOIN_API_KEY";
const ENV_API_SECRET: &str = "KUCOIN_API_SECRET";
const ENV_API_PASSPHRASE: &str = "KUCOIN_API_PASSPHRASE";
const ENV_KEY_VERSION: &str = "KUCOIN_API_KEY_VERSION";
const ENV_BASE_URL: &str = "KUCOIN_BASE_URL";

/// API key version, selects how the passphrase header is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum KeyVersion {
    /// Passphrase sent in plain text
    #[serde(rename = "1")]
    V1,
    /// Passphrase sent as base64(HMAC-SHA256(secret, passphrase))
    #[default]
    #[serde(rename = "2")]
    V2,
}

impl KeyVersion {
    /// Value of the `KC-API-KEY-VERSION` header
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "1",
            Self::V2 => "2",
        }
    }
}

impl FromStr for KeyVersion {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::V1),
            "2" => Ok(Self::V2),
            other => Err(AuthError::InvalidCredentials(format!(
                "unsupported key version: {:?}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for KeyVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plain configuration record, e.g. deserialized from a host config file
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    pub api_key: String,
    pub api_secret: String,
    pub api_passphrase: String,
    #[serde(default)]
    pub key_version: KeyVersion,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// API credentials for authenticated requests
///
/// Validated once at construction and read-only afterwards. The secret and
/// passphrase are zeroized when the Credentials are dropped.
pub struct Credentials {
    api_key: String,
    api_secret: SecretString,
    api_passphrase: SecretString,
    key_version: KeyVersion,
    base_url: String,
}

impl Credentials {
    /// Create new credentials against the production endpoint
    ///
    /// # Arguments
    /// * `api_key` - Your KuCoin API key
    /// * `api_secret` - Your API secret
    /// * `api_passphrase` - The passphrase chosen when the key was created
    /// * `key_version` - Version of the API key
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        api_passphrase: impl Into<String>,
        key_version: KeyVersion,
    ) -> AuthResult<Self> {
        Self::with_base_url(
            api_key,
            api_secret,
            api_passphrase,
            key_version,
            DEFAULT_BASE_URL,
        )
    }

    /// Create new credentials against a specific REST endpoint
    pub fn with_base_url(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        api_passphrase: impl Into<String>,
        key_version: KeyVersion,
        base_url: impl AsRef<str>,
    ) -> AuthResult<Self> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();
        let api_passphrase = api_passphrase.into();

        if api_key.trim().is_empty() {
            return Err(AuthError::InvalidCredentials("empty API key".to_string()));
        }
        if api_secret.is_empty() {
            return Err(AuthError::InvalidCredentials("empty API secret".to_string()));
        }
        if api_passphrase.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "empty API passphrase".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            api_secret: SecretString::from(api_secret),
            api_passphrase: SecretString::from(api_passphrase),
            key_version,
            base_url: normalize_base_url(base_url.as_ref())?,
        })
    }

    /// Create credentials from a configuration record
    pub fn from_config(config: CredentialsConfig) -> AuthResult<Self> {
        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(
            config.api_key,
            config.api_secret,
            config.api_passphrase,
            config.key_version,
            base_url,
        )
    }

    /// Create credentials from environment variables
    ///
    /// Reads `KUCOIN_API_KEY`, `KUCOIN_API_SECRET` and `KUCOIN_API_PASSPHRASE`.
    /// `KUCOIN_API_KEY_VERSION` (default `2`) and `KUCOIN_BASE_URL` are optional.
    pub fn from_env() -> AuthResult<Self> {
        let api_key = required_env(ENV_API_KEY)?;
        let api_secret = required_env(ENV_API_SECRET)?;
        let api_passphrase = required_env(ENV_API_PASSPHRASE)?;
        let key_version = match std::env::var(ENV_KEY_VERSION) {
            Ok(v) => v.parse()?,
            Err(_) => KeyVersion::default(),
        };
        let base_url =
            std::env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self::with_base_url(api_key, api_secret, api_passphrase, key_version, base_url)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the key version
    pub fn key_version(&self) -> KeyVersion {
        self.key_version
    }

    /// Get the REST base URL (no trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sign a canonical request string with the API secret
    pub fn sign(&self, canonical: &str) -> AuthResult<String> {
        signer::sign(canonical, self.api_secret.expose_secret().as_bytes())
    }

    /// Produce the `KC-API-PASSPHRASE` header value for this key version
    pub fn passphrase_header(&self) -> AuthResult<String> {
        signer::encrypt_passphrase(
            self.api_passphrase.expose_secret(),
            self.api_secret.expose_secret().as_bytes(),
            self.key_version,
        )
    }
}

fn required_env(name: &str) -> AuthResult<String> {
    std::env::var(name).map_err(|_| AuthError::EnvVarNotSet(name.to_string()))
}

/// Validate an `http(s)://` base URL and trim any trailing `/`
pub fn normalize_base_url(base_url: &str) -> AuthResult<String> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| {
            AuthError::InvalidCredentials(format!("base URL must be http(s): {:?}", base_url))
        })?;
    if host.is_empty() {
        return Err(AuthError::InvalidCredentials(format!(
            "base URL has no host: {:?}",
            base_url
        )));
    }
    Ok(trimmed.to_string())
}

impl Clone for Credentials {
    /// Clone credentials (creates new secret boxes with the same content)
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            api_secret: SecretString::from(self.api_secret.expose_secret().to_string()),
            api_passphrase: SecretString::from(self.api_passphrase.expose_secret().to_string()),
            key_version: self.key_version,
            base_url: self.base_url.clone(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "api_key",
                &format!("{}...", self.api_key.chars().take(8).collect::<String>()),
            )
            .field("api_secret", &"[REDACTED]")
            .field("api_passphrase", &"[REDACTED]")
            .field("key_version", &self.key_version)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(version: KeyVersion) -> Credentials {
        Credentials::new("key-1234567890", "s3cr3t", "pass123", version).unwrap()
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", creds(KeyVersion::V2));
        assert!(!debug.contains("s3cr3t"));
        assert!(!debug.contains("pass123"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("key-1234..."));
    }

    #[test]
    fn test_debug_multibyte_key() {
        // Byte 8 falls inside the two-byte 'я'
        let creds = Credentials::new("abcdefgяzz", "s3cr3t", "pass123", KeyVersion::V2).unwrap();
        let debug = format!("{:?}", creds);
        assert!(debug.contains("abcdefgя..."));
    }

    #[test]
    fn test_default_key_version_is_two() {
        assert_eq!(KeyVersion::default(), KeyVersion::V2);
        assert_eq!(KeyVersion::default().as_str(), "2");
    }

    #[test]
    fn test_key_version_parse() {
        assert_eq!("1".parse::<KeyVersion>().unwrap(), KeyVersion::V1);
        assert_eq!(" 2 ".parse::<KeyVersion>().unwrap(), KeyVersion::V2);
        assert!("3".parse::<KeyVersion>().is_err());
    }

    #[test]
    fn test_empty_fields_rejected() {
        assert!(Credentials::new("", "s", "p", KeyVersion::V2).is_err());
        assert!(Credentials::new("k", "", "p", KeyVersion::V2).is_err());
        assert!(Credentials::new("k", "s", "", KeyVersion::V2).is_err());
    }

    #[test]
    fn test_base_url_normalized() {
        let creds = Credentials::with_base_url(
            "k",
            "s",
            "p",
            KeyVersion::V1,
            "https://openapi-sandbox.kucoin.com/",
        )
        .unwrap();
        assert_eq!(creds.base_url(), "https://openapi-sandbox.kucoin.com");
        assert_eq!(self::creds(KeyVersion::V1).base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_rejected() {
        for bad in ["api.kucoin.com", "ftp://api.kucoin.com", "https://", ""] {
            let result = Credentials::with_base_url("k", "s", "p", KeyVersion::V2, bad);
            assert!(
                matches!(result, Err(AuthError::InvalidCredentials(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_passphrase_header_by_version() {
        assert_eq!(creds(KeyVersion::V1).passphrase_header().unwrap(), "pass123");
        assert_eq!(
            creds(KeyVersion::V2).passphrase_header().unwrap(),
            "DK8vVLkVyW1bTaAef8yXC/T2Kcxsisiu4k3ZdB5n31g="
        );
    }

    #[test]
    fn test_from_config() {
        let config: CredentialsConfig = serde_json::from_str(
            r#"{"api_key":"k","api_secret":"s","api_passphrase":"p","key_version":"1"}"#,
        )
        .unwrap();
        let creds = Credentials::from_config(config).unwrap();
        assert_eq!(creds.key_version(), KeyVersion::V1);
        assert_eq!(creds.base_url(), DEFAULT_BASE_URL);

        let config: CredentialsConfig = serde_json::from_str(
            r#"{"api_key":"k","api_secret":"s","api_passphrase":"p","base_url":"http://localhost:8080"}"#,
        )
        .unwrap();
        let creds = Credentials::from_config(config).unwrap();
        assert_eq!(creds.key_version(), KeyVersion::V2);
        assert_eq!(creds.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_clone_keeps_signing_material() {
        let original = creds(KeyVersion::V2);
        let cloned = original.clone();
        assert_eq!(
            original.sign("1700000000000GET/api/v1/accounts").unwrap(),
            cloned.sign("1700000000000GET/api/v1/accounts").unwrap()
        );
    }
}
