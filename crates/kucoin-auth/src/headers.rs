//! Authentication header assembly

use crate::canonical::EncodedRequest;
use crate::clock::Clock;
use crate::credentials::{Credentials, KeyVersion};
use crate::error::AuthResult;
use tracing::trace;

pub const HEADER_API_KEY: &str = "KC-API-KEY";
pub const HEADER_API_SIGN: &str = "KC-API-SIGN";
pub const HEADER_API_TIMESTAMP: &str = "KC-API-TIMESTAMP";
pub const HEADER_API_PASSPHRASE: &str = "KC-API-PASSPHRASE";
pub const HEADER_API_KEY_VERSION: &str = "KC-API-KEY-VERSION";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Headers for one signed request
#[derive(Clone)]
pub struct AuthHeaders {
    api_key: String,
    signature: String,
    timestamp_millis: u64,
    passphrase: String,
    key_version: KeyVersion,
    has_body: bool,
}

impl AuthHeaders {
    /// The timestamp that was signed and is sent in `KC-API-TIMESTAMP`
    pub fn timestamp_millis(&self) -> u64 {
        self.timestamp_millis
    }

    /// The `KC-API-SIGN` value
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Header name/value pairs, plus `Content-Type` when a body is sent
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (HEADER_API_KEY, self.api_key.clone()),
            (HEADER_API_SIGN, self.signature.clone()),
            (HEADER_API_TIMESTAMP, self.timestamp_millis.to_string()),
            (HEADER_API_PASSPHRASE, self.passphrase.clone()),
            (HEADER_API_KEY_VERSION, self.key_version.as_str().to_string()),
        ];
        if self.has_body {
            pairs.push((HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON.to_string()));
        }
        pairs
    }
}

impl std::fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHeaders")
            .field("api_key", &self.api_key)
            .field("signature", &self.signature)
            .field("timestamp_millis", &self.timestamp_millis)
            .field("passphrase", &"[REDACTED]")
            .field("key_version", &self.key_version)
            .field("has_body", &self.has_body)
            .finish()
    }
}

/// Request signer for building authenticated requests
#[derive(Debug, Clone, Copy)]
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    clock: &'a dyn Clock,
}

impl<'a> RequestSigner<'a> {
    /// Create a new request signer
    pub fn new(credentials: &'a Credentials, clock: &'a dyn Clock) -> Self {
        Self { credentials, clock }
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Sign a request and assemble its headers
    ///
    /// The clock is read exactly once; that value is both signed and sent.
    pub fn build_headers(&self, request: &EncodedRequest) -> AuthResult<AuthHeaders> {
        let timestamp_millis = self.clock.now_millis();
        let canonical = request.at(timestamp_millis).canonical_string();
        let signature = self.credentials.sign(&canonical)?;
        let passphrase = self.credentials.passphrase_header()?;

        trace!(
            method = %request.method(),
            path = request.request_path(),
            timestamp_millis,
            "Signed request"
        );

        Ok(AuthHeaders {
            api_key: self.credentials.api_key().to_string(),
            signature,
            timestamp_millis,
            passphrase,
            key_version: self.credentials.key_version(),
            has_body: !request.body().is_empty(),
        })
    }
}
