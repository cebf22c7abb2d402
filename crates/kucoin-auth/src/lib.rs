//! Request signing for the KuCoin REST API
//!
//! This crate turns a request (method, path, query, body) into the exact
//! string KuCoin signs and the five `KC-API-*` headers that authenticate it.
//! It performs no I/O: transport lives in `kucoin-rest`.
//!
//! # Example
//!
//! ```
//! use kucoin_auth::{Credentials, EncodedRequest, FixedClock, KeyVersion, Method, QueryParams, RequestSigner};
//!
//! # fn main() -> Result<(), kucoin_auth::AuthError> {
//! let creds = Credentials::new("my-key", "abc", "my-passphrase", KeyVersion::V2)?;
//! let request = EncodedRequest::new(Method::Get, "/api/v1/accounts", &QueryParams::new(), None)?;
//!
//! let clock = FixedClock(1_700_000_000_000);
//! let headers = RequestSigner::new(&creds, &clock).build_headers(&request)?;
//! assert_eq!(headers.signature(), "cixBrJX9uJFsaKkGS+Q8wDWxrQjC7raILgiUHmei48Q=");
//! # Ok(())
//! # }
//! ```

mod canonical;
mod clock;
mod credentials;
mod error;
mod headers;
pub mod signer;

pub use canonical::{encode_json_body, EncodedRequest, Method, QueryParams, SigningContext};
pub use clock::{Clock, FixedClock, SystemClock};
pub use credentials::{
    normalize_base_url, Credentials, CredentialsConfig, KeyVersion, DEFAULT_BASE_URL,
};
pub use error::{AuthError, AuthResult};
pub use headers::{
    AuthHeaders, RequestSigner, CONTENT_TYPE_JSON, HEADER_API_KEY, HEADER_API_KEY_VERSION,
    HEADER_API_PASSPHRASE, HEADER_API_SIGN, HEADER_API_TIMESTAMP, HEADER_CONTENT_TYPE,
};
