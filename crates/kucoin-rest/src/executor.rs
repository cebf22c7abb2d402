//! Authenticated request executor
//!
//! Issues exactly one HTTP call per invocation and classifies the outcome:
//! transport failure, non-2xx status, non-success API code, or the decoded
//! `data` payload. Retrying is left to [`crate::retry`] and
//! [`crate::pagination`], which call back in here and therefore re-sign
//! every attempt.

use kucoin_auth::{Clock, Credentials, EncodedRequest, Method, QueryParams, RequestSigner};
use kucoin_types::SUCCESS_CODE;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{RestError, RestResult};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use crate::types::ApiResponse;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

// Bodies are truncated in error values past this length
const MAX_ERROR_BODY: usize = 500;

/// Sends signed and public requests through a [`Transport`]
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    base_url: String,
    timeout: Duration,
}

impl RequestExecutor {
    pub fn new(
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            clock,
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send one request and decode the `data` field of the response envelope
    ///
    /// # Errors
    /// * [`RestError::Transport`] - no response was received
    /// * [`RestError::Http`] - non-2xx status
    /// * [`RestError::Api`] - 2xx status but `code != "200000"`
    /// * [`RestError::Parse`] - body is not an envelope or `data` has the wrong shape
    #[instrument(skip(self, headers, body))]
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        headers: Vec<(&'static str, String)>,
        body: Option<String>,
        timeout: Duration,
    ) -> RestResult<T> {
        let request = HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body,
            timeout,
        };

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(timed_out = e.timed_out, "Request to {} failed: {}", url, e);
            RestError::Transport {
                url: url.to_string(),
                message: e.message,
                timed_out: e.timed_out,
            }
        })?;

        debug!(status = response.status, body_len = response.body.len(), "Response received");
        decode_response(url, response)
    }

    /// Unsigned request, used by public market endpoints
    pub async fn public<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
    ) -> RestResult<T> {
        let request = EncodedRequest::new(method, path, query, None)?;
        let url = format!("{}{}", self.base_url, request.request_path());

        debug!("Making public request to {}", request.request_path());

        self.execute(method, &url, Vec::new(), None, self.timeout)
            .await
    }

    /// Signed request: encode, sign with a fresh timestamp, send
    pub async fn signed<T: DeserializeOwned>(
        &self,
        credentials: &Credentials,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<String>,
    ) -> RestResult<T> {
        let request = EncodedRequest::new(method, path, query, body)?;
        let headers = RequestSigner::new(credentials, self.clock.as_ref()).build_headers(&request)?;

        // The URL is built from the same path string that was signed
        let url = format!("{}{}", self.base_url, request.request_path());
        let body = if request.body().is_empty() {
            None
        } else {
            Some(request.body().to_string())
        };

        debug!("Making authenticated request to {}", request.request_path());

        self.execute(method, &url, headers.to_pairs(), body, self.timeout)
            .await
    }
}

fn decode_response<T: DeserializeOwned>(url: &str, response: HttpResponse) -> RestResult<T> {
    if !(200..300).contains(&response.status) {
        warn!(status = response.status, "Non-success status from {}", url);
        return Err(RestError::Http {
            status: response.status,
            url: url.to_string(),
            body: truncate(&response.body),
        });
    }

    let envelope: ApiResponse = serde_json::from_str(&response.body).map_err(|e| RestError::Parse {
        url: url.to_string(),
        message: format!("invalid envelope: {}; body: {}", e, truncate(&response.body)),
    })?;

    if envelope.code != SUCCESS_CODE {
        let message = envelope.msg.unwrap_or_default();
        warn!(code = %envelope.code, "API error from {}: {}", url, message);
        return Err(RestError::api(&envelope.code, &message, url));
    }

    serde_json::from_value(envelope.data).map_err(|e| RestError::Parse {
        url: url.to_string(),
        message: format!("unexpected data shape: {}", e),
    })
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
