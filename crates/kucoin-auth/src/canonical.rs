//! Canonical request encoding
//!
//! The string KuCoin signs is
//! `timestamp + METHOD + path[?query] + body`, concatenated with no
//! separators. The server recomputes it from the bytes it receives, so the
//! query string and body built here are also the exact bytes sent.

use serde::Serialize;

use crate::error::{AuthError, AuthResult};

/// HTTP methods used by the REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    /// Upper-case name, as it appears in the canonical string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }

    /// Whether the method carries a request body
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post)
    }

    /// Whether repeating the request is safe
    pub fn is_idempotent(&self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered query parameters
///
/// Keys keep insertion order; `None` values are dropped rather than sent
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    pub fn push(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a parameter if it has a value
    pub fn push_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Form-encoded query string, without the leading `?`
    pub fn encode(&self) -> AuthResult<String> {
        serde_urlencoded::to_string(&self.pairs).map_err(|e| AuthError::Serialization(e.to_string()))
    }
}

impl<K: ToString, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Serialize a request body to its compact JSON wire form
pub fn encode_json_body<T: Serialize + ?Sized>(body: &T) -> AuthResult<String> {
    serde_json::to_string(body).map_err(|e| AuthError::Serialization(e.to_string()))
}

/// Method, host-relative path (with query) and body of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest {
    method: Method,
    request_path: String,
    body: String,
}

impl EncodedRequest {
    /// Encode a request
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - Endpoint path, starting with `/` (e.g. `/api/v1/accounts`)
    /// * `query` - Query parameters, kept in the given order
    /// * `body` - Pre-serialized body; ignored for GET and DELETE
    pub fn new(
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<String>,
    ) -> AuthResult<Self> {
        if !path.starts_with('/') {
            return Err(AuthError::InvalidEndpoint(path.to_string()));
        }
        if path.contains('?') && !query.is_empty() {
            return Err(AuthError::InvalidEndpoint(format!(
                "{} already carries a query string",
                path
            )));
        }

        let query_string = query.encode()?;
        let request_path = if query_string.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query_string)
        };

        let body = if method.has_body() {
            body.unwrap_or_default()
        } else {
            String::new()
        };

        Ok(Self {
            method,
            request_path,
            body,
        })
    }

    /// Encode a request whose body is serialized from `body`
    pub fn with_json<T: Serialize + ?Sized>(
        method: Method,
        path: &str,
        query: &QueryParams,
        body: &T,
    ) -> AuthResult<Self> {
        Self::new(method, path, query, Some(encode_json_body(body)?))
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Path plus `?query` when there is one; never includes the host
    pub fn request_path(&self) -> &str {
        &self.request_path
    }

    /// Body as sent; empty for GET and DELETE
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Bind a timestamp to this request
    pub fn at(&self, timestamp_millis: u64) -> SigningContext<'_> {
        SigningContext {
            request: self,
            timestamp_millis,
        }
    }
}

/// An encoded request bound to the one timestamp used for signing
#[derive(Debug, Clone, Copy)]
pub struct SigningContext<'a> {
    request: &'a EncodedRequest,
    timestamp_millis: u64,
}

impl SigningContext<'_> {
    pub fn timestamp_millis(&self) -> u64 {
        self.timestamp_millis
    }

    /// `timestamp + METHOD + request_path + body`
    pub fn canonical_string(&self) -> String {
        format!(
            "{}{}{}{}",
            self.timestamp_millis,
            self.request.method.as_str(),
            self.request.request_path,
            self.request.body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accounts_canonical_string() {
        let request =
            EncodedRequest::new(Method::Get, "/api/v1/accounts", &QueryParams::new(), None)
                .unwrap();
        assert_eq!(
            request.at(1_700_000_000_000).canonical_string(),
            "1700000000000GET/api/v1/accounts"
        );
    }

    #[test]
    fn test_query_keeps_caller_order() {
        let query = QueryParams::new().push("type", "trade").push("currency", "BTC");
        let request = EncodedRequest::new(Method::Get, "/api/v1/accounts", &query, None).unwrap();
        assert_eq!(request.request_path(), "/api/v1/accounts?type=trade&currency=BTC");
    }

    #[test]
    fn test_none_params_omitted() {
        let query = QueryParams::new()
            .push("currency", "BTC")
            .push_opt("type", None::<&str>)
            .push_opt("pageSize", Some(50));
        assert_eq!(query.len(), 2);
        assert_eq!(query.encode().unwrap(), "currency=BTC&pageSize=50");
    }

    #[test]
    fn test_query_values_are_form_encoded() {
        let query = QueryParams::new().push("remark", "a b&c");
        assert_eq!(query.encode().unwrap(), "remark=a+b%26c");
    }

    #[test]
    fn test_get_and_delete_drop_body() {
        for method in [Method::Get, Method::Delete] {
            let request = EncodedRequest::new(
                method,
                "/api/v1/orders",
                &QueryParams::new().push("symbol", "BTC-USDT"),
                Some("{\"x\":1}".to_string()),
            )
            .unwrap();
            assert_eq!(request.body(), "");
            assert_eq!(
                request.at(1).canonical_string(),
                format!("1{}/api/v1/orders?symbol=BTC-USDT", method)
            );
        }
    }

    #[test]
    fn test_post_body_is_compact_and_ordered() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            client_oid: &'a str,
            side: &'a str,
            symbol: &'a str,
        }

        let request = EncodedRequest::with_json(
            Method::Post,
            "/api/v1/orders",
            &QueryParams::new(),
            &Body {
                client_oid: "abc",
                side: "buy",
                symbol: "BTC-USDT",
            },
        )
        .unwrap();

        assert_eq!(
            request.body(),
            r#"{"clientOid":"abc","side":"buy","symbol":"BTC-USDT"}"#
        );
        assert_eq!(
            request.at(5).canonical_string(),
            r#"5POST/api/v1/orders{"clientOid":"abc","side":"buy","symbol":"BTC-USDT"}"#
        );
    }

    #[test]
    fn test_dynamic_json_keeps_insertion_order() {
        let body = serde_json::json!({"symbol": "BTC-USDT", "currency": "USDT", "amount": "1"});
        assert_eq!(
            encode_json_body(&body).unwrap(),
            r#"{"symbol":"BTC-USDT","currency":"USDT","amount":"1"}"#
        );
    }

    #[test]
    fn test_relative_path_rejected() {
        let result = EncodedRequest::new(Method::Get, "api/v1/accounts", &QueryParams::new(), None);
        assert!(matches!(result, Err(AuthError::InvalidEndpoint(_))));

        let result = EncodedRequest::new(
            Method::Get,
            "https://api.kucoin.com/api/v1/accounts",
            &QueryParams::new(),
            None,
        );
        assert!(matches!(result, Err(AuthError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_double_query_rejected() {
        let result = EncodedRequest::new(
            Method::Get,
            "/api/v1/accounts?currency=BTC",
            &QueryParams::new().push("type", "main"),
            None,
        );
        assert!(matches!(result, Err(AuthError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_method_properties() {
        assert!(Method::Post.has_body());
        assert!(!Method::Get.has_body());
        assert!(Method::Delete.is_idempotent());
        assert!(!Method::Post.is_idempotent());
    }

    #[test]
    fn test_query_from_iter() {
        let query: QueryParams = vec![("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(query.encode().unwrap(), "a=1&b=2");
    }
}
