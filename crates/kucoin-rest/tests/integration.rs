//! Integration tests for the KuCoin REST client
//!
//! Drives the client end to end over an in-memory transport: request
//! encoding, signing, header assembly, response classification and
//! pagination.

mod common;

use common::*;
use kucoin_auth::{signer, EncodedRequest, Method, QueryParams};
use kucoin_rest::{
    FillFilter, KeyVersion, PageState, PaginationConfig, PlaceOrderRequest, RestError,
    RetryPolicy, TransportError,
};
use kucoin_types::{AccountType, ErrorCategory, KucoinErrorCode, OrderType, Side};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Signed Requests
// =============================================================================

#[tokio::test]
async fn test_signed_get_headers() {
    let transport = MockTransport::new();
    transport.push_data(ACCOUNTS_DATA);
    let client = client(&transport);

    let accounts = client.get_accounts().await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].holds, dec!(0.01099));

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, "https://api.kucoin.com/api/v1/accounts");
    assert!(request.body.is_none());
    assert_eq!(request.timeout, Duration::from_millis(3000));

    assert_eq!(header(request, "KC-API-KEY"), Some(API_KEY));
    assert_eq!(
        header(request, "KC-API-SIGN"),
        Some("cixBrJX9uJFsaKkGS+Q8wDWxrQjC7raILgiUHmei48Q=")
    );
    assert_eq!(header(request, "KC-API-TIMESTAMP"), Some("1700000000000"));
    assert_eq!(header(request, "KC-API-PASSPHRASE"), Some(API_PASSPHRASE));
    assert_eq!(header(request, "KC-API-KEY-VERSION"), Some("1"));
    assert_eq!(header(request, "Content-Type"), None);
}

#[tokio::test]
async fn test_signed_get_with_query() {
    let transport = MockTransport::new();
    transport.push_data(ACCOUNTS_DATA);
    let client = client(&transport);

    client
        .account()
        .unwrap()
        .list_accounts(Some("BTC"), Some(AccountType::Trade))
        .await
        .unwrap();

    let request = &transport.requests()[0];
    assert_eq!(
        request.url,
        "https://api.kucoin.com/api/v1/accounts?currency=BTC&type=trade"
    );
    assert_eq!(
        header(request, "KC-API-SIGN"),
        Some("BU0qPkEGN6sa7Er5sP9n+Yc0DBojVyPBeIZd/AfqfyQ=")
    );
}

#[tokio::test]
async fn test_place_order_signs_sent_body() {
    let transport = MockTransport::new();
    transport.push_data(r#"{"orderId":"5bd6e9286d99522a52e458de"}"#);
    let client = client(&transport);

    let order = PlaceOrderRequest::limit("BTC-USDT", Side::Buy, dec!(30000), dec!(0.001))
        .with_client_oid("5c52e11203aa677f33e493fb");
    let response = client.place_order(&order).await.unwrap();
    assert_eq!(response.order_id, "5bd6e9286d99522a52e458de");

    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, "https://api.kucoin.com/api/v1/orders");
    assert_eq!(
        request.body.as_deref(),
        Some(r#"{"clientOid":"5c52e11203aa677f33e493fb","side":"buy","symbol":"BTC-USDT","type":"limit","price":"30000","size":"0.001"}"#)
    );
    assert_eq!(
        header(request, "KC-API-SIGN"),
        Some("N36UNmI6fePZeHFE4TncKRrlHy49m7wL9titgvRtqxY=")
    );
    assert_eq!(header(request, "Content-Type"), Some("application/json"));
}

#[tokio::test]
async fn test_cancel_order_signs_delete() {
    let transport = MockTransport::new();
    transport.push_data(r#"{"cancelledOrderIds":["5bd6e9286d99522a52e458de"]}"#);
    let client = client(&transport);

    let cancelled = client.cancel_order("5bd6e9286d99522a52e458de").await.unwrap();
    assert_eq!(cancelled.cancelled_order_ids, vec!["5bd6e9286d99522a52e458de"]);

    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::Delete);
    assert!(request.body.is_none());
    assert_eq!(
        header(request, "KC-API-SIGN"),
        Some("MzHi7jQKUyGzZUoPu/dy5sogAfImg/+MuiOz37lmRBI=")
    );
}

#[tokio::test]
async fn test_v2_key_sends_encrypted_passphrase() {
    let transport = MockTransport::new();
    transport.push_data(ACCOUNTS_DATA);
    let creds = kucoin_rest::Credentials::new(API_KEY, "s3cr3t", "pass123", KeyVersion::V2).unwrap();
    let client = client_with(&transport, creds, Arc::new(kucoin_rest::FixedClock(TIMESTAMP)));

    client.get_accounts().await.unwrap();

    let request = &transport.requests()[0];
    assert_eq!(
        header(request, "KC-API-PASSPHRASE"),
        Some("DK8vVLkVyW1bTaAef8yXC/T2Kcxsisiu4k3ZdB5n31g=")
    );
    assert_eq!(header(request, "KC-API-KEY-VERSION"), Some("2"));
}

#[tokio::test]
async fn test_sent_headers_verify_against_sent_request() {
    let transport = MockTransport::new();
    transport.push_data(ACCOUNTS_DATA);
    let client = client_with(
        &transport,
        credentials(KeyVersion::V2),
        Arc::new(SteppingClock::starting_at(TIMESTAMP)),
    );

    client
        .account()
        .unwrap()
        .list_accounts(Some("USDT"), None)
        .await
        .unwrap();

    // Rebuild the canonical string from what went over the wire
    let request = &transport.requests()[0];
    let timestamp: u64 = header(request, "KC-API-TIMESTAMP").unwrap().parse().unwrap();
    let path = request.url.strip_prefix("https://api.kucoin.com").unwrap();
    let canonical = format!("{}GET{}", timestamp, path);
    assert_eq!(
        header(request, "KC-API-SIGN").unwrap(),
        signer::sign(&canonical, API_SECRET.as_bytes()).unwrap()
    );

    let encoded = EncodedRequest::new(
        Method::Get,
        "/api/v1/accounts",
        &QueryParams::new().push("currency", "USDT"),
        None,
    )
    .unwrap();
    assert_eq!(encoded.at(timestamp).canonical_string(), canonical);
}

#[tokio::test]
async fn test_sandbox_base_url_from_credentials() {
    let transport = MockTransport::new();
    transport.push_data(ACCOUNTS_DATA);
    let creds = kucoin_rest::Credentials::with_base_url(
        API_KEY,
        API_SECRET,
        API_PASSPHRASE,
        KeyVersion::V1,
        "https://openapi-sandbox.kucoin.com/",
    )
    .unwrap();
    let client = client_with(&transport, creds, Arc::new(kucoin_rest::FixedClock(TIMESTAMP)));

    client.get_accounts().await.unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.url, "https://openapi-sandbox.kucoin.com/api/v1/accounts");
    // The host is not part of the signature
    assert_eq!(
        header(request, "KC-API-SIGN"),
        Some("cixBrJX9uJFsaKkGS+Q8wDWxrQjC7raILgiUHmei48Q=")
    );
}

// =============================================================================
// Public Requests
// =============================================================================

#[tokio::test]
async fn test_public_request_is_unsigned() {
    let transport = MockTransport::new();
    transport.push_data(TICKER_DATA);
    let client = public_client(&transport);

    let ticker = client.get_ticker("BTC-USDT").await.unwrap();
    assert_eq!(ticker.best_ask, dec!(0.03715004));

    let request = &transport.requests()[0];
    assert_eq!(
        request.url,
        "https://api.kucoin.com/api/v1/market/orderbook/level1?symbol=BTC-USDT"
    );
    assert!(request.headers.is_empty());
}

#[tokio::test]
async fn test_candles_decoded() {
    let transport = MockTransport::new();
    transport.push_data(
        r#"[["1545904980","0.058","0.049","0.058","0.049","0.018","0.000945"],
            ["1545904920","0.058","0.072","0.072","0.058","0.103","0.006986"]]"#,
    );
    let client = public_client(&transport);

    let candles = client
        .market()
        .get_candles("BTC-USDT", kucoin_types::CandleInterval::M1, None, None)
        .await
        .unwrap();
    assert_eq!(candles.len(), 2);
    assert_eq!(candles[1].close, dec!(0.072));
    assert_eq!(
        transport.requests()[0].url,
        "https://api.kucoin.com/api/v1/market/candles?symbol=BTC-USDT&type=1min"
    );
}

// =============================================================================
// Error Classification
// =============================================================================

#[tokio::test]
async fn test_api_error_classified() {
    let transport = MockTransport::new();
    transport.push_raw(200, r#"{"code":"400005","msg":"Invalid KC-API-SIGN"}"#);
    let client = client(&transport);

    let err = client.get_accounts().await.unwrap_err();
    match &err {
        RestError::Api { error, url } => {
            assert_eq!(error.code, Some(KucoinErrorCode::InvalidSignature));
            assert_eq!(error.category, ErrorCategory::Auth);
            assert!(error.requires_reauth());
            assert_eq!(url, "https://api.kucoin.com/api/v1/accounts");
        }
        other => panic!("expected Api, got {:?}", other),
    }
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_http_error_classified() {
    let transport = MockTransport::new();
    transport.push_raw(503, "Service Unavailable");
    let client = client(&transport);

    let err = client.get_accounts().await.unwrap_err();
    assert!(matches!(err, RestError::Http { status: 503, ref body, .. } if body == "Service Unavailable"));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_transport_error_classified() {
    let transport = MockTransport::new();
    transport.push_error(TransportError::timeout("operation timed out"));
    let client = client(&transport);

    let err = client.get_accounts().await.unwrap_err();
    assert!(matches!(err, RestError::Transport { timed_out: true, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_parse_error_classified() {
    let transport = MockTransport::new();
    transport.push_data(r#"{"unexpected":"shape"}"#);
    let client = client(&transport);

    let err = client.get_accounts().await.unwrap_err();
    assert!(matches!(err, RestError::Parse { .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_invalid_input_sends_nothing() {
    let transport = MockTransport::new();
    let client = client(&transport);

    let bad_order = PlaceOrderRequest::market_by_size("BTC-USDT", Side::Sell, dec!(0));
    assert!(matches!(
        client.place_order(&bad_order).await,
        Err(RestError::InvalidParameter(_))
    ));
    assert!(matches!(
        client.get_order("../accounts").await,
        Err(RestError::InvalidParameter(_))
    ));
    assert!(matches!(
        kucoin_rest::KucoinRestClient::new().unwrap().account(),
        Err(RestError::AuthRequired)
    ));
    assert_eq!(transport.request_count(), 0);
}

// =============================================================================
// Retry
// =============================================================================

#[tokio::test]
async fn test_get_order_with_retry_resigns() {
    let transport = MockTransport::new();
    transport.push_error(TransportError::new("connection reset"));
    transport.push_data(ORDER_DATA);
    let client = client_with(
        &transport,
        credentials(KeyVersion::V2),
        Arc::new(SteppingClock::starting_at(TIMESTAMP)),
    );

    let order = client
        .get_order_with_retry("5c35c02703aa673ceec2a168", &RetryPolicy::fixed(2, Duration::ZERO))
        .await
        .unwrap();
    assert_eq!(order.deal_size, dec!(1));
    assert_eq!(order.remaining_size(), dec!(1));

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_ne!(
        header(&requests[0], "KC-API-TIMESTAMP"),
        header(&requests[1], "KC-API-TIMESTAMP")
    );
    assert_ne!(
        header(&requests[0], "KC-API-SIGN"),
        header(&requests[1], "KC-API-SIGN")
    );
}

#[tokio::test]
async fn test_cancel_with_retry_stops_on_api_error() {
    let transport = MockTransport::new();
    transport.push_raw(200, r#"{"code":"400100","msg":"order not exist"}"#);
    transport.push_data(r#"{"cancelledOrderIds":[]}"#);
    let client = client(&transport);

    let err = client
        .cancel_order_with_retry("5bd6e9286d99522a52e458de", &RetryPolicy::fixed(3, Duration::ZERO))
        .await
        .unwrap_err();
    assert!(matches!(err, RestError::Api { .. }));
    assert_eq!(transport.request_count(), 1);
}

// =============================================================================
// Pagination
// =============================================================================

fn fast_pages() -> PaginationConfig {
    PaginationConfig::new().with_page_size(2).with_delay(Duration::ZERO)
}

#[tokio::test]
async fn test_fills_walk_all_pages() {
    let transport = MockTransport::new();
    for page in 1..=3 {
        transport.push_data(&fills_page(page, 3, 2));
    }
    let client = client(&transport);

    let collected = client
        .trading()
        .unwrap()
        .fills(FillFilter::new().symbol("BTC-USDT"), fast_pages())
        .collect()
        .await;
    assert_eq!(collected.state, PageState::Exhausted);
    let fills = collected.into_result().unwrap();
    assert_eq!(fills.len(), 6);
    assert_eq!(fills[5].trade_id, "t3-1");
    assert_eq!(fills[4].order_type, OrderType::Limit);
    assert_eq!(fills[5].order_type, OrderType::LimitStop);

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://api.kucoin.com/api/v1/fills?symbol=BTC-USDT&currentPage=1&pageSize=2",
            "https://api.kucoin.com/api/v1/fills?symbol=BTC-USDT&currentPage=2&pageSize=2",
            "https://api.kucoin.com/api/v1/fills?symbol=BTC-USDT&currentPage=3&pageSize=2",
        ]
    );
}

#[tokio::test]
async fn test_pagination_failure_keeps_pages() {
    let transport = MockTransport::new();
    transport.push_data(&fills_page(1, 4, 2));
    transport.push_data(&fills_page(2, 4, 2));
    transport.push_error(TransportError::new("connection reset"));
    transport.push_data(&fills_page(4, 4, 2));
    let client = client(&transport);

    let collected = client
        .trading()
        .unwrap()
        .fills(FillFilter::new(), fast_pages())
        .collect()
        .await;
    assert_eq!(collected.pages.len(), 2);
    assert_eq!(collected.state, PageState::Failed);
    assert!(matches!(collected.error, Some(RestError::Transport { .. })));
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn test_pagination_retries_server_error() {
    let transport = MockTransport::new();
    transport.push_data(&fills_page(1, 2, 2));
    transport.push_raw(502, "Bad Gateway");
    transport.push_data(&fills_page(2, 2, 2));
    let client = client(&transport);

    let config = fast_pages().with_retry(RetryPolicy::fixed(1, Duration::ZERO));
    let collected = client
        .trading()
        .unwrap()
        .fills(FillFilter::new(), config)
        .collect()
        .await;
    assert!(collected.is_complete());
    assert_eq!(collected.pages.len(), 2);

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].url, requests[2].url);
}

#[tokio::test]
async fn test_pagination_max_pages() {
    let transport = MockTransport::new();
    for page in 1..=2 {
        transport.push_data(&fills_page(page, 4, 2));
    }
    let client = client(&transport);

    let collected = client
        .trading()
        .unwrap()
        .fills(FillFilter::new(), fast_pages().with_max_pages(2))
        .collect()
        .await;
    assert_eq!(collected.pages.len(), 2);
    assert_eq!(collected.state, PageState::HasMore);
    assert!(collected.error.is_none());
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_pagination_resumes_from_start_page() {
    let transport = MockTransport::new();
    transport.push_data(&fills_page(3, 3, 2));
    let client = client(&transport);

    let collected = client
        .trading()
        .unwrap()
        .fills(FillFilter::new(), fast_pages().with_start_page(3))
        .collect()
        .await;
    assert!(collected.is_complete());
    assert_eq!(collected.pages.len(), 1);
    assert_eq!(
        transport.requests()[0].url,
        "https://api.kucoin.com/api/v1/fills?currentPage=3&pageSize=2"
    );
}
