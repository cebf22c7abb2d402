//! Common test utilities and fixtures for integration tests
//!
//! Response bodies follow the shapes documented for the KuCoin v1/v2/v3 REST API.

#![allow(dead_code)]

use async_trait::async_trait;
use kucoin_rest::{
    ClientConfig, Clock, Credentials, FixedClock, HttpRequest, HttpResponse, KeyVersion,
    KucoinRestClient, Transport, TransportError,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub const TIMESTAMP: u64 = 1_700_000_000_000;
pub const API_KEY: &str = "my-key";
pub const API_SECRET: &str = "abc";
pub const API_PASSPHRASE: &str = "pass123";

/// Transport that replays scripted responses and records every request
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a 200 response with a success envelope around `data`
    pub fn push_data(&self, data: &str) {
        self.push_raw(200, &format!(r#"{{"code":"200000","data":{}}}"#, data));
    }

    pub fn push_raw(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted response")))
    }
}

/// Clock that advances one millisecond per read
#[derive(Debug)]
pub struct SteppingClock(AtomicU64);

impl SteppingClock {
    pub fn starting_at(millis: u64) -> Self {
        Self(AtomicU64::new(millis))
    }
}

impl Clock for SteppingClock {
    fn now_millis(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

pub fn credentials(key_version: KeyVersion) -> Credentials {
    Credentials::new(API_KEY, API_SECRET, API_PASSPHRASE, key_version).unwrap()
}

/// Authenticated client with a v1 key, fixed clock and mock transport
pub fn client(transport: &Arc<MockTransport>) -> KucoinRestClient {
    client_with(transport, credentials(KeyVersion::V1), Arc::new(FixedClock(TIMESTAMP)))
}

pub fn client_with(
    transport: &Arc<MockTransport>,
    credentials: Credentials,
    clock: Arc<dyn Clock>,
) -> KucoinRestClient {
    let transport: Arc<dyn Transport> = transport.clone();
    KucoinRestClient::with_config(
        ClientConfig::new()
            .with_credentials(credentials)
            .with_clock(clock)
            .with_transport(transport),
    )
    .unwrap()
}

pub fn public_client(transport: &Arc<MockTransport>) -> KucoinRestClient {
    let transport: Arc<dyn Transport> = transport.clone();
    KucoinRestClient::with_config(ClientConfig::new().with_transport(transport)).unwrap()
}

pub fn header<'r>(request: &'r HttpRequest, name: &str) -> Option<&'r str> {
    request
        .headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

pub const ACCOUNTS_DATA: &str = r#"[
    {"id":"5bd6e9286d99522a52e458de","currency":"BTC","type":"main",
     "balance":"237582.04299","available":"237582.032","holds":"0.01099"},
    {"id":"5bd6e9216d99522a52e458d6","currency":"BTC","type":"trade",
     "balance":"1234356","available":"1234356","holds":"0"}
]"#;

pub const TICKER_DATA: &str = r#"{
    "time":1700000000000,"sequence":"1550467636704",
    "price":"0.03715005","size":"0.17",
    "bestBid":"0.03710768","bestBidSize":"3.803",
    "bestAsk":"0.03715004","bestAskSize":"1.788"
}"#;

pub const ORDER_DATA: &str = r#"{
    "id":"5c35c02703aa673ceec2a168","symbol":"BTC-USDT","opType":"DEAL",
    "type":"limit","side":"buy","price":"10","size":"2","funds":"0",
    "dealFunds":"0.166","dealSize":"1","fee":"0","feeCurrency":"USDT",
    "stp":"","timeInForce":"GTC","postOnly":false,"hidden":false,
    "cancelAfter":0,"channel":"IOS","clientOid":"5c52e11203aa677f33e493fb",
    "remark":null,"isActive":true,"cancelExist":false,
    "createdAt":1547026471000,"tradeType":"TRADE"
}"#;

/// One page of fills, `per_page` items each; the last one on every page
/// comes from a triggered stop order
pub fn fills_page(current: u32, total: u32, per_page: u32) -> String {
    let items: Vec<String> = (0..per_page)
        .map(|i| {
            let kind = if i + 1 == per_page { "limit_stop" } else { "limit" };
            format!(
                r#"{{"symbol":"BTC-USDT","tradeId":"t{page}-{i}","orderId":"5c35c02703aa673ceec2a168",
                    "counterOrderId":"5c1ab46003aa676e487fa8e3","side":"buy","liquidity":"taker",
                    "forceTaker":true,"price":"0.083","size":"0.8424304","funds":"0.0699217232",
                    "fee":"0","feeRate":"0","feeCurrency":"USDT","type":"{kind}",
                    "createdAt":1547026472000,"tradeType":"TRADE"}}"#,
                page = current,
                i = i,
                kind = kind
            )
        })
        .collect();
    format!(
        r#"{{"currentPage":{},"pageSize":{},"totalNum":{},"totalPage":{},"items":[{}]}}"#,
        current,
        per_page,
        total * per_page,
        total,
        items.join(",")
    )
}
