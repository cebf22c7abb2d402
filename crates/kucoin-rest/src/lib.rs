//! REST API client for the KuCoin exchange
//!
//! This crate provides an authenticated REST client for KuCoin spot trading,
//! including market data, accounts, sub-accounts, orders and deposits.
//!
//! # Features
//!
//! - **Market Data**: Server time, symbols, tickers, 24h stats, candles
//! - **Account**: Balances, account detail, paginated ledgers
//! - **Sub-accounts**: Sub-users and their balances
//! - **Trading**: Place, cancel and query orders; paginated orders and fills
//! - **Funding**: Deposit addresses and deposit history
//!
//! # Authentication
//!
//! Private endpoints are signed with HMAC-SHA256 over
//! `timestamp + method + path + body`, see [`kucoin_auth`].
//!
//! # Example
//!
//! ```no_run
//! use kucoin_rest::{Credentials, KucoinRestClient, OrderFilter, PaginationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let client = KucoinRestClient::new()?;
//!     let ticker = client.get_ticker("BTC-USDT").await?;
//!     println!("BTC-USDT: {}", ticker.price);
//!
//!     // Private endpoints (auth required)
//!     let creds = Credentials::from_env()?;
//!     let auth_client = KucoinRestClient::with_credentials(creds)?;
//!     let done = auth_client
//!         .trading()?
//!         .orders(OrderFilter::done().symbol("BTC-USDT"), PaginationConfig::default())
//!         .collect()
//!         .await;
//!     println!("{} pages of orders", done.pages.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Retries
//!
//! Nothing is retried by default. Transient failures (no response, HTTP 5xx)
//! can be retried per page through [`PaginationConfig::with_retry`] or per
//! call through [`retry::with_retry`]. API error codes are never retried.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod executor;
pub mod pagination;
pub mod retry;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::{ClientConfig, KucoinRestClient};
pub use error::{RestError, RestResult};
pub use executor::RequestExecutor;
pub use kucoin_auth::{Clock, Credentials, CredentialsConfig, FixedClock, KeyVersion, SystemClock};
pub use pagination::{Collected, PageCursor, PageDriver, PageState, PaginationConfig};
pub use retry::RetryPolicy;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};

// Re-export endpoint filters
pub use endpoints::{DepositFilter, FillFilter, LedgerFilter, OrderFilter};

// Re-export endpoint-specific types
pub use types::{
    // Market data
    AllTickers, Candle, Level1Ticker, Stats24h, SymbolInfo, TickerEntry,
    // Account
    Account, AccountDetail, LedgerEntry, SubAccountBalance, SubAccountEntry, SubUser,
    // Trading
    CancelledByClientOid, CancelledOrders, Fill, Order, PlaceOrderRequest, PlaceOrderResponse,
    // Funding
    CreatedDepositAddress, Deposit, DepositAddress,
    // Responses
    PagedData,
};
