//! Main REST client implementation

use kucoin_auth::{normalize_base_url, Clock, Credentials, SystemClock, DEFAULT_BASE_URL};
use kucoin_types::AccountType;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::endpoints::{
    AccountEndpoints, FundingEndpoints, MarketEndpoints, SubAccountEndpoints, TradingEndpoints,
};
use crate::error::{RestError, RestResult};
use crate::executor::{RequestExecutor, DEFAULT_TIMEOUT_MS};
use crate::retry::RetryPolicy;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Account, CancelledOrders, Level1Ticker, Order, PlaceOrderRequest, PlaceOrderResponse};

const DEFAULT_USER_AGENT: &str = concat!("kucoin-rest/", env!("CARGO_PKG_VERSION"));

/// KuCoin REST API client
///
/// Provides access to both public and private endpoints.
///
/// # Example
///
/// ```no_run
/// use kucoin_rest::{Credentials, KucoinRestClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public endpoints only
///     let client = KucoinRestClient::new()?;
///     let ticker = client.get_ticker("BTC-USDT").await?;
///
///     // With authentication for private endpoints
///     let creds = Credentials::from_env()?;
///     let auth_client = KucoinRestClient::with_credentials(creds)?;
///     let accounts = auth_client.get_accounts().await?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct KucoinRestClient {
    executor: RequestExecutor,
    credentials: Option<Credentials>,
}

impl KucoinRestClient {
    /// Create a new client without authentication
    ///
    /// Only public endpoints will be available.
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with credentials
    ///
    /// All endpoints (public and private) will be available.
    pub fn with_credentials(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::new().with_credentials(credentials))
    }

    /// Create a new client with custom configuration
    ///
    /// The base URL is the configured override if any, else the one carried
    /// by the credentials, else the public KuCoin host.
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let base_url = match (&config.base_url, &config.credentials) {
            (Some(url), _) => normalize_base_url(url)?,
            (None, Some(creds)) => creds.base_url().to_string(),
            (None, None) => DEFAULT_BASE_URL.to_string(),
        };

        let transport: Arc<dyn Transport> = match config.transport {
            Some(transport) => transport,
            None => {
                let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
                Arc::new(ReqwestTransport::new(user_agent)?)
            }
        };

        let executor = RequestExecutor::new(
            transport,
            config.clock,
            base_url,
            Duration::from_millis(config.timeout_ms),
        );

        info!(
            base_url = executor.base_url(),
            authenticated = config.credentials.is_some(),
            "Created KuCoin REST client"
        );

        Ok(Self {
            executor,
            credentials: config.credentials,
        })
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn base_url(&self) -> &str {
        self.executor.base_url()
    }

    /// The underlying executor, for endpoints not wrapped here
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    fn credentials(&self) -> RestResult<&Credentials> {
        self.credentials.as_ref().ok_or(RestError::AuthRequired)
    }

    // ========================================================================
    // Public Market Endpoints
    // ========================================================================

    /// Get market endpoints
    pub fn market(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(&self.executor)
    }

    /// Get server time in Unix milliseconds
    pub async fn get_server_time(&self) -> RestResult<i64> {
        self.market().get_server_time().await
    }

    /// Get best bid/ask for a trading pair
    ///
    /// # Arguments
    /// * `symbol` - Trading pair (e.g., "BTC-USDT")
    pub async fn get_ticker(&self, symbol: &str) -> RestResult<Level1Ticker> {
        self.market().get_ticker(symbol).await
    }

    // ========================================================================
    // Private Account Endpoints
    // ========================================================================

    /// Get account endpoints (requires credentials)
    pub fn account(&self) -> RestResult<AccountEndpoints<'_>> {
        Ok(AccountEndpoints::new(&self.executor, self.credentials()?))
    }

    /// List every account
    pub async fn get_accounts(&self) -> RestResult<Vec<Account>> {
        self.account()?.list_accounts(None, None).await
    }

    /// List trade accounts, optionally for one currency
    pub async fn get_trade_accounts(&self, currency: Option<&str>) -> RestResult<Vec<Account>> {
        self.account()?
            .list_accounts(currency, Some(AccountType::Trade))
            .await
    }

    /// Get sub-account endpoints (requires credentials)
    pub fn sub_accounts(&self) -> RestResult<SubAccountEndpoints<'_>> {
        Ok(SubAccountEndpoints::new(&self.executor, self.credentials()?))
    }

    // ========================================================================
    // Private Trading Endpoints
    // ========================================================================

    /// Get trading endpoints (requires credentials)
    pub fn trading(&self) -> RestResult<TradingEndpoints<'_>> {
        Ok(TradingEndpoints::new(&self.executor, self.credentials()?))
    }

    /// Place a new order
    pub async fn place_order(&self, order: &PlaceOrderRequest) -> RestResult<PlaceOrderResponse> {
        self.trading()?.place_order(order).await
    }

    /// Cancel an order by id
    pub async fn cancel_order(&self, order_id: &str) -> RestResult<CancelledOrders> {
        self.trading()?.cancel_order(order_id).await
    }

    /// Cancel all open orders for a symbol
    pub async fn cancel_all_orders(&self, symbol: &str) -> RestResult<CancelledOrders> {
        self.trading()?.cancel_all_orders(Some(symbol), None).await
    }

    /// Get an order by id
    pub async fn get_order(&self, order_id: &str) -> RestResult<Order> {
        self.trading()?.get_order(order_id).await
    }

    /// Cancel an order, retrying transient failures
    pub async fn cancel_order_with_retry(
        &self,
        order_id: &str,
        policy: &RetryPolicy,
    ) -> RestResult<CancelledOrders> {
        self.trading()?.cancel_order_with_retry(order_id, policy).await
    }

    /// Get an order, retrying transient failures
    pub async fn get_order_with_retry(&self, order_id: &str, policy: &RetryPolicy) -> RestResult<Order> {
        self.trading()?.get_order_with_retry(order_id, policy).await
    }

    // ========================================================================
    // Private Funding Endpoints
    // ========================================================================

    /// Get funding endpoints (requires credentials)
    pub fn funding(&self) -> RestResult<FundingEndpoints<'_>> {
        Ok(FundingEndpoints::new(&self.executor, self.credentials()?))
    }
}

impl std::fmt::Debug for KucoinRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KucoinRestClient")
            .field("base_url", &self.executor.base_url())
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Overrides the base URL carried by the credentials
    pub base_url: Option<String>,
    /// Source of request timestamps
    pub clock: Arc<dyn Clock>,
    /// HTTP transport; `reqwest` when unset
    pub transport: Option<Arc<dyn Transport>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: None,
            base_url: None,
            clock: Arc::new(SystemClock),
            transport: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set base URL (e.g. a sandbox host)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set timestamp source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set HTTP transport
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }
}
