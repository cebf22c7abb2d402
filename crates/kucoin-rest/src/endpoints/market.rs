//! Public market data endpoints
//!
//! These endpoints don't require authentication.

use kucoin_auth::{Method, QueryParams};
use kucoin_types::CandleInterval;
use tracing::{debug, instrument};

use super::required;
use crate::error::{RestError, RestResult};
use crate::executor::RequestExecutor;
use crate::types::{AllTickers, Candle, Level1Ticker, Stats24h, SymbolInfo};

/// Public market data endpoints
#[derive(Debug, Clone, Copy)]
pub struct MarketEndpoints<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> MarketEndpoints<'a> {
    pub fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    /// Get server time in Unix milliseconds
    #[instrument(skip(self))]
    pub async fn get_server_time(&self) -> RestResult<i64> {
        debug!("Fetching server time");
        self.executor
            .public(Method::Get, "/api/v1/timestamp", &QueryParams::new())
            .await
    }

    /// List trading pairs
    ///
    /// # Arguments
    /// * `market` - Optional trading area filter (e.g., "USDS", "BTC")
    #[instrument(skip(self))]
    pub async fn get_symbols(&self, market: Option<&str>) -> RestResult<Vec<SymbolInfo>> {
        debug!("Fetching symbols");
        let query = QueryParams::new().push_opt("market", market);
        self.executor.public(Method::Get, "/api/v2/symbols", &query).await
    }

    /// Get best bid/ask and last trade
    ///
    /// # Arguments
    /// * `symbol` - Trading pair (e.g., "BTC-USDT")
    #[instrument(skip(self))]
    pub async fn get_ticker(&self, symbol: &str) -> RestResult<Level1Ticker> {
        let query = QueryParams::new().push("symbol", required("symbol", symbol)?);
        debug!("Fetching ticker for {}", symbol);
        self.executor
            .public(Method::Get, "/api/v1/market/orderbook/level1", &query)
            .await
    }

    /// Get tickers for every symbol
    #[instrument(skip(self))]
    pub async fn get_all_tickers(&self) -> RestResult<AllTickers> {
        debug!("Fetching all tickers");
        self.executor
            .public(Method::Get, "/api/v1/market/allTickers", &QueryParams::new())
            .await
    }

    /// Get 24 hour statistics
    #[instrument(skip(self))]
    pub async fn get_24h_stats(&self, symbol: &str) -> RestResult<Stats24h> {
        let query = QueryParams::new().push("symbol", required("symbol", symbol)?);
        debug!("Fetching 24h stats for {}", symbol);
        self.executor
            .public(Method::Get, "/api/v1/market/stats", &query)
            .await
    }

    /// Get candles, newest first
    ///
    /// # Arguments
    /// * `symbol` - Trading pair
    /// * `interval` - Candle width
    /// * `start_at` / `end_at` - Optional bounds in Unix seconds
    #[instrument(skip(self))]
    pub async fn get_candles(
        &self,
        symbol: &str,
        interval: CandleInterval,
        start_at: Option<i64>,
        end_at: Option<i64>,
    ) -> RestResult<Vec<Candle>> {
        if let (Some(start), Some(end)) = (start_at, end_at) {
            if start > end {
                return Err(RestError::InvalidParameter(format!(
                    "startAt {} is after endAt {}",
                    start, end
                )));
            }
        }

        let query = QueryParams::new()
            .push("symbol", required("symbol", symbol)?)
            .push("type", interval.as_str())
            .push_opt("startAt", start_at)
            .push_opt("endAt", end_at);

        debug!("Fetching {} candles for {}", interval.as_str(), symbol);

        let rows: Vec<Vec<String>> = self
            .executor
            .public(Method::Get, "/api/v1/market/candles", &query)
            .await?;

        rows.iter()
            .map(|row| {
                Candle::from_row(row).map_err(|e| match e {
                    RestError::Parse { message, .. } => RestError::Parse {
                        url: format!("{}/api/v1/market/candles", self.executor.base_url()),
                        message,
                    },
                    other => other,
                })
            })
            .collect()
    }
}
