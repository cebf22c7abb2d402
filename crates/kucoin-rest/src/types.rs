//! Types for KuCoin REST API requests and responses

use kucoin_types::{OrderType, SelfTradePrevention, Side, TimeInForce, TradeType};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RestError, RestResult};

// ============================================================================
// API Response Wrapper
// ============================================================================

/// Standard KuCoin response envelope
///
/// `data` is kept as raw JSON until the code has been checked, since error
/// responses carry no `data` or a differently shaped one.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    /// `"200000"` on success
    #[serde(deserialize_with = "code_as_string")]
    pub code: String,
    /// Payload (present if successful)
    #[serde(default)]
    pub data: serde_json::Value,
    /// Error description (present on failure)
    #[serde(default)]
    pub msg: Option<String>,
}

// Some gateways emit the code as a JSON number
fn code_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "code must be a string or number, got {}",
            other
        ))),
    }
}

/// One page of an offset-paginated list
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedData<T> {
    pub current_page: u32,
    pub page_size: u32,
    #[serde(default)]
    pub total_num: u64,
    #[serde(default)]
    pub total_page: u32,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

// ============================================================================
// Market Data Types
// ============================================================================

/// Trading pair configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub name: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub fee_currency: String,
    pub market: String,
    pub base_min_size: Decimal,
    pub quote_min_size: Decimal,
    pub base_max_size: Decimal,
    pub quote_max_size: Decimal,
    pub base_increment: Decimal,
    pub quote_increment: Decimal,
    pub price_increment: Decimal,
    pub price_limit_rate: Option<Decimal>,
    pub min_funds: Option<Decimal>,
    pub is_margin_enabled: bool,
    pub enable_trading: bool,
}

/// Best bid/ask and last trade for one symbol
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level1Ticker {
    pub time: i64,
    pub sequence: String,
    /// Last traded price
    pub price: Decimal,
    /// Last traded size
    pub size: Decimal,
    pub best_bid: Decimal,
    pub best_bid_size: Decimal,
    pub best_ask: Decimal,
    pub best_ask_size: Decimal,
}

impl Level1Ticker {
    /// Get the mid price (average of bid and ask)
    pub fn mid_price(&self) -> Decimal {
        (self.best_ask + self.best_bid) / Decimal::TWO
    }

    /// Get the spread
    pub fn spread(&self) -> Decimal {
        self.best_ask - self.best_bid
    }

    /// Get spread in basis points
    pub fn spread_bps(&self) -> Option<Decimal> {
        let mid = self.mid_price();
        if mid.is_zero() {
            return None;
        }
        Some(self.spread() / mid * Decimal::from(10000))
    }
}

/// Snapshot of every ticker
#[derive(Debug, Clone, Deserialize)]
pub struct AllTickers {
    pub time: i64,
    pub ticker: Vec<TickerEntry>,
}

/// One entry of [`AllTickers`]; illiquid symbols report null prices
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerEntry {
    pub symbol: String,
    pub symbol_name: Option<String>,
    /// Best bid
    pub buy: Option<Decimal>,
    /// Best ask
    pub sell: Option<Decimal>,
    pub change_rate: Option<Decimal>,
    pub change_price: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub vol: Option<Decimal>,
    pub vol_value: Option<Decimal>,
    pub last: Option<Decimal>,
    pub average_price: Option<Decimal>,
    pub taker_fee_rate: Option<Decimal>,
    pub maker_fee_rate: Option<Decimal>,
}

/// 24 hour statistics for one symbol
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats24h {
    pub time: i64,
    pub symbol: String,
    pub buy: Option<Decimal>,
    pub sell: Option<Decimal>,
    pub change_rate: Option<Decimal>,
    pub change_price: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub vol: Option<Decimal>,
    pub vol_value: Option<Decimal>,
    pub last: Option<Decimal>,
    pub average_price: Option<Decimal>,
}

/// Individual candle
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    /// Candle start, Unix seconds
    pub time: i64,
    pub open: Decimal,
    pub close: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    /// Volume in base currency
    pub volume: Decimal,
    /// Volume in quote currency
    pub turnover: Decimal,
}

impl Candle {
    /// Parse one `[time, open, close, high, low, volume, turnover]` row
    pub fn from_row(row: &[String]) -> RestResult<Self> {
        if row.len() < 7 {
            return Err(RestError::Parse {
                url: String::new(),
                message: format!("candle row has {} fields, expected 7", row.len()),
            });
        }
        let time = row[0].parse::<i64>().map_err(|e| RestError::Parse {
            url: String::new(),
            message: format!("candle time {:?}: {}", row[0], e),
        })?;
        let dec = |i: usize| -> RestResult<Decimal> {
            row[i].parse::<Decimal>().map_err(|e| RestError::Parse {
                url: String::new(),
                message: format!("candle field {} {:?}: {}", i, row[i], e),
            })
        };

        Ok(Self {
            time,
            open: dec(1)?,
            close: dec(2)?,
            high: dec(3)?,
            low: dec(4)?,
            volume: dec(5)?,
            turnover: dec(6)?,
        })
    }
}

// ============================================================================
// Account Types
// ============================================================================

/// One currency balance in one account type
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub currency: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub balance: Decimal,
    pub available: Decimal,
    pub holds: Decimal,
}

/// Balance of a single account
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetail {
    pub currency: String,
    pub balance: Decimal,
    pub available: Decimal,
    pub holds: Decimal,
}

/// Ledger entry (balance change)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub currency: String,
    pub amount: Decimal,
    pub fee: Decimal,
    pub balance: Decimal,
    pub account_type: String,
    pub biz_type: String,
    /// `in` or `out`
    pub direction: String,
    pub created_at: i64,
    /// Business context, a JSON document encoded as a string
    #[serde(default)]
    pub context: Option<String>,
}

// ============================================================================
// Sub-account Types
// ============================================================================

/// Sub-user summary
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubUser {
    pub user_id: String,
    pub uid: Option<u64>,
    pub sub_name: String,
    pub status: Option<i32>,
    #[serde(rename = "type")]
    pub sub_type: Option<i32>,
    pub access: Option<String>,
    pub created_at: Option<i64>,
    pub remarks: Option<String>,
}

/// Balances held by one sub-account
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountBalance {
    pub sub_user_id: String,
    pub sub_name: String,
    #[serde(default)]
    pub main_accounts: Vec<SubAccountEntry>,
    #[serde(default)]
    pub trade_accounts: Vec<SubAccountEntry>,
    #[serde(default)]
    pub margin_accounts: Vec<SubAccountEntry>,
}

impl SubAccountBalance {
    /// All entries across account types
    pub fn entries(&self) -> impl Iterator<Item = &SubAccountEntry> {
        self.main_accounts
            .iter()
            .chain(&self.trade_accounts)
            .chain(&self.margin_accounts)
    }
}

/// One currency in a sub-account
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountEntry {
    pub currency: String,
    pub balance: Decimal,
    pub available: Decimal,
    pub holds: Decimal,
    pub base_currency: Option<String>,
    pub base_currency_price: Option<Decimal>,
    pub base_amount: Option<Decimal>,
}

// ============================================================================
// Trading Types
// ============================================================================

/// Request to place a spot order
///
/// Serialized field order is the order KuCoin documents; the body is signed
/// exactly as serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub client_oid: String,
    pub side: Side,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stp: Option<SelfTradePrevention>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_type: Option<TradeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Decimal>,
    /// Quote amount, market orders only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funds: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    /// Seconds, only with GTT
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_after: Option<u64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub post_only: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl PlaceOrderRequest {
    fn base(symbol: impl Into<String>, side: Side, order_type: OrderType) -> Self {
        Self {
            client_oid: generate_client_oid(),
            side,
            symbol: symbol.into(),
            order_type,
            remark: None,
            stp: None,
            trade_type: None,
            price: None,
            size: None,
            funds: None,
            time_in_force: None,
            cancel_after: None,
            post_only: false,
            hidden: false,
        }
    }

    /// Create a limit order
    pub fn limit(symbol: impl Into<String>, side: Side, price: Decimal, size: Decimal) -> Self {
        Self {
            price: Some(price),
            size: Some(size),
            ..Self::base(symbol, side, OrderType::Limit)
        }
    }

    /// Create a market order for a base-currency quantity
    pub fn market_by_size(symbol: impl Into<String>, side: Side, size: Decimal) -> Self {
        Self {
            size: Some(size),
            ..Self::base(symbol, side, OrderType::Market)
        }
    }

    /// Create a market order spending a quote-currency amount
    pub fn market_by_funds(symbol: impl Into<String>, side: Side, funds: Decimal) -> Self {
        Self {
            funds: Some(funds),
            ..Self::base(symbol, side, OrderType::Market)
        }
    }

    /// Replace the generated client order id
    pub fn with_client_oid(mut self, client_oid: impl Into<String>) -> Self {
        self.client_oid = client_oid.into();
        self
    }

    /// Set time in force
    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = Some(tif);
        self
    }

    /// Good-till-time: cancel after `secs` seconds
    pub fn cancel_after(mut self, secs: u64) -> Self {
        self.time_in_force = Some(TimeInForce::GoodTillTime);
        self.cancel_after = Some(secs);
        self
    }

    /// Set as post-only (maker only)
    pub fn post_only(mut self) -> Self {
        self.post_only = true;
        self
    }

    /// Hide the order from the book
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }

    pub fn with_stp(mut self, stp: SelfTradePrevention) -> Self {
        self.stp = Some(stp);
        self
    }

    pub fn with_trade_type(mut self, trade_type: TradeType) -> Self {
        self.trade_type = Some(trade_type);
        self
    }

    /// Check the field combinations KuCoin requires for this order type
    pub fn validate(&self) -> RestResult<()> {
        let invalid = |msg: &str| Err(RestError::InvalidParameter(msg.to_string()));
        let positive = |v: Option<Decimal>| v.map(|d| d > Decimal::ZERO);

        if self.symbol.trim().is_empty() {
            return invalid("symbol is required");
        }
        if self.client_oid.is_empty() || self.client_oid.len() > 40 {
            return invalid("clientOid must be 1-40 characters");
        }
        if self.remark.as_ref().is_some_and(|r| r.len() > 100) {
            return invalid("remark must be at most 100 characters");
        }

        match self.order_type {
            OrderType::Limit => {
                if positive(self.price) != Some(true) {
                    return invalid("limit order requires a positive price");
                }
                if positive(self.size) != Some(true) {
                    return invalid("limit order requires a positive size");
                }
                if self.funds.is_some() {
                    return invalid("funds is only valid for market orders");
                }
            }
            OrderType::Market => {
                match (positive(self.size), positive(self.funds)) {
                    (Some(true), None) | (None, Some(true)) => {}
                    (Some(_), Some(_)) => return invalid("market order takes size or funds, not both"),
                    _ => return invalid("market order requires a positive size or funds"),
                }
                if self.price.is_some() || self.time_in_force.is_some() || self.post_only {
                    return invalid("price, timeInForce and postOnly are only valid for limit orders");
                }
            }
            OrderType::MarketStop | OrderType::LimitStop => {
                return invalid("stop orders are not placed through the order endpoint");
            }
        }

        if self.cancel_after.is_some() && self.time_in_force != Some(TimeInForce::GoodTillTime) {
            return invalid("cancelAfter requires timeInForce GTT");
        }
        if self.post_only
            && matches!(
                self.time_in_force,
                Some(TimeInForce::ImmediateOrCancel | TimeInForce::FillOrKill)
            )
        {
            return invalid("postOnly is invalid with IOC or FOK");
        }
        Ok(())
    }
}

/// Random 32 hex character client order id
pub fn generate_client_oid() -> String {
    format!("{:032x}", rand::random::<u128>())
}

/// Response from placing an order
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub order_id: String,
}

/// Orders cancelled by id or by symbol
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledOrders {
    #[serde(default)]
    pub cancelled_order_ids: Vec<String>,
}

/// Order cancelled by client order id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledByClientOid {
    pub cancelled_order_id: String,
    pub client_oid: String,
}

/// Spot order details
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub symbol: String,
    pub op_type: Option<String>,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: Side,
    pub price: Decimal,
    pub size: Decimal,
    pub funds: Decimal,
    pub deal_funds: Decimal,
    pub deal_size: Decimal,
    pub fee: Decimal,
    pub fee_currency: String,
    pub stp: Option<String>,
    pub time_in_force: Option<TimeInForce>,
    #[serde(default)]
    pub post_only: bool,
    #[serde(default)]
    pub hidden: bool,
    pub cancel_after: Option<u64>,
    pub channel: Option<String>,
    pub client_oid: Option<String>,
    pub remark: Option<String>,
    pub is_active: bool,
    pub cancel_exist: bool,
    pub created_at: i64,
    pub trade_type: Option<TradeType>,
}

impl Order {
    /// Size still open on the book
    pub fn remaining_size(&self) -> Decimal {
        (self.size - self.deal_size).max(Decimal::ZERO)
    }
}

/// Executed trade
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    pub symbol: String,
    pub trade_id: String,
    pub order_id: String,
    pub counter_order_id: Option<String>,
    pub side: Side,
    /// `maker` or `taker`
    pub liquidity: String,
    #[serde(default)]
    pub force_taker: bool,
    pub price: Decimal,
    pub size: Decimal,
    pub funds: Decimal,
    pub fee: Decimal,
    pub fee_rate: Decimal,
    pub fee_currency: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub created_at: i64,
    pub trade_type: Option<TradeType>,
}

// ============================================================================
// Funding Types
// ============================================================================

/// Deposit address for one chain
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAddress {
    pub address: String,
    #[serde(default)]
    pub memo: Option<String>,
    pub chain_id: Option<String>,
    pub chain_name: Option<String>,
    /// Account the deposit is credited to (`MAIN` or `TRADE`)
    pub to: Option<String>,
    pub currency: Option<String>,
    pub expiration_date: Option<i64>,
}

/// Address returned when one is created
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedDepositAddress {
    pub address: String,
    #[serde(default)]
    pub memo: Option<String>,
    pub chain: Option<String>,
}

/// Body of the create-deposit-address request
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateDepositAddressBody<'a> {
    pub currency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<&'a str>,
}

/// Deposit record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub currency: String,
    pub chain: Option<String>,
    /// `PROCESSING`, `SUCCESS` or `FAILURE`
    pub status: String,
    pub address: String,
    #[serde(default)]
    pub memo: Option<String>,
    pub is_inner: bool,
    pub amount: Decimal,
    pub fee: Decimal,
    pub wallet_tx_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub remark: Option<String>,
}
