//! Side, OrderType, TimeInForce and the other request/response enums

use serde::{Deserialize, Serialize};

/// Trade side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl Side {
    /// Returns the side as used in API messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }

    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spot order types
///
/// The stop variants only appear in order and fill history, for orders
/// that were placed through the stop-order endpoint and later triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Market order - executes immediately at best available price
    Market,
    /// Limit order - executes at specified price or better
    Limit,
    /// Triggered stop order that became a market order
    MarketStop,
    /// Triggered stop order that became a limit order
    LimitStop,
}

impl OrderType {
    /// Returns the order type as used in API messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Limit => "limit",
            Self::MarketStop => "market_stop",
            Self::LimitStop => "limit_stop",
        }
    }

    /// Whether this type came from a triggered stop order
    pub fn is_stop(&self) -> bool {
        matches!(self, Self::MarketStop | Self::LimitStop)
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time in force for limit orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeInForce {
    /// Good till cancelled
    #[default]
    #[serde(rename = "GTC")]
    GoodTillCancelled,
    /// Good till time (requires `cancelAfter`)
    #[serde(rename = "GTT")]
    GoodTillTime,
    /// Immediate or cancel
    #[serde(rename = "IOC")]
    ImmediateOrCancel,
    /// Fill or kill
    #[serde(rename = "FOK")]
    FillOrKill,
}

impl TimeInForce {
    /// Returns the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoodTillCancelled => "GTC",
            Self::GoodTillTime => "GTT",
            Self::ImmediateOrCancel => "IOC",
            Self::FillOrKill => "FOK",
        }
    }
}

/// Self-trade prevention strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelfTradePrevention {
    /// Cancel newest
    #[serde(rename = "CN")]
    CancelNewest,
    /// Cancel oldest
    #[serde(rename = "CO")]
    CancelOldest,
    /// Cancel both
    #[serde(rename = "CB")]
    CancelBoth,
    /// Decrease and cancel
    #[serde(rename = "DC")]
    DecreaseAndCancel,
}

/// Account types held under one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Funding account
    Main,
    /// Spot trading account
    Trade,
    /// High-frequency trading account
    TradeHf,
    /// Cross margin account
    Margin,
    /// Isolated margin account
    Isolated,
}

impl AccountType {
    /// Returns the account type as used in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Trade => "trade",
            Self::TradeHf => "trade_hf",
            Self::Margin => "margin",
            Self::Isolated => "isolated",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Open orders
    Active,
    /// Filled or cancelled orders
    Done,
}

impl OrderStatus {
    /// Returns the status as used in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Done => "done",
        }
    }
}

/// Trade type of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeType {
    /// Spot trading
    #[default]
    Trade,
    /// Cross margin trading
    MarginTrade,
    /// Isolated margin trading
    MarginIsolatedTrade,
}

impl TradeType {
    /// Returns the trade type as used in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trade => "TRADE",
            Self::MarginTrade => "MARGIN_TRADE",
            Self::MarginIsolatedTrade => "MARGIN_ISOLATED_TRADE",
        }
    }
}

/// Candle interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandleInterval {
    #[serde(rename = "1min")]
    M1,
    #[serde(rename = "3min")]
    M3,
    #[serde(rename = "5min")]
    M5,
    #[serde(rename = "15min")]
    M15,
    #[serde(rename = "30min")]
    M30,
    #[serde(rename = "1hour")]
    H1,
    #[serde(rename = "2hour")]
    H2,
    #[serde(rename = "4hour")]
    H4,
    #[serde(rename = "6hour")]
    H6,
    #[serde(rename = "8hour")]
    H8,
    #[serde(rename = "12hour")]
    H12,
    #[serde(rename = "1day")]
    D1,
    #[serde(rename = "1week")]
    W1,
}

impl CandleInterval {
    /// Returns the interval as used in the `type` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M1 => "1min",
            Self::M3 => "3min",
            Self::M5 => "5min",
            Self::M15 => "15min",
            Self::M30 => "30min",
            Self::H1 => "1hour",
            Self::H2 => "2hour",
            Self::H4 => "4hour",
            Self::H6 => "6hour",
            Self::H8 => "8hour",
            Self::H12 => "12hour",
            Self::D1 => "1day",
            Self::W1 => "1week",
        }
    }

    /// Interval length in seconds
    pub fn as_secs(&self) -> u64 {
        match self {
            Self::M1 => 60,
            Self::M3 => 180,
            Self::M5 => 300,
            Self::M15 => 900,
            Self::M30 => 1800,
            Self::H1 => 3600,
            Self::H2 => 7200,
            Self::H4 => 14400,
            Self::H6 => 21600,
            Self::H8 => 28800,
            Self::H12 => 43200,
            Self::D1 => 86400,
            Self::W1 => 604800,
        }
    }
}
