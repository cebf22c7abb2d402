//! Shared types for the KuCoin REST API
//!
//! This crate provides the core type definitions used across the KuCoin
//! client crates. It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`Side`], [`OrderType`], [`TimeInForce`] - Order enums
//! - [`AccountType`], [`OrderStatus`], [`TradeType`] - Query filters
//! - [`CandleInterval`] - Kline intervals
//! - [`KucoinApiError`], [`KucoinErrorCode`] - KuCoin API error mapping
//! - [`RecoveryStrategy`] - What a caller can do about an error

pub mod enums;
pub mod error_codes;

pub use enums::*;
pub use error_codes::*;

// Re-export rust_decimal for users
pub use rust_decimal::Decimal;
