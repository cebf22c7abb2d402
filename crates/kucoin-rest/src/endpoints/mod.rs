//! API endpoint implementations

pub mod market;
pub mod account;
pub mod sub_account;
pub mod trading;
pub mod funding;

pub use market::MarketEndpoints;
pub use account::{AccountEndpoints, LedgerFilter};
pub use sub_account::SubAccountEndpoints;
pub use trading::{FillFilter, OrderFilter, TradingEndpoints};
pub use funding::{DepositFilter, FundingEndpoints};

use crate::error::{RestError, RestResult};

/// Reject values that would change the shape of a URL path
pub(crate) fn path_segment<'s>(name: &str, value: &'s str) -> RestResult<&'s str> {
    let bad = |c: char| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control();
    if value.is_empty() || value.chars().any(bad) {
        return Err(RestError::InvalidParameter(format!(
            "invalid {}: {:?}",
            name, value
        )));
    }
    Ok(value)
}

pub(crate) fn required<'s>(name: &str, value: &'s str) -> RestResult<&'s str> {
    if value.trim().is_empty() {
        return Err(RestError::InvalidParameter(format!("{} is required", name)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment("orderId", "5bd6e9286d99522a52e458de").unwrap(), "5bd6e9286d99522a52e458de");
        for bad in ["", "a/b", "a?b=1", "a#b", "a b", "..%2f"] {
            assert!(
                matches!(path_segment("orderId", bad), Err(RestError::InvalidParameter(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_required() {
        assert!(required("symbol", "BTC-USDT").is_ok());
        assert!(required("symbol", "  ").is_err());
    }
}
