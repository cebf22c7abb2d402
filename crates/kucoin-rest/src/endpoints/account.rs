//! Private account endpoints
//!
//! These endpoints require authentication.

use kucoin_auth::{Credentials, Method, QueryParams};
use kucoin_types::AccountType;
use tracing::{debug, instrument};

use super::path_segment;
use crate::error::RestResult;
use crate::executor::RequestExecutor;
use crate::pagination::{PageCursor, PageDriver, PaginationConfig};
use crate::types::{Account, AccountDetail, LedgerEntry, PagedData};

/// Private account endpoints
#[derive(Debug, Clone, Copy)]
pub struct AccountEndpoints<'a> {
    executor: &'a RequestExecutor,
    credentials: &'a Credentials,
}

impl<'a> AccountEndpoints<'a> {
    pub fn new(executor: &'a RequestExecutor, credentials: &'a Credentials) -> Self {
        Self {
            executor,
            credentials,
        }
    }

    /// List accounts
    ///
    /// # Arguments
    /// * `currency` - Optional currency filter (e.g., "BTC")
    /// * `account_type` - Optional account type filter
    #[instrument(skip(self))]
    pub async fn list_accounts(
        &self,
        currency: Option<&str>,
        account_type: Option<AccountType>,
    ) -> RestResult<Vec<Account>> {
        let query = QueryParams::new()
            .push_opt("currency", currency)
            .push_opt("type", account_type.map(|t| t.as_str()));

        debug!("Fetching accounts");

        self.executor
            .signed(self.credentials, Method::Get, "/api/v1/accounts", &query, None)
            .await
    }

    /// Get a single account by id
    #[instrument(skip(self))]
    pub async fn get_account(&self, account_id: &str) -> RestResult<AccountDetail> {
        let path = format!("/api/v1/accounts/{}", path_segment("accountId", account_id)?);
        self.executor
            .signed(self.credentials, Method::Get, &path, &QueryParams::new(), None)
            .await
    }

    /// Fetch one page of ledger entries
    #[instrument(skip(self, filter))]
    pub async fn get_ledgers_page(
        &self,
        filter: &LedgerFilter,
        cursor: PageCursor,
    ) -> RestResult<PagedData<LedgerEntry>> {
        let query = filter
            .query()
            .push("currentPage", cursor.current_page)
            .push("pageSize", cursor.page_size);

        self.executor
            .signed(self.credentials, Method::Get, "/api/v1/accounts/ledgers", &query, None)
            .await
    }

    /// Walk ledger pages lazily
    pub fn ledgers(&self, filter: LedgerFilter, config: PaginationConfig) -> PageDriver<'a, LedgerEntry> {
        let this = *self;
        PageDriver::new(config, move |cursor| {
            let filter = filter.clone();
            async move { this.get_ledgers_page(&filter, cursor).await }
        })
    }
}

/// Ledger query filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerFilter {
    /// Comma-separated currencies, at most 10
    pub currency: Option<String>,
    /// `in` or `out`
    pub direction: Option<String>,
    /// e.g. `TRANSFER`, `TRADE_EXCHANGE`
    pub biz_type: Option<String>,
    /// Unix milliseconds
    pub start_at: Option<i64>,
    pub end_at: Option<i64>,
}

impl LedgerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    pub fn biz_type(mut self, biz_type: impl Into<String>) -> Self {
        self.biz_type = Some(biz_type.into());
        self
    }

    /// Restrict to `[start_at, end_at]`, both Unix milliseconds
    pub fn between(mut self, start_at: i64, end_at: i64) -> Self {
        self.start_at = Some(start_at);
        self.end_at = Some(end_at);
        self
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .push_opt("currency", self.currency.as_deref())
            .push_opt("direction", self.direction.as_deref())
            .push_opt("bizType", self.biz_type.as_deref())
            .push_opt("startAt", self.start_at)
            .push_opt("endAt", self.end_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_filter_query() {
        let query = LedgerFilter::new()
            .currency("BTC")
            .direction("in")
            .between(1, 2)
            .query();
        assert_eq!(
            query.encode().unwrap(),
            "currency=BTC&direction=in&startAt=1&endAt=2"
        );
        assert!(LedgerFilter::default().query().is_empty());
    }
}
