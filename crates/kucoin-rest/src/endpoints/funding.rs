//! Funding endpoints for deposits
//!
//! These endpoints require authentication.

use kucoin_auth::{encode_json_body, Credentials, Method, QueryParams};
use tracing::{debug, info, instrument};

use super::required;
use crate::error::RestResult;
use crate::executor::RequestExecutor;
use crate::pagination::{PageCursor, PageDriver, PaginationConfig};
use crate::types::{CreateDepositAddressBody, CreatedDepositAddress, Deposit, DepositAddress, PagedData};

/// Funding endpoints for deposits
#[derive(Debug, Clone, Copy)]
pub struct FundingEndpoints<'a> {
    executor: &'a RequestExecutor,
    credentials: &'a Credentials,
}

impl<'a> FundingEndpoints<'a> {
    pub fn new(executor: &'a RequestExecutor, credentials: &'a Credentials) -> Self {
        Self {
            executor,
            credentials,
        }
    }

    /// Get deposit addresses, one per chain
    ///
    /// # Arguments
    /// * `currency` - Currency (e.g., "USDT")
    /// * `chain` - Optional chain id (e.g., "trx")
    #[instrument(skip(self))]
    pub async fn get_deposit_addresses(
        &self,
        currency: &str,
        chain: Option<&str>,
    ) -> RestResult<Vec<DepositAddress>> {
        let query = QueryParams::new()
            .push("currency", required("currency", currency)?)
            .push_opt("chain", chain);

        debug!("Getting deposit addresses for {}", currency);

        // An unknown currency yields `data: null`
        let addresses: Option<Vec<DepositAddress>> = self
            .executor
            .signed(self.credentials, Method::Get, "/api/v3/deposit-addresses", &query, None)
            .await?;
        Ok(addresses.unwrap_or_default())
    }

    /// Create a deposit address
    #[instrument(skip(self))]
    pub async fn create_deposit_address(
        &self,
        currency: &str,
        chain: Option<&str>,
    ) -> RestResult<CreatedDepositAddress> {
        let body = encode_json_body(&CreateDepositAddressBody {
            currency: required("currency", currency)?,
            chain,
        })?;

        let created: CreatedDepositAddress = self
            .executor
            .signed(
                self.credentials,
                Method::Post,
                "/api/v1/deposit-addresses",
                &QueryParams::new(),
                Some(body),
            )
            .await?;

        info!(currency, "Deposit address created");
        Ok(created)
    }

    /// Fetch one page of deposits
    #[instrument(skip(self, filter))]
    pub async fn get_deposits_page(
        &self,
        filter: &DepositFilter,
        cursor: PageCursor,
    ) -> RestResult<PagedData<Deposit>> {
        let query = filter
            .query()
            .push("currentPage", cursor.current_page)
            .push("pageSize", cursor.page_size);
        self.executor
            .signed(self.credentials, Method::Get, "/api/v1/deposits", &query, None)
            .await
    }

    /// Walk deposit pages lazily
    pub fn deposits(&self, filter: DepositFilter, config: PaginationConfig) -> PageDriver<'a, Deposit> {
        let this = *self;
        PageDriver::new(config, move |cursor| {
            let filter = filter.clone();
            async move { this.get_deposits_page(&filter, cursor).await }
        })
    }
}

/// Deposit list filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepositFilter {
    pub currency: Option<String>,
    /// `PROCESSING`, `SUCCESS` or `FAILURE`
    pub status: Option<String>,
    /// Unix milliseconds
    pub start_at: Option<i64>,
    pub end_at: Option<i64>,
}

impl DepositFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn between(mut self, start_at: i64, end_at: i64) -> Self {
        self.start_at = Some(start_at);
        self.end_at = Some(end_at);
        self
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .push_opt("currency", self.currency.as_deref())
            .push_opt("status", self.status.as_deref())
            .push_opt("startAt", self.start_at)
            .push_opt("endAt", self.end_at)
    }
}
