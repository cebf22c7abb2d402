//! Sub-account endpoints
//!
//! These endpoints require master-account credentials.

use kucoin_auth::{Credentials, Method, QueryParams};
use tracing::{debug, instrument};

use super::path_segment;
use crate::error::RestResult;
use crate::executor::RequestExecutor;
use crate::pagination::{PageCursor, PageDriver, PaginationConfig};
use crate::types::{PagedData, SubAccountBalance, SubUser};

/// Sub-account endpoints
#[derive(Debug, Clone, Copy)]
pub struct SubAccountEndpoints<'a> {
    executor: &'a RequestExecutor,
    credentials: &'a Credentials,
}

impl<'a> SubAccountEndpoints<'a> {
    pub fn new(executor: &'a RequestExecutor, credentials: &'a Credentials) -> Self {
        Self {
            executor,
            credentials,
        }
    }

    /// Fetch one page of sub-users
    #[instrument(skip(self))]
    pub async fn get_sub_users_page(&self, cursor: PageCursor) -> RestResult<PagedData<SubUser>> {
        let query = QueryParams::new()
            .push("currentPage", cursor.current_page)
            .push("pageSize", cursor.page_size);
        self.executor
            .signed(self.credentials, Method::Get, "/api/v2/sub/user", &query, None)
            .await
    }

    /// Walk sub-user pages lazily
    pub fn sub_users(&self, config: PaginationConfig) -> PageDriver<'a, SubUser> {
        let this = *self;
        PageDriver::new(config, move |cursor| async move {
            this.get_sub_users_page(cursor).await
        })
    }

    /// Balances of every sub-account
    #[instrument(skip(self))]
    pub async fn list_balances(&self) -> RestResult<Vec<SubAccountBalance>> {
        debug!("Fetching sub-account balances");
        self.executor
            .signed(
                self.credentials,
                Method::Get,
                "/api/v1/sub-accounts",
                &QueryParams::new(),
                None,
            )
            .await
    }

    /// Balance of one sub-account
    ///
    /// # Arguments
    /// * `sub_user_id` - Sub-account user id
    /// * `include_base_amount` - Also report zero balances
    #[instrument(skip(self))]
    pub async fn get_balance(
        &self,
        sub_user_id: &str,
        include_base_amount: bool,
    ) -> RestResult<SubAccountBalance> {
        let path = format!(
            "/api/v1/sub-accounts/{}",
            path_segment("subUserId", sub_user_id)?
        );
        let query = QueryParams::new().push("includeBaseAmount", include_base_amount);
        self.executor
            .signed(self.credentials, Method::Get, &path, &query, None)
            .await
    }
}
