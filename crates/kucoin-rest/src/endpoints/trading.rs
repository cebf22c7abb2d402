//! Trading endpoints for order management
//!
//! These endpoints require authentication.

use kucoin_auth::{encode_json_body, Credentials, Method, QueryParams};
use kucoin_types::{OrderStatus, OrderType, Side, TradeType};
use tracing::{debug, info, instrument};

use super::path_segment;
use crate::error::RestResult;
use crate::executor::RequestExecutor;
use crate::pagination::{PageCursor, PageDriver, PaginationConfig};
use crate::retry::{with_retry, RetryPolicy};
use crate::types::{
    CancelledByClientOid, CancelledOrders, Fill, Order, PagedData, PlaceOrderRequest,
    PlaceOrderResponse,
};

/// Trading endpoints for order management
#[derive(Debug, Clone, Copy)]
pub struct TradingEndpoints<'a> {
    executor: &'a RequestExecutor,
    credentials: &'a Credentials,
}

impl<'a> TradingEndpoints<'a> {
    pub fn new(executor: &'a RequestExecutor, credentials: &'a Credentials) -> Self {
        Self {
            executor,
            credentials,
        }
    }

    /// Place a new order
    ///
    /// The request is validated locally before anything is sent.
    #[instrument(skip(self, order), fields(symbol = %order.symbol, client_oid = %order.client_oid))]
    pub async fn place_order(&self, order: &PlaceOrderRequest) -> RestResult<PlaceOrderResponse> {
        order.validate()?;
        let body = encode_json_body(order)?;

        debug!("Placing {} {} order", order.side, order.order_type.as_str());

        let response: PlaceOrderResponse = self
            .executor
            .signed(
                self.credentials,
                Method::Post,
                "/api/v1/orders",
                &QueryParams::new(),
                Some(body),
            )
            .await?;

        info!(order_id = %response.order_id, "Order placed");
        Ok(response)
    }

    /// Cancel an order by server order id
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: &str) -> RestResult<CancelledOrders> {
        let path = format!("/api/v1/orders/{}", path_segment("orderId", order_id)?);
        self.executor
            .signed(self.credentials, Method::Delete, &path, &QueryParams::new(), None)
            .await
    }

    /// Cancel an order by client order id
    #[instrument(skip(self))]
    pub async fn cancel_order_by_client_oid(&self, client_oid: &str) -> RestResult<CancelledByClientOid> {
        let path = format!(
            "/api/v1/order/client-order/{}",
            path_segment("clientOid", client_oid)?
        );
        self.executor
            .signed(self.credentials, Method::Delete, &path, &QueryParams::new(), None)
            .await
    }

    /// Cancel all open orders, optionally for one symbol
    #[instrument(skip(self))]
    pub async fn cancel_all_orders(
        &self,
        symbol: Option<&str>,
        trade_type: Option<TradeType>,
    ) -> RestResult<CancelledOrders> {
        let query = QueryParams::new()
            .push_opt("symbol", symbol)
            .push_opt("tradeType", trade_type.map(|t| t.as_str()));

        let cancelled: CancelledOrders = self
            .executor
            .signed(self.credentials, Method::Delete, "/api/v1/orders", &query, None)
            .await?;

        info!(count = cancelled.cancelled_order_ids.len(), "Orders cancelled");
        Ok(cancelled)
    }

    /// Get an order by server order id
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: &str) -> RestResult<Order> {
        let path = format!("/api/v1/orders/{}", path_segment("orderId", order_id)?);
        self.executor
            .signed(self.credentials, Method::Get, &path, &QueryParams::new(), None)
            .await
    }

    /// Get an order by client order id
    #[instrument(skip(self))]
    pub async fn get_order_by_client_oid(&self, client_oid: &str) -> RestResult<Order> {
        let path = format!(
            "/api/v1/order/client-order/{}",
            path_segment("clientOid", client_oid)?
        );
        self.executor
            .signed(self.credentials, Method::Get, &path, &QueryParams::new(), None)
            .await
    }

    /// Cancel by order id, retrying transient failures
    ///
    /// A retry after a lost response may report the order as already
    /// cancelled; that surfaces as an API error.
    pub async fn cancel_order_with_retry(
        &self,
        order_id: &str,
        policy: &RetryPolicy,
    ) -> RestResult<CancelledOrders> {
        let this = *self;
        let policy = policy.for_method(Method::Delete);
        with_retry(&policy, move || async move { this.cancel_order(order_id).await }).await
    }

    /// Look up an order by id, retrying transient failures
    pub async fn get_order_with_retry(&self, order_id: &str, policy: &RetryPolicy) -> RestResult<Order> {
        let this = *self;
        let policy = policy.for_method(Method::Get);
        with_retry(&policy, move || async move { this.get_order(order_id).await }).await
    }

    /// Fetch one page of orders
    #[instrument(skip(self, filter))]
    pub async fn get_orders_page(
        &self,
        filter: &OrderFilter,
        cursor: PageCursor,
    ) -> RestResult<PagedData<Order>> {
        let query = filter
            .query()
            .push("currentPage", cursor.current_page)
            .push("pageSize", cursor.page_size);
        self.executor
            .signed(self.credentials, Method::Get, "/api/v1/orders", &query, None)
            .await
    }

    /// Walk order pages lazily
    pub fn orders(&self, filter: OrderFilter, config: PaginationConfig) -> PageDriver<'a, Order> {
        let this = *self;
        PageDriver::new(config, move |cursor| {
            let filter = filter.clone();
            async move { this.get_orders_page(&filter, cursor).await }
        })
    }

    /// Fetch one page of fills
    #[instrument(skip(self, filter))]
    pub async fn get_fills_page(
        &self,
        filter: &FillFilter,
        cursor: PageCursor,
    ) -> RestResult<PagedData<Fill>> {
        let query = filter
            .query()
            .push("currentPage", cursor.current_page)
            .push("pageSize", cursor.page_size);
        self.executor
            .signed(self.credentials, Method::Get, "/api/v1/fills", &query, None)
            .await
    }

    /// Walk fill pages lazily
    pub fn fills(&self, filter: FillFilter, config: PaginationConfig) -> PageDriver<'a, Fill> {
        let this = *self;
        PageDriver::new(config, move |cursor| {
            let filter = filter.clone();
            async move { this.get_fills_page(&filter, cursor).await }
        })
    }
}

/// Order list filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub symbol: Option<String>,
    pub side: Option<Side>,
    pub order_type: Option<OrderType>,
    pub trade_type: Option<TradeType>,
    /// Unix milliseconds
    pub start_at: Option<i64>,
    pub end_at: Option<i64>,
}

impl OrderFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open orders only
    pub fn active() -> Self {
        Self {
            status: Some(OrderStatus::Active),
            ..Self::default()
        }
    }

    /// Completed orders only
    pub fn done() -> Self {
        Self {
            status: Some(OrderStatus::Done),
            ..Self::default()
        }
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    pub fn trade_type(mut self, trade_type: TradeType) -> Self {
        self.trade_type = Some(trade_type);
        self
    }

    pub fn between(mut self, start_at: i64, end_at: i64) -> Self {
        self.start_at = Some(start_at);
        self.end_at = Some(end_at);
        self
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .push_opt("status", self.status.map(|s| s.as_str()))
            .push_opt("symbol", self.symbol.as_deref())
            .push_opt("side", self.side.map(|s| s.as_str()))
            .push_opt("type", self.order_type.map(|t| t.as_str()))
            .push_opt("tradeType", self.trade_type.map(|t| t.as_str()))
            .push_opt("startAt", self.start_at)
            .push_opt("endAt", self.end_at)
    }
}

/// Fill list filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillFilter {
    pub order_id: Option<String>,
    pub symbol: Option<String>,
    pub side: Option<Side>,
    pub order_type: Option<OrderType>,
    pub trade_type: Option<TradeType>,
    pub start_at: Option<i64>,
    pub end_at: Option<i64>,
}

impl FillFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills of one order; other filters are ignored by the server
    pub fn for_order(order_id: impl Into<String>) -> Self {
        Self {
            order_id: Some(order_id.into()),
            ..Self::default()
        }
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn trade_type(mut self, trade_type: TradeType) -> Self {
        self.trade_type = Some(trade_type);
        self
    }

    pub fn between(mut self, start_at: i64, end_at: i64) -> Self {
        self.start_at = Some(start_at);
        self.end_at = Some(end_at);
        self
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .push_opt("orderId", self.order_id.as_deref())
            .push_opt("symbol", self.symbol.as_deref())
            .push_opt("side", self.side.map(|s| s.as_str()))
            .push_opt("type", self.order_type.map(|t| t.as_str()))
            .push_opt("tradeType", self.trade_type.map(|t| t.as_str()))
            .push_opt("startAt", self.start_at)
            .push_opt("endAt", self.end_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_filter_query() {
        let query = OrderFilter::active()
            .symbol("BTC-USDT")
            .side(Side::Buy)
            .trade_type(TradeType::Trade)
            .query();
        assert_eq!(
            query.encode().unwrap(),
            "status=active&symbol=BTC-USDT&side=buy&tradeType=TRADE"
        );
    }

    #[test]
    fn test_fill_filter_query() {
        let query = FillFilter::for_order("5c35c02703aa673ceec2a168").query();
        assert_eq!(query.encode().unwrap(), "orderId=5c35c02703aa673ceec2a168");
        assert!(FillFilter::default().query().is_empty());
    }
}
