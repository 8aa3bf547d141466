//! v1 REST client

use cdc_auth::{Credentials, Params};
use cdc_types::rate_limit::endpoint_rates;
use cdc_types::{OrderSide, OrderStatus, OrderType, Symbol};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::ClientConfig;
use crate::dispatcher::{decode, Dispatcher};
use crate::error::{RestError, RestResult};
use crate::expiry::ExpiredOrder;
use crate::pagination::{collect_pages, Page};
use crate::protocol::ProtocolVariant;
use crate::transport::HttpTransport;

use super::types::{
    AccountSummary, CoinBalance, CreateOrderResult, DepthResult, ListResult, Order, OrderBook,
    OrderDetail, SymbolInfo, Ticker, Tickers, Trade,
};

mod paths {
    pub const SYMBOLS: &str = "symbols";
    pub const TICKER: &str = "ticker";
    pub const DEPTH: &str = "depth";
    pub const ACCOUNT: &str = "account";
    pub const CREATE_ORDER: &str = "order";
    pub const SHOW_ORDER: &str = "showOrder";
    pub const CANCEL_ORDER: &str = "orders/cancel";
    pub const OPEN_ORDERS: &str = "openOrders";
    pub const TRADES: &str = "myTrades";
}

/// Page size requested from paged endpoints
pub const PAGE_SIZE: u32 = 100;

/// Depth aggregation level (no merging)
const DEPTH_STEP: &str = "step0";

/// v1 pages start at 1 on the wire
fn page_params(symbol: &str, page: u32) -> Params {
    Params::new()
        .with("symbol", wire_symbol(symbol))
        .with("pageSize", PAGE_SIZE)
        .with("page", page + 1)
}

fn wire_symbol(symbol: &str) -> String {
    Symbol::new(symbol).v1_name()
}

/// Crypto.com Exchange v1 REST client
///
/// Symbols may be given as `ETH_BTC`, `ETH/BTC` or in the wire form `ethbtc`.
///
/// ```no_run
/// use cdc_rest::v1::Client;
///
/// # async fn example() -> cdc_rest::RestResult<()> {
/// let client = Client::new()?;
/// let book = client.order_book("ETH_BTC").await?;
/// println!("{} bids, {} asks", book.bids.len(), book.asks.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    dispatcher: Dispatcher,
}

impl Client {
    /// Create a new client without authentication
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with credentials
    pub fn with_credentials(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::new().with_credentials(credentials))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let dispatcher = Dispatcher::new(ProtocolVariant::V1, config)?;
        info!(base_url = dispatcher.base_url(), "Created v1 REST client");
        Ok(Self { dispatcher })
    }

    /// Create a client with a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self::from_dispatcher(Dispatcher::with_transport(ProtocolVariant::V1, config, transport))
    }

    /// Wrap an existing dispatcher
    pub fn from_dispatcher(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Underlying dispatcher
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.dispatcher.has_credentials()
    }

    // ========================================================================
    // Public Market Endpoints
    // ========================================================================

    /// List tradable pairs
    #[instrument(skip(self))]
    pub async fn symbols(&self) -> RestResult<Vec<SymbolInfo>> {
        let payload = self.dispatcher.get(paths::SYMBOLS, Params::new()).await?;
        decode(payload)
    }

    /// Tickers for all pairs
    #[instrument(skip(self))]
    pub async fn tickers(&self) -> RestResult<Tickers> {
        let payload = self.dispatcher.get(paths::TICKER, Params::new()).await?;
        decode(payload)
    }

    /// Ticker for one pair
    #[instrument(skip(self))]
    pub async fn ticker(&self, symbol: &str) -> RestResult<Ticker> {
        let params = Params::new().with("symbol", wire_symbol(symbol));
        let payload = self.dispatcher.get(paths::TICKER, params).await?;
        if payload.is_null() {
            return Err(RestError::NotFound(symbol.to_string()));
        }
        decode(payload)
    }

    /// Order book for one pair
    #[instrument(skip(self))]
    pub async fn order_book(&self, symbol: &str) -> RestResult<OrderBook> {
        let params = Params::new()
            .with("symbol", wire_symbol(symbol))
            .with("type", DEPTH_STEP);
        let payload = self.dispatcher.get(paths::DEPTH, params).await?;
        Ok(decode::<DepthResult>(payload)?.tick)
    }

    // ========================================================================
    // Private Account Endpoints
    // ========================================================================

    /// Account summary with per-coin balances
    #[instrument(skip(self))]
    pub async fn account(&self) -> RestResult<AccountSummary> {
        let payload = self
            .dispatcher
            .post(paths::ACCOUNT, Params::new(), endpoint_rates::ACCOUNT)
            .await?;
        decode(payload)
    }

    /// Balance of one coin
    #[instrument(skip(self))]
    pub async fn balance(&self, coin: &str) -> RestResult<CoinBalance> {
        self.account()
            .await?
            .coin(coin)
            .cloned()
            .ok_or_else(|| RestError::NotFound(coin.to_string()))
    }

    // ========================================================================
    // Private Trading Endpoints
    // ========================================================================

    /// Place an order and return its id
    ///
    /// The order is fetched again after placement. An order that expired on
    /// placement is reported as [`RestError::OrderExpired`] with the balance
    /// that was available.
    #[instrument(skip(self))]
    pub async fn create_order(
        &self,
        symbol: &str,
        side: OrderSide,
        order_type: OrderType,
        volume: Decimal,
        price: Decimal,
    ) -> RestResult<String> {
        if volume <= Decimal::ZERO {
            return Err(RestError::InvalidParameter(format!(
                "volume must be positive, got {}",
                volume
            )));
        }
        let type_code = order_type.v1_code().ok_or_else(|| {
            RestError::InvalidParameter(format!("{} orders are not supported by v1", order_type))
        })?;

        let mut params = Params::new()
            .with("symbol", wire_symbol(symbol))
            .with("side", side.as_str())
            .with("type", u32::from(type_code))
            .with("volume", volume);
        if order_type.requires_price() {
            params.insert("price", price);
        }

        let payload = self
            .dispatcher
            .post(paths::CREATE_ORDER, params, endpoint_rates::CREATE_ORDER)
            .await?;
        let order_id = decode::<CreateOrderResult>(payload)?.order_id;
        info!(%order_id, "order placed");

        let placed = self.get_order(symbol, &order_id).await.map_err(|e| {
            warn!(%order_id, error = %e, "placed order could not be fetched");
            e
        })?;
        if placed.order_info.status() == OrderStatus::Expired {
            let mut expired = ExpiredOrder::new(symbol, side, volume, price);
            if order_type == OrderType::Market {
                if let Ok(ticker) = self.ticker(symbol).await {
                    expired.price = ticker.last;
                }
            }
            if let Ok(balance) = self.balance(&expired.balance_currency).await {
                expired.available = balance.normal;
            }

            let message = expired.message();
            warn!(%order_id, %message, "order expired");
            return Err(RestError::OrderExpired { order_id, message });
        }

        Ok(order_id)
    }

    /// Look up an order with its fills
    #[instrument(skip(self))]
    pub async fn get_order(&self, symbol: &str, order_id: &str) -> RestResult<OrderDetail> {
        let params = Params::new()
            .with("symbol", wire_symbol(symbol))
            .with("order_id", order_id);
        let payload = self
            .dispatcher
            .post(paths::SHOW_ORDER, params, endpoint_rates::ORDER_DETAIL)
            .await?;
        decode(payload)
    }

    /// Cancel an order
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, symbol: &str, order_id: &str) -> RestResult<()> {
        let params = Params::new()
            .with("symbol", wire_symbol(symbol))
            .with("order_id", order_id);
        self.dispatcher
            .post(paths::CANCEL_ORDER, params, endpoint_rates::CANCEL_ORDER)
            .await?;
        Ok(())
    }

    /// All open orders of a pair
    #[instrument(skip(self))]
    pub async fn open_orders(&self, symbol: &str) -> RestResult<Vec<Order>> {
        collect_pages(move |page| async move {
            let payload = self
                .dispatcher
                .post(paths::OPEN_ORDERS, page_params(symbol, page), endpoint_rates::OPEN_ORDERS)
                .await?;
            let result = decode::<ListResult<Order>>(payload)?;
            Ok(Page::new(result.count, result.result_list))
        })
        .await
    }

    /// All executed trades of a pair
    #[instrument(skip(self))]
    pub async fn my_trades(&self, symbol: &str) -> RestResult<Vec<Trade>> {
        collect_pages(move |page| async move {
            let payload = self
                .dispatcher
                .post(paths::TRADES, page_params(symbol, page), endpoint_rates::TRADES)
                .await?;
            let result = decode::<ListResult<Trade>>(payload)?;
            Ok(Page::new(result.count, result.result_list))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use cdc_types::RateBudget;
    use rust_decimal_macros::dec;

    fn client() -> (Client, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let config = ClientConfig::new()
            .with_credentials(Credentials::new("key", "secret").unwrap())
            .with_rate_budget(RateBudget::permissive());
        (Client::with_transport(config, transport.clone()), transport)
    }

    fn form(transport: &MockTransport, index: usize) -> Vec<(String, String)> {
        let requests = transport.requests();
        serde_urlencoded::from_str(requests[index].body.as_deref().unwrap()).unwrap()
    }

    fn field<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_page_params_start_at_one() {
        let params = page_params("ETH_BTC", 0);
        assert_eq!(
            params.canonical_concat(),
            "page1pageSize100symbolethbtc"
        );
    }

    #[tokio::test]
    async fn test_depth_query() {
        let (client, transport) = client();
        transport.push_ok(
            r#"{"code":"0","msg":"suc","data":{"tick":{"asks":[["0.031","2"]],"bids":[["0.030","1"]],"time":1}}}"#,
        );

        let book = client.order_book("ETH_BTC").await.unwrap();
        assert_eq!(book.asks[0].price(), dec!(0.031));
        assert_eq!(book.bids[0].size(), dec!(1));
        assert_eq!(
            transport.requests()[0].url,
            "https://api.crypto.com/v1/depth?symbol=ethbtc&type=step0"
        );
    }

    #[tokio::test]
    async fn test_limit_order_form() {
        let (client, transport) = client();
        transport.push_ok(r#"{"code":"0","msg":"suc","data":{"order_id":343}}"#);
        transport.push_ok(r#"{"code":"0","msg":"suc","data":{"order_info":{"id":343,"status":1},"trade_list":[]}}"#);

        let id = client
            .create_order("ETH_BTC", OrderSide::Buy, OrderType::Limit, dec!(1.5), dec!(0.03))
            .await
            .unwrap();
        assert_eq!(id, "343");

        let create = form(&transport, 0);
        assert_eq!(field(&create, "symbol"), Some("ethbtc"));
        assert_eq!(field(&create, "side"), Some("BUY"));
        assert_eq!(field(&create, "type"), Some("1"));
        assert_eq!(field(&create, "volume"), Some("1.5"));
        assert_eq!(field(&create, "price"), Some("0.03"));
        assert_eq!(field(&create, "api_key"), Some("key"));
        assert!(field(&create, "sign").is_some());
        assert!(field(&create, "time").is_some());

        let show = form(&transport, 1);
        assert_eq!(field(&show, "order_id"), Some("343"));
        assert!(transport.requests()[1].url.ends_with("/showOrder"));
    }

    #[tokio::test]
    async fn test_unsupported_order_type() {
        let (client, transport) = client();
        let result = client
            .create_order("ETH_BTC", OrderSide::Buy, OrderType::StopLoss, dec!(1), dec!(1))
            .await;
        assert!(matches!(result, Err(RestError::InvalidParameter(_))));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_balance_not_found() {
        let (client, transport) = client();
        transport.push_ok(r#"{"code":"0","msg":"suc","data":{"total_asset":"0","coin_list":[]}}"#);
        let err = client.balance("eth").await.unwrap_err();
        assert_eq!(err.to_string(), "eth does not exist");
    }
}
