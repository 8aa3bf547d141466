//! v2 REST client

use cdc_auth::{Credentials, Params};
use cdc_types::rate_limit::endpoint_rates;
use cdc_types::{OrderSide, OrderStatus, OrderType};
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
    Account, AccountsResult, CreateOrderResult, DataResult, Instrument, InstrumentsResult, NewOrder,
    Order, OrderBook, OrderDetailResult, OrderListResult, Ticker, Trade, TradeListResult,
};

mod paths {
    pub const INSTRUMENTS: &str = "public/get-instruments";
    pub const TICKER: &str = "public/get-ticker";
    pub const BOOK: &str = "public/get-book";
    pub const ACCOUNT_SUMMARY: &str = "private/get-account-summary";
    pub const CREATE_ORDER: &str = "private/create-order";
    pub const ORDER_DETAIL: &str = "private/get-order-detail";
    pub const CANCEL_ORDER: &str = "private/cancel-order";
    pub const OPEN_ORDERS: &str = "private/get-open-orders";
    pub const TRADES: &str = "private/get-trades";
}

/// Parameters for paged endpoints: instrument when set, page when past the first
fn page_params(symbol: &str, page: u32) -> Params {
    let mut params = Params::new();
    if !symbol.is_empty() {
        params.insert("instrument_name", symbol);
    }
    if page > 0 {
        params.insert("page", page);
    }
    params
}

/// Crypto.com Exchange v2 REST client
///
/// # Example
///
/// ```no_run
/// use cdc_rest::v2::Client;
/// use cdc_auth::Credentials;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public endpoints only
///     let client = Client::new()?;
///     let ticker = client.ticker("ETH_BTC").await?;
///     println!("last: {}", ticker.last);
///
///     // With authentication for private endpoints
///     let auth_client = Client::with_credentials(Credentials::from_env()?)?;
///     for account in auth_client.accounts().await? {
///         println!("{}: {}", account.currency, account.available);
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Client {
    dispatcher: Dispatcher,
}

impl Client {
    /// Create a new client without authentication
    ///
    /// Only public endpoints will be available.
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with credentials
    pub fn with_credentials(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::new().with_credentials(credentials))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let dispatcher = Dispatcher::new(ProtocolVariant::V2, config)?;
        info!(base_url = dispatcher.base_url(), "Created v2 REST client");
        Ok(Self { dispatcher })
    }

    /// Create a client with a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self::from_dispatcher(Dispatcher::with_transport(ProtocolVariant::V2, config, transport))
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

    /// List tradable instruments
    #[instrument(skip(self))]
    pub async fn symbols(&self) -> RestResult<Vec<Instrument>> {
        let payload = self.dispatcher.get(paths::INSTRUMENTS, Params::new()).await?;
        Ok(decode::<InstrumentsResult>(payload)?.instruments)
    }

    /// Tickers for all instruments
    #[instrument(skip(self))]
    pub async fn tickers(&self) -> RestResult<Vec<Ticker>> {
        let payload = self.dispatcher.get(paths::TICKER, Params::new()).await?;
        Ok(decode::<DataResult<Ticker>>(payload)?.data)
    }

    /// Ticker for one instrument
    #[instrument(skip(self))]
    pub async fn ticker(&self, symbol: &str) -> RestResult<Ticker> {
        let params = Params::new().with("instrument_name", symbol);
        let payload = self.dispatcher.get(paths::TICKER, params).await?;
        decode::<DataResult<Ticker>>(payload)?
            .data
            .into_iter()
            .next()
            .ok_or_else(|| RestError::NotFound(symbol.to_string()))
    }

    /// Order book for one instrument
    #[instrument(skip(self))]
    pub async fn order_book(&self, symbol: &str) -> RestResult<OrderBook> {
        let params = Params::new().with("instrument_name", symbol);
        let payload = self.dispatcher.get(paths::BOOK, params).await?;
        decode::<DataResult<OrderBook>>(payload)?
            .data
            .into_iter()
            .next()
            .ok_or_else(|| RestError::NotFound(symbol.to_string()))
    }

    // ========================================================================
    // Private Account Endpoints
    // ========================================================================

    /// Balances of all currencies
    #[instrument(skip(self))]
    pub async fn accounts(&self) -> RestResult<Vec<Account>> {
        let payload = self
            .dispatcher
            .post(paths::ACCOUNT_SUMMARY, Params::new(), endpoint_rates::ACCOUNT)
            .await?;
        Ok(decode::<AccountsResult>(payload)?.accounts)
    }

    /// Balance of one currency
    #[instrument(skip(self))]
    pub async fn account(&self, currency: &str) -> RestResult<Account> {
        let params = Params::new().with("currency", currency);
        let payload = self
            .dispatcher
            .post(paths::ACCOUNT_SUMMARY, params, endpoint_rates::ACCOUNT)
            .await?;
        decode::<AccountsResult>(payload)?
            .accounts
            .into_iter()
            .next()
            .ok_or_else(|| RestError::NotFound(currency.to_string()))
    }

    // ========================================================================
    // Private Trading Endpoints
    // ========================================================================

    /// Place an order and return its id
    ///
    /// The price is only sent for order types that take one. After placement
    /// the order is fetched again; a rejected or expired order is reported as
    /// [`RestError::OrderRejected`] / [`RestError::OrderExpired`], both of
    /// which carry the order id.
    pub async fn create_order(
        &self,
        symbol: &str,
        side: OrderSide,
        order_type: OrderType,
        quantity: Decimal,
        price: Decimal,
    ) -> RestResult<String> {
        self.place_order(&NewOrder::new(symbol, side, order_type, quantity, price))
            .await
    }

    /// Place an order described by a [`NewOrder`]
    #[instrument(skip(self), fields(symbol = %order.instrument_name, side = %order.side))]
    pub async fn place_order(&self, order: &NewOrder) -> RestResult<String> {
        if order.quantity <= Decimal::ZERO {
            return Err(RestError::InvalidParameter(format!(
                "quantity must be positive, got {}",
                order.quantity
            )));
        }

        let mut params = Params::new()
            .with("instrument_name", order.instrument_name.as_str())
            .with("side", order.side.as_str())
            .with("type", order.order_type.as_str())
            .with("quantity", order.quantity);
        if order.order_type.requires_price() {
            params.insert("price", order.price);
        }
        if let Some(trigger_price) = order.trigger_price {
            params.insert("trigger_price", trigger_price);
        }
        if let Some(ref client_oid) = order.client_oid {
            params.insert("client_oid", client_oid.as_str());
        }

        let payload = self
            .dispatcher
            .post(paths::CREATE_ORDER, params, endpoint_rates::CREATE_ORDER)
            .await?;
        let order_id = decode::<CreateOrderResult>(payload)?.order_id;
        info!(%order_id, "order placed");

        let placed = self
            .get_order(&order.instrument_name, &order_id)
            .await
            .map_err(|e| {
                warn!(%order_id, error = %e, "placed order could not be fetched");
                e
            })?;
        match placed.status() {
            OrderStatus::Rejected => {
                warn!(%order_id, reason = %placed.reason, "order rejected");
                Err(RestError::OrderRejected {
                    order_id,
                    reason: placed.reason,
                })
            }
            OrderStatus::Expired => {
                let message = self.expired_message(order).await;
                warn!(%order_id, %message, "order expired");
                Err(RestError::OrderExpired { order_id, message })
            }
            _ => Ok(order_id),
        }
    }

    /// Best-effort diagnostic for an order that expired on placement
    async fn expired_message(&self, order: &NewOrder) -> String {
        let mut expired = ExpiredOrder::new(
            &order.instrument_name,
            order.side,
            order.quantity,
            order.price,
        );

        if order.order_type == OrderType::Market {
            if let Ok(ticker) = self.ticker(&order.instrument_name).await {
                expired.price = ticker.last;
            }
        }
        if let Ok(account) = self.account(&expired.balance_currency).await {
            expired.available = account.available;
        }

        expired.message()
    }

    /// Look up an order
    #[instrument(skip(self))]
    pub async fn get_order(&self, symbol: &str, order_id: &str) -> RestResult<Order> {
        let params = Params::new()
            .with("instrument_name", symbol)
            .with("order_id", order_id);
        let payload = self
            .dispatcher
            .post(paths::ORDER_DETAIL, params, endpoint_rates::ORDER_DETAIL)
            .await?;
        Ok(decode::<OrderDetailResult>(payload)?.order_info)
    }

    /// Cancel an order
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, symbol: &str, order_id: &str) -> RestResult<()> {
        let params = Params::new()
            .with("instrument_name", symbol)
            .with("order_id", order_id);
        self.dispatcher
            .post(paths::CANCEL_ORDER, params, endpoint_rates::CANCEL_ORDER)
            .await?;
        Ok(())
    }

    /// All open orders, optionally for one instrument (empty string for all)
    #[instrument(skip(self))]
    pub async fn open_orders(&self, symbol: &str) -> RestResult<Vec<Order>> {
        collect_pages(move |page| async move {
            let payload = self
                .dispatcher
                .post(paths::OPEN_ORDERS, page_params(symbol, page), endpoint_rates::OPEN_ORDERS)
                .await?;
            let result = decode::<OrderListResult>(payload)?;
            Ok(Page::new(result.count, result.order_list))
        })
        .await
    }

    /// All executed trades, optionally for one instrument (empty string for all)
    #[instrument(skip(self))]
    pub async fn my_trades(&self, symbol: &str) -> RestResult<Vec<Trade>> {
        collect_pages(move |page| async move {
            let payload = self
                .dispatcher
                .post(paths::TRADES, page_params(symbol, page), endpoint_rates::TRADES)
                .await?;
            let result = decode::<TradeListResult>(payload)?;
            Ok(Page::new(result.count, result.trade_list))
        })
        .await
    }
}
