//! The authoritative in-memory collection of trade records.
//!
//! A single `TradeStore` is shared across all request handling. Every
//! mutation takes the write guard, so create/update/delete apply atomically
//! and a numeric id can never be handed out twice; readers take the read
//! guard and always observe a consistent snapshot.

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::trade::{Side, Trade, TradeBody, TradeDetails};
use crate::domain::errors::StoreError;
use crate::domain::value_objects::price::Price;
use crate::domain::value_objects::quantity::Quantity;

struct StoreInner {
    /// Records in insertion order.
    trades: Vec<Trade>,
    /// Next numeric id to assign. Monotonic, never reused after deletes.
    next_id: u64,
}

impl StoreInner {
    fn new() -> Self {
        StoreInner {
            trades: Vec::new(),
            next_id: 1,
        }
    }

    fn create(&mut self, body: TradeBody) -> Trade {
        let id = self.next_id;
        self.next_id += 1;

        let trade = Trade {
            id,
            trade_id: body.trade_id.unwrap_or_else(generate_trade_id),
            asset_class: body.asset_class,
            counterparty: body.counterparty,
            instrument_id: body.instrument_id,
            instrument_name: body.instrument_name,
            trade_date_time: body.trade_date_time,
            trade_details: body.trade_details,
            trader: body.trader,
        };
        self.trades.push(trade.clone());
        trade
    }

    fn get_by_id(&self, id: u64) -> Result<Trade, StoreError> {
        self.trades
            .iter()
            .find(|trade| trade.id == id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    fn update(&mut self, id: u64, body: TradeBody) -> Result<Trade, StoreError> {
        let position = self
            .trades
            .iter()
            .position(|trade| trade.id == id)
            .ok_or(StoreError::NotFound { id })?;

        // Full replacement: the old record is removed and the replacement
        // appended, keyed by the path-supplied id, so the record moves to
        // the end of insertion order. The previous external trade id is
        // discarded along with the rest of the old contents.
        self.trades.remove(position);
        let trade = Trade {
            id,
            trade_id: body.trade_id.unwrap_or_else(generate_trade_id),
            asset_class: body.asset_class,
            counterparty: body.counterparty,
            instrument_id: body.instrument_id,
            instrument_name: body.instrument_name,
            trade_date_time: body.trade_date_time,
            trade_details: body.trade_details,
            trader: body.trader,
        };
        self.trades.push(trade.clone());
        Ok(trade)
    }

    fn delete(&mut self, id: u64) -> Result<(), StoreError> {
        let position = self
            .trades
            .iter()
            .position(|trade| trade.id == id)
            .ok_or(StoreError::NotFound { id })?;
        self.trades.remove(position);
        Ok(())
    }
}

fn generate_trade_id() -> String {
    Uuid::new_v4().to_string()
}

pub struct TradeStore {
    inner: RwLock<StoreInner>,
}

impl TradeStore {
    pub fn new() -> Self {
        TradeStore {
            inner: RwLock::new(StoreInner::new()),
        }
    }

    /// A store preloaded with the five-record demo dataset, so the service
    /// answers queries out of the box.
    pub fn with_seed_data() -> Self {
        let mut inner = StoreInner::new();
        for body in seed_bodies() {
            inner.create(body);
        }
        TradeStore {
            inner: RwLock::new(inner),
        }
    }

    /// Insert a new record. Assigns the next numeric id and, when the body
    /// carries no external trade id, generates a fresh random one. Never
    /// fails for validated input.
    pub async fn create(&self, body: TradeBody) -> Trade {
        self.inner.write().await.create(body)
    }

    pub async fn get_by_id(&self, id: u64) -> Result<Trade, StoreError> {
        self.inner.read().await.get_by_id(id)
    }

    /// Insertion-ordered snapshot of all current records. Callers get
    /// clones; nothing they do can touch stored state.
    pub async fn list(&self) -> Vec<Trade> {
        self.inner.read().await.trades.clone()
    }

    /// Replace the record with the given id wholesale. See `StoreInner::update`
    /// for the replacement semantics.
    pub async fn update(&self, id: u64, body: TradeBody) -> Result<Trade, StoreError> {
        self.inner.write().await.update(id, body)
    }

    pub async fn delete(&self, id: u64) -> Result<(), StoreError> {
        self.inner.write().await.delete(id)
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.trades.len()
    }
}

impl Default for TradeStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The demo dataset from the service's first deployment: four equity trades
/// and one FX trade.
fn seed_bodies() -> Vec<TradeBody> {
    vec![
        seed_trade(
            "Equity",
            "Goldman Sachs",
            "AAPL",
            "Apple Inc.",
            "2022-04-14T10:00:00",
            Side::Buy,
            155.0,
            100,
            "John Doe",
        ),
        seed_trade(
            "Equity",
            "Bank of America",
            "AMZN",
            "Amazon.com Inc.",
            "2022-04-16T13:15:00",
            Side::Buy,
            3200.0,
            10,
            "David Wilson",
        ),
        seed_trade(
            "Equity",
            "Morgan Stanley",
            "MSFT",
            "Microsoft Corporation",
            "2022-04-15T09:30:00",
            Side::Buy,
            250.0,
            200,
            "Alice Smith",
        ),
        seed_trade(
            "FX",
            "Citigroup",
            "EURUSD",
            "Euro/US Dollar",
            "2022-04-15T14:45:00",
            Side::Sell,
            1.22,
            5000,
            "Bob Johnson",
        ),
        seed_trade(
            "Equity",
            "Bank of America",
            "AMZN",
            "Amazon.com Inc.",
            "2022-04-16T13:15:00",
            Side::Buy,
            3200.0,
            10,
            "David Wilson",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn seed_trade(
    asset_class: &str,
    counterparty: &str,
    instrument_id: &str,
    instrument_name: &str,
    trade_date_time: &str,
    side: Side,
    price: f64,
    quantity: i64,
    trader: &str,
) -> TradeBody {
    TradeBody {
        trade_id: None,
        asset_class: Some(asset_class.to_string()),
        counterparty: Some(counterparty.to_string()),
        instrument_id: instrument_id.to_string(),
        instrument_name: instrument_name.to_string(),
        trade_date_time: trade_date_time
            .parse()
            .expect("seed date-time is well-formed"),
        trade_details: TradeDetails {
            buy_sell_indicator: side,
            price: Price::new(price).expect("seed price is non-negative"),
            quantity: Quantity::new(quantity).expect("seed quantity is non-negative"),
        },
        trader: trader.to_string(),
    }
}
