//! Order book snapshots for state replay.
//!
//! When a session logs in it is sent the current book so its view starts
//! consistent. A [`BookSnapshot`] is a plain serializable copy of one
//! stack's two sides; nothing here persists anything.

use crate::orderbook::error::OrderBookError;
use crate::orderbook::order::{Contract, Order, OrderId, OrderType, Side, TradingAccount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single order as captured in a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    /// System-assigned order ID
    pub id: OrderId,
    /// Order type
    pub order_type: OrderType,
    /// Side the order rests on
    pub side: Side,
    /// Limit price
    pub price: Decimal,
    /// Remaining quantity
    pub quantity: Decimal,
    /// Quantity the order was created with
    pub original_quantity: Decimal,
    /// Last-update timestamp, millis since the Unix epoch
    pub last_update_time: u64,
    /// Client-assigned order ID
    pub cl_ord_id: String,
    /// Trading account
    pub account: TradingAccount,
}

impl From<&Order> for OrderSnapshot {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            order_type: order.order_type(),
            side: order.side(),
            price: order.price(),
            quantity: order.quantity(),
            original_quantity: order.original_quantity(),
            last_update_time: order.last_update_time(),
            cl_ord_id: order.cl_ord_id().to_string(),
            account: order.account().clone(),
        }
    }
}

impl OrderSnapshot {
    /// Rebuild the order this snapshot was captured from.
    pub fn to_order(&self, contract: &Contract) -> Order {
        Order::restore(
            self.id,
            self.order_type,
            contract.clone(),
            self.side,
            self.price,
            self.quantity,
            self.original_quantity,
            self.last_update_time,
            self.cl_ord_id.clone(),
            self.account.clone(),
        )
    }
}

/// A point-in-time copy of one instrument's book, both sides in priority
/// order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// The instrument symbol
    pub symbol: String,
    /// Bid side, best first
    pub bids: Vec<OrderSnapshot>,
    /// Ask side, best first
    pub asks: Vec<OrderSnapshot>,
}

impl BookSnapshot {
    /// Capture a snapshot from already-sorted sides.
    pub(crate) fn capture(symbol: &str, bids: &[Order], asks: &[Order]) -> Self {
        Self {
            symbol: symbol.to_string(),
            bids: bids.iter().map(OrderSnapshot::from).collect(),
            asks: asks.iter().map(OrderSnapshot::from).collect(),
        }
    }

    /// Rebuild the captured orders, bids then asks.
    pub fn to_orders(&self) -> Vec<Order> {
        let contract = Contract::new(self.symbol.clone());
        self.bids
            .iter()
            .chain(self.asks.iter())
            .map(|snap| snap.to_order(&contract))
            .collect()
    }

    /// Serialize the snapshot to a JSON string.
    ///
    /// # Errors
    /// Returns [`OrderBookError::SerializationError`] if encoding fails.
    pub fn to_json(&self) -> Result<String, OrderBookError> {
        serde_json::to_string(self).map_err(|e| OrderBookError::SerializationError {
            message: e.to_string(),
        })
    }

    /// Deserialize a snapshot from a JSON string.
    ///
    /// # Errors
    /// Returns [`OrderBookError::SerializationError`] if decoding fails.
    pub fn from_json(json: &str) -> Result<Self, OrderBookError> {
        serde_json::from_str(json).map_err(|e| OrderBookError::SerializationError {
            message: e.to_string(),
        })
    }
}
