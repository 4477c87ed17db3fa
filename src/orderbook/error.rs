//! Order book error types

use crate::orderbook::order::{OrderId, OrderType, Side};
use rust_decimal::Decimal;
use std::fmt;

/// Errors that can occur within the order book core.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum OrderBookError {
    /// Orders on different market sides were compared; the priority
    /// ordering is only defined within one side.
    InvalidSideComparison {
        /// Side of the left-hand order
        lhs: Side,
        /// Side of the right-hand order
        rhs: Side,
    },

    /// The matcher found the best bid above the best ask. Order intake
    /// validation is supposed to make this unreachable, so the matching
    /// pass is aborted rather than matched through.
    CrossedMarket {
        /// Best bid price at the time of the pass
        best_bid: Decimal,
        /// Best ask price at the time of the pass
        best_ask: Decimal,
    },

    /// An order comparing exactly equal to a resting order was added to a
    /// stack. The ID tie-break makes this impossible for distinct orders.
    DuplicateOrder {
        /// The ID of the rejected order
        order_id: OrderId,
    },

    /// A partial fill that is zero, negative, or not strictly smaller than
    /// the order's remaining quantity. A fill of the whole remaining
    /// quantity must be a full match (removal), never a partial one.
    InvalidFill {
        /// The order being filled
        order_id: OrderId,
        /// Remaining quantity before the fill
        quantity: Decimal,
        /// The offending fill quantity
        fill: Decimal,
    },

    /// Order not found in the book
    OrderNotFound(OrderId),

    /// Order intake only accepts limit orders
    UnsupportedOrderType(OrderType),

    /// A limit order arrived without a price
    MissingPrice {
        /// Client order ID of the rejected request
        cl_ord_id: String,
    },

    /// The order quantity was zero or negative
    InvalidQuantity(Decimal),

    /// Accepting the order would cross the opposite best price. Crossing
    /// orders are rejected at intake so the book never holds a crossed
    /// market.
    WouldCrossMarket {
        /// Side of the rejected order
        side: Side,
        /// Price of the rejected order
        price: Decimal,
        /// Best price on the opposite side
        opposite_price: Decimal,
    },

    /// The requesting session does not own the order it tried to cancel
    PermissionDenied {
        /// The order the session tried to cancel
        order_id: OrderId,
    },

    /// Error while serializing snapshot data
    SerializationError {
        /// Underlying error message
        message: String,
    },
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::InvalidSideComparison { lhs, rhs } => {
                write!(f, "invalid side comparison: {lhs} against {rhs}")
            }
            OrderBookError::CrossedMarket { best_bid, best_ask } => {
                write!(
                    f,
                    "crossed market when matching orders: best bid {best_bid} above best ask {best_ask}"
                )
            }
            OrderBookError::DuplicateOrder { order_id } => {
                write!(f, "unable to add order {order_id}: duplicate entry")
            }
            OrderBookError::InvalidFill {
                order_id,
                quantity,
                fill,
            } => {
                write!(
                    f,
                    "invalid partial fill of {fill} for order {order_id} with remaining quantity {quantity}"
                )
            }
            OrderBookError::OrderNotFound(order_id) => {
                write!(f, "order {order_id} could not be found")
            }
            OrderBookError::UnsupportedOrderType(order_type) => {
                write!(f, "order type {order_type} not supported")
            }
            OrderBookError::MissingPrice { cl_ord_id } => {
                write!(f, "limit order {cl_ord_id} must specify a price")
            }
            OrderBookError::InvalidQuantity(quantity) => {
                write!(f, "order quantity {quantity} must be positive")
            }
            OrderBookError::WouldCrossMarket {
                side,
                price,
                opposite_price,
            } => {
                write!(
                    f,
                    "{side} at {price} would cross the market: best opposite price is {opposite_price}"
                )
            }
            OrderBookError::PermissionDenied { order_id } => {
                write!(f, "unable to cancel order {order_id}: permission denied")
            }
            OrderBookError::SerializationError { message } => {
                write!(f, "serialization error: {message}")
            }
        }
    }
}

impl std::error::Error for OrderBookError {}
