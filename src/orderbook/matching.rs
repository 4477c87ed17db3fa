//! Contains the core matching logic for the order book.
//!
//! [`match_orders`] is a pure function from two sorted order sequences to
//! a list of fills. It holds no state and performs no I/O; the stack is
//! responsible for locking, applying the fills and publishing the event.

use crate::orderbook::error::OrderBookError;
use crate::orderbook::order::{Contract, Order, OrderId, Side, TradingAccount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a fill consumed the whole order or part of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    /// Part of the order's quantity was matched; the order keeps resting.
    Partial,
    /// The order's entire remaining quantity was matched.
    Full,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Partial => write!(f, "Partial"),
            MatchKind::Full => write!(f, "Full"),
        }
    }
}

/// A single fill produced by a matching pass.
///
/// Produced only by the matcher and immutable from then on; the boundary
/// layer translates each one into an execution report for the owning
/// session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderMatch {
    /// The matched order
    pub order_id: OrderId,
    /// The instrument the fill happened on
    pub contract: Contract,
    /// Side of the matched order
    pub side: Side,
    /// Trading account of the matched order
    pub account: TradingAccount,
    /// Client order ID of the matched order
    pub cl_ord_id: String,
    /// Price the fill executed at
    pub price: Decimal,
    /// Quantity the order was created with
    pub original_quantity: Decimal,
    /// Quantity matched by this fill
    pub matched_quantity: Decimal,
    /// Quantity left resting after this fill
    pub remaining_quantity: Decimal,
    /// Whether the order was fully or partially consumed
    pub kind: MatchKind,
}

impl OrderMatch {
    /// A fill consuming part of `order`'s remaining quantity.
    fn partial(order: &Order, matched: Decimal) -> Self {
        Self {
            order_id: order.id(),
            contract: order.contract().clone(),
            side: order.side(),
            account: order.account().clone(),
            cl_ord_id: order.cl_ord_id().to_string(),
            price: order.price(),
            original_quantity: order.original_quantity(),
            matched_quantity: matched,
            remaining_quantity: order.quantity() - matched,
            kind: MatchKind::Partial,
        }
    }

    /// A fill consuming all of `order`'s remaining quantity.
    fn full(order: &Order) -> Self {
        Self {
            order_id: order.id(),
            contract: order.contract().clone(),
            side: order.side(),
            account: order.account().clone(),
            cl_ord_id: order.cl_ord_id().to_string(),
            price: order.price(),
            original_quantity: order.original_quantity(),
            matched_quantity: order.quantity(),
            remaining_quantity: Decimal::ZERO,
            kind: MatchKind::Full,
        }
    }
}

/// Match the best price level of two sorted books.
///
/// Both inputs must already be sorted best-first (see
/// [`crate::orderbook::ordering`]). Only orders at the shared best price
/// participate: the maximal best-price prefix of each side is taken, the
/// matchable quantity is the smaller of the two prefix sums, and each
/// prefix is walked in priority order handing out full fills until the
/// remaining budget no longer covers an order, which then receives the
/// single partial fill of the pass. Orders priced worse than the best
/// level are never touched, even when quantity remains unmatched on the
/// other side — the next pass picks them up if the market still crosses.
///
/// Fills are returned bid side first, then ask side, priority order
/// preserved within each side.
///
/// # Errors
/// Returns [`OrderBookError::CrossedMarket`] when the best bid is above
/// the best ask. Intake validation rejects crossing orders, so hitting
/// this means the acceptance path is broken; the pass is aborted with no
/// fills rather than matching through inconsistent state.
pub fn match_orders(
    sorted_bids: &[Order],
    sorted_asks: &[Order],
) -> Result<Vec<OrderMatch>, OrderBookError> {
    let (Some(best_bid), Some(best_ask)) = (sorted_bids.first(), sorted_asks.first()) else {
        return Ok(Vec::new());
    };

    let best_bid_price = best_bid.price();
    let best_ask_price = best_ask.price();

    if best_bid_price > best_ask_price {
        return Err(OrderBookError::CrossedMarket {
            best_bid: best_bid_price,
            best_ask: best_ask_price,
        });
    }

    if best_bid_price < best_ask_price {
        // Spread remains, nothing to do
        return Ok(Vec::new());
    }

    let bid_level: Vec<&Order> = sorted_bids
        .iter()
        .take_while(|o| o.price() == best_bid_price)
        .collect();
    let ask_level: Vec<&Order> = sorted_asks
        .iter()
        .take_while(|o| o.price() == best_ask_price)
        .collect();

    let bid_quantity: Decimal = bid_level.iter().map(|o| o.quantity()).sum();
    let ask_quantity: Decimal = ask_level.iter().map(|o| o.quantity()).sum();
    let match_quantity = bid_quantity.min(ask_quantity);

    let mut fills = fill_level(&bid_level, match_quantity);
    fills.extend(fill_level(&ask_level, match_quantity));
    Ok(fills)
}

/// Hand `budget` out across one side's best-price level in priority order.
fn fill_level(level: &[&Order], mut budget: Decimal) -> Vec<OrderMatch> {
    let mut fills = Vec::new();
    for order in level {
        if budget <= Decimal::ZERO {
            break;
        }
        fills.push(if order.quantity() > budget {
            OrderMatch::partial(order, budget)
        } else {
            OrderMatch::full(order)
        });
        budget -= order.quantity();
    }
    fills
}
