//! Priority ordering over orders on one side of the market.
//!
//! `Less` means strictly better priority: the order that would be hit
//! first if the market crossed, and the one shown on top of the stack.
//! Comparison runs through price, last-update time, quantity, then ID as
//! the final tie-break, so the ordering is a strict total order and a
//! sorted collection never silently drops a "duplicate".

use crate::orderbook::error::OrderBookError;
use crate::orderbook::order::{Order, Side};
use std::cmp::Ordering;

/// Compare two orders on the same market side.
///
/// Keys, in sequence:
/// 1. price — for bids a higher price is better, for asks a lower one;
/// 2. last-update time — earlier is better;
/// 3. remaining quantity — larger is better;
/// 4. ID — lower is better.
///
/// The quantity rule is a deliberate venue policy: at equal price and time
/// a larger order outranks a smaller one.
///
/// # Errors
/// Returns [`OrderBookError::InvalidSideComparison`] when the orders are on
/// different sides; priority is meaningless across the spread.
pub fn compare(x: &Order, y: &Order) -> Result<Ordering, OrderBookError> {
    if x.side() != y.side() {
        return Err(OrderBookError::InvalidSideComparison {
            lhs: x.side(),
            rhs: y.side(),
        });
    }
    Ok(priority_in_side(x, y))
}

/// Same-side priority comparison. Callers must have established that both
/// orders are on the same side; the sided stacks guarantee this by
/// construction.
pub(crate) fn priority_in_side(x: &Order, y: &Order) -> Ordering {
    debug_assert_eq!(x.side(), y.side());
    price_priority(x, y)
        .then_with(|| x.last_update_time().cmp(&y.last_update_time()))
        .then_with(|| y.quantity().cmp(&x.quantity()))
        .then_with(|| x.id().cmp(&y.id()))
}

fn price_priority(x: &Order, y: &Order) -> Ordering {
    match x.side() {
        // Bids: descending price
        Side::Bid => y.price().cmp(&x.price()),
        // Asks: ascending price
        Side::Ask => x.price().cmp(&y.price()),
    }
}
