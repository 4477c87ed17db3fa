//! Per-instrument order stack: two sorted, independently locked sides.

use crate::orderbook::error::OrderBookError;
use crate::orderbook::events::{MatchEvent, MatchListener};
use crate::orderbook::matching::{self, MatchKind, OrderMatch};
use crate::orderbook::order::{Contract, Order, OrderId, Side};
use crate::orderbook::ordering;
use crate::orderbook::snapshot::BookSnapshot;
use crossbeam::atomic::AtomicCell;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::{info, trace};

/// One instrument's order stack.
///
/// Each side is a best-first sorted collection behind its own
/// reader/writer lock, so reads (best price, snapshots) on one side never
/// contend with writes on the other. [`OrderStack::match_orders`] is the
/// only operation taking both write locks; every dual-lock acquisition in
/// this module goes bids first, then asks, so lock ordering is globally
/// consistent and cannot deadlock.
///
/// Nothing here re-enters a lock: adding an order returns before matching
/// is triggered, which is what lets the sides use plain non-reentrant
/// locks.
pub struct OrderStack {
    contract: Contract,

    /// Bid side, sorted best-first under the priority ordering
    bids: RwLock<Vec<Order>>,

    /// Ask side, sorted best-first under the priority ordering
    asks: RwLock<Vec<Order>>,

    /// The price of the last non-empty matching pass
    last_match_price: AtomicCell<Option<Decimal>>,

    /// Receives one event per non-empty matching pass
    pub match_listener: Option<MatchListener>,
}

impl OrderStack {
    /// Create an empty stack for `contract` with no listener.
    pub fn new(contract: Contract) -> Self {
        Self {
            contract,
            bids: RwLock::new(Vec::new()),
            asks: RwLock::new(Vec::new()),
            last_match_price: AtomicCell::new(None),
            match_listener: None,
        }
    }

    /// Create an empty stack that publishes match events to `listener`.
    pub fn with_match_listener(contract: Contract, listener: MatchListener) -> Self {
        Self {
            match_listener: Some(listener),
            ..Self::new(contract)
        }
    }

    /// The instrument this stack holds orders for.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Insert an order into its side, keeping the side sorted best-first.
    ///
    /// # Errors
    /// Returns [`OrderBookError::DuplicateOrder`] if an order comparing
    /// exactly equal is already resting. Unique IDs make that impossible
    /// for distinct orders; the sorted collection is the enforcement
    /// point.
    pub fn add_order(&self, order: Order) -> Result<(), OrderBookError> {
        let mut side = self.sided_stack(order.side()).write();
        match side.binary_search_by(|resting| ordering::priority_in_side(resting, &order)) {
            Ok(_) => Err(OrderBookError::DuplicateOrder {
                order_id: order.id(),
            }),
            Err(pos) => {
                trace!("adding order {order} at stack position {pos}");
                side.insert(pos, order);
                Ok(())
            }
        }
    }

    /// Remove the order with the given ID.
    ///
    /// Returns the removed order, or `None` when no such order rests in
    /// this stack — deleting an already-gone order is a valid no-op.
    pub fn delete_order(&self, order_id: OrderId) -> Option<Order> {
        for side in [Side::Bid, Side::Ask] {
            let mut orders = self.sided_stack(side).write();
            if let Some(pos) = orders.iter().position(|o| o.id() == order_id) {
                let removed = orders.remove(pos);
                trace!("deleted order {removed}");
                return Some(removed);
            }
        }
        None
    }

    /// The best resting price on `side`, or `None` when the side is empty.
    pub fn best_price(&self, side: Side) -> Option<Decimal> {
        self.sided_stack(side).read().first().map(Order::price)
    }

    /// Find an order by ID on either side.
    ///
    /// Linear scan; the stack keeps no ID index.
    pub fn get_order(&self, order_id: OrderId) -> Option<Order> {
        for side in [Side::Bid, Side::Ask] {
            if let Some(order) = self
                .sided_stack(side)
                .read()
                .iter()
                .find(|o| o.id() == order_id)
            {
                return Some(order.clone());
            }
        }
        None
    }

    /// All resting orders, bids then asks, each side in priority order.
    pub fn all_orders(&self) -> Vec<Order> {
        let bids = self.bids.read();
        let asks = self.asks.read();
        bids.iter().chain(asks.iter()).cloned().collect()
    }

    /// Number of resting orders across both sides.
    pub fn order_count(&self) -> usize {
        self.bids.read().len() + self.asks.read().len()
    }

    /// The price of the last non-empty matching pass on this stack.
    pub fn last_match_price(&self) -> Option<Decimal> {
        self.last_match_price.load()
    }

    /// A point-in-time copy of both sides.
    pub fn snapshot(&self) -> BookSnapshot {
        let bids = self.bids.read();
        let asks = self.asks.read();
        BookSnapshot::capture(self.contract.symbol(), &bids, &asks)
    }

    /// Run one matching pass over the current book.
    ///
    /// Takes both write locks (bids, then asks), computes the fills for
    /// the best crossing price level, applies them — full matches are
    /// removed, partial matches have their quantity reduced in place and
    /// keep their book position — and publishes a single [`MatchEvent`]
    /// if any fill was produced. A pass clears at most one price level;
    /// callers re-invoke after every mutation that could enable a match.
    ///
    /// # Errors
    /// Propagates [`OrderBookError::CrossedMarket`] from the matcher with
    /// the book untouched, and [`OrderBookError::InvalidFill`] if a
    /// computed fill violates the order's quantity invariant; both mean
    /// the book reached a state the intake path is supposed to prevent.
    pub fn match_orders(&self) -> Result<(), OrderBookError> {
        let fills = {
            let mut bids = self.bids.write();
            let mut asks = self.asks.write();

            let fills = matching::match_orders(&bids, &asks)?;
            if fills.is_empty() {
                return Ok(());
            }

            for fill in &fills {
                let side = match fill.side {
                    Side::Bid => &mut *bids,
                    Side::Ask => &mut *asks,
                };
                Self::apply_fill(side, fill)?;
            }

            self.last_match_price.store(Some(fills[0].price));
            fills
        };

        info!(
            "matched {} fills on {} at {}",
            fills.len(),
            self.contract,
            fills[0].price
        );

        // Locks are released before the listener runs, so a consumer may
        // call straight back into the stack.
        if let Some(listener) = &self.match_listener {
            listener(&MatchEvent::new(self.contract.symbol(), fills));
        }
        Ok(())
    }

    /// Delete fully matched orders, reduce quantity for partial matches.
    fn apply_fill(orders: &mut Vec<Order>, fill: &OrderMatch) -> Result<(), OrderBookError> {
        let Some(pos) = orders.iter().position(|o| o.id() == fill.order_id) else {
            return Ok(());
        };
        match fill.kind {
            MatchKind::Full => {
                orders.remove(pos);
            }
            MatchKind::Partial => orders[pos].apply_partial_fill(fill.matched_quantity)?,
        }
        Ok(())
    }

    fn sided_stack(&self, side: Side) -> &RwLock<Vec<Order>> {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }
}
