//! The repository owning every instrument's order stack.

use crate::orderbook::error::OrderBookError;
use crate::orderbook::events::MatchListener;
use crate::orderbook::order::{Contract, Order, OrderId, OrderType, Side, TradingAccount};
use crate::orderbook::snapshot::BookSnapshot;
use crate::orderbook::stack::OrderStack;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

/// Keeps an order stack per contract and fans operations out to the right
/// one.
///
/// Stacks are created lazily on the first order for an instrument and
/// live for the process lifetime. The market map is a concurrent map with
/// insert-if-absent semantics, so two sessions racing to trade a brand-new
/// instrument end up sharing one stack; per-instrument contention stays
/// isolated inside each stack's own locks.
///
/// Every stack is wired with the repository's match listener at creation,
/// which gives consumers a single stream of match events across all
/// instruments.
pub struct OrderRepository {
    market: DashMap<Contract, Arc<OrderStack>>,
    match_listener: Option<MatchListener>,
}

impl OrderRepository {
    /// An empty repository that publishes no match events.
    pub fn new() -> Self {
        Self {
            market: DashMap::new(),
            match_listener: None,
        }
    }

    /// An empty repository whose stacks publish match events to
    /// `listener`.
    pub fn with_match_listener(listener: MatchListener) -> Self {
        Self {
            market: DashMap::new(),
            match_listener: Some(listener),
        }
    }

    /// Create an order and insert it into its contract's stack, creating
    /// the stack if this is the first order for the instrument.
    ///
    /// # Errors
    /// Returns [`OrderBookError::DuplicateOrder`] if the stack already
    /// holds an order comparing equal.
    #[allow(clippy::too_many_arguments)]
    pub fn add_order(
        &self,
        order_id: OrderId,
        contract: Contract,
        order_type: OrderType,
        side: Side,
        price: Decimal,
        quantity: Decimal,
        cl_ord_id: &str,
        account: TradingAccount,
    ) -> Result<Order, OrderBookError> {
        let order = Order::new(
            order_id, order_type, contract, side, price, quantity, cl_ord_id, account,
        );
        let stack = self.stack_for(order.contract());
        stack.add_order(order.clone())?;
        Ok(order)
    }

    /// Look up an order anywhere in the market.
    ///
    /// A miss is a reported error: callers of `get_order` expect the order
    /// to exist, unlike [`OrderRepository::delete_order`], which treats a
    /// miss as idempotent cleanup.
    ///
    /// # Errors
    /// Returns [`OrderBookError::OrderNotFound`] when no stack holds the
    /// order.
    pub fn get_order(&self, order_id: OrderId) -> Result<Order, OrderBookError> {
        self.market
            .iter()
            .find_map(|entry| entry.value().get_order(order_id))
            .ok_or(OrderBookError::OrderNotFound(order_id))
    }

    /// Delete an order wherever it rests.
    ///
    /// Returns the deleted order, or `None` when nothing held it.
    pub fn delete_order(&self, order_id: OrderId) -> Option<Order> {
        self.market
            .iter()
            .find_map(|entry| entry.value().delete_order(order_id))
    }

    /// Best resting price for a contract and side, or `None` when the
    /// instrument has no stack or the side is empty.
    pub fn best_price(&self, contract: &Contract, side: Side) -> Option<Decimal> {
        self.market.get(contract)?.best_price(side)
    }

    /// Every resting order across all instruments, used to replay book
    /// state to a newly connected session.
    pub fn all_orders(&self) -> Vec<Order> {
        self.market
            .iter()
            .flat_map(|entry| entry.value().all_orders())
            .collect()
    }

    /// Run one matching pass for `contract`. Unknown instruments are a
    /// no-op: with no stack there is nothing to match.
    ///
    /// # Errors
    /// Propagates internal-consistency errors from the stack's pass.
    pub fn match_orders(&self, contract: &Contract) -> Result<(), OrderBookError> {
        match self.market.get(contract) {
            Some(stack) => stack.match_orders(),
            None => Ok(()),
        }
    }

    /// A snapshot of every instrument's book.
    pub fn snapshots(&self) -> Vec<BookSnapshot> {
        self.market
            .iter()
            .map(|entry| entry.value().snapshot())
            .collect()
    }

    /// Whether a stack exists for `contract`.
    pub fn has_stack(&self, contract: &Contract) -> bool {
        self.market.contains_key(contract)
    }

    /// Number of instruments with a stack.
    pub fn stack_count(&self) -> usize {
        self.market.len()
    }

    /// The stack for `contract`, created (and wired to the match
    /// listener) if absent.
    fn stack_for(&self, contract: &Contract) -> Arc<OrderStack> {
        self.market
            .entry(contract.clone())
            .or_insert_with(|| {
                info!("creating order stack for {contract}");
                let stack = match &self.match_listener {
                    Some(listener) => {
                        OrderStack::with_match_listener(contract.clone(), Arc::clone(listener))
                    }
                    None => OrderStack::new(contract.clone()),
                };
                Arc::new(stack)
            })
            .clone()
    }
}

impl Default for OrderRepository {
    fn default() -> Self {
        Self::new()
    }
}
