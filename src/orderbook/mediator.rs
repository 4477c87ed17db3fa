//! Session-facing order management.
//!
//! The mediator is the boundary between the wire-protocol layer and the
//! book: it validates intake requests, assigns order IDs, remembers which
//! session owns which order so cancellation can be authorized, triggers
//! matching after every accepted order, and routes each fill back to its
//! owning session through the execution listener.

use crate::orderbook::error::OrderBookError;
use crate::orderbook::events::MatchListener;
use crate::orderbook::matching::{MatchKind, OrderMatch};
use crate::orderbook::order::{Contract, Order, OrderId, OrderType, Side, TradingAccount};
use crate::orderbook::repository::OrderRepository;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info, trace};

/// Opaque identity of a wire-protocol session.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a session key, e.g. the FIX sender/target pair.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a cancel request was rejected, with the FIX CxlRejReason code the
/// boundary layer puts on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelRejectReason {
    /// The order does not exist (anymore)
    OrderNotFound,
    /// The requesting session does not own the order
    PermissionDenied,
}

impl CancelRejectReason {
    /// The numeric CxlRejReason value for this rejection.
    pub fn code(&self) -> u32 {
        match self {
            // UNKNOWN_ORDER
            CancelRejectReason::OrderNotFound => 1,
            // OTHER
            CancelRejectReason::PermissionDenied => 99,
        }
    }

    /// Map a cancel failure to its reject reason, or `None` for errors
    /// that are not cancel rejections.
    pub fn from_error(error: &OrderBookError) -> Option<Self> {
        match error {
            OrderBookError::OrderNotFound(_) => Some(CancelRejectReason::OrderNotFound),
            OrderBookError::PermissionDenied { .. } => Some(CancelRejectReason::PermissionDenied),
            _ => None,
        }
    }
}

/// Receives every fill together with the session that owns the filled
/// order; the boundary layer turns the pair into an execution report.
pub type ExecutionListener = Arc<dyn Fn(&OrderMatch, &SessionId) + Send + Sync>;

/// Mediator for everything sessions do with orders.
pub struct OrderMediator {
    repository: Arc<OrderRepository>,
    owners: Arc<DashMap<OrderId, SessionId>>,
    next_order_id: AtomicU64,
}

impl OrderMediator {
    /// Create a mediator whose fills are delivered to
    /// `execution_listener`.
    ///
    /// The mediator subscribes to the repository's match stream: for every
    /// fill it resolves the owning session, forgets ownership of fully
    /// matched orders, and invokes the listener.
    pub fn new(execution_listener: ExecutionListener) -> Self {
        let owners: Arc<DashMap<OrderId, SessionId>> = Arc::new(DashMap::new());

        let owners_in_listener = Arc::clone(&owners);
        let match_listener: MatchListener = Arc::new(move |event| {
            for fill in &event.fills {
                let Some(session) = owners_in_listener
                    .get(&fill.order_id)
                    .map(|entry| entry.value().clone())
                else {
                    error!("no owning session recorded for matched order {}", fill.order_id);
                    continue;
                };
                if fill.kind == MatchKind::Full {
                    owners_in_listener.remove(&fill.order_id);
                }
                execution_listener(fill, &session);
            }
        });

        Self {
            repository: Arc::new(OrderRepository::with_match_listener(match_listener)),
            owners,
            next_order_id: AtomicU64::new(0),
        }
    }

    /// The repository behind this mediator, for snapshot queries.
    pub fn repository(&self) -> &Arc<OrderRepository> {
        &self.repository
    }

    /// Validate and accept a new order for `session`, then run a matching
    /// pass on the instrument.
    ///
    /// Validation, in order: only limit orders are supported; a limit
    /// order must carry a price; the quantity must be positive; the price
    /// must not cross the opposite best — a crossing order is rejected
    /// here precisely so the matcher never sees a crossed book.
    ///
    /// The matching pass runs after the insert has completed and its lock
    /// has been released, so no lock is ever re-entered on this call path.
    ///
    /// # Errors
    /// Returns the structured rejection for validation failures, or
    /// propagates an internal-consistency error from the matching pass.
    #[allow(clippy::too_many_arguments)]
    pub fn add_order(
        &self,
        session: &SessionId,
        order_type: OrderType,
        symbol: &str,
        side: Side,
        cl_ord_id: &str,
        account: TradingAccount,
        quantity: Decimal,
        price: Option<Decimal>,
    ) -> Result<Order, OrderBookError> {
        // A fuller system would look the contract up in a contract store
        let contract = Contract::new(symbol);

        let order_price = match order_type {
            OrderType::Limit => price.ok_or_else(|| OrderBookError::MissingPrice {
                cl_ord_id: cl_ord_id.to_string(),
            })?,
            other => return Err(OrderBookError::UnsupportedOrderType(other)),
        };

        if quantity <= Decimal::ZERO {
            return Err(OrderBookError::InvalidQuantity(quantity));
        }

        if let Some(opposite_price) = self.crossed_best_price(&contract, side, order_price) {
            return Err(OrderBookError::WouldCrossMarket {
                side,
                price: order_price,
                opposite_price,
            });
        }

        let order = self.repository.add_order(
            self.create_order_id(),
            contract.clone(),
            order_type,
            side,
            order_price,
            quantity,
            cl_ord_id,
            account,
        )?;
        self.owners.insert(order.id(), session.clone());
        info!("session {session} added order {order}");

        // The new order may have enabled a match
        self.repository.match_orders(&contract).inspect_err(|e| {
            error!("matching pass after adding order {} failed: {e}", order.id());
        })?;

        Ok(order)
    }

    /// Look up an order by ID.
    ///
    /// # Errors
    /// Returns [`OrderBookError::OrderNotFound`] when it does not exist.
    pub fn get_order(&self, order_id: OrderId) -> Result<Order, OrderBookError> {
        self.repository.get_order(order_id)
    }

    /// Cancel an order on behalf of `session`.
    ///
    /// The session must be the one that placed the order.
    ///
    /// # Errors
    /// Returns [`OrderBookError::PermissionDenied`] when another session
    /// owns the order, and [`OrderBookError::OrderNotFound`] when the
    /// order is unknown or already gone. [`CancelRejectReason::from_error`]
    /// maps both onto wire reject codes.
    pub fn cancel_order(
        &self,
        order_id: OrderId,
        session: &SessionId,
    ) -> Result<Order, OrderBookError> {
        match self.owners.get(&order_id).map(|e| e.value().clone()) {
            None => Err(OrderBookError::OrderNotFound(order_id)),
            Some(owner) if owner != *session => {
                Err(OrderBookError::PermissionDenied { order_id })
            }
            Some(_) => {
                let cancelled = self
                    .delete_order(order_id)
                    .ok_or(OrderBookError::OrderNotFound(order_id))?;
                info!("session {session} cancelled order {order_id}");
                Ok(cancelled)
            }
        }
    }

    /// Delete an order without an ownership check.
    ///
    /// Returns the deleted order, or `None` when it did not exist. Use
    /// [`OrderMediator::cancel_order`] when the request comes from a
    /// session.
    pub fn delete_order(&self, order_id: OrderId) -> Option<Order> {
        let deleted = self.repository.delete_order(order_id);
        if deleted.is_some() {
            self.owners.remove(&order_id);
        }
        deleted
    }

    /// Delete every order owned by `session`, e.g. when it logs out.
    pub fn delete_all_orders(&self, session: &SessionId) {
        let session_orders: Vec<OrderId> = self
            .owners
            .iter()
            .filter(|entry| entry.value() == session)
            .map(|entry| *entry.key())
            .collect();
        trace!(
            "deleting {} orders for session {session}",
            session_orders.len()
        );
        for order_id in session_orders {
            self.delete_order(order_id);
        }
    }

    /// Every resting order in the system, for login replay.
    pub fn all_orders(&self) -> Vec<Order> {
        self.repository.all_orders()
    }

    /// Run a matching pass for `symbol`.
    ///
    /// # Errors
    /// Propagates internal-consistency errors from the pass.
    pub fn match_orders(&self, symbol: &str) -> Result<(), OrderBookError> {
        self.repository.match_orders(&Contract::new(symbol))
    }

    /// Would an order at `price` on `side` cross the opposite best?
    /// Returns the crossed opposite price when it would. Meeting the
    /// opposite best exactly is not a cross — that is a match.
    fn crossed_best_price(
        &self,
        contract: &Contract,
        side: Side,
        price: Decimal,
    ) -> Option<Decimal> {
        let opposite_price = self.repository.best_price(contract, side.opposite())?;
        let crosses = match side {
            Side::Bid => price > opposite_price,
            Side::Ask => price < opposite_price,
        };
        crosses.then_some(opposite_price)
    }

    fn create_order_id(&self) -> OrderId {
        OrderId(self.next_order_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
