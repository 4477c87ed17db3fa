//! The order entity and its identity types.
//!
//! An [`Order`] is the atomic unit being matched. Identity is the numeric
//! [`OrderId`] assigned once at intake: two orders are equal iff their IDs
//! are equal, and an ID is never reused. Quantity only ever decreases, via
//! [`Order::apply_partial_fill`], while explicit amendments go through
//! [`Order::update_price`] and [`Order::update_quantity`] and refresh the
//! last-update timestamp.

use crate::orderbook::error::OrderBookError;
use crate::utils::current_time_millis;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Unique numeric order identifier, assigned once by the mediator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Side of the market an order rests on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy side
    Bid,
    /// Sell side
    Ask,
}

impl Side {
    /// The other side of the market.
    pub fn opposite(&self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "Bid"),
            Side::Ask => write!(f, "Ask"),
        }
    }
}

/// Order type carried on the intake request. Only limit orders are
/// accepted; the enum exists so validation can reject the rest with a
/// structured reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Resting order with a limit price
    Limit,
    /// Take the best available price. Not supported by this venue.
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => write!(f, "Limit"),
            OrderType::Market => write!(f, "Market"),
        }
    }
}

/// The instrument an order is for. Currently just the symbol; keyed by
/// value in the repository's market map.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contract {
    symbol: String,
}

impl Contract {
    /// Create a contract for the given symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    /// The instrument symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// The trading account associated with an order. Clients are not required
/// to supply one, so the unset state is explicit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingAccount {
    name: Option<String>,
}

impl TradingAccount {
    /// The "not specified" account.
    pub fn none() -> Self {
        Self { name: None }
    }

    /// An account with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Whether an account was actually supplied.
    pub fn is_set(&self) -> bool {
        self.name.is_some()
    }

    /// The account name, or `None` when not specified.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for TradingAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "NotSpecified"),
        }
    }
}

/// An order resting in (or headed for) a stack.
///
/// Invariants maintained by the mutators:
/// * `quantity >= 0`
/// * `quantity <= original_quantity` once fills are applied
/// * `filled_quantity() == original_quantity - quantity`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    order_type: OrderType,
    contract: Contract,
    side: Side,
    price: Decimal,
    quantity: Decimal,
    original_quantity: Decimal,
    last_update_time: u64,
    cl_ord_id: String,
    account: TradingAccount,
}

impl Order {
    /// Create a new order stamped with the current time.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        order_type: OrderType,
        contract: Contract,
        side: Side,
        price: Decimal,
        quantity: Decimal,
        cl_ord_id: impl Into<String>,
        account: TradingAccount,
    ) -> Self {
        Self {
            id,
            order_type,
            contract,
            side,
            price,
            quantity,
            original_quantity: quantity,
            last_update_time: current_time_millis(),
            cl_ord_id: cl_ord_id.into(),
            account,
        }
    }

    /// Reconstruct an order from previously captured state, e.g. when
    /// replaying a book snapshot. All fields are taken as given.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: OrderId,
        order_type: OrderType,
        contract: Contract,
        side: Side,
        price: Decimal,
        quantity: Decimal,
        original_quantity: Decimal,
        last_update_time: u64,
        cl_ord_id: impl Into<String>,
        account: TradingAccount,
    ) -> Self {
        Self {
            id,
            order_type,
            contract,
            side,
            price,
            quantity,
            original_quantity,
            last_update_time,
            cl_ord_id: cl_ord_id.into(),
            account,
        }
    }

    /// The order's system-assigned ID.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// The order type.
    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// The instrument this order is for.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Which side of the market the order rests on.
    pub fn side(&self) -> Side {
        self.side
    }

    /// The limit price.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// The remaining (unfilled) quantity.
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// The quantity the order was created with.
    pub fn original_quantity(&self) -> Decimal {
        self.original_quantity
    }

    /// How much of the order has been filled so far.
    pub fn filled_quantity(&self) -> Decimal {
        self.original_quantity - self.quantity
    }

    /// When the order was last updated (created, repriced or resized), as
    /// milliseconds since the Unix epoch. Partial fills do not move this.
    pub fn last_update_time(&self) -> u64 {
        self.last_update_time
    }

    /// The client-assigned order ID.
    pub fn cl_ord_id(&self) -> &str {
        &self.cl_ord_id
    }

    /// The trading account associated with the order.
    pub fn account(&self) -> &TradingAccount {
        &self.account
    }

    /// Reduce the remaining quantity after a partial match.
    ///
    /// The fill must be positive and strictly smaller than the remaining
    /// quantity; filling the whole remainder is a full match, which removes
    /// the order instead. The last-update time is deliberately NOT
    /// refreshed: a partial fill does not cost the order its time priority.
    ///
    /// # Errors
    /// Returns [`OrderBookError::InvalidFill`] when the fill is out of range.
    pub fn apply_partial_fill(&mut self, filled: Decimal) -> Result<(), OrderBookError> {
        if filled <= Decimal::ZERO || filled >= self.quantity {
            return Err(OrderBookError::InvalidFill {
                order_id: self.id,
                quantity: self.quantity,
                fill: filled,
            });
        }
        self.quantity -= filled;
        Ok(())
    }

    /// Re-price the order. Refreshes the last-update time, so the order
    /// goes to the back of the time-priority queue at its new price.
    pub fn update_price(&mut self, new_price: Decimal) {
        self.price = new_price;
        self.last_update_time = current_time_millis();
    }

    /// Resize the order. The filled quantity so far is preserved, so the
    /// original quantity moves by the same delta. Refreshes the
    /// last-update time.
    ///
    /// # Errors
    /// Returns [`OrderBookError::InvalidQuantity`] when the new quantity is
    /// not positive.
    pub fn update_quantity(&mut self, new_quantity: Decimal) -> Result<(), OrderBookError> {
        if new_quantity <= Decimal::ZERO {
            return Err(OrderBookError::InvalidQuantity(new_quantity));
        }
        self.original_quantity += new_quantity - self.quantity;
        self.quantity = new_quantity;
        self.last_update_time = current_time_millis();
        Ok(())
    }
}

// Order identity is the ID, nothing else.
impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Order {}

impl Hash for Order {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}@{} {} (id {}, clOrdID {})",
            self.side, self.order_type, self.quantity, self.price, self.contract, self.id, self.cl_ord_id
        )
    }
}
