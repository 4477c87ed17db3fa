//! Prelude module that re-exports commonly used types and traits.
//!
//! Instead of importing each type individually, you can use:
//!
//! ```rust
//! use fixmatch_rs::prelude::*;
//! ```

// Core book types
pub use crate::orderbook::OrderBookError;
pub use crate::orderbook::repository::OrderRepository;
pub use crate::orderbook::stack::OrderStack;

// Order domain types
pub use crate::orderbook::order::{Contract, Order, OrderId, OrderType, Side, TradingAccount};

// Matching types
pub use crate::orderbook::matching::{MatchKind, OrderMatch, match_orders};

// Event and feed types
pub use crate::orderbook::events::{MatchEvent, MatchFeedStd, MatchFeedTokio, MatchListener};

// Boundary types
pub use crate::orderbook::mediator::{
    CancelRejectReason, ExecutionListener, OrderMediator, SessionId,
};

// Snapshot types
pub use crate::orderbook::snapshot::{BookSnapshot, OrderSnapshot};

// Utility functions
pub use crate::utils::current_time_millis;
