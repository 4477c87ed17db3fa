//! Order book core: the order domain, priority ordering, matching, the
//! per-instrument stacks, the repository that owns them, and the
//! session-facing mediator.

pub mod error;
/// Match events and centralized event routing.
pub mod events;
pub mod matching;
/// Session-facing order management: validation, ownership, fill routing.
pub mod mediator;
/// The order entity and its identity types.
pub mod order;
pub mod ordering;
/// The contract → stack market map.
pub mod repository;
/// Book snapshots for state replay.
pub mod snapshot;
pub mod stack;
mod tests;

pub use error::OrderBookError;
pub use events::{MatchEvent, MatchFeedStd, MatchFeedTokio, MatchListener};
pub use matching::{MatchKind, OrderMatch, match_orders};
pub use mediator::{CancelRejectReason, ExecutionListener, OrderMediator, SessionId};
pub use order::{Contract, Order, OrderId, OrderType, Side, TradingAccount};
pub use repository::OrderRepository;
pub use snapshot::{BookSnapshot, OrderSnapshot};
pub use stack::OrderStack;
