//! # Mock FIX Trading Venue Core
//!
//! The matching core of a mock FIX trading venue: per-instrument order books, a price/time
//! priority matching engine producing partial and full fills, and a session-facing mediator
//! that validates intake, authorizes cancellation and routes fills back to the owning session.
//!
//! ## Key Features
//!
//! - **Priority ordering**: a strict total order over each side of the market — price, then
//!   last-update time, then remaining quantity (larger first), then order ID — so sorted
//!   stacks are deterministic and never drop entries as accidental duplicates.
//!
//! - **Pure matching engine**: matching is a stateless function from two sorted books to a
//!   list of fills. A pass clears the single best crossing price level, fully absorbing the
//!   smaller side and leaving at most one partially filled order on the larger side; orders
//!   priced worse than the level are never touched in that pass.
//!
//! - **Crossed-market rejection at intake**: an order that would cross the opposite best
//!   price is rejected before it reaches a stack, which is what entitles the matcher to
//!   treat an actually crossed book as a fatal internal-consistency error.
//!
//! - **Per-instrument, per-side locking**: each side of each book sits behind its own
//!   reader/writer lock. Different instruments never contend; within one instrument, reads
//!   (best price, snapshots) share a lock while mutations take it exclusively, and the
//!   matching pass is the only dual-lock operation, always acquiring bids before asks.
//!
//! - **Match events**: every non-empty matching pass publishes exactly one event carrying
//!   all fills of the pass. Events can be consumed synchronously through a listener or
//!   fanned into a channel-backed feed (std thread or Tokio task) for off-thread
//!   processing.
//!
//! - **Session bookkeeping at the boundary**: the mediator assigns order IDs, records which
//!   session owns which order, rejects cancels from non-owners with wire-ready reject
//!   codes, and clears a session's orders on logout.
//!
//! ## Scope
//!
//! This crate is the venue core only. FIX message encoding/decoding, acceptor lifecycle,
//! heartbeats and the command-queue plumbing that feeds the core belong to the protocol
//! layer driving it. Only limit orders are supported, matching never crosses instruments,
//! and book state is not persisted.
//!
//! ## Example
//!
//! ```rust
//! use fixmatch_rs::prelude::*;
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let listener: ExecutionListener = Arc::new(|fill, session| {
//!     println!("fill {} x {} for session {session}", fill.matched_quantity, fill.order_id);
//! });
//! let mediator = OrderMediator::new(listener);
//!
//! let buyer = SessionId::new("FIX.4.2:BUYER->VENUE");
//! let seller = SessionId::new("FIX.4.2:SELLER->VENUE");
//!
//! mediator
//!     .add_order(
//!         &buyer,
//!         OrderType::Limit,
//!         "GOLD",
//!         Side::Bid,
//!         "ord-1",
//!         TradingAccount::none(),
//!         Decimal::from(20),
//!         Some(Decimal::from(10)),
//!     )
//!     .unwrap();
//!
//! // Crosses the resting bid at 10, so the pass after this add fills both orders.
//! mediator
//!     .add_order(
//!         &seller,
//!         OrderType::Limit,
//!         "GOLD",
//!         Side::Ask,
//!         "ord-2",
//!         TradingAccount::none(),
//!         Decimal::from(20),
//!         Some(Decimal::from(10)),
//!     )
//!     .unwrap();
//! ```

pub mod orderbook;

pub mod prelude;
mod utils;

pub use orderbook::error::OrderBookError;
pub use orderbook::events::{MatchEvent, MatchFeedStd, MatchFeedTokio, MatchListener};
pub use orderbook::matching::{MatchKind, OrderMatch, match_orders};
pub use orderbook::mediator::{CancelRejectReason, ExecutionListener, OrderMediator, SessionId};
pub use orderbook::order::{Contract, Order, OrderId, OrderType, Side, TradingAccount};
pub use orderbook::repository::OrderRepository;
pub use orderbook::snapshot::{BookSnapshot, OrderSnapshot};
pub use orderbook::stack::OrderStack;
pub use utils::current_time_millis;
