//! Match events and centralized event routing.
//!
//! Every non-empty matching pass produces exactly one [`MatchEvent`]
//! carrying all fills from that pass. Stacks push events to an optional
//! [`MatchListener`]; the repository hands each stack the same listener so
//! a single system-wide stream exists. [`MatchFeedStd`] and
//! [`MatchFeedTokio`] put a channel behind that listener for consumers
//! that want to process events off the matching thread.

use crate::orderbook::matching::OrderMatch;
use crate::utils::current_time_millis;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// All fills from one matching pass on one instrument.
#[derive(Clone, Debug, Serialize)]
pub struct MatchEvent {
    /// Unique ID for this event
    pub event_id: Uuid,
    /// The instrument symbol the pass ran on
    pub symbol: String,
    /// The fills, bid side first, priority order preserved per side
    pub fills: Vec<OrderMatch>,
    /// Unix timestamp in milliseconds when the pass completed
    pub timestamp: u64,
}

impl MatchEvent {
    /// Create an event for a completed pass. `fills` must be non-empty;
    /// passes without fills publish nothing.
    pub fn new(symbol: impl Into<String>, fills: Vec<OrderMatch>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            symbol: symbol.into(),
            fills,
            timestamp: current_time_millis(),
        }
    }
}

/// Match listener specification using Arc for shared ownership.
pub type MatchListener = Arc<dyn Fn(&MatchEvent) + Send + Sync>;

/// Match-event feed backed by a standard library mpsc channel.
///
/// The listener side is cheap to clone into any number of stacks; the
/// receiving side is drained by a processor thread started with
/// [`MatchFeedStd::start_processor`].
pub struct MatchFeedStd {
    sender: std::sync::mpsc::Sender<MatchEvent>,
    receiver: Option<std::sync::mpsc::Receiver<MatchEvent>>,
}

impl MatchFeedStd {
    /// Create a feed with an unbounded std channel.
    pub fn new() -> Self {
        let (sender, receiver) = std::sync::mpsc::channel();
        Self {
            sender,
            receiver: Some(receiver),
        }
    }

    /// A listener that forwards every event into this feed's channel.
    pub fn listener(&self) -> MatchListener {
        let sender = self.sender.clone();
        Arc::new(move |event: &MatchEvent| {
            if let Err(e) = sender.send(event.clone()) {
                error!("failed to forward match event for {}: {}", event.symbol, e);
            }
        })
    }

    /// Start the event processor in a separate thread, invoking `handler`
    /// for every event. The processor stops when all listeners are gone.
    pub fn start_processor<F>(&mut self, handler: F) -> std::thread::JoinHandle<()>
    where
        F: Fn(MatchEvent) + Send + 'static,
    {
        let receiver = self
            .receiver
            .take()
            .expect("Match processor already started");

        std::thread::spawn(move || {
            info!("Match processor started");

            while let Ok(event) = receiver.recv() {
                handler(event);
            }

            info!("Match processor stopped");
        })
    }
}

impl Default for MatchFeedStd {
    fn default() -> Self {
        Self::new()
    }
}

/// Match-event feed backed by a Tokio unbounded mpsc channel.
pub struct MatchFeedTokio {
    sender: tokio::sync::mpsc::UnboundedSender<MatchEvent>,
    receiver: Option<tokio::sync::mpsc::UnboundedReceiver<MatchEvent>>,
}

impl MatchFeedTokio {
    /// Create a feed with a Tokio unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Some(receiver),
        }
    }

    /// A listener that forwards every event into this feed's channel.
    pub fn listener(&self) -> MatchListener {
        let sender = self.sender.clone();
        Arc::new(move |event: &MatchEvent| {
            if let Err(e) = sender.send(event.clone()) {
                error!("failed to forward match event for {}: {}", event.symbol, e);
            }
        })
    }

    /// Start the event processor as an async task, invoking `handler` for
    /// every event.
    ///
    /// Returns a JoinHandle for the spawned task.
    pub fn start_processor<F>(&mut self, handler: F) -> tokio::task::JoinHandle<()>
    where
        F: Fn(MatchEvent) + Send + 'static,
    {
        let mut receiver = self
            .receiver
            .take()
            .expect("Match processor already started");

        tokio::spawn(async move {
            info!("Match processor started (Tokio)");

            while let Some(event) = receiver.recv().await {
                handler(event);
            }

            info!("Match processor stopped (Tokio)");
        })
    }
}

impl Default for MatchFeedTokio {
    fn default() -> Self {
        Self::new()
    }
}
