use fixmatch_rs::prelude::*;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::Arc;

fn add_limit(repo: &OrderRepository, id: u64, symbol: &str, side: Side, quantity: i64, price: i64) {
    repo.add_order(
        OrderId(id),
        Contract::new(symbol),
        OrderType::Limit,
        side,
        Decimal::from(price),
        Decimal::from(quantity),
        &format!("cl-{id}"),
        TradingAccount::none(),
    )
    .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_feed_delivers_match_events() {
        let mut feed = MatchFeedStd::new();
        let received: Arc<Mutex<Vec<MatchEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let handle = feed.start_processor(move |event| sink.lock().push(event));

        let repo = OrderRepository::with_match_listener(feed.listener());
        add_limit(&repo, 1, "GOLD", Side::Bid, 10, 10);
        add_limit(&repo, 2, "GOLD", Side::Ask, 10, 10);
        repo.match_orders(&Contract::new("GOLD")).unwrap();

        // Dropping every sender ends the processor once the queue drains
        drop(repo);
        drop(feed);
        handle.join().unwrap();

        let received = received.lock();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].symbol, "GOLD");
        assert_eq!(received[0].fills.len(), 2);
        assert!(received[0]
            .fills
            .iter()
            .all(|f| f.matched_quantity == Decimal::from(10)));
    }

    #[test]
    fn test_std_feed_gets_one_event_per_pass() {
        let mut feed = MatchFeedStd::new();
        let received: Arc<Mutex<Vec<MatchEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let handle = feed.start_processor(move |event| sink.lock().push(event));

        let repo = OrderRepository::with_match_listener(feed.listener());
        let gold = Contract::new("GOLD");

        // Two passes with fills, one without
        add_limit(&repo, 1, "GOLD", Side::Bid, 10, 10);
        add_limit(&repo, 2, "GOLD", Side::Ask, 5, 10);
        repo.match_orders(&gold).unwrap();
        repo.match_orders(&gold).unwrap();
        add_limit(&repo, 3, "GOLD", Side::Ask, 5, 10);
        repo.match_orders(&gold).unwrap();

        drop(repo);
        drop(feed);
        handle.join().unwrap();

        let received = received.lock();
        assert_eq!(received.len(), 2);
        assert!(received.iter().all(|e| !e.fills.is_empty()));
    }

    #[tokio::test]
    async fn test_tokio_feed_delivers_match_events() {
        let mut feed = MatchFeedTokio::new();
        let received: Arc<Mutex<Vec<MatchEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let handle = feed.start_processor(move |event| sink.lock().push(event));

        let repo = OrderRepository::with_match_listener(feed.listener());
        add_limit(&repo, 1, "SILVER", Side::Bid, 20, 7);
        add_limit(&repo, 2, "SILVER", Side::Ask, 20, 7);
        repo.match_orders(&Contract::new("SILVER")).unwrap();

        drop(repo);
        drop(feed);
        handle.await.unwrap();

        let received = received.lock();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].symbol, "SILVER");
    }
}
