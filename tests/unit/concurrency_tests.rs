use fixmatch_rs::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::thread;

/// A limit order with a pinned timestamp so priority does not depend on
/// which thread won the race to insert it.
fn pinned_order(id: u64, symbol: &str, side: Side, quantity: i64, price: i64) -> Order {
    let quantity = Decimal::from(quantity);
    Order::restore(
        OrderId(id),
        OrderType::Limit,
        Contract::new(symbol),
        side,
        Decimal::from(price),
        quantity,
        quantity,
        1_700_000_000_000,
        format!("cl-{id}"),
        TradingAccount::none(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrent_adds_match_like_sequential_adds() {
        let batch_a: Vec<Order> = vec![
            pinned_order(1, "GOLD", Side::Bid, 10, 10),
            pinned_order(2, "GOLD", Side::Bid, 10, 10),
            pinned_order(3, "GOLD", Side::Bid, 5, 9),
        ];
        let batch_b: Vec<Order> = vec![
            pinned_order(4, "GOLD", Side::Ask, 40, 10),
            pinned_order(5, "GOLD", Side::Ask, 5, 12),
        ];

        // Sequential baseline
        let baseline = {
            let stack = OrderStack::new(Contract::new("GOLD"));
            for order in batch_a.iter().chain(batch_b.iter()) {
                stack.add_order(order.clone()).unwrap();
            }
            let bids: Vec<Order> = stack
                .all_orders()
                .into_iter()
                .filter(|o| o.side() == Side::Bid)
                .collect();
            let asks: Vec<Order> = stack
                .all_orders()
                .into_iter()
                .filter(|o| o.side() == Side::Ask)
                .collect();
            match_orders(&bids, &asks).unwrap()
        };
        assert!(!baseline.is_empty());

        // The same two batches inserted from racing threads
        for _ in 0..20 {
            let events: Arc<parking_lot::Mutex<Vec<MatchEvent>>> =
                Arc::new(parking_lot::Mutex::new(Vec::new()));
            let sink = Arc::clone(&events);
            let listener: MatchListener = Arc::new(move |event| sink.lock().push(event.clone()));
            let stack = Arc::new(OrderStack::with_match_listener(
                Contract::new("GOLD"),
                listener,
            ));

            let handles: Vec<_> = [batch_a.clone(), batch_b.clone()]
                .into_iter()
                .map(|batch| {
                    let stack = Arc::clone(&stack);
                    thread::spawn(move || {
                        for order in batch {
                            stack.add_order(order).unwrap();
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            stack.match_orders().unwrap();

            let events = events.lock();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].fills, baseline);
        }
    }

    #[test]
    fn test_no_orders_lost_under_contention() {
        let stack = Arc::new(OrderStack::new(Contract::new("GOLD")));
        let threads = 8;
        let per_thread = 50;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let stack = Arc::clone(&stack);
                thread::spawn(move || {
                    for i in 0..per_thread {
                        let id = (t * per_thread + i + 1) as u64;
                        let side = if id % 2 == 0 { Side::Bid } else { Side::Ask };
                        // Keep the book uncrossed: bids at/below 10, asks above
                        let price = if side == Side::Bid { 10 - (id % 3) as i64 } else { 11 + (id % 3) as i64 };
                        stack
                            .add_order(pinned_order(id, "GOLD", side, 1 + (id % 7) as i64, price))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(stack.order_count(), threads * per_thread);

        // Each side must still be perfectly sorted best-first
        for side in [Side::Bid, Side::Ask] {
            let orders: Vec<Order> = stack
                .all_orders()
                .into_iter()
                .filter(|o| o.side() == side)
                .collect();
            for pair in orders.windows(2) {
                let ordering =
                    fixmatch_rs::orderbook::ordering::compare(&pair[0], &pair[1]).unwrap();
                assert_ne!(ordering, std::cmp::Ordering::Greater);
            }
        }
    }

    #[test]
    fn test_instruments_do_not_contend() {
        let repo = Arc::new(OrderRepository::new());
        let symbols = ["GOLD", "SILVER", "COPPER", "ZINC"];

        let handles: Vec<_> = symbols
            .into_iter()
            .enumerate()
            .map(|(t, symbol)| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    for i in 0..25u64 {
                        let id = (t as u64) * 1_000 + i + 1;
                        repo.add_order(
                            OrderId(id),
                            Contract::new(symbol),
                            OrderType::Limit,
                            Side::Bid,
                            Decimal::from(10),
                            Decimal::from(5),
                            &format!("cl-{id}"),
                            TradingAccount::none(),
                        )
                        .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(repo.stack_count(), symbols.len());
        assert_eq!(repo.all_orders().len(), symbols.len() * 25);
    }

    #[test]
    fn test_concurrent_sessions_through_the_mediator() {
        let listener: ExecutionListener = Arc::new(|_, _| {});
        let mediator = Arc::new(OrderMediator::new(listener));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let mediator = Arc::clone(&mediator);
                thread::spawn(move || {
                    let session = SessionId::new(format!("session-{t}"));
                    for i in 0..25 {
                        mediator
                            .add_order(
                                &session,
                                OrderType::Limit,
                                "GOLD",
                                Side::Bid,
                                &format!("cl-{t}-{i}"),
                                TradingAccount::none(),
                                Decimal::from(5),
                                Some(Decimal::from(10 - t)),
                            )
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(mediator.all_orders().len(), 100);

        // One session logs out; only its orders disappear
        mediator.delete_all_orders(&SessionId::new("session-0"));
        assert_eq!(mediator.all_orders().len(), 75);
    }
}
