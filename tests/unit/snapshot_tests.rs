use fixmatch_rs::prelude::*;
use rust_decimal::Decimal;

fn add_limit(stack: &OrderStack, id: u64, side: Side, quantity: i64, price: i64) {
    let quantity = Decimal::from(quantity);
    stack
        .add_order(Order::restore(
            OrderId(id),
            OrderType::Limit,
            stack.contract().clone(),
            side,
            Decimal::from(price),
            quantity,
            quantity,
            1_700_000_000_000 + id,
            format!("cl-{id}"),
            TradingAccount::named("ACCT"),
        ))
        .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_json_round_trip() {
        let stack = OrderStack::new(Contract::new("GOLD"));
        add_limit(&stack, 1, Side::Bid, 20, 10);
        add_limit(&stack, 2, Side::Bid, 10, 9);
        add_limit(&stack, 3, Side::Ask, 15, 11);

        let snapshot = stack.snapshot();
        let json = snapshot.to_json().unwrap();
        let decoded = BookSnapshot::from_json(&json).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_snapshot_replays_into_an_equal_book() {
        let stack = OrderStack::new(Contract::new("GOLD"));
        add_limit(&stack, 1, Side::Bid, 20, 10);
        add_limit(&stack, 2, Side::Ask, 15, 11);

        let replayed = OrderStack::new(Contract::new("GOLD"));
        for order in stack.snapshot().to_orders() {
            replayed.add_order(order).unwrap();
        }

        assert_eq!(replayed.order_count(), 2);
        assert_eq!(replayed.best_price(Side::Bid), Some(Decimal::from(10)));
        assert_eq!(replayed.best_price(Side::Ask), Some(Decimal::from(11)));

        let original = stack.snapshot();
        assert_eq!(replayed.snapshot(), original);
    }

    #[test]
    fn test_invalid_json_is_a_serialization_error() {
        let err = BookSnapshot::from_json("not json").unwrap_err();
        assert!(matches!(err, OrderBookError::SerializationError { .. }));
    }
}
