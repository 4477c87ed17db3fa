use fixmatch_rs::orderbook::ordering::compare;
use fixmatch_rs::prelude::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::cmp::Ordering;

const BASE_TIME: u64 = 1_700_000_000_000;

fn order_from(id: u64, side: Side, price: i64, quantity: i64, time_offset: u64) -> Order {
    let quantity = Decimal::from(quantity);
    Order::restore(
        OrderId(id),
        OrderType::Limit,
        Contract::new("TEST"),
        side,
        Decimal::from(price),
        quantity,
        quantity,
        BASE_TIME + time_offset,
        format!("cl-{id}"),
        TradingAccount::none(),
    )
}

/// Narrow key ranges on purpose: collisions in price, time and quantity
/// are what push the comparison down its tie-break chain.
fn arb_order(side: Side) -> impl Strategy<Value = Order> {
    (any::<u64>(), 1i64..4, 1i64..4, 0u64..3)
        .prop_map(move |(id, price, quantity, offset)| order_from(id, side, price, quantity, offset))
}

fn arb_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Bid), Just(Side::Ask)]
}

proptest! {
    #[test]
    fn prop_comparison_is_total_and_antisymmetric(
        (x, y) in arb_side().prop_flat_map(|s| (arb_order(s), arb_order(s))),
    ) {
        let xy = compare(&x, &y).unwrap();
        let yx = compare(&y, &x).unwrap();
        prop_assert_eq!(xy, yx.reverse());
        if x.id() != y.id() {
            // Distinct orders never compare equal: the ID tie-break makes
            // the order strict.
            prop_assert_ne!(xy, Ordering::Equal);
        }
    }

    #[test]
    fn prop_comparison_is_transitive(
        (x, y, z) in arb_side().prop_flat_map(|s| (arb_order(s), arb_order(s), arb_order(s))),
    ) {
        let xy = compare(&x, &y).unwrap();
        let yz = compare(&y, &z).unwrap();
        if xy == yz {
            prop_assert_eq!(compare(&x, &z).unwrap(), xy);
        }
        if xy != Ordering::Greater && yz != Ordering::Greater {
            prop_assert_ne!(compare(&x, &z).unwrap(), Ordering::Greater);
        }
    }

    #[test]
    fn prop_cross_side_comparison_always_fails(
        bid in arb_order(Side::Bid),
        ask in arb_order(Side::Ask),
    ) {
        prop_assert!(compare(&bid, &ask).is_err());
        prop_assert!(compare(&ask, &bid).is_err());
    }

    #[test]
    fn prop_better_price_always_outranks(
        side in arb_side(),
        quantity_a in 1i64..100,
        quantity_b in 1i64..100,
        offset_a in 0u64..1000,
        offset_b in 0u64..1000,
    ) {
        // Whatever the quantities and times, price decides first.
        let (better_price, worse_price) = match side {
            Side::Bid => (11, 10),
            Side::Ask => (10, 11),
        };
        let better = order_from(1, side, better_price, quantity_a, offset_a);
        let worse = order_from(2, side, worse_price, quantity_b, offset_b);
        prop_assert_eq!(compare(&better, &worse).unwrap(), Ordering::Less);
    }
}
