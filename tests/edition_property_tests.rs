//! Property-based tests for the edition resolver pipeline
//!
//! Snapshots are generated from small pools of order names, line item ids and
//! editions so that duplicates, re-syncs, cross-source edition claims and
//! equal timestamps show up in nearly every case. The invariants checked here
//! must hold for any snapshot, not only the hand-picked scenarios.

use edition_resolver::{
    Resolver,
    config::ResolverConfig,
    filter::is_active_edition,
    get_filtered_collector_editions,
    order::{LineItem, Order, TimeStamp},
    order_dedup::{deduplicate_orders, order_group_key},
    snapshot::EditionDigest,
};
use proptest::prelude::*;
use std::collections::HashSet;

// PROPERTY TEST STRATEGIES

/// Strategy to generate a line item drawn from a small id/edition pool
fn line_item_strategy() -> impl Strategy<Value = LineItem> {
    (
        0u8..6,
        prop::option::of((0u8..3, 1i64..4)),
        prop::bool::weighted(0.85),
        prop::option::of(any::<bool>()),
        prop_oneof![Just(None), Just(Some("none")), Just(Some("refunded"))],
        prop_oneof![
            Just(None),
            Just(Some("fulfilled")),
            Just(Some("partial")),
            Just(Some("unfulfilled"))
        ],
    )
        .prop_map(|(id, edition, active, restocked, refund, fulfillment)| {
            let mut item = LineItem::new(&format!("L{}", id));
            if let Some((product, number)) = edition {
                item = item.set_edition(&format!("P{}", product), number);
            }
            if !active {
                item = item.set_status("removed");
            }
            item.restocked = restocked;
            item.refund_status = refund.map(str::to_string);
            item.fulfillment_status = fulfillment.map(str::to_string);
            item
        })
}

/// Strategy to generate an order from either source, with colliding names and
/// timestamps spread over a few days so ties are common
fn order_strategy() -> impl Strategy<Value = Order> {
    (
        any::<bool>(),
        0u32..1000,
        prop_oneof![
            Just(None),
            Just(Some("1001")),
            Just(Some("#1001")),
            Just(Some("1001A")),
            Just(Some("1002B")),
            Just(Some("Gift"))
        ],
        1u32..=5,
        prop_oneof![Just(None), Just(Some("fulfilled")), Just(Some("restocked"))],
        prop_oneof![Just(None), Just(Some("paid")), Just(Some("voided"))],
        prop::collection::vec(line_item_strategy(), 0..4),
    )
        .prop_map(
            |(manual, n, name, day, fulfillment, financial, line_items)| {
                let id = if manual {
                    format!("warehouse_{}", n)
                } else {
                    format!("gid://shopify/Order/{}", n)
                };
                let mut order = Order::new(&id, TimeStamp::new_with(2024, 7, day, 0, 0, 0));
                order.order_name = name.map(str::to_string);
                order.fulfillment_status = fulfillment.map(str::to_string);
                order.financial_status = financial.map(str::to_string);
                order.line_items = line_items;
                order
            },
        )
}

fn snapshot_strategy() -> impl Strategy<Value = Vec<Order>> {
    prop::collection::vec(order_strategy(), 0..8)
}

// PROPERTY TESTS
proptest! {
    /// Property: no two resolved editions share a line_item_id
    #[test]
    fn prop_line_item_ids_are_unique(orders in snapshot_strategy()) {
        let editions = get_filtered_collector_editions(&orders);
        let mut seen = HashSet::new();

        for edition in &editions {
            prop_assert!(
                seen.insert(edition.line_item_id().to_string()),
                "duplicate line item {} in {:?}", edition.line_item_id(), editions
            );
        }
    }

    /// Property: no two resolved editions claim the same product edition
    #[test]
    fn prop_edition_keys_are_unique(orders in snapshot_strategy()) {
        let editions = get_filtered_collector_editions(&orders);
        let mut seen = HashSet::new();

        for key in editions.iter().filter_map(|e| e.edition_key()) {
            prop_assert!(seen.insert(key.clone()), "edition {:?} claimed twice", key);
        }
    }

    /// Property: every resolved edition satisfies the active edition predicate
    /// against the order context it carries
    #[test]
    fn prop_output_is_filter_sound(orders in snapshot_strategy()) {
        let config = ResolverConfig::default();

        for edition in get_filtered_collector_editions(&orders) {
            prop_assert!(is_active_edition(&edition, &config), "{:?}", edition);
        }
    }

    /// Property: every resolved edition is a line item of a real input order,
    /// annotated with that order's own context
    #[test]
    fn prop_output_traces_back_to_an_order(orders in snapshot_strategy()) {
        for edition in get_filtered_collector_editions(&orders) {
            let found = orders.iter().any(|order| {
                order.id == edition.order.order_id
                    && order.processed_at == edition.order.processed_at
                    && order.financial_status == edition.order.financial_status
                    && order.line_items.contains(&edition.line_item)
            });
            prop_assert!(found, "{:?} has no source order", edition);
        }
    }

    /// Property: resolving the same snapshot twice gives identical output
    #[test]
    fn prop_resolution_is_idempotent(orders in snapshot_strategy()) {
        let resolver = Resolver::default();
        let first = resolver.resolve(&orders);
        let second = resolver.resolve(&orders);

        prop_assert_eq!(EditionDigest::of(&first).unwrap(), EditionDigest::of(&second).unwrap());
        prop_assert_eq!(first, second);
    }

    /// Property: order deduplication leaves one order per purchase group
    #[test]
    fn prop_one_order_per_group(orders in snapshot_strategy()) {
        let canonical = deduplicate_orders(&orders, &ResolverConfig::default());
        let groups: HashSet<_> = orders.iter().map(order_group_key).collect();

        prop_assert_eq!(canonical.len(), groups.len());
        let kept: HashSet<_> = canonical.iter().map(order_group_key).collect();
        prop_assert_eq!(kept, groups);
    }
}

// TARGETED PROPERTY TESTS
#[cfg(test)]
mod recency {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Property: of two copies of a line item from distinct orders, the
        /// one processed later wins regardless of arrival order
        #[test]
        fn prop_newer_copy_wins(
            (early, late) in (1u32..=14, 15u32..=28),
            swap in any::<bool>(),
            with_edition in any::<bool>(),
        ) {
            let item = if with_edition {
                LineItem::new("A1").set_edition("P", 3)
            } else {
                LineItem::new("A1")
            };
            let older = Order::new("gid://shopify/Order/1", TimeStamp::new_with(2024, 2, early, 0, 0, 0))
                .set_order_name("#1")
                .add_line_item(item.clone());
            let newer = Order::new("gid://shopify/Order/2", TimeStamp::new_with(2024, 2, late, 0, 0, 0))
                .set_order_name("#2")
                .add_line_item(item);
            let orders = if swap { vec![newer, older] } else { vec![older, newer] };

            let editions = get_filtered_collector_editions(&orders);

            prop_assert_eq!(editions.len(), 1);
            prop_assert_eq!(&editions[0].order.order_id, "gid://shopify/Order/2");
        }

        /// Property: a different line item claiming the same edition from a
        /// later order supersedes the earlier claim
        #[test]
        fn prop_cross_key_supersession(
            (early, late) in (1u32..=14, 15u32..=28),
            swap in any::<bool>(),
        ) {
            let a = Order::new("gid://shopify/Order/1", TimeStamp::new_with(2024, 2, early, 0, 0, 0))
                .set_order_name("#1")
                .add_line_item(LineItem::new("A1").set_edition("P", 3));
            let b = Order::new("warehouse_2", TimeStamp::new_with(2024, 2, late, 0, 0, 0))
                .set_order_name("#2")
                .add_line_item(LineItem::new("B1").set_edition("P", 3));
            let orders = if swap { vec![b, a] } else { vec![a, b] };

            let editions = get_filtered_collector_editions(&orders);

            prop_assert_eq!(editions.len(), 1);
            prop_assert_eq!(editions[0].line_item_id(), "B1");
        }
    }
}
