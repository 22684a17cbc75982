//! Collapses order records that describe the same real-world purchase
use super::config::ResolverConfig;
use super::order::Order;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// What two copies of one purchase have in common. A nameless order only
/// ever groups with itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderGroupKey {
    Number(String),
    Name(String),
    Id(String),
}

/// `"#1188"`, `"1188"` and `"1188A"` all map to `Number("1188")`. Names
/// without a leading number group case-insensitively.
pub fn order_group_key(order: &Order) -> OrderGroupKey {
    let Some(name) = order.order_name.as_deref() else {
        return OrderGroupKey::Id(order.id.clone());
    };
    let name = name.strip_prefix('#').unwrap_or(name);
    let digits: String = name.chars().take_while(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        OrderGroupKey::Name(name.to_lowercase())
    } else {
        OrderGroupKey::Number(digits)
    }
}

/// Whether `candidate` should replace the currently kept copy of its purchase.
/// A valid order beats an invalidated one; with validity tied the better
/// ranked source wins; otherwise the kept copy stays.
fn outranks(candidate: &Order, kept: &Order, config: &ResolverConfig) -> bool {
    let candidate_invalid = config.is_invalidated(
        candidate.fulfillment_status.as_deref(),
        candidate.financial_status.as_deref(),
    );
    let kept_invalid = config.is_invalidated(
        kept.fulfillment_status.as_deref(),
        kept.financial_status.as_deref(),
    );

    if candidate_invalid != kept_invalid {
        return kept_invalid;
    }
    config.source_rank(&candidate.id) < config.source_rank(&kept.id)
}

/// One order per real-world purchase, in order of first appearance.
pub fn deduplicate_orders(orders: &[Order], config: &ResolverConfig) -> Vec<Order> {
    let mut groups: HashMap<OrderGroupKey, usize> = HashMap::new();
    let mut kept: Vec<&Order> = Vec::with_capacity(orders.len());

    for order in orders {
        match groups.entry(order_group_key(order)) {
            Entry::Vacant(slot) => {
                slot.insert(kept.len());
                kept.push(order);
            }
            Entry::Occupied(slot) => {
                let current = &mut kept[*slot.get()];
                if outranks(order, current, config) {
                    debug!(group = ?slot.key(), kept = %order.id, dropped = %current.id, "order superseded");
                    *current = order;
                } else {
                    debug!(group = ?slot.key(), kept = %current.id, dropped = %order.id, "duplicate order dropped");
                }
            }
        }
    }

    kept.into_iter().cloned().collect()
}
