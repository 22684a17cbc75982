//! Entry points composing the three stages
use super::config::ResolverConfig;
use super::context::Edition;
use super::filter::filter_active_editions;
use super::line_item_dedup::deduplicate_line_items;
use super::order::Order;
use super::order_dedup::deduplicate_orders;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The canonical, currently valid editions held across a snapshot of orders
    pub fn resolve(&self, orders: &[Order]) -> Vec<Edition> {
        let canonical_orders = deduplicate_orders(orders, &self.config);
        let line_items = deduplicate_line_items(&canonical_orders);
        let deduplicated = line_items.len();
        let editions = filter_active_editions(line_items, &self.config);

        debug!(
            orders = orders.len(),
            canonical_orders = canonical_orders.len(),
            line_items = deduplicated,
            editions = editions.len(),
            "resolved collector editions"
        );
        editions
    }
}

pub fn get_filtered_collector_editions(orders: &[Order]) -> Vec<Edition> {
    Resolver::default().resolve(orders)
}
