//! Keeps only line items that are a currently owned, valid edition
use super::config::ResolverConfig;
use super::context::Edition;

/// The order the item belongs to was not restocked, canceled, refunded or voided
pub fn is_valid_order(edition: &Edition, config: &ResolverConfig) -> bool {
    !config.is_invalidated(
        edition.order.fulfillment_status.as_deref(),
        edition.order.financial_status.as_deref(),
    )
}

pub fn is_actually_active(edition: &Edition) -> bool {
    let item = &edition.line_item;
    item.status == "active" && !item.is_restocked() && !item.is_refunded()
}

/// Accessory and digital units are never fulfilled on their own, so a missing
/// line level status passes.
pub fn is_fulfillment_valid(edition: &Edition, config: &ResolverConfig) -> bool {
    config.is_line_fulfillment_valid(edition.line_item.fulfillment_status.as_deref())
}

pub fn is_active_edition(edition: &Edition, config: &ResolverConfig) -> bool {
    is_valid_order(edition, config) && is_actually_active(edition) && is_fulfillment_valid(edition, config)
}

pub fn filter_active_editions(editions: Vec<Edition>, config: &ResolverConfig) -> Vec<Edition> {
    editions
        .into_iter()
        .filter(|edition| is_active_edition(edition, config))
        .collect()
}
