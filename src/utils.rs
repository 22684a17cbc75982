//! Utility functions for minting order ids

use uuid7::uuid7;

// orders keyed in by staff need an id the resolver can tell apart from
// auto-synced ones, so the source prefix leads
pub fn new_manual_order_id(prefix: &str) -> anyhow::Result<String> {
    if prefix.is_empty() {
        anyhow::bail!("manual order ids need a non-empty source prefix");
    }
    Ok(format!("{prefix}{}", uuid7()))
}
