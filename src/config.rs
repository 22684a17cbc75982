//! Business constants consulted by the deduplication and filter stages
use serde::Deserialize;

pub const DEFAULT_MANUAL_ID_PREFIX: &str = "warehouse_";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Ranked prefixes of non-authoritative order sources. An id matching
    /// none of them comes from the auto-synced source and outranks them all;
    /// earlier prefixes outrank later ones.
    pub manual_id_prefixes: Vec<String>,
    pub invalid_fulfillment_statuses: Vec<String>,
    pub invalid_financial_statuses: Vec<String>,
    /// Line level fulfillment states that count as delivered. A missing
    /// state is always accepted.
    pub valid_line_fulfillment_statuses: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            manual_id_prefixes: vec![DEFAULT_MANUAL_ID_PREFIX.to_string()],
            invalid_fulfillment_statuses: vec!["restocked".to_string(), "canceled".to_string()],
            invalid_financial_statuses: vec!["refunded".to_string(), "voided".to_string()],
            valid_line_fulfillment_statuses: vec!["fulfilled".to_string(), "partial".to_string()],
        }
    }
}

fn contains(set: &[String], value: Option<&str>) -> bool {
    value.is_some_and(|v| set.iter().any(|s| s == v))
}

impl ResolverConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// 0 for the auto-synced source, 1.. for manual sources in rank order
    pub fn source_rank(&self, order_id: &str) -> usize {
        self.manual_id_prefixes
            .iter()
            .position(|prefix| order_id.starts_with(prefix.as_str()))
            .map_or(0, |i| i + 1)
    }

    pub fn is_manual(&self, order_id: &str) -> bool {
        self.source_rank(order_id) > 0
    }

    /// An order whose fulfillment or payment was reversed no longer counts
    pub fn is_invalidated(
        &self,
        fulfillment_status: Option<&str>,
        financial_status: Option<&str>,
    ) -> bool {
        contains(&self.invalid_fulfillment_statuses, fulfillment_status)
            || contains(&self.invalid_financial_statuses, financial_status)
    }

    pub fn is_line_fulfillment_valid(&self, fulfillment_status: Option<&str>) -> bool {
        match fulfillment_status {
            None => true,
            status => contains(&self.valid_line_fulfillment_statuses, status),
        }
    }
}
