//! Conversions at the API boundary: inbound json snapshots, outbound editions
use super::context::Edition;
use super::error::SnapshotError;
use super::order::Order;

pub fn parse_orders_json(text: &str) -> Result<Vec<Order>, SnapshotError> {
    Ok(serde_json::from_str(text)?)
}

pub fn editions_to_json(editions: &[Edition]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(editions)?)
}

/// sha256 over the cbor encoding of a resolved edition list. Two resolutions
/// agree on this exactly when their outputs are byte-identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionDigest(String);

impl EditionDigest {
    pub fn of(editions: &[Edition]) -> Result<Self, SnapshotError> {
        let encoded =
            minicbor::to_vec(editions).map_err(|e| SnapshotError::Encode(e.to_string()))?;
        Ok(Self(sha256::digest(&encoded)))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
