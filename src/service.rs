//! Sled-backed order snapshots per collector, resolved on demand
use super::config::ResolverConfig;
use super::context::Edition;
use super::error::SnapshotError;
use super::order::Order;
use super::pipeline::Resolver;
use super::snapshot::EditionDigest;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct ResolvedEditions {
    pub editions: Vec<Edition>,
    pub digest: EditionDigest,
}

pub struct SnapshotStore {
    instance: Arc<sled::Db>,
}

impl SnapshotStore {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    /// Replace whatever snapshot is stored for the collector
    pub fn put_snapshot(&self, collector_id: &str, orders: &[Order]) -> anyhow::Result<()> {
        let cbor = minicbor::to_vec(orders).map_err(|e| SnapshotError::Encode(e.to_string()))?;
        self.instance
            .insert(collector_id.as_bytes(), cbor)
            .map_err(SnapshotError::from)?;

        debug!(collector_id, orders = orders.len(), "snapshot stored");
        Ok(())
    }

    pub fn load_snapshot(&self, collector_id: &str) -> anyhow::Result<Vec<Order>> {
        let bytes = self
            .instance
            .get(collector_id.as_bytes())
            .map_err(SnapshotError::from)?
            .ok_or_else(|| SnapshotError::NotFound(collector_id.to_string()))?;

        let orders: Vec<Order> = minicbor::decode(&bytes).map_err(SnapshotError::from)?;
        Ok(orders)
    }

    pub fn remove_snapshot(&self, collector_id: &str) -> anyhow::Result<bool> {
        let removed = self
            .instance
            .remove(collector_id.as_bytes())
            .map_err(SnapshotError::from)?;
        Ok(removed.is_some())
    }

    /// Load the collector's snapshot and run it through the resolver
    pub fn resolve_collector(
        &self,
        collector_id: &str,
        config: &ResolverConfig,
    ) -> anyhow::Result<ResolvedEditions> {
        let orders = self.load_snapshot(collector_id)?;
        let editions = Resolver::new(config.clone()).resolve(&orders);
        let digest = EditionDigest::of(&editions)?;

        debug!(
            collector_id,
            editions = editions.len(),
            digest = digest.as_str(),
            "collector resolved"
        );
        Ok(ResolvedEditions { editions, digest })
    }
}
