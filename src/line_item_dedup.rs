//! Collapses line item records that describe the same purchased unit.
//!
//! A unit can be duplicated two ways: re-synced under the same
//! `line_item_id` with newer order context, or recorded by the other source
//! system under a different `line_item_id` that claims the same
//! `(product_id, edition_number)`. Both collapse to the entry whose order was
//! processed most recently; ties keep the entry seen first.
//!
//! Entries live in an insertion ordered arena. Both identity maps index into
//! it, so superseding an entry is a matter of emptying its slot and
//! unmapping its `line_item_id`. A newer copy that keeps the same edition
//! moves to the end; one without an edition, or re-synced onto a different
//! edition, keeps its slot.
use super::context::{Edition, OrderContext};
use super::order::{EditionKey, Order};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
struct EditionLedger {
    slots: Vec<Option<Edition>>,
    by_line_item_id: HashMap<String, usize>,
    // may point at an emptied slot, or at one since overwritten with a
    // different edition. Either way the key is vacant.
    by_product_edition: HashMap<EditionKey, usize>,
}

impl EditionLedger {
    fn admit(&mut self, candidate: Edition) {
        if let Some(slot) = self.admit_primary(candidate) {
            self.reconcile_secondary(slot);
        }
    }

    /// Returns the candidate's slot, or `None` when an entry for the same
    /// `line_item_id` from an equally recent or newer order is already held.
    fn admit_primary(&mut self, candidate: Edition) -> Option<usize> {
        let Some(&slot) = self.by_line_item_id.get(candidate.line_item_id()) else {
            let slot = self.slots.len();
            self.by_line_item_id
                .insert(candidate.line_item_id().to_string(), slot);
            self.slots.push(Some(candidate));
            return Some(slot);
        };

        let held = self.slots[slot].as_ref()?;
        if candidate.processed_at() > held.processed_at() {
            debug!(
                line_item_id = %candidate.line_item_id(),
                kept_order = %candidate.order.order_id,
                dropped_order = %held.order.order_id,
                "line item re-synced from a newer order"
            );
            // a newer copy of a unit that holds its edition supersedes the
            // held entry outright, so it is re-inserted at the end
            let held_key = held.edition_key();
            if held_key.is_some() && held_key == candidate.edition_key() {
                self.slots[slot] = None;
                let moved = self.slots.len();
                self.by_line_item_id
                    .insert(candidate.line_item_id().to_string(), moved);
                self.slots.push(Some(candidate));
                return Some(moved);
            }
            self.slots[slot] = Some(candidate);
            Some(slot)
        } else {
            debug!(
                line_item_id = %candidate.line_item_id(),
                kept_order = %held.order.order_id,
                dropped_order = %candidate.order.order_id,
                "stale line item copy dropped"
            );
            None
        }
    }

    fn holder(&self, key: &EditionKey) -> Option<usize> {
        let slot = *self.by_product_edition.get(key)?;
        let held = self.slots[slot].as_ref()?;

        (held.edition_key().as_ref() == Some(key)).then_some(slot)
    }

    fn reconcile_secondary(&mut self, slot: usize) {
        let Some(key) = self.slots[slot].as_ref().and_then(Edition::edition_key) else {
            return;
        };

        match self.holder(&key) {
            None => {
                self.by_product_edition.insert(key, slot);
            }
            Some(held) if held == slot => {}
            Some(held) => {
                let newer = match (&self.slots[slot], &self.slots[held]) {
                    (Some(current), Some(stored)) => current.processed_at() > stored.processed_at(),
                    _ => return,
                };
                if newer {
                    self.evict(held, &key, "edition claimed by a newer order");
                    self.by_product_edition.insert(key, slot);
                } else {
                    self.evict(slot, &key, "edition already held by an equal or newer order");
                }
            }
        }
    }

    fn evict(&mut self, slot: usize, key: &EditionKey, reason: &str) {
        if let Some(edition) = self.slots[slot].take() {
            debug!(
                line_item_id = %edition.line_item_id(),
                order = %edition.order.order_id,
                product_id = %key.product_id,
                edition_number = key.edition_number,
                reason,
                "duplicate edition dropped"
            );
            self.by_line_item_id.remove(edition.line_item_id());
        }
    }

    fn into_editions(self) -> Vec<Edition> {
        self.slots.into_iter().flatten().collect()
    }
}

/// Every line item of every order, annotated with its order's context, with
/// duplicates of the same unit removed. Output follows first insertion order.
pub fn deduplicate_line_items(orders: &[Order]) -> Vec<Edition> {
    let mut ledger = EditionLedger::default();

    for order in orders {
        let context = OrderContext::from_order(order);
        for line_item in &order.line_items {
            ledger.admit(Edition::new(line_item.clone(), context.clone()));
        }
    }

    ledger.into_editions()
}
