use super::order::{EditionKey, LineItem, Order, TimeStamp};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

/// Json key the order context is written under, next to the line item's own fields
pub const ORDER_CONTEXT_KEY: &str = "order_context";
/// Where a pass-through field already named `order_context` is moved to
pub const SHADOWED_EXTRA_KEY: &str = "line_item_order_context";

/// The parent order's state, copied onto each line item at dedup time so
/// consumers never have to join back to the order.
#[derive(Debug, Clone, PartialEq, Serialize, minicbor::Encode, minicbor::Decode)]
pub struct OrderContext {
    #[n(0)]
    pub order_id: String,
    #[n(1)]
    pub order_name: Option<String>,
    #[n(2)]
    pub processed_at: TimeStamp<Utc>,
    #[n(3)]
    pub fulfillment_status: Option<String>, // order level, not the line item's
    #[n(4)]
    pub financial_status: Option<String>,
}

impl OrderContext {
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id.clone(),
            order_name: order.order_name.clone(),
            processed_at: order.processed_at.clone(),
            fulfillment_status: order.fulfillment_status.clone(),
            financial_status: order.financial_status.clone(),
        }
    }
}

/// A line item annotated with the order it currently belongs to. The
/// resolver's output is a list of these.
#[derive(Debug, Clone, PartialEq, Serialize, minicbor::Encode, minicbor::Decode)]
pub struct Edition {
    #[n(0)]
    #[serde(flatten)]
    pub line_item: LineItem,
    #[n(1)]
    #[serde(rename = "order_context")]
    pub order: OrderContext,
}

impl Edition {
    pub fn new(mut line_item: LineItem, order: OrderContext) -> Self {
        if let Some(shadowed) = line_item.extra.remove(ORDER_CONTEXT_KEY) {
            if line_item.extra.contains_key(SHADOWED_EXTRA_KEY) {
                warn!(
                    line_item_id = %line_item.line_item_id,
                    "pass-through field {ORDER_CONTEXT_KEY} dropped, {SHADOWED_EXTRA_KEY} is taken"
                );
            } else {
                line_item
                    .extra
                    .insert(SHADOWED_EXTRA_KEY.to_string(), shadowed);
            }
        }
        Self { line_item, order }
    }
    pub fn line_item_id(&self) -> &str {
        &self.line_item.line_item_id
    }
    pub fn edition_key(&self) -> Option<EditionKey> {
        self.line_item.edition_key()
    }
    pub fn processed_at(&self) -> &TimeStamp<Utc> {
        &self.order.processed_at
    }
}
