use crate::model::{OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of the `order_items` table: one line per product per order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemKey {
    pub order_id: OrderId,
    pub product_id: ProductId,
}

impl fmt::Display for OrderItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.order_id, self.product_id)
    }
}

/// A line of an order as it was at checkout.
///
/// Name, image and price are copied from the product so later catalog edits
/// do not rewrite history. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(flatten)]
    pub key: OrderItemKey,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    /// Effective unit price paid.
    pub price: u64,
    pub seller_id: UserId,
}

impl OrderItem {
    pub fn order_id(&self) -> &OrderId {
        &self.key.order_id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.key.product_id
    }

    pub fn line_total(&self) -> u64 {
        self.price * u64::from(self.quantity)
    }
}
