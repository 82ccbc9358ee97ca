use crate::model::{Buyer, CartItem, OrderId, OrderItem, OrderStatus, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CashOnDelivery,
    Online,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentMethod {
    /// Online payments are captured at checkout; cash is collected on delivery.
    pub fn initial_status(self) -> PaymentStatus {
        match self {
            PaymentMethod::Online => PaymentStatus::Paid,
            PaymentMethod::CashOnDelivery => PaymentStatus::Unpaid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub province: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLog {
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
}

/// A row of the `orders` table.
///
/// Line items live in their own table; see [`OrderDetails`] for the joined view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub buyer: Buyer,
    /// Items plus shipping, in minor units.
    pub total: u64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub shipping_address: ShippingAddress,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_name: Option<String>,
    pub status_history: Vec<StatusLog>,
    /// Items built at checkout, handed to the item table by the create hook.
    #[serde(skip)]
    pub(crate) pending_items: Vec<OrderItem>,
}

/// Checkout payload.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    /// `None` checks out as a guest.
    pub buyer: Option<UserId>,
    pub lines: Vec<CartItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub shipping_fee: u64,
}

/// An order joined with its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl OrderDetails {
    pub fn subtotal(&self) -> u64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}
