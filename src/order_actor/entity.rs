//! [`ActorEntity`] implementation for [`Order`].
//!
//! The order is the only record whose hooks reach into other actors:
//! checkout sells stock and records line items, cancellation restocks.
//! Each of those is a single all-or-nothing batch in the owning actor, and
//! every step that succeeded is undone if a later one fails.

use super::OrderError;
use crate::clients::{OrderItemClient, ProductClient};
use crate::framework::ActorEntity;
use crate::model::{
    Buyer, CartItem, GuestToken, Order, OrderCreate, OrderId, OrderItem, OrderItemKey, OrderStatus,
    ProductId, StatusLog, Transition,
};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};

/// Dependencies injected into the order actor.
#[derive(Clone)]
pub struct OrderContext {
    pub products: ProductClient,
    pub items: OrderItemClient,
}

/// Custom actions for Order records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderAction {
    /// Move the order to `status`, optionally recording shipment details.
    SetStatus {
        status: OrderStatus,
        tracking_number: Option<String>,
        courier_name: Option<String>,
    },
}

/// Whether a status change was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Changed,
    /// Re-cancelling a cancelled order.
    Unchanged,
}

/// Fold lines naming the same product into one, keeping the first line's snapshot.
fn merge_lines(lines: Vec<CartItem>) -> Vec<CartItem> {
    let mut merged: Vec<CartItem> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.iter_mut().find(|m| m.product.id == line.product.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }
    merged
}

fn quantities(items: &[OrderItem]) -> Vec<(ProductId, u32)> {
    items
        .iter()
        .map(|item| (item.product_id().clone(), item.quantity))
        .collect()
}

impl Order {
    /// Undo a checkout: drop its items and put their stock back.
    async fn release(&self, ctx: &OrderContext) -> Result<(), OrderError> {
        let items = ctx.items.for_order(&self.id).await?;
        ctx.items.remove_for_order(&self.id).await?;
        ctx.products.restock_available(quantities(&items)).await?;
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = ();
    type Action = OrderAction;
    type ActionResult = StatusChange;
    type Context = OrderContext;
    type Error = OrderError;

    fn id(&self) -> &OrderId {
        &self.id
    }

    fn assign_id(_params: &OrderCreate) -> OrderId {
        OrderId::generate()
    }

    /// Price the cart and snapshot its lines. Stock is untouched until `on_create`.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if params.lines.is_empty() {
            return Err(OrderError::Validation("cart is empty".into()));
        }
        if let Some(line) = params.lines.iter().find(|line| line.quantity == 0) {
            return Err(OrderError::Validation(format!(
                "quantity for {} must be at least 1",
                line.product.id
            )));
        }

        let lines = merge_lines(params.lines);
        let overflow = || OrderError::Validation("order total overflows".into());
        let mut subtotal: u64 = 0;
        for line in &lines {
            let line_total = line
                .unit_price()
                .checked_mul(u64::from(line.quantity))
                .ok_or_else(overflow)?;
            subtotal = subtotal.checked_add(line_total).ok_or_else(overflow)?;
        }
        let total = subtotal
            .checked_add(params.shipping_fee)
            .ok_or_else(overflow)?;

        let pending_items = lines
            .iter()
            .map(|line| OrderItem {
                key: OrderItemKey {
                    order_id: id.clone(),
                    product_id: line.product.id.clone(),
                },
                name: line.product.name.clone(),
                image: line.product.primary_image().to_string(),
                quantity: line.quantity,
                price: line.unit_price(),
                seller_id: line.product.seller_id.clone(),
            })
            .collect();

        let buyer = match params.buyer {
            Some(user_id) => Buyer::User(user_id),
            None => Buyer::Guest(GuestToken::generate()),
        };
        let now = Utc::now();

        Ok(Self {
            id,
            buyer,
            total,
            status: OrderStatus::Pending,
            payment_method: params.payment_method,
            payment_status: params.payment_method.initial_status(),
            shipping_address: params.shipping_address,
            created_at: now,
            tracking_number: None,
            courier_name: None,
            status_history: vec![StatusLog {
                status: OrderStatus::Pending,
                timestamp: now,
            }],
            pending_items,
        })
    }

    fn validate(&self) -> Result<(), OrderError> {
        let Some(last) = self.status_history.last() else {
            return Err(OrderError::Validation(format!(
                "order {} has no status history",
                self.id
            )));
        };
        if last.status != self.status {
            return Err(OrderError::Validation(format!(
                "order {} is {} but its history ends at {}",
                self.id, self.status, last.status
            )));
        }
        if self
            .status_history
            .windows(2)
            .any(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(OrderError::Validation(format!(
                "order {} has out-of-order history",
                self.id
            )));
        }
        Ok(())
    }

    /// Sell the stock, then record the items. A failed recording restocks.
    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), OrderError> {
        let items = std::mem::take(&mut self.pending_items);
        let sold = quantities(&items);

        ctx.products.sell(sold.clone()).await?;
        if let Err(e) = ctx.items.record(items).await {
            if let Err(undo) = ctx.products.restock_available(sold).await {
                error!(order_id = %self.id, error = %undo, "Failed to restock after item write failure");
            }
            return Err(e);
        }
        info!(order_id = %self.id, total = self.total, "Checkout committed to products and items");
        Ok(())
    }

    async fn on_update(&mut self, _update: (), _ctx: &OrderContext) -> Result<(), OrderError> {
        Err(OrderError::Validation(
            "orders only change through status transitions".into(),
        ))
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<StatusChange, OrderError> {
        let OrderAction::SetStatus {
            status,
            tracking_number,
            courier_name,
        } = action;

        match self.status.transition_to(status) {
            Transition::Reject => Err(OrderError::InvalidTransition {
                from: self.status,
                to: status,
            }),
            Transition::NoOp => Ok(StatusChange::Unchanged),
            Transition::Apply => {
                if status == OrderStatus::Cancelled {
                    let items = ctx.items.for_order(&self.id).await?;
                    let restocked = ctx.products.restock_available(quantities(&items)).await?;
                    info!(order_id = %self.id, restocked = restocked.len(), "Stock returned for cancelled order");
                }
                if tracking_number.is_some() {
                    self.tracking_number = tracking_number;
                }
                if courier_name.is_some() {
                    self.courier_name = courier_name;
                }
                let mut now = Utc::now();
                if let Some(last) = self.status_history.last() {
                    now = now.max(last.timestamp);
                }
                self.status = status;
                self.status_history.push(StatusLog {
                    status,
                    timestamp: now,
                });
                Ok(StatusChange::Changed)
            }
        }
    }

    async fn rollback(&self, before: Option<&Self>, ctx: &OrderContext) -> Result<(), OrderError> {
        match before {
            None => self.release(ctx).await,
            Some(previous)
                if self.status == OrderStatus::Cancelled
                    && previous.status != OrderStatus::Cancelled =>
            {
                let items = ctx.items.for_order(&self.id).await?;
                ctx.products.sell_available(quantities(&items)).await?;
                Ok(())
            }
            Some(_) => Ok(()),
        }
    }
}
