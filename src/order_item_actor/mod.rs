//! # Order Item Actor
//!
//! Owns the `order_items` table. Items are keyed by `(order_id, product_id)`, so
//! the actor itself rejects a second line for the same product in one order.
//! Items are written once at checkout and never updated; the only removal is the
//! order actor compensating a checkout that could not be committed.

use crate::clients::OrderItemClient;
use crate::framework::{ActorEntity, FrameworkError, ResourceActor};
use crate::model::{OrderItem, OrderItemKey};
use crate::order_actor::OrderError;
use crate::storage::Table;
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for OrderItem {
    type Id = OrderItemKey;
    type Create = OrderItem;
    type Update = ();
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = OrderError;

    fn id(&self) -> &OrderItemKey {
        &self.key
    }

    fn assign_id(params: &OrderItem) -> OrderItemKey {
        params.key.clone()
    }

    fn from_create_params(key: OrderItemKey, mut params: OrderItem) -> Result<Self, OrderError> {
        params.key = key;
        Ok(params)
    }

    fn validate(&self) -> Result<(), OrderError> {
        if self.quantity == 0 {
            return Err(OrderError::Validation(format!(
                "item {} has zero quantity",
                self.key
            )));
        }
        Ok(())
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), OrderError> {
        Err(OrderError::Validation(format!(
            "order item {} is immutable",
            self.key
        )))
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), OrderError> {
        Ok(())
    }
}

/// Creates an order item actor over an in-memory table, and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<OrderItem>, OrderItemClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, OrderItemClient::new(generic_client))
}

/// Creates an order item actor over `table`, loading the stored items.
pub fn with_table(
    buffer_size: usize,
    table: impl Table<OrderItem>,
) -> Result<(ResourceActor<OrderItem>, OrderItemClient), FrameworkError> {
    let (actor, generic_client) = ResourceActor::with_table(buffer_size, table)?;
    Ok((actor, OrderItemClient::new(generic_client)))
}
