//! # Order Item Client
//!
//! Reads and writes of the `order_items` table. Used by the order actor's hooks
//! and by [`OrderClient`](crate::clients::OrderClient) to join items onto orders.

use crate::framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use crate::model::{OrderId, OrderItem, UserId};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Client for interacting with the order item actor.
#[derive(Clone)]
pub struct OrderItemClient {
    inner: ResourceClient<OrderItem>,
}

impl OrderItemClient {
    pub fn new(inner: ResourceClient<OrderItem>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<OrderItem> for OrderItemClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<OrderItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::Conflict(id) => OrderError::Validation(format!("duplicate order item {id}")),
            FrameworkError::Storage(e) => OrderError::Storage(e.to_string()),
            other => other
                .into_entity_error::<OrderError>()
                .unwrap_or_else(|e| OrderError::ActorCommunication(e.to_string())),
        }
    }
}

impl OrderItemClient {
    /// Write a checkout's items as one all-or-nothing batch.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn record(&self, items: Vec<OrderItem>) -> Result<(), OrderError> {
        debug!("Sending request");
        self.inner
            .create_many(items)
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn for_order(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, OrderError> {
        let order_id = order_id.clone();
        self.query(move |item| item.key.order_id == order_id).await
    }

    /// Items of any of `order_ids`, in one request.
    #[instrument(skip(self, order_ids), fields(orders = order_ids.len()))]
    pub async fn for_orders(&self, order_ids: HashSet<OrderId>) -> Result<Vec<OrderItem>, OrderError> {
        self.query(move |item| order_ids.contains(&item.key.order_id))
            .await
    }

    /// Every item sold by `seller_id`, across all orders.
    #[instrument(skip(self))]
    pub async fn for_seller(&self, seller_id: &UserId) -> Result<Vec<OrderItem>, OrderError> {
        let seller_id = seller_id.clone();
        self.query(move |item| item.seller_id == seller_id).await
    }

    /// Delete an order's items. Only used to compensate a failed checkout.
    #[instrument(skip(self))]
    pub async fn remove_for_order(&self, order_id: &OrderId) -> Result<(), OrderError> {
        for item in self.for_order(order_id).await? {
            match self.inner.delete(item.key).await {
                Ok(()) | Err(FrameworkError::NotFound(_)) => {}
                Err(e) => return Err(Self::map_error(e)),
            }
        }
        Ok(())
    }

    async fn query(
        &self,
        predicate: impl Fn(&OrderItem) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<OrderItem>, OrderError> {
        self.inner
            .query(Filter::new(predicate))
            .await
            .map_err(Self::map_error)
    }
}
