//! # Order Client
//!
//! High-level API for the `Order` actor. Checkout and status changes run inside
//! the actor (see [`order_actor`](crate::order_actor)); this client prices nothing
//! itself and only joins orders with their items for the read side.

use crate::clients::OrderItemClient;
use crate::framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use crate::model::{
    Buyer, CartItem, Order, OrderCreate, OrderDetails, OrderId, OrderItem, OrderStatus,
    PaymentMethod, ShippingAddress, UserId,
};
use crate::order_actor::{OrderAction, OrderError, StatusChange};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument};

/// Flat shipping surcharge, in minor units.
pub const DEFAULT_SHIPPING_FEE: u64 = 250;

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    items: OrderItemClient,
    shipping_fee: u64,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, items: OrderItemClient) -> Self {
        Self {
            inner,
            items,
            shipping_fee: DEFAULT_SHIPPING_FEE,
        }
    }

    pub fn with_shipping_fee(mut self, shipping_fee: u64) -> Self {
        self.shipping_fee = shipping_fee;
        self
    }

    pub fn shipping_fee(&self) -> u64 {
        self.shipping_fee
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::Conflict(id) => OrderError::Validation(format!("duplicate order id {id}")),
            FrameworkError::Storage(e) => OrderError::Storage(e.to_string()),
            other => other
                .into_entity_error::<OrderError>()
                .unwrap_or_else(|e| OrderError::ActorCommunication(e.to_string())),
        }
    }
}

/// Attach items to their orders, newest order first.
fn join(orders: Vec<Order>, items: Vec<OrderItem>) -> Vec<OrderDetails> {
    let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order
            .entry(item.order_id().clone())
            .or_default()
            .push(item);
    }
    let mut details: Vec<OrderDetails> = orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderDetails { order, items }
        })
        .collect();
    details.sort_by(|a, b| b.order.created_at.cmp(&a.order.created_at));
    details
}

impl OrderClient {
    /// Check out a cart. `buyer: None` places a guest order whose token is in
    /// the returned order's `buyer`.
    #[instrument(skip(self, lines, shipping_address), fields(lines = lines.len()))]
    pub async fn create_order(
        &self,
        buyer: Option<UserId>,
        lines: Vec<CartItem>,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Result<OrderDetails, OrderError> {
        let params = OrderCreate {
            buyer,
            lines,
            shipping_address,
            payment_method,
            shipping_fee: self.shipping_fee,
        };
        debug!(?params, "create_order called");
        let id = self.inner.create(params).await.map_err(Self::map_error)?;
        info!(order_id = %id, "Order placed");
        self.get_order(&id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Option<OrderDetails>, OrderError> {
        let Some(order) = self.get(id.clone()).await? else {
            return Ok(None);
        };
        let items = self.items.for_order(id).await?;
        Ok(Some(OrderDetails { order, items }))
    }

    /// Orders placed by exactly `buyer`, each with all its items. Newest first.
    #[instrument(skip(self))]
    pub async fn list_for_buyer(&self, buyer: &Buyer) -> Result<Vec<OrderDetails>, OrderError> {
        let wanted = buyer.clone();
        let orders = self
            .inner
            .query(Filter::new(move |o: &Order| o.buyer == wanted))
            .await
            .map_err(Self::map_error)?;
        if orders.is_empty() {
            return Ok(Vec::new());
        }
        let ids: HashSet<OrderId> = orders.iter().map(|o| o.id.clone()).collect();
        let items = self.items.for_orders(ids).await?;
        Ok(join(orders, items))
    }

    /// Orders containing at least one of the seller's items, each showing only
    /// that seller's items. Newest first.
    #[instrument(skip(self))]
    pub async fn list_for_seller(&self, seller_id: &UserId) -> Result<Vec<OrderDetails>, OrderError> {
        let items = self.items.for_seller(seller_id).await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let ids: HashSet<OrderId> = items.iter().map(|i| i.order_id().clone()).collect();
        let orders = self
            .inner
            .query(Filter::new(move |o: &Order| ids.contains(&o.id)))
            .await
            .map_err(Self::map_error)?;
        Ok(join(orders, items))
    }

    /// Move an order to `status` and return it as it now stands.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        tracking_number: Option<String>,
        courier_name: Option<String>,
    ) -> Result<OrderDetails, OrderError> {
        let action = OrderAction::SetStatus {
            status,
            tracking_number,
            courier_name,
        };
        let change = self
            .inner
            .perform_action(id.clone(), action)
            .await
            .map_err(Self::map_error)?;
        if change == StatusChange::Unchanged {
            debug!("Status already {status}; nothing recorded");
        }
        self.get_order(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }
}
