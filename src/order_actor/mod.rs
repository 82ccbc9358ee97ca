//! # Order Actor
//!
//! Owns the `orders` table and drives checkout and cancellation.
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`], shared with the order item actor
//!
//! ## Dependencies
//!
//! The actor runs with an [`OrderContext`] holding the product and order item
//! clients. It is created first and wired at `run` time:
//!
//! ```rust,ignore
//! let (order_actor, order_client) = order_actor::new(32, item_client.clone());
//! tokio::spawn(order_actor.run(OrderContext {
//!     products: product_client.clone(),
//!     items: item_client.clone(),
//! }));
//! ```
//!
//! Because the actor handles one message at a time, two status changes racing on
//! the same order are applied in sequence and cancellation restocks exactly once.

pub mod entity;
pub mod error;

pub use entity::{OrderAction, OrderContext, StatusChange};
pub use error::*;

use crate::clients::{OrderClient, OrderItemClient};
use crate::framework::{FrameworkError, ResourceActor};
use crate::model::Order;
use crate::storage::Table;

/// Creates an Order actor over an in-memory table, and its client.
///
/// The client reads line items through `items` to build [`OrderDetails`](crate::model::OrderDetails).
pub fn new(buffer_size: usize, items: OrderItemClient) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, OrderClient::new(generic_client, items))
}

/// Creates an Order actor over `table`, loading the stored orders.
pub fn with_table(
    buffer_size: usize,
    table: impl Table<Order>,
    items: OrderItemClient,
) -> Result<(ResourceActor<Order>, OrderClient), FrameworkError> {
    let (actor, generic_client) = ResourceActor::with_table(buffer_size, table)?;
    Ok((actor, OrderClient::new(generic_client, items)))
}
