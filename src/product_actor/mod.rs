//! # Product Actor
//!
//! Owns the `products` table, the single source of truth for stock and sold count.
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Product`]
//! - [`error`] - [`ProductError`]
//! - [`actions`] - [`ProductAction`] and [`ProductActionResult`] for stock movements
//!
//! ## Custom Actions
//!
//! ```rust,ignore
//! // Read-only
//! let stock = product_client.check_stock(product_id).await?;
//!
//! // One all-or-nothing batch for a whole checkout
//! product_client.sell(vec![(phone_id, 2), (case_id, 1)]).await?;
//! ```
//!
//! The actor has no dependencies, so it runs with a `()` context.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::ProductClient;
use crate::framework::{FrameworkError, ResourceActor};
use crate::model::Product;
use crate::storage::Table;

/// Creates a Product actor over an in-memory table, and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Product>, ProductClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, ProductClient::new(generic_client))
}

/// Creates a Product actor over `table`, loading the stored catalog.
pub fn with_table(
    buffer_size: usize,
    table: impl Table<Product>,
) -> Result<(ResourceActor<Product>, ProductClient), FrameworkError> {
    let (actor, generic_client) = ResourceActor::with_table(buffer_size, table)?;
    Ok((actor, ProductClient::new(generic_client)))
}
