//! Error types for the Order and order item actors.

use crate::model::OrderStatus;
use crate::product_actor::ProductError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// A cart line names a product that no longer exists.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The transition table does not allow this status change.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    Validation(String),

    /// The orders or order items table could not be read or written.
    #[error("Order storage error: {0}")]
    Storage(String),

    /// A stock movement failed in the product actor.
    #[error("Product error: {0}")]
    Product(ProductError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

impl From<ProductError> for OrderError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => OrderError::ProductNotFound(id),
            other => OrderError::Product(other),
        }
    }
}
