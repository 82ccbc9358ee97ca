//! Error types for the Product actor.

use thiserror::Error;

/// Errors that can occur during product operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    /// The requested product was not found.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// A product with this id already exists.
    #[error("Product already exists: {0}")]
    AlreadyExists(String),

    /// The product data or requested quantity is invalid.
    #[error("Product validation error: {0}")]
    Validation(String),

    /// The products table could not be read or written.
    #[error("Product storage error: {0}")]
    Storage(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}
