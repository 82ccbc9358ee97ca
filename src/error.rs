//! Top-level error of the [`Storefront`](crate::lifecycle::Storefront) facade.

use crate::config::ConfigError;
use crate::framework::FrameworkError;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::user_actor::UserError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error(transparent)]
    Order(#[from] OrderError),

    /// Startup failures: a table that cannot be loaded, for instance.
    #[error(transparent)]
    Framework(#[from] FrameworkError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An actor task ended abnormally during shutdown.
    #[error("Actor task failed during shutdown: {0}")]
    Shutdown(String),
}
