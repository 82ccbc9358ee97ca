//! # ActorClient Trait
//!
//! Common interface for the table-specific clients, adding default `get` and `all`
//! methods on top of a generic `ResourceClient`.

use crate::framework::{ActorEntity, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for table-specific clients to inherit the read operations.
///
/// Writes stay on the concrete clients, because each table has its own rules
/// (orders are never deleted, product deletes are idempotent, ...).
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The table-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the table-specific error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a record by key.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch every record of the table, in no particular order.
    #[tracing::instrument(skip(self))]
    async fn all(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner()
            .query(Filter::all())
            .await
            .map_err(Self::map_error)
    }
}
