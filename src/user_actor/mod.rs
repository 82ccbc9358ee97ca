//! # User Actor
//!
//! Owns the `users` table: registration, login and profile edits.
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`UserRecord`]
//! - [`error`] - [`UserError`]
//! - [`password`] - salted SHA-256 digests
//!
//! The actor has no dependencies, so it runs with a `()` context.

pub mod entity;
pub mod error;
pub mod password;

pub use entity::UserAction;
pub use error::*;

use crate::clients::UserClient;
use crate::framework::{FrameworkError, ResourceActor};
use crate::model::UserRecord;
use crate::storage::Table;

/// Creates a User actor over an in-memory table, and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<UserRecord>, UserClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, UserClient::new(generic_client))
}

/// Creates a User actor over `table`, loading the stored accounts.
pub fn with_table(
    buffer_size: usize,
    table: impl Table<UserRecord>,
) -> Result<(ResourceActor<UserRecord>, UserClient), FrameworkError> {
    let (actor, generic_client) = ResourceActor::with_table(buffer_size, table)?;
    Ok((actor, UserClient::new(generic_client)))
}
