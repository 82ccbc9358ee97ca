//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every storefront record (user, product,
//! order, order item) implements to be owned by a [`ResourceActor`](crate::framework::ResourceActor).
//!
//! Associated types pin down the id, the DTOs, the custom actions and the error
//! of each record, so a `ProductCreate` payload can never reach the order table.
//!
//! # Provided Methods (Hooks)
//! Most hooks have a default that does nothing:
//! - [`ActorEntity::validate`] runs on every create, update and table load.
//! - [`ActorEntity::conflicts_with`] lets a record declare a uniqueness rule beyond its id.
//! - [`ActorEntity::on_create`] / [`ActorEntity::on_delete`] run side effects around insertion and removal.
//! - [`ActorEntity::rollback`] undoes those side effects when the actor cannot commit the result.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record must implement to be managed by a `ResourceActor`.
///
/// # Async & Context
/// Hooks are async so they can call other actors. The `Context` type is injected
/// into every hook when the actor is started, which lets the order table reach the
/// product and order item tables without owning them.
///
/// # Failure contract
/// A hook that returns `Err` must leave no external side effect behind. A hook that
/// returns `Ok` may have touched other actors; if the owning actor then fails to
/// persist the new state it calls [`ActorEntity::rollback`] with the uncommitted
/// record and the previous one.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique key of this record.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new record.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing record.
    type Update: Send + Sync + Debug;

    /// Record-specific operations (e.g. `Sell`, `SetStatus`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this record.
    ///
    /// One enum per actor rather than one per message: clients only ever match
    /// on a single error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The key this record is stored under.
    fn id(&self) -> &Self::Id;

    /// Decide the key of a record about to be created.
    ///
    /// Either generates a fresh id or derives it from the payload (a preassigned
    /// product id, the `(order, product)` pair of an order item). The actor rejects
    /// the create with `Conflict` if the key is already taken.
    fn assign_id(params: &Self::Create) -> Self::Id;

    /// Construct the full record from its key and payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Check the record's own invariants.
    fn validate(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Whether this record may not coexist with `other` (e.g. two users sharing an email).
    fn conflicts_with(&self, _other: &Self) -> bool {
        false
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after the record is built and validated, before it is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the record is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom record-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;

    /// Undo the external side effects of a create (`before == None`) or of an
    /// action (`before == Some(previous)`) whose result could not be committed.
    async fn rollback(&self, _before: Option<&Self>, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }
}
