//! Generic actor framework for table-backed resources.
//!
//! This module provides the building blocks every storefront table is made of:
//! a sequential actor owning one table, a typed client to talk to it, and the
//! trait a record implements to be managed that way.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that record types implement to be managed by actors
//! - [`ResourceActor`] - Generic actor that owns one table and processes requests in order
//! - [`ResourceClient`] - Typed async handle used to send requests to an actor
//! - [`ActorClient`] - Shared behaviour for the domain-specific client wrappers
//! - [`FrameworkError`] - Errors raised by the plumbing itself
//!
//! # Testing
//!
//! See [`mock`] for utilities to test clients without spawning full actors.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Filter, ResourceRequest, Response};
