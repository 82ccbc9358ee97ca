//! Plain records and payloads of the storefront.
//!
//! The records here are what the actors store and what the clients return. Their
//! [`ActorEntity`](crate::framework::ActorEntity) impls live next to each actor.

pub mod ids;
pub mod order;
pub mod order_item;
pub mod product;
pub mod status;
pub mod user;

pub use ids::*;
pub use order::*;
pub use order_item::*;
pub use product::*;
pub use status::*;
pub use user::*;
