//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).
//!
//! Each client maps [`FrameworkError`](crate::framework::FrameworkError) into its
//! actor's own error type, recovering the typed record error where there is one.

pub mod order_client;
pub mod order_item_client;
pub mod product_client;
pub mod user_client;

pub use order_client::*;
pub use order_item_client::*;
pub use product_client::*;
pub use user_client::*;
