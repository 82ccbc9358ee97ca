//! # System Lifecycle
//!
//! Starting, wiring and stopping the storefront's actors.
//!
//! Individual actors are simple; wiring them is where the ordering rules live.
//! [`Storefront::start`] does it in two phases:
//!
//! 1. **Load and create.** Every table is opened and loaded before any actor
//!    runs, so a malformed table aborts startup with nothing half-started.
//! 2. **Run with context.** Dependencies are injected through `run(context)`.
//!    Only the order actor has any: the product and order item clients.
//!
//! ```rust,ignore
//! let storefront = Storefront::start(StorefrontConfig::from_env()?).await?;
//! let products = storefront.fetch_active_products().await?;
//! storefront.shutdown().await?;
//! ```
//!
//! ## Shutdown
//!
//! [`Storefront::shutdown`] drops its clients and awaits every actor task. The
//! dependency graph is acyclic (orders → products, orders → items), so each actor
//! stops once its last sender is gone: the order actor first, then the actors
//! whose clients it held in its context.
//!
//! ## Demo data
//!
//! With `seed_demo_data` set, [`seed::seed_demo_data`] fills empty `users` and
//! `products` tables with a default seller and a small catalog.

pub mod seed;
pub mod storefront;
pub mod tracing;

pub use storefront::*;
pub use self::tracing::*;
