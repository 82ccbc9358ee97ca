//! # Storefront
//!
//! The core of a marketplace storefront: a product catalog with stock, user
//! accounts, and orders whose placement and cancellation keep stock consistent.
//!
//! Every table is owned by one actor that handles its requests one at a time.
//! Cross-table work (a checkout touching products, order items and orders) is
//! driven from the order actor's hooks as one all-or-nothing batch per table,
//! with compensation when a later step fails.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`], [`storage`])
//! The generic [`ResourceActor`](framework::ResourceActor) and the
//! [`ActorEntity`](framework::ActorEntity) trait a record implements to live in
//! one. Each actor writes its table through a [`Table`](storage::Table) after
//! every committed change.
//!
//! ### 2. The Records ([`model`], [`catalog`])
//! Plain data: products, orders and their items, users, ids, and the order
//! status machine. [`catalog`] holds the pure "is this listing visible" rules.
//!
//! ### 3. The Actors ([`user_actor`], [`product_actor`], [`order_item_actor`], [`order_actor`])
//! The `ActorEntity` implementations: validation, conflicts, stock movements,
//! checkout and cancellation.
//!
//! ### 4. The Interface ([`clients`])
//! Domain clients that wrap the generic `ResourceClient` and turn framework
//! errors back into each actor's own error type.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! [`Storefront`](lifecycle::Storefront) loads the tables, starts the actors,
//! wires their dependencies and exposes the operations the UI calls.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run
//! STOREFRONT_DATA_DIR=./data STOREFRONT_SEED_DEMO_DATA=true cargo run
//! ```

pub mod catalog;
pub mod clients;
pub mod config;
pub mod error;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod order_item_actor;
pub mod product_actor;
pub mod storage;
pub mod user_actor;
