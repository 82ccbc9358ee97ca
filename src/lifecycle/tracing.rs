//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. Module paths are hidden; every actor log line carries an
//! `entity_type` field instead.
//!
//! ```bash
//! RUST_LOG=info cargo run                        # commits and failures
//! RUST_LOG=debug cargo run                       # request payloads too
//! RUST_LOG=storefront::framework=debug cargo run # actor plumbing only
//! ```
//!
//! A checkout at `info` reads roughly:
//!
//! ```text
//! INFO Actions ok entity_type="Product" count=2
//! INFO Created batch entity_type="OrderItem" count=2 size=2
//! INFO Checkout committed to products and items order_id=ORD-...
//! INFO Created entity_type="Order" id=ORD-... size=1
//! INFO create_order: Order placed order_id=ORD-...
//! ```
//!
//! Payloads that hold credentials (`UserCreate`, `UserAction`, `GuestToken`) have
//! redacted `Debug` output, so `debug` level is safe to leave on.

/// Install the global subscriber. Later calls are ignored, so tests may call it freely.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
