//! # Storefront demo
//!
//! Starts a storefront from `STOREFRONT_*` configuration and walks one order
//! through its life: register a buyer, list a product, check out, cancel.
//! Stock is logged after each step.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

use storefront::config::StorefrontConfig;
use storefront::error::StorefrontError;
use storefront::framework::ActorClient;
use storefront::lifecycle::{setup_tracing, Storefront};
use storefront::model::{
    CartItem, OrderStatus, PaymentMethod, ProductCreate, ProductId, Role, ShippingAddress, UserCreate,
};
use tracing::{error, info, Instrument};

async fn log_stock(storefront: &Storefront, id: &ProductId, step: &str) -> Result<(), StorefrontError> {
    let product = storefront
        .products
        .get(id.clone())
        .await?
        .ok_or_else(|| storefront::product_actor::ProductError::NotFound(id.to_string()))?;
    info!(step, stock = product.stock, sold = product.sold_count, "Stock");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), StorefrontError> {
    setup_tracing();

    let config = StorefrontConfig::from_env()?;
    info!(?config, "Starting storefront");
    let storefront = Storefront::start(config).await?;

    let buyer = storefront
        .register(UserCreate::new("Alice", "alice@example.com", "alice-secret", Role::Buyer))
        .await?;
    info!(user_id = %buyer.id, "Buyer registered");

    let seller = storefront
        .register(UserCreate::new("Bob", "bob@example.com", "bob-secret", Role::Seller))
        .await?;
    let product = storefront
        .add_product(ProductCreate::new(
            "Wireless Mouse",
            1_250,
            5,
            seller.id.clone(),
            "Bob's Gadgets",
        ))
        .await?;
    info!(product_id = %product.id, "Product listed");
    log_stock(&storefront, &product.id, "listed").await?;

    let address = ShippingAddress {
        full_name: "Alice".to_string(),
        phone: "0300-0000000".to_string(),
        address: "12 Main Boulevard".to_string(),
        city: "Lahore".to_string(),
        province: "Punjab".to_string(),
        postal_code: None,
        landmark: None,
    };

    let span = tracing::info_span!("checkout");
    let order = async {
        storefront
            .create_order(
                Some(buyer.id.clone()),
                vec![CartItem::new(product.clone(), 2)],
                address,
                PaymentMethod::CashOnDelivery,
            )
            .await
    }
    .instrument(span)
    .await?;
    info!(order_id = %order.order.id, total = order.order.total, status = %order.order.status, "Order placed");
    log_stock(&storefront, &product.id, "after checkout").await?;

    let span = tracing::info_span!("cancellation");
    let cancelled = async {
        storefront
            .update_order_status(&order.order.id, OrderStatus::Cancelled, None, None)
            .await
    }
    .instrument(span)
    .await;
    match cancelled {
        Ok(details) => info!(order_id = %details.order.id, status = %details.order.status, "Order cancelled"),
        Err(e) => error!(error = %e, "Cancellation failed"),
    }
    log_stock(&storefront, &product.id, "after cancellation").await?;

    storefront.shutdown().await?;
    info!("Demo completed");
    Ok(())
}
