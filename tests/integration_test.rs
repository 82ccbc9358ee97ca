use chrono::{Duration, Utc};
use storefront::config::StorefrontConfig;
use storefront::error::StorefrontError;
use storefront::framework::ActorClient;
use storefront::lifecycle::Storefront;
use storefront::model::{
    Buyer, CartItem, GuestToken, OrderStatus, PaymentMethod, PaymentStatus, Product, ProductCreate,
    ProductId, ProductUpdate, Role, ShippingAddress, User, UserCreate,
};
use storefront::order_actor::OrderError;
use storefront::user_actor::UserError;

/// Full end-to-end tests with all real actors over in-memory tables.

async fn start() -> Storefront {
    Storefront::start(StorefrontConfig::default())
        .await
        .expect("Failed to start storefront")
}

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Ayesha Khan".into(),
        phone: "0321-1234567".into(),
        address: "House 4, Street 9".into(),
        city: "Karachi".into(),
        province: "Sindh".into(),
        postal_code: Some("75500".into()),
        landmark: None,
    }
}

async fn seller(storefront: &Storefront, name: &str) -> User {
    let email = format!("{}@shop.test", name.to_lowercase());
    storefront
        .register(UserCreate::new(name, email, "seller-pass", Role::Seller))
        .await
        .expect("Failed to register seller")
}

async fn list(storefront: &Storefront, owner: &User, name: &str, price: u64, stock: u32) -> Product {
    storefront
        .add_product(ProductCreate::new(name, price, stock, owner.id.clone(), owner.name.clone()))
        .await
        .expect("Failed to add product")
}

async fn stock_of(storefront: &Storefront, id: &ProductId) -> (u32, u32) {
    let product = storefront
        .products
        .get(id.clone())
        .await
        .unwrap()
        .expect("Product not found");
    (product.stock, product.sold_count)
}

#[tokio::test]
async fn test_checkout_and_cancel_reconcile_stock() {
    let storefront = start().await;
    let shop = seller(&storefront, "Shop").await;
    let buyer = storefront
        .register(UserCreate::new("Ayesha", "ayesha@mail.test", "buyer-pass", Role::Buyer))
        .await
        .unwrap();
    let product = list(&storefront, &shop, "Kettle", 1250, 5).await;

    let placed = storefront
        .create_order(
            Some(buyer.id.clone()),
            vec![CartItem::new(product.clone(), 2)],
            address(),
            PaymentMethod::CashOnDelivery,
        )
        .await
        .unwrap();
    assert_eq!(placed.order.total, 2750);
    assert_eq!(placed.order.status, OrderStatus::Pending);
    assert_eq!(placed.order.payment_status, PaymentStatus::Unpaid);
    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.items[0].price, 1250);
    assert_eq!(placed.subtotal() + storefront.orders.shipping_fee(), placed.order.total);
    assert_eq!(stock_of(&storefront, &product.id).await, (3, 2));

    let id = placed.order.id.clone();
    let cancelled = storefront
        .update_order_status(&id, OrderStatus::Cancelled, None, None)
        .await
        .unwrap();
    assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
    assert_eq!(stock_of(&storefront, &product.id).await, (5, 0));

    // Cancelling again must not put the stock back a second time.
    let again = storefront
        .update_order_status(&id, OrderStatus::Cancelled, None, None)
        .await
        .unwrap();
    assert_eq!(again.order.status_history.len(), cancelled.order.status_history.len());
    assert_eq!(stock_of(&storefront, &product.id).await, (5, 0));

    storefront.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_discounted_price_is_snapshotted() {
    let storefront = start().await;
    let shop = seller(&storefront, "Shop").await;
    let mut params = ProductCreate::new("Lamp", 1000, 4, shop.id.clone(), shop.name.clone());
    params.discount_price = Some(800);
    let lamp = storefront.add_product(params).await.unwrap();

    let placed = storefront
        .create_order(None, vec![CartItem::new(lamp.clone(), 1)], address(), PaymentMethod::Online)
        .await
        .unwrap();
    assert_eq!(placed.order.total, 1050);
    assert_eq!(placed.order.payment_status, PaymentStatus::Paid);

    // A later price change leaves the order's items alone.
    storefront
        .update_product(
            lamp.id.clone(),
            ProductUpdate {
                discount_price: Some(None),
                price: Some(1500),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let orders = storefront.fetch_customer_orders(&placed.order.buyer).await.unwrap();
    assert_eq!(orders[0].items[0].price, 800);

    storefront.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_seller_sees_only_own_items() {
    let storefront = start().await;
    let alpha = seller(&storefront, "Alpha").await;
    let beta = seller(&storefront, "Beta").await;
    let a = list(&storefront, &alpha, "Mug", 300, 10).await;
    let b = list(&storefront, &beta, "Plate", 450, 10).await;

    let placed = storefront
        .create_order(
            None,
            vec![CartItem::new(a.clone(), 1), CartItem::new(b.clone(), 3)],
            address(),
            PaymentMethod::CashOnDelivery,
        )
        .await
        .unwrap();
    assert_eq!(placed.items.len(), 2);

    let for_alpha = storefront.fetch_seller_orders(&alpha.id).await.unwrap();
    assert_eq!(for_alpha.len(), 1);
    assert_eq!(for_alpha[0].items.len(), 1);
    assert_eq!(for_alpha[0].items[0].product_id(), &a.id);

    let for_beta = storefront.fetch_seller_orders(&beta.id).await.unwrap();
    assert_eq!(for_beta[0].items.len(), 1);
    assert_eq!(for_beta[0].items[0].quantity, 3);

    let buyer_view = storefront.fetch_customer_orders(&placed.order.buyer).await.unwrap();
    assert_eq!(buyer_view[0].items.len(), 2);

    storefront.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_guest_orders_visible_only_by_token() {
    let storefront = start().await;
    let shop = seller(&storefront, "Shop").await;
    let product = list(&storefront, &shop, "Scarf", 900, 3).await;

    let placed = storefront
        .create_order(None, vec![CartItem::new(product, 1)], address(), PaymentMethod::Online)
        .await
        .unwrap();
    let Buyer::Guest(_) = &placed.order.buyer else {
        panic!("expected a guest buyer, got {:?}", placed.order.buyer);
    };

    let own = storefront.fetch_customer_orders(&placed.order.buyer).await.unwrap();
    assert_eq!(own.len(), 1);

    let stranger = Buyer::Guest(GuestToken::generate());
    assert!(storefront.fetch_customer_orders(&stranger).await.unwrap().is_empty());
    assert!(storefront
        .fetch_customer_orders(&Buyer::User(shop.id.clone()))
        .await
        .unwrap()
        .is_empty());

    storefront.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_illegal_transition_leaves_order_unchanged() {
    let storefront = start().await;
    let shop = seller(&storefront, "Shop").await;
    let product = list(&storefront, &shop, "Desk", 20_000, 2).await;
    let placed = storefront
        .create_order(None, vec![CartItem::new(product.clone(), 1)], address(), PaymentMethod::Online)
        .await
        .unwrap();
    let id = placed.order.id.clone();

    let shipped = storefront
        .update_order_status(&id, OrderStatus::Shipped, Some("TRK-42".into()), Some("Leopards".into()))
        .await
        .unwrap();
    assert_eq!(shipped.order.tracking_number.as_deref(), Some("TRK-42"));
    assert_eq!(shipped.order.courier_name.as_deref(), Some("Leopards"));

    let err = storefront
        .update_order_status(&id, OrderStatus::Confirmed, None, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorefrontError::Order(OrderError::InvalidTransition {
            from: OrderStatus::Shipped,
            to: OrderStatus::Confirmed,
        })
    ));

    storefront
        .update_order_status(&id, OrderStatus::Delivered, None, None)
        .await
        .unwrap();
    let err = storefront
        .update_order_status(&id, OrderStatus::Cancelled, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::Order(OrderError::InvalidTransition { .. })));

    let current = storefront.orders.get_order(&id).await.unwrap().unwrap();
    assert_eq!(current.order.status, OrderStatus::Delivered);
    assert_eq!(current.order.status_history.len(), 3);
    assert_eq!(stock_of(&storefront, &product.id).await, (1, 1));

    storefront.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_registration_and_login() {
    let storefront = start().await;
    let user = storefront
        .register(UserCreate::new("Sara", "Sara@Mail.test", "correct horse", Role::Buyer))
        .await
        .unwrap();

    let err = storefront
        .register(UserCreate::new("Other Sara", "sara@mail.test", "whatever", Role::Buyer))
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::User(UserError::EmailTaken(_))));
    assert_eq!(storefront.users.all().await.unwrap().len(), 1);

    let logged_in = storefront.login("SARA@mail.test", "correct horse").await.unwrap();
    assert_eq!(logged_in, user);

    for (email, password) in [("sara@mail.test", "wrong"), ("nobody@mail.test", "correct horse")] {
        let err = storefront.login(email, password).await.unwrap_err();
        assert!(matches!(err, StorefrontError::User(UserError::AuthenticationFailed)));
    }

    storefront.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_active_listings_hide_sold_out_and_expired_deals() {
    let storefront = start().await;
    let shop = seller(&storefront, "Shop").await;
    let live = list(&storefront, &shop, "Live", 100, 3).await;
    let sold_out = list(&storefront, &shop, "Sold out", 100, 0).await;

    let mut expired = ProductCreate::new("Expired deal", 100, 3, shop.id.clone(), shop.name.clone());
    expired.is_flash_sale = true;
    expired.flash_sale_ends_at = Some(Utc::now() - Duration::hours(1));
    let expired = storefront.add_product(expired).await.unwrap();

    let active: Vec<ProductId> = storefront
        .fetch_active_products()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(active, vec![live.id.clone()]);

    let all = storefront.fetch_products().await.unwrap();
    assert_eq!(all.len(), 3);
    let mine = storefront.fetch_seller_products(&shop.id).await.unwrap();
    assert!(mine.iter().any(|p| p.id == sold_out.id));
    assert!(mine.iter().any(|p| p.id == expired.id));

    storefront.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_delete_is_idempotent_and_cancel_survives_it() {
    let storefront = start().await;
    let shop = seller(&storefront, "Shop").await;
    let product = list(&storefront, &shop, "Vase", 700, 2).await;
    let placed = storefront
        .create_order(None, vec![CartItem::new(product.clone(), 1)], address(), PaymentMethod::Online)
        .await
        .unwrap();

    storefront.delete_product(product.id.clone()).await.unwrap();
    storefront.delete_product(product.id.clone()).await.unwrap();
    storefront.delete_product(ProductId::from("never-existed")).await.unwrap();
    assert!(storefront.fetch_products().await.unwrap().is_empty());

    // The product is gone, so there is nothing to restock, but the order still cancels.
    let cancelled = storefront
        .update_order_status(&placed.order.id, OrderStatus::Cancelled, None, None)
        .await
        .unwrap();
    assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.items.len(), 1);

    storefront.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_rename_seller_updates_profile_and_listings() {
    let storefront = start().await;
    let shop = seller(&storefront, "Shop").await;
    let other = seller(&storefront, "Other").await;
    list(&storefront, &shop, "One", 100, 1).await;
    list(&storefront, &shop, "Two", 100, 1).await;
    list(&storefront, &other, "Three", 100, 1).await;

    let renamed = storefront.update_seller_name(&shop.id, "Shop Deluxe").await.unwrap();
    assert_eq!(renamed.name, "Shop Deluxe");

    let mine = storefront.fetch_seller_products(&shop.id).await.unwrap();
    assert!(mine.iter().all(|p| p.seller_name == "Shop Deluxe"));
    let theirs = storefront.fetch_seller_products(&other.id).await.unwrap();
    assert!(theirs.iter().all(|p| p.seller_name == "Other"));

    storefront.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_seeded_storefront_lists_demo_catalog() {
    let config = StorefrontConfig {
        seed_demo_data: true,
        ..Default::default()
    };
    let storefront = Storefront::start(config).await.unwrap();

    let admin = storefront.login("admin@gmail.com", "123456").await.unwrap();
    assert_eq!(admin.role, Role::Seller);
    assert_eq!(storefront.fetch_active_products().await.unwrap().len(), 4);

    storefront.shutdown().await.unwrap();
}
