use storefront::clients::OrderClient;
use storefront::config::StorefrontConfig;
use storefront::error::StorefrontError;
use storefront::framework::ActorClient;
use storefront::lifecycle::Storefront;
use storefront::model::{
    CartItem, Order, OrderStatus, PaymentMethod, ProductCreate, Role, ShippingAddress, UserCreate,
};
use storefront::order_actor::{self, OrderContext, OrderError};
use storefront::storage::{self, MemoryTable, StorageError, Table};
use storefront::{order_item_actor, product_actor};

/// Persistence tests: JSON tables survive a restart, and a table that cannot be
/// written rolls back everything the failed change did.

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Bilal Ahmed".into(),
        phone: "0333-7654321".into(),
        address: "Flat 2, Block C".into(),
        city: "Islamabad".into(),
        province: "ICT".into(),
        postal_code: None,
        landmark: Some("Near the park".into()),
    }
}

fn on_disk(dir: &std::path::Path) -> StorefrontConfig {
    StorefrontConfig {
        data_dir: Some(dir.to_path_buf()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_json_tables_reload_after_restart() {
    let dir = tempfile::tempdir().unwrap();

    let storefront = Storefront::start(on_disk(dir.path())).await.unwrap();
    let shop = storefront
        .register(UserCreate::new("Shop", "shop@mail.test", "shop-pass", Role::Seller))
        .await
        .unwrap();
    let product = storefront
        .add_product(ProductCreate::new("Teapot", 1500, 4, shop.id.clone(), shop.name.clone()))
        .await
        .unwrap();
    let placed = storefront
        .create_order(None, vec![CartItem::new(product.clone(), 3)], address(), PaymentMethod::Online)
        .await
        .unwrap();
    storefront
        .update_order_status(&placed.order.id, OrderStatus::Confirmed, None, None)
        .await
        .unwrap();
    storefront.shutdown().await.unwrap();

    for table in [storage::PRODUCTS, storage::ORDERS, storage::ORDER_ITEMS, storage::USERS] {
        assert!(dir.path().join(format!("{table}.json")).exists(), "{table} was not written");
    }

    let reopened = Storefront::start(on_disk(dir.path())).await.unwrap();
    let products = reopened.fetch_products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].stock, 1);
    assert_eq!(products[0].sold_count, 3);

    let orders = reopened.fetch_customer_orders(&placed.order.buyer).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order.status, OrderStatus::Confirmed);
    assert_eq!(orders[0].order.status_history.len(), 2);
    assert_eq!(orders[0].items, placed.items);

    let login = reopened.login("shop@mail.test", "shop-pass").await.unwrap();
    assert_eq!(login, shop);

    reopened.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_malformed_table_aborts_startup() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("products.json"), r#"[{"id": "p1", "price": "free"}]"#).unwrap();

    let result = Storefront::start(on_disk(dir.path())).await;
    assert!(matches!(result, Err(StorefrontError::Framework(_))));
}

/// An orders table whose every save fails.
struct BrokenTable;

impl Table<Order> for BrokenTable {
    fn name(&self) -> &str {
        storage::ORDERS
    }

    fn load(&self) -> Result<Vec<Order>, StorageError> {
        Ok(Vec::new())
    }

    fn save(&self, _rows: &[&Order]) -> Result<(), StorageError> {
        Err(StorageError::Io {
            table: storage::ORDERS.to_string(),
            source: std::io::Error::other("disk full"),
        })
    }
}

#[tokio::test]
async fn test_failed_order_write_leaves_stock_unchanged() {
    let (item_actor, items) = order_item_actor::new(10);
    let (product_actor, products) = product_actor::new(10);
    let (order_actor, orders): (_, OrderClient) =
        order_actor::with_table(10, BrokenTable, items.clone()).unwrap();
    tokio::spawn(item_actor.run(()));
    tokio::spawn(product_actor.run(()));
    tokio::spawn(order_actor.run(OrderContext {
        products: products.clone(),
        items: items.clone(),
    }));

    let seller = storefront::model::UserId::from("s1");
    let product = products
        .create_product(ProductCreate::new("Tray", 600, 5, seller, "My Store"))
        .await
        .unwrap();

    let result = orders
        .create_order(None, vec![CartItem::new(product.clone(), 2)], address(), PaymentMethod::CashOnDelivery)
        .await;
    assert!(matches!(result, Err(OrderError::Storage(_))));

    let after = products.get(product.id.clone()).await.unwrap().unwrap();
    assert_eq!((after.stock, after.sold_count), (5, 0));
    assert!(items.all().await.unwrap().is_empty());
    assert!(orders.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_memory_table_rows_are_loaded() {
    let seller = storefront::model::UserId::from("s1");
    let seeded = {
        let (actor, products) = product_actor::new(4);
        let handle = tokio::spawn(actor.run(()));
        let product = products
            .create_product(ProductCreate::new("Cup", 200, 9, seller, "My Store"))
            .await
            .unwrap();
        drop(products);
        handle.await.unwrap();
        product
    };

    let table = MemoryTable::with_rows(storage::PRODUCTS, vec![seeded.clone()]);
    let (actor, products) = product_actor::with_table(4, table).unwrap();
    tokio::spawn(actor.run(()));
    assert_eq!(products.list_products().await.unwrap(), vec![seeded]);
}
