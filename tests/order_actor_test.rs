use storefront::clients::{OrderItemClient, ProductClient};
use storefront::framework::mock::MockClient;
use storefront::framework::{ActorEntity, FrameworkError};
use storefront::model::{
    Buyer, CartItem, OrderId, OrderItem, OrderItemKey, OrderStatus, PaymentMethod, Product,
    ProductCreate, ProductId, ShippingAddress, UserId,
};
use storefront::order_actor::{self, OrderContext, OrderError};
use storefront::product_actor::{ProductActionResult, StockLevel};

/// Integration tests: a real Order actor with mocked product and order item actors.
///
/// These check which requests checkout and cancellation send, and in what
/// order, without running the actors that would answer them.

fn product(id: &str, price: u64) -> Product {
    let params = ProductCreate::new(id, price, 5, UserId::from("s1"), "My Store");
    Product::from_create_params(ProductId::from(id), params).unwrap()
}

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Ali Raza".into(),
        phone: "0300-0000000".into(),
        address: "12 Mall Road".into(),
        city: "Lahore".into(),
        province: "Punjab".into(),
        postal_code: None,
        landmark: None,
    }
}

fn item(order_id: &OrderId, product_id: &str, quantity: u32, price: u64) -> OrderItem {
    OrderItem {
        key: OrderItemKey {
            order_id: order_id.clone(),
            product_id: ProductId::from(product_id),
        },
        name: product_id.to_string(),
        image: String::new(),
        quantity,
        price,
        seller_id: UserId::from("s1"),
    }
}

fn level(stock: u32, sold_count: u32) -> ProductActionResult {
    ProductActionResult::Stock(StockLevel { stock, sold_count })
}

struct Harness {
    products: MockClient<Product>,
    items: MockClient<OrderItem>,
    orders: storefront::clients::OrderClient,
    handle: tokio::task::JoinHandle<()>,
}

fn start() -> Harness {
    let products = MockClient::<Product>::new();
    let items = MockClient::<OrderItem>::new();
    let item_client = OrderItemClient::new(items.client());
    let (order_actor, orders) = order_actor::new(10, item_client.clone());
    let handle = tokio::spawn(order_actor.run(OrderContext {
        products: ProductClient::new(products.client()),
        items: item_client,
    }));
    Harness {
        products,
        items,
        orders,
        handle,
    }
}

#[tokio::test]
async fn test_checkout_sells_then_records_items() {
    let h = start();
    h.products.expect_actions().return_ok(vec![level(3, 2)]);
    // The order id is generated inside the actor, so the mocks answer with
    // whatever the read-back needs rather than echoing the request.
    h.items.expect_create_many().return_ok(Vec::new());
    h.items.expect_query().return_ok(Vec::new());

    let details = h
        .orders
        .create_order(
            Some(UserId::from("u1")),
            vec![CartItem::new(product("p1", 1250), 2)],
            address(),
            PaymentMethod::CashOnDelivery,
        )
        .await
        .unwrap();

    assert_eq!(details.order.total, 2750);
    assert_eq!(details.order.status, OrderStatus::Pending);
    assert_eq!(details.order.buyer, Buyer::User(UserId::from("u1")));
    assert_eq!(h.products.received(), vec!["ActionMany"]);
    assert_eq!(h.items.received(), vec!["CreateMany", "Query"]);
    h.products.verify();
    h.items.verify();

    drop(h.orders);
    h.handle.await.unwrap();
}

#[tokio::test]
async fn test_failed_item_write_restocks_and_stores_nothing() {
    let h = start();
    h.products.expect_actions().return_ok(vec![level(3, 2)]);
    h.items
        .expect_create_many()
        .return_err(FrameworkError::entity(OrderError::Storage("disk full".into())));
    h.products.expect_actions().return_ok(vec![level(5, 0)]);

    let result = h
        .orders
        .create_order(
            Some(UserId::from("u1")),
            vec![CartItem::new(product("p1", 1250), 2)],
            address(),
            PaymentMethod::Online,
        )
        .await;

    assert_eq!(result.unwrap_err(), OrderError::Storage("disk full".into()));
    assert_eq!(h.products.received(), vec!["ActionMany", "ActionMany"]);
    assert!(h
        .orders
        .list_for_buyer(&Buyer::User(UserId::from("u1")))
        .await
        .unwrap()
        .is_empty());
    h.products.verify();
    h.items.verify();
}

#[tokio::test]
async fn test_missing_product_fails_checkout_before_items() {
    let h = start();
    h.products
        .expect_actions()
        .return_err(FrameworkError::NotFound("p9".into()));

    let result = h
        .orders
        .create_order(
            None,
            vec![CartItem::new(product("p9", 100), 1)],
            address(),
            PaymentMethod::Online,
        )
        .await;

    assert_eq!(result.unwrap_err(), OrderError::ProductNotFound("p9".into()));
    assert!(h.items.received().is_empty());
    h.products.verify();
}

#[tokio::test]
async fn test_cancel_restocks_exactly_once() {
    let h = start();
    h.products.expect_actions().return_ok(vec![level(3, 2)]);
    h.items.expect_create_many().return_ok(Vec::new());
    h.items.expect_query().return_ok(Vec::new());
    let placed = h
        .orders
        .create_order(
            Some(UserId::from("u1")),
            vec![CartItem::new(product("p1", 1250), 2)],
            address(),
            PaymentMethod::CashOnDelivery,
        )
        .await
        .unwrap();
    let id = placed.order.id.clone();
    let items = vec![item(&id, "p1", 2, 1250)];

    // First cancel: read items, restock, read back.
    h.items.expect_query().return_ok(items.clone());
    h.products.expect_actions().return_ok(vec![level(5, 0)]);
    h.items.expect_query().return_ok(items.clone());
    let cancelled = h
        .orders
        .set_status(&id, OrderStatus::Cancelled, None, None)
        .await
        .unwrap();
    assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.order.status_history.len(), 2);

    // Second cancel: no stock movement, nothing appended.
    h.items.expect_query().return_ok(items);
    let again = h
        .orders
        .set_status(&id, OrderStatus::Cancelled, None, None)
        .await
        .unwrap();
    assert_eq!(again.order.status_history.len(), 2);

    assert_eq!(h.products.received(), vec!["ActionMany", "ActionMany"]);
    h.products.verify();
    h.items.verify();
}

#[tokio::test]
async fn test_cancelled_order_cannot_be_reopened() {
    let h = start();
    h.products.expect_actions().return_ok(vec![level(4, 1)]);
    h.items.expect_create_many().return_ok(Vec::new());
    h.items.expect_query().return_ok(Vec::new());
    let placed = h
        .orders
        .create_order(
            Some(UserId::from("u1")),
            vec![CartItem::new(product("p1", 500), 1)],
            address(),
            PaymentMethod::Online,
        )
        .await
        .unwrap();
    let id = placed.order.id.clone();

    h.items.expect_query().return_ok(vec![item(&id, "p1", 1, 500)]);
    h.products.expect_actions().return_ok(vec![level(5, 0)]);
    h.items.expect_query().return_ok(Vec::new());
    h.orders
        .set_status(&id, OrderStatus::Cancelled, None, None)
        .await
        .unwrap();

    let result = h
        .orders
        .set_status(&id, OrderStatus::Confirmed, None, None)
        .await;
    assert_eq!(
        result.unwrap_err(),
        OrderError::InvalidTransition {
            from: OrderStatus::Cancelled,
            to: OrderStatus::Confirmed,
        }
    );
    h.products.verify();
    h.items.verify();
}
