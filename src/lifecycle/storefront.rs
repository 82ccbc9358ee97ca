use crate::clients::{OrderClient, OrderItemClient, ProductClient, UserClient};
use crate::config::StorefrontConfig;
use crate::error::StorefrontError;
use crate::framework::FrameworkError;
use crate::lifecycle::seed;
use crate::model::{
    Buyer, CartItem, Order, OrderDetails, OrderId, OrderItem, OrderStatus, PaymentMethod, Product,
    ProductCreate, ProductId, ProductUpdate, ShippingAddress, User, UserCreate, UserId, UserRecord,
    UserUpdate,
};
use crate::order_actor::OrderContext;
use crate::storage::{self, JsonFileTable, MemoryTable, Table};
use crate::{order_actor, order_item_actor, product_actor, user_actor};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, instrument};

/// The running storefront: four actors and the operations the UI calls.
///
/// The clients are public for callers that need the lower-level API; the
/// methods on `Storefront` itself add the configured simulated latency.
pub struct Storefront {
    pub users: UserClient,
    pub products: ProductClient,
    pub orders: OrderClient,
    pub items: OrderItemClient,
    latency: Duration,
    handles: Vec<JoinHandle<()>>,
}

/// Pick the backend for table `name`: a JSON file under `data_dir`, or memory.
fn open_table<T>(data_dir: Option<&Path>, name: &str) -> Result<Box<dyn Table<T>>, StorefrontError>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    let table: Box<dyn Table<T>> = match data_dir {
        Some(dir) => Box::new(JsonFileTable::open(dir, name).map_err(FrameworkError::from)?),
        None => Box::new(MemoryTable::new(name)),
    };
    Ok(table)
}

impl Storefront {
    /// Load every table, start the actors and wire them together.
    ///
    /// Fails without starting anything if a table cannot be loaded.
    pub async fn start(config: StorefrontConfig) -> Result<Self, StorefrontError> {
        let capacity = config.channel_capacity;
        let dir = config.data_dir.as_deref();

        // 1. Load tables and create actors. Nothing runs until every table loaded.
        let (item_actor, item_client) =
            order_item_actor::with_table(capacity, open_table::<OrderItem>(dir, storage::ORDER_ITEMS)?)?;
        let (product_actor, product_client) =
            product_actor::with_table(capacity, open_table::<Product>(dir, storage::PRODUCTS)?)?;
        let (order_actor, order_client) = order_actor::with_table(
            capacity,
            open_table::<Order>(dir, storage::ORDERS)?,
            item_client.clone(),
        )?;
        let (user_actor, user_client) =
            user_actor::with_table(capacity, open_table::<UserRecord>(dir, storage::USERS)?)?;

        // 2. Start them, injecting the order actor's dependencies.
        let handles = vec![
            tokio::spawn(item_actor.run(())),
            tokio::spawn(product_actor.run(())),
            tokio::spawn(order_actor.run(OrderContext {
                products: product_client.clone(),
                items: item_client.clone(),
            })),
            tokio::spawn(user_actor.run(())),
        ];

        let storefront = Self {
            users: user_client,
            products: product_client,
            orders: order_client.with_shipping_fee(config.shipping_fee),
            items: item_client,
            latency: config.simulated_latency(),
            handles,
        };

        if config.seed_demo_data {
            seed::seed_demo_data(&storefront.users, &storefront.products).await?;
        }
        info!(
            persistent = config.data_dir.is_some(),
            shipping_fee = config.shipping_fee,
            "Storefront started"
        );
        Ok(storefront)
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, StorefrontError> {
        self.round_trip().await;
        Ok(self.users.login(email, password).await?)
    }

    #[instrument(skip_all)]
    pub async fn register(&self, params: UserCreate) -> Result<User, StorefrontError> {
        self.round_trip().await;
        Ok(self.users.register(params).await?)
    }

    /// The whole catalog, newest first. Sellers' dashboards use this.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, StorefrontError> {
        self.round_trip().await;
        Ok(self.products.list_products().await?)
    }

    /// Listings a customer may see right now, newest first.
    #[instrument(skip(self))]
    pub async fn fetch_active_products(&self) -> Result<Vec<Product>, StorefrontError> {
        self.round_trip().await;
        Ok(self.products.list_active(Utc::now()).await?)
    }

    #[instrument(skip(self))]
    pub async fn fetch_seller_products(&self, seller_id: &UserId) -> Result<Vec<Product>, StorefrontError> {
        self.round_trip().await;
        Ok(self.products.list_by_seller(seller_id).await?)
    }

    #[instrument(skip_all)]
    pub async fn add_product(&self, params: ProductCreate) -> Result<Product, StorefrontError> {
        self.round_trip().await;
        Ok(self.products.create_product(params).await?)
    }

    #[instrument(skip(self, update))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, StorefrontError> {
        self.round_trip().await;
        Ok(self.products.update_product(id, update).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), StorefrontError> {
        self.round_trip().await;
        Ok(self.products.remove_product(id).await?)
    }

    /// Check out a cart; `buyer: None` places a guest order.
    #[instrument(skip(self, lines, shipping_address))]
    pub async fn create_order(
        &self,
        buyer: Option<UserId>,
        lines: Vec<CartItem>,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Result<OrderDetails, StorefrontError> {
        self.round_trip().await;
        Ok(self
            .orders
            .create_order(buyer, lines, shipping_address, payment_method)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn fetch_customer_orders(&self, buyer: &Buyer) -> Result<Vec<OrderDetails>, StorefrontError> {
        self.round_trip().await;
        Ok(self.orders.list_for_buyer(buyer).await?)
    }

    #[instrument(skip(self))]
    pub async fn fetch_seller_orders(&self, seller_id: &UserId) -> Result<Vec<OrderDetails>, StorefrontError> {
        self.round_trip().await;
        Ok(self.orders.list_for_seller(seller_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        tracking_number: Option<String>,
        courier_name: Option<String>,
    ) -> Result<OrderDetails, StorefrontError> {
        self.round_trip().await;
        Ok(self
            .orders
            .set_status(id, status, tracking_number, courier_name)
            .await?)
    }

    /// Rename a seller's store: the profile first, then every listing's seller name.
    #[instrument(skip(self))]
    pub async fn update_seller_name(&self, seller_id: &UserId, name: &str) -> Result<User, StorefrontError> {
        self.round_trip().await;
        let update = UserUpdate {
            name: Some(name.to_string()),
            ..Default::default()
        };
        let user = self.users.update_profile(seller_id, update).await?;
        let renamed = self.products.rename_seller(seller_id, name).await?;
        info!(seller_id = %seller_id, renamed, "Seller renamed");
        Ok(user)
    }

    /// Drop every client and wait for the actors to drain their mailboxes.
    pub async fn shutdown(self) -> Result<(), StorefrontError> {
        info!("Shutting down storefront");
        let Self {
            users,
            products,
            orders,
            items,
            handles,
            ..
        } = self;
        drop(users);
        drop(products);
        drop(orders);
        drop(items);

        for handle in handles {
            handle
                .await
                .map_err(|e| StorefrontError::Shutdown(e.to_string()))?;
        }
        info!("Storefront stopped");
        Ok(())
    }
}
