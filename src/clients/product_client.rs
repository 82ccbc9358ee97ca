//! # Product Client
//!
//! High-level API for the `Product` actor: catalog CRUD, customer listings and
//! stock movements.

use crate::catalog;
use crate::framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate, UserId};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError, StockLevel};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => ProductError::NotFound(id),
            FrameworkError::Conflict(id) => ProductError::AlreadyExists(id),
            FrameworkError::Storage(e) => ProductError::Storage(e.to_string()),
            other => other
                .into_entity_error::<ProductError>()
                .unwrap_or_else(|e| ProductError::ActorCommunication(e.to_string())),
        }
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunication(format!("unexpected action result {result:?}"))
}

fn stock_level(result: ProductActionResult) -> Result<StockLevel, ProductError> {
    match result {
        ProductActionResult::Stock(level) => Ok(level),
        other => Err(unexpected(other)),
    }
}

impl ProductClient {
    /// Add a listing and return it as stored.
    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        let id = self.inner.create(params).await.map_err(Self::map_error)?;
        self.get(id.clone())
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// Every product, newest first.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        let mut products = self.all().await?;
        catalog::sort_newest_first(&mut products);
        Ok(products)
    }

    /// Products a customer may see at `now`, newest first.
    #[instrument(skip(self))]
    pub async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<Product>, ProductError> {
        let mut products = self
            .inner
            .query(Filter::new(move |p: &Product| catalog::is_active(p, now)))
            .await
            .map_err(Self::map_error)?;
        catalog::sort_newest_first(&mut products);
        Ok(products)
    }

    /// A seller's own catalog, including sold-out and expired listings. Newest first.
    #[instrument(skip(self))]
    pub async fn list_by_seller(&self, seller_id: &UserId) -> Result<Vec<Product>, ProductError> {
        let seller_id = seller_id.clone();
        let mut products = self
            .inner
            .query(Filter::new(move |p: &Product| p.seller_id == seller_id))
            .await
            .map_err(Self::map_error)?;
        catalog::sort_newest_first(&mut products);
        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Delete a listing. Deleting a missing listing succeeds.
    #[instrument(skip(self))]
    pub async fn remove_product(&self, id: ProductId) -> Result<(), ProductError> {
        match self.inner.delete(id).await {
            Ok(()) | Err(FrameworkError::NotFound(_)) => Ok(()),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Check the current stock level for a product.
    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: ProductId) -> Result<u32, ProductError> {
        match self
            .inner
            .perform_action(id, ProductAction::CheckStock)
            .await
            .map_err(Self::map_error)?
        {
            ProductActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Take units off the shelf for a checkout, all or nothing.
    ///
    /// Fails with `NotFound` if any product is gone, in which case nothing changed.
    #[instrument(skip(self))]
    pub async fn sell(&self, lines: Vec<(ProductId, u32)>) -> Result<Vec<StockLevel>, ProductError> {
        let actions = lines
            .into_iter()
            .map(|(id, quantity)| (id, ProductAction::Sell(quantity)))
            .collect();
        self.inner
            .perform_actions(actions)
            .await
            .map_err(Self::map_error)?
            .into_iter()
            .map(stock_level)
            .collect()
    }

    /// Put units back, skipping products deleted since they were sold.
    ///
    /// Returns the products that were restocked.
    #[instrument(skip(self))]
    pub async fn restock_available(
        &self,
        lines: Vec<(ProductId, u32)>,
    ) -> Result<Vec<ProductId>, ProductError> {
        let actions = lines
            .into_iter()
            .map(|(id, quantity)| (id, ProductAction::Restock(quantity)))
            .collect();
        self.apply_to_existing(actions).await
    }

    /// Like [`sell`](Self::sell), but skips products that no longer exist.
    #[instrument(skip(self))]
    pub async fn sell_available(
        &self,
        lines: Vec<(ProductId, u32)>,
    ) -> Result<Vec<ProductId>, ProductError> {
        let actions = lines
            .into_iter()
            .map(|(id, quantity)| (id, ProductAction::Sell(quantity)))
            .collect();
        self.apply_to_existing(actions).await
    }

    /// Rewrite the seller name on all of a seller's listings. Returns how many changed.
    #[instrument(skip(self))]
    pub async fn rename_seller(&self, seller_id: &UserId, name: &str) -> Result<usize, ProductError> {
        let actions = self
            .list_by_seller(seller_id)
            .await?
            .into_iter()
            .map(|p| (p.id, ProductAction::RenameSeller(name.to_string())))
            .collect();
        Ok(self.apply_to_existing(actions).await?.len())
    }

    /// Run `actions` as one batch, dropping products that have been deleted and retrying.
    async fn apply_to_existing(
        &self,
        mut actions: Vec<(ProductId, ProductAction)>,
    ) -> Result<Vec<ProductId>, ProductError> {
        loop {
            if actions.is_empty() {
                return Ok(Vec::new());
            }
            let ids: Vec<ProductId> = actions.iter().map(|(id, _)| id.clone()).collect();
            match self.inner.perform_actions(actions.clone()).await {
                Ok(_) => return Ok(ids),
                Err(FrameworkError::NotFound(missing)) => {
                    let before = actions.len();
                    actions.retain(|(id, _)| id.as_str() != missing);
                    if actions.len() == before {
                        return Err(ProductError::NotFound(missing));
                    }
                    warn!(product_id = %missing, "Skipping deleted product");
                }
                Err(e) => return Err(Self::map_error(e)),
            }
        }
    }
}
