//! [`ActorEntity`] implementation for [`Product`].

use super::actions::{ProductAction, ProductActionResult, StockLevel};
use super::ProductError;
use crate::framework::ActorEntity;
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use async_trait::async_trait;
use chrono::Utc;

fn positive(quantity: u32) -> Result<u32, ProductError> {
    if quantity == 0 {
        return Err(ProductError::Validation("quantity must be at least 1".into()));
    }
    Ok(quantity)
}

impl Product {
    fn stock_level(&self) -> StockLevel {
        StockLevel {
            stock: self.stock,
            sold_count: self.sold_count,
        }
    }
}

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Context = ();
    type Error = ProductError;

    fn id(&self) -> &ProductId {
        &self.id
    }

    /// Keeps a preassigned id so seeded and imported listings stay stable.
    fn assign_id(params: &ProductCreate) -> ProductId {
        params.id.clone().unwrap_or_else(ProductId::generate)
    }

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, ProductError> {
        Ok(Self {
            id,
            seller_id: params.seller_id,
            seller_name: params.seller_name,
            name: params.name,
            description: params.description,
            brand: params.brand,
            price: params.price,
            discount_price: params.discount_price,
            discount_percentage: params.discount_percentage,
            category: params.category,
            images: params.images,
            stock: params.stock,
            total_initial_stock: params.total_initial_stock,
            sold_count: params.sold_count,
            rating: params.rating,
            reviews_count: params.reviews_count,
            is_flash_sale: params.is_flash_sale,
            flash_sale_ends_at: params.flash_sale_ends_at,
            is_daily_deal: params.is_daily_deal,
            deal_ends_at: params.deal_ends_at,
            sku: params.sku,
            created_at: params.created_at.unwrap_or_else(Utc::now),
            attributes: params.attributes,
            package_details: params.package_details,
        })
    }

    fn validate(&self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() {
            return Err(ProductError::Validation("name must not be empty".into()));
        }
        if let Some(discount) = self.discount_price {
            if discount > self.price {
                return Err(ProductError::Validation(format!(
                    "discount price {discount} exceeds price {}",
                    self.price
                )));
            }
        }
        if self.discount_percentage.is_some_and(|pct| pct > 100) {
            return Err(ProductError::Validation("discount percentage above 100".into()));
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(ProductError::Validation(format!(
                "rating {} outside 0..=5",
                self.rating
            )));
        }
        Ok(())
    }

    /// Shallow merge. Stock may be set directly by the seller; sold count may not.
    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), ProductError> {
        let ProductUpdate {
            name,
            description,
            brand,
            price,
            discount_price,
            discount_percentage,
            category,
            images,
            stock,
            total_initial_stock,
            is_flash_sale,
            flash_sale_ends_at,
            is_daily_deal,
            deal_ends_at,
            sku,
            attributes,
            package_details,
        } = update;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = brand {
            self.brand = v;
        }
        if let Some(v) = price {
            self.price = v;
        }
        if let Some(v) = discount_price {
            self.discount_price = v;
        }
        if let Some(v) = discount_percentage {
            self.discount_percentage = v;
        }
        if let Some(v) = category {
            self.category = v;
        }
        if let Some(v) = images {
            self.images = v;
        }
        if let Some(v) = stock {
            self.stock = v;
        }
        if let Some(v) = total_initial_stock {
            self.total_initial_stock = v;
        }
        if let Some(v) = is_flash_sale {
            self.is_flash_sale = v;
        }
        if let Some(v) = flash_sale_ends_at {
            self.flash_sale_ends_at = v;
        }
        if let Some(v) = is_daily_deal {
            self.is_daily_deal = v;
        }
        if let Some(v) = deal_ends_at {
            self.deal_ends_at = v;
        }
        if let Some(v) = sku {
            self.sku = v;
        }
        if let Some(v) = attributes {
            self.attributes = v;
        }
        if let Some(v) = package_details {
            self.package_details = v;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ProductAction,
        _ctx: &(),
    ) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock)),
            ProductAction::Sell(quantity) => {
                let quantity = positive(quantity)?;
                self.stock = self.stock.saturating_sub(quantity);
                self.sold_count = self.sold_count.saturating_add(quantity);
                Ok(ProductActionResult::Stock(self.stock_level()))
            }
            ProductAction::Restock(quantity) => {
                let quantity = positive(quantity)?;
                self.stock = self.stock.saturating_add(quantity);
                self.sold_count = self.sold_count.saturating_sub(quantity);
                Ok(ProductActionResult::Stock(self.stock_level()))
            }
            ProductAction::RenameSeller(name) => {
                if name.trim().is_empty() {
                    return Err(ProductError::Validation("seller name must not be empty".into()));
                }
                self.seller_name = name;
                Ok(ProductActionResult::Renamed)
            }
        }
    }
}
