use crate::model::{ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Products with fewer units than this (but more than zero) show as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
}

/// A catalog listing. Prices are in minor currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub seller_id: UserId,
    pub seller_name: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<u8>,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_initial_stock: Option<u32>,
    #[serde(default)]
    pub sold_count: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub reviews_count: u32,
    #[serde(default)]
    pub is_flash_sale: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash_sale_ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_daily_deal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_ends_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<ProductAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_details: Option<PackageDetails>,
}

impl Product {
    /// What a buyer pays per unit: the discount price when there is one.
    pub fn effective_price(&self) -> u64 {
        self.discount_price.unwrap_or(self.price)
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock > 0 && self.stock < LOW_STOCK_THRESHOLD
    }

    pub fn primary_image(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or_default()
    }
}

/// Payload for adding a product.
///
/// `id` and `created_at` are filled in by the catalog when left empty.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub id: Option<ProductId>,
    pub seller_id: UserId,
    pub seller_name: String,
    pub name: String,
    pub description: String,
    pub brand: Option<String>,
    pub price: u64,
    pub discount_price: Option<u64>,
    pub discount_percentage: Option<u8>,
    pub category: String,
    pub images: Vec<String>,
    pub stock: u32,
    pub total_initial_stock: Option<u32>,
    pub sold_count: u32,
    pub rating: f32,
    pub reviews_count: u32,
    pub is_flash_sale: bool,
    pub flash_sale_ends_at: Option<DateTime<Utc>>,
    pub is_daily_deal: bool,
    pub deal_ends_at: Option<DateTime<Utc>>,
    pub sku: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub attributes: Vec<ProductAttribute>,
    pub package_details: Option<PackageDetails>,
}

impl ProductCreate {
    /// A plain listing with no discount, deal or optional details.
    pub fn new(
        name: impl Into<String>,
        price: u64,
        stock: u32,
        seller_id: UserId,
        seller_name: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            seller_id,
            seller_name: seller_name.into(),
            name: name.into(),
            description: String::new(),
            brand: None,
            price,
            discount_price: None,
            discount_percentage: None,
            category: String::from("General"),
            images: Vec::new(),
            stock,
            total_initial_stock: None,
            sold_count: 0,
            rating: 0.0,
            reviews_count: 0,
            is_flash_sale: false,
            flash_sale_ends_at: None,
            is_daily_deal: false,
            deal_ends_at: None,
            sku: None,
            created_at: None,
            attributes: Vec::new(),
            package_details: None,
        }
    }
}

/// A shallow partial update. `Some(None)` on a nullable field clears it.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<Option<String>>,
    pub price: Option<u64>,
    pub discount_price: Option<Option<u64>>,
    pub discount_percentage: Option<Option<u8>>,
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
    pub stock: Option<u32>,
    pub total_initial_stock: Option<Option<u32>>,
    pub is_flash_sale: Option<bool>,
    pub flash_sale_ends_at: Option<Option<DateTime<Utc>>>,
    pub is_daily_deal: Option<bool>,
    pub deal_ends_at: Option<Option<DateTime<Utc>>>,
    pub sku: Option<Option<String>>,
    pub attributes: Option<Vec<ProductAttribute>>,
    pub package_details: Option<Option<PackageDetails>>,
}

/// A product in a buyer's cart. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    pub fn unit_price(&self) -> u64 {
        self.product.effective_price()
    }

    pub fn line_total(&self) -> u64 {
        self.unit_price() * u64::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: u64, discount: Option<u64>, stock: u32) -> Product {
        Product {
            id: ProductId::from("p1"),
            seller_id: UserId::from("s1"),
            seller_name: "My Store".into(),
            name: "Widget".into(),
            description: String::new(),
            brand: None,
            price,
            discount_price: discount,
            discount_percentage: None,
            category: "General".into(),
            images: vec!["a.png".into(), "b.png".into()],
            stock,
            total_initial_stock: None,
            sold_count: 0,
            rating: 0.0,
            reviews_count: 0,
            is_flash_sale: false,
            flash_sale_ends_at: None,
            is_daily_deal: false,
            deal_ends_at: None,
            sku: None,
            created_at: Utc::now(),
            attributes: Vec::new(),
            package_details: None,
        }
    }

    #[test]
    fn effective_price_prefers_discount() {
        assert_eq!(product(1000, Some(800), 1).effective_price(), 800);
        assert_eq!(product(1000, None, 1).effective_price(), 1000);
        assert_eq!(CartItem::new(product(1000, Some(800), 5), 3).line_total(), 2400);
    }

    #[test]
    fn low_stock_excludes_sold_out() {
        assert!(!product(1, None, 0).is_low_stock());
        assert!(product(1, None, 9).is_low_stock());
        assert!(!product(1, None, 10).is_low_stock());
    }

    #[test]
    fn missing_sold_count_defaults_to_zero() {
        let json = serde_json::json!({
            "id": "p9", "sellerId": "s1", "sellerName": "My Store", "name": "Lamp",
            "description": "", "price": 2500, "category": "Home", "stock": 4,
            "createdAt": "2024-05-01T10:00:00Z"
        });
        let p: Product = serde_json::from_value(json).unwrap();
        assert_eq!(p.sold_count, 0);
        assert_eq!(p.primary_image(), "");
        assert!(!p.is_flash_sale);
    }
}
