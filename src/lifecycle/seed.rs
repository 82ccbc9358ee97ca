//! Demo data for empty tables.

use crate::clients::{ProductClient, UserClient};
use crate::error::StorefrontError;
use crate::framework::ActorClient;
use crate::model::{ProductCreate, ProductId, Role, UserCreate, UserId};
use chrono::{DateTime, Duration, Utc};
use tracing::info;

/// Id of the store account created on first start.
pub const DEFAULT_SELLER_ID: &str = "s1";

fn default_seller() -> UserCreate {
    let mut params = UserCreate::new("My Store", "admin@gmail.com", "123456", Role::Seller);
    params.id = Some(UserId::from(DEFAULT_SELLER_ID));
    params
}

#[derive(Clone, Copy)]
enum Deal {
    None,
    FlashSale,
    DailyDeal,
}

struct Listing {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    brand: &'static str,
    category: &'static str,
    image: &'static str,
    price: u64,
    discount_price: Option<u64>,
    stock: u32,
    sold_count: u32,
    seller_id: &'static str,
    seller_name: &'static str,
    rating: f32,
    reviews_count: u32,
    age_hours: i64,
    deal: Deal,
}

const LISTINGS: [Listing; 4] = [
    Listing {
        id: "p1",
        name: "iPhone 15 Pro Max - 256GB",
        description: "The latest flagship from Apple with Titanium design and A17 Pro chip.",
        brand: "Apple",
        category: "Electronics",
        image: "https://picsum.photos/seed/iphone/600/600",
        price: 345_000,
        discount_price: Some(330_000),
        stock: 15,
        sold_count: 35,
        seller_id: "s1",
        seller_name: "Apple Store PK",
        rating: 4.8,
        reviews_count: 120,
        age_hours: 24,
        deal: Deal::FlashSale,
    },
    Listing {
        id: "p2",
        name: "Sony WH-1000XM5 Headphones",
        description: "High-fidelity audio with industry-leading noise cancellation.",
        brand: "Sony",
        category: "Electronics",
        image: "https://picsum.photos/seed/headphone/600/600",
        price: 45_000,
        discount_price: Some(38_000),
        stock: 50,
        sold_count: 50,
        seller_id: "s2",
        seller_name: "TechHub",
        rating: 4.5,
        reviews_count: 85,
        age_hours: 0,
        deal: Deal::DailyDeal,
    },
    Listing {
        id: "p3",
        name: "Leather Bomber Jacket",
        description: "Premium faux leather jacket with ribbed cuffs and collar.",
        brand: "ZARA",
        category: "Fashion",
        image: "https://picsum.photos/seed/jacket/600/600",
        price: 12_000,
        discount_price: Some(8_500),
        stock: 10,
        sold_count: 40,
        seller_id: "s3",
        seller_name: "StyleStudio",
        rating: 4.2,
        reviews_count: 45,
        age_hours: 48,
        deal: Deal::FlashSale,
    },
    Listing {
        id: "p4",
        name: "Ergonomic Office Chair",
        description: "Breathable mesh back with adjustable lumbar support.",
        brand: "Interwood",
        category: "Home & Living",
        image: "https://picsum.photos/seed/chair/600/600",
        price: 25_000,
        discount_price: None,
        stock: 20,
        sold_count: 0,
        seller_id: "s4",
        seller_name: "ModernHome",
        rating: 4.7,
        reviews_count: 30,
        age_hours: 72,
        deal: Deal::None,
    },
];

fn demo_products(now: DateTime<Utc>) -> Vec<ProductCreate> {
    let tomorrow = now + Duration::days(1);
    LISTINGS
        .iter()
        .map(|l| {
            let mut p = ProductCreate::new(l.name, l.price, l.stock, UserId::from(l.seller_id), l.seller_name);
            p.id = Some(ProductId::from(l.id));
            p.description = l.description.to_string();
            p.brand = Some(l.brand.to_string());
            p.category = l.category.to_string();
            p.images = vec![l.image.to_string()];
            p.discount_price = l.discount_price;
            p.total_initial_stock = (l.sold_count > 0).then_some(l.stock + l.sold_count);
            p.sold_count = l.sold_count;
            p.rating = l.rating;
            p.reviews_count = l.reviews_count;
            p.created_at = Some(now - Duration::hours(l.age_hours));
            match l.deal {
                Deal::None => {}
                Deal::FlashSale => {
                    p.is_flash_sale = true;
                    p.flash_sale_ends_at = Some(tomorrow);
                }
                Deal::DailyDeal => {
                    p.is_daily_deal = true;
                    p.deal_ends_at = Some(tomorrow);
                }
            }
            p
        })
        .collect()
}

/// Create the default seller and the demo catalog, each only if its table is empty.
pub async fn seed_demo_data(users: &UserClient, products: &ProductClient) -> Result<(), StorefrontError> {
    if users.all().await?.is_empty() {
        let seller = users.register(default_seller()).await?;
        info!(user_id = %seller.id, "Seeded default seller");
    }
    if products.all().await?.is_empty() {
        let listings = demo_products(Utc::now());
        let count = listings.len();
        for listing in listings {
            products.create_product(listing).await?;
        }
        info!(count, "Seeded demo products");
    }
    Ok(())
}
