//! Customer-facing listing rules.
//!
//! Pure functions over products; nothing here is stored.

use crate::model::Product;
use chrono::{DateTime, Utc};

/// Whether `product` may be shown to customers at `now`.
///
/// It must be in stock, and every deal flag that carries an expiry must expire
/// strictly after `now`. A deal flag without an expiry never expires.
pub fn is_active(product: &Product, now: DateTime<Utc>) -> bool {
    if product.stock == 0 {
        return false;
    }
    let live = |flag: bool, ends_at: Option<DateTime<Utc>>| match (flag, ends_at) {
        (true, Some(end)) => end > now,
        _ => true,
    };
    live(product.is_flash_sale, product.flash_sale_ends_at)
        && live(product.is_daily_deal, product.deal_ends_at)
}

/// Newest first.
pub fn sort_newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// The active subset of `products`, keeping their order.
pub fn active_products(products: Vec<Product>, now: DateTime<Utc>) -> Vec<Product> {
    products
        .into_iter()
        .filter(|p| is_active(p, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProductId, UserId};
    use chrono::Duration;

    fn product(stock: u32) -> Product {
        Product {
            id: ProductId::from("p1"),
            seller_id: UserId::from("s1"),
            seller_name: "My Store".into(),
            name: "Widget".into(),
            description: String::new(),
            brand: None,
            price: 1000,
            discount_price: None,
            discount_percentage: None,
            category: "General".into(),
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
            created_at: Utc::now(),
            attributes: Vec::new(),
            package_details: None,
        }
    }

    #[test]
    fn out_of_stock_is_never_active() {
        let now = Utc::now();
        let mut p = product(0);
        p.is_flash_sale = true;
        p.flash_sale_ends_at = Some(now + Duration::days(1));
        assert!(!is_active(&p, now));
    }

    #[test]
    fn plain_product_in_stock_is_active() {
        assert!(is_active(&product(1), Utc::now()));
    }

    #[test]
    fn expired_flash_sale_is_hidden() {
        let now = Utc::now();
        let mut p = product(5);
        p.is_flash_sale = true;
        p.flash_sale_ends_at = Some(now - Duration::minutes(1));
        assert!(!is_active(&p, now));

        p.flash_sale_ends_at = Some(now);
        assert!(!is_active(&p, now), "expiry must be strictly after now");

        p.flash_sale_ends_at = Some(now + Duration::minutes(1));
        assert!(is_active(&p, now));
    }

    #[test]
    fn expired_daily_deal_is_hidden_and_open_deal_is_shown() {
        let now = Utc::now();
        let mut p = product(5);
        p.is_daily_deal = true;
        assert!(is_active(&p, now));

        p.deal_ends_at = Some(now - Duration::hours(2));
        assert!(!is_active(&p, now));
    }

    #[test]
    fn expiry_without_flag_is_ignored() {
        let now = Utc::now();
        let mut p = product(5);
        p.deal_ends_at = Some(now - Duration::hours(2));
        assert!(is_active(&p, now));
    }

    #[test]
    fn sorts_newest_first_and_filters_in_place() {
        let now = Utc::now();
        let mut old = product(3);
        old.id = ProductId::from("old");
        old.created_at = now - Duration::days(2);
        let mut sold_out = product(0);
        sold_out.id = ProductId::from("sold_out");
        sold_out.created_at = now - Duration::days(1);
        let mut new = product(3);
        new.id = ProductId::from("new");
        new.created_at = now;

        let mut all = vec![old, sold_out, new];
        sort_newest_first(&mut all);
        let ids: Vec<_> = active_products(all, now).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![ProductId::from("new"), ProductId::from("old")]);
    }
}
