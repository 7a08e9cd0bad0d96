//! Product records from the grocery catalog.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};

/// A product as returned by `GET api/products`.
///
/// Immutable once fetched. Prices arrive as JSON numbers, so the money
/// fields go through `rust_decimal::serde::float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "product_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Discounted price, when the product is on sale.
    ///
    /// An explicit `Option`: `Some(0)` is a legitimate sale price of zero,
    /// distinct from "not on sale".
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub sale_price: Option<Decimal>,
    pub category_id: CategoryId,
    pub image_url: String,
}

impl Product {
    /// The price a buyer actually pays: sale price if present, else base.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(price: i64, sale: Option<i64>) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Tomatoes".to_string(),
            price: Decimal::new(price, 0),
            sale_price: sale.map(|s| Decimal::new(s, 0)),
            category_id: CategoryId::new(2),
            image_url: "https://cdn.example.com/tomatoes.png".to_string(),
        }
    }

    #[test]
    fn effective_price_prefers_sale() {
        assert_eq!(product(50, Some(40)).effective_price(), Decimal::new(40, 0));
        assert_eq!(product(50, None).effective_price(), Decimal::new(50, 0));
    }

    #[test]
    fn sale_price_of_zero_is_honored() {
        assert_eq!(product(50, Some(0)).effective_price(), Decimal::ZERO);
    }

    #[test]
    fn deserializes_backend_shape() {
        let json = serde_json::json!({
            "product_id": 3,
            "name": "Basmati Rice",
            "price": 120.5,
            "sale_price": null,
            "category_id": 4,
            "image_url": "https://cdn.example.com/rice.png"
        });
        let p: Product = serde_json::from_value(json).unwrap();
        assert_eq!(p.id, ProductId::new(3));
        assert_eq!(p.price, Decimal::new(1205, 1));
        assert_eq!(p.sale_price, None);
    }

    #[test]
    fn missing_sale_price_field_is_none() {
        let json = serde_json::json!({
            "product_id": 3,
            "name": "Basmati Rice",
            "price": 120,
            "category_id": 4,
            "image_url": ""
        });
        let p: Product = serde_json::from_value(json).unwrap();
        assert_eq!(p.sale_price, None);
    }
}
