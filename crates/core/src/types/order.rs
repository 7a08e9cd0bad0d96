//! Order submission payloads and order history records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, ProductId, SlotId};
use super::payment::PaymentMethod;

/// One priced line of an order submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Wire name is `id`, not `product_id`, in the order contract.
    pub id: ProductId,
    pub quantity: u32,
    /// Effective unit price at the moment of confirmation.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// The body of `POST api/orders`.
///
/// Constructed fresh per submission and never mutated afterwards. Field
/// names are the external contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Cart subtotal plus the flat shipping fee.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Formatted delivery address: `"line1, city - pincode"`.
    pub address: String,
    pub slot_id: SlotId,
    /// ISO `YYYY-MM-DD` delivery date.
    pub slot_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderItem>,
}

/// A past order as returned by `GET api/orders/my-orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    pub status: String,
    pub payment_method: String,
    #[serde(default)]
    pub payment_status: Option<String>,
    pub address: String,
    #[serde(default)]
    pub slot_details: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub items: Vec<PlacedOrderItem>,
}

/// One line of a past order.
#[derive(Debug, Clone, Deserialize)]
pub struct PlacedOrderItem {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}
