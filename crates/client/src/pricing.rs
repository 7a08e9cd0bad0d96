//! Pure derivation of priced line items and totals from cart state and the
//! product catalog.
//!
//! Nothing here is cached or stored: line items are recomputed from a cart
//! snapshot on every read so they always reflect the latest cart. Cart
//! entries whose product is missing from the catalog are silently skipped -
//! that is the catalog-not-yet-loaded race, not an error.

use rust_decimal::Decimal;

use greenkart_core::{OrderItem, Product};

use crate::cart::CartStore;
use crate::catalog::ProductCatalog;

/// Flat shipping fee added on top of the cart subtotal at checkout.
pub const SHIPPING_FEE: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// One product's priced contribution to the cart, derived on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub product: Product,
    pub quantity: u32,
    /// Sale price if present, else base price.
    pub unit_price: Decimal,
    /// `unit_price * quantity`.
    pub amount: Decimal,
}

impl LineItem {
    fn new(product: Product, quantity: u32) -> Self {
        let unit_price = product.effective_price();
        let amount = unit_price * Decimal::from(quantity);
        Self {
            product,
            quantity,
            unit_price,
            amount,
        }
    }

    /// The order-payload form of this line.
    #[must_use]
    pub fn to_order_item(&self) -> OrderItem {
        OrderItem {
            id: self.product.id,
            quantity: self.quantity,
            price: self.unit_price,
        }
    }
}

/// Derive the priced line items for the current cart, ordered by product
/// id. Entries without a catalog match are excluded.
#[must_use]
pub fn line_items(cart: &CartStore, catalog: &ProductCatalog) -> Vec<LineItem> {
    cart.snapshot()
        .into_iter()
        .filter_map(|(id, quantity)| {
            catalog
                .get(id)
                .map(|product| LineItem::new(product.clone(), quantity))
        })
        .collect()
}

/// Sum of line amounts over the resolvable cart entries.
#[must_use]
pub fn cart_subtotal(cart: &CartStore, catalog: &ProductCatalog) -> Decimal {
    line_items(cart, catalog)
        .iter()
        .map(|line| line.amount)
        .sum()
}

/// Checkout total: subtotal plus the flat shipping fee.
#[must_use]
pub fn order_total(subtotal: Decimal) -> Decimal {
    subtotal + SHIPPING_FEE
}
