//! The end-to-end checkout command: build a cart, open a session, apply
//! selection overrides, and confirm the order.

use chrono::NaiveDate;

use greenkart_client::{CartStore, CheckoutSession};
use greenkart_core::{AddressId, PaymentMethod, ProductId, SlotId};

use super::{CliError, connect};

/// Optional selection overrides; anything left `None` keeps the session's
/// default.
pub struct Overrides {
    pub address: Option<i64>,
    pub slot: Option<i64>,
    pub date: Option<NaiveDate>,
    pub payment: Option<PaymentMethod>,
}

/// Place an order for the given `<product-id>:<quantity>` items.
pub async fn place_order(
    token: String,
    items: &[String],
    overrides: &Overrides,
) -> Result<(), CliError> {
    let (api, _session) = connect(Some(token))?;

    let cart = CartStore::new();
    for spec in items {
        let (id, quantity) = parse_item(spec)?;
        for _ in 0..quantity {
            cart.increment(id);
        }
    }

    let checkout = CheckoutSession::new(api, cart, chrono::Local::now().naive_local());
    checkout.load().await;

    if let Some(id) = overrides.address {
        checkout.select_address(AddressId::new(id))?;
    }
    if let Some(id) = overrides.slot {
        checkout.select_slot(SlotId::new(id))?;
    }
    if let Some(date) = overrides.date {
        checkout.select_date(date)?;
    }
    if let Some(method) = overrides.payment {
        checkout.select_payment(method);
    }

    for line in checkout.line_items() {
        tracing::info!(
            "  {}x {} @ {} = {}",
            line.quantity,
            line.product.name,
            line.unit_price,
            line.amount
        );
    }
    tracing::info!("Subtotal: {}", checkout.subtotal());
    tracing::info!("Total with shipping: {}", checkout.total());
    if let Some(date) = checkout.selected_date() {
        tracing::info!("Delivery: {} via {}", date, checkout.payment_method());
    }

    checkout.confirm().await?;
    tracing::info!("Order placed");
    Ok(())
}

/// Parse `<product-id>:<quantity>`; a bare `<product-id>` means quantity 1.
fn parse_item(spec: &str) -> Result<(ProductId, u32), CliError> {
    let invalid = || CliError::InvalidCartItem(spec.to_string());
    let (id, quantity) = match spec.split_once(':') {
        Some((id, quantity)) => (id, quantity.parse::<u32>().map_err(|_| invalid())?),
        None => (spec, 1),
    };
    let id = id.trim().parse::<ProductId>().map_err(|_| invalid())?;
    if quantity == 0 {
        return Err(invalid());
    }
    Ok((id, quantity))
}
