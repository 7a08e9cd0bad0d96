//! Read-only listing commands: catalog, slots, addresses, order history.

use super::{CliError, connect};

/// List the product catalog.
pub async fn products() -> Result<(), CliError> {
    let (api, _session) = connect(None)?;
    let products = api.fetch_products().await?;

    tracing::info!("{} products", products.len());
    for product in products {
        match product.sale_price {
            Some(sale) => tracing::info!(
                "  [{}] {} - {} (was {})",
                product.id,
                product.name,
                sale,
                product.price
            ),
            None => tracing::info!("  [{}] {} - {}", product.id, product.name, product.price),
        }
    }
    Ok(())
}

/// List the delivery slots.
pub async fn slots() -> Result<(), CliError> {
    let (api, _session) = connect(None)?;
    let slots = api.fetch_slots().await?;

    tracing::info!("{} delivery slots", slots.len());
    for slot in slots {
        tracing::info!("  [{}] {}", slot.id, slot.details);
    }
    Ok(())
}

/// List the saved delivery addresses.
pub async fn addresses(token: String) -> Result<(), CliError> {
    let (api, _session) = connect(Some(token))?;
    let addresses = api.fetch_addresses().await?;

    tracing::info!("{} saved addresses", addresses.len());
    for address in addresses {
        let marker = if address.is_default { " (default)" } else { "" };
        tracing::info!("  [{}] {}{}", address.id, address.order_line(), marker);
    }
    Ok(())
}

/// List past orders.
pub async fn orders(token: String) -> Result<(), CliError> {
    let (api, _session) = connect(Some(token))?;
    let orders = api.my_orders().await?;

    tracing::info!("{} past orders", orders.len());
    for order in orders {
        tracing::info!(
            "  [{}] {} - {} via {} - {}",
            order.order_id,
            order.status,
            order.total,
            order.payment_method,
            order.address
        );
        for item in order.items {
            tracing::info!("      {}x {} @ {}", item.quantity, item.name, item.price);
        }
    }
    Ok(())
}
