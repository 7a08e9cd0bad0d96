//! Core types for the GreenKart client.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod id;
pub mod order;
pub mod payment;
pub mod product;
pub mod slot;

pub use address::{Address, NewAddress, default_address};
pub use id::*;
pub use order::{OrderItem, OrderRequest, PlacedOrder, PlacedOrderItem};
pub use payment::{PaymentMethod, UnknownPaymentMethod};
pub use product::Product;
pub use slot::Slot;
