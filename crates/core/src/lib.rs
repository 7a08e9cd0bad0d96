//! GreenKart Core - Shared domain types.
//!
//! This crate provides common types used across all GreenKart client
//! components:
//! - `client` - Cart and checkout engine talking to the grocery backend
//! - `cli` - Headless command-line front end for manual testing
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Serde
//! attributes on these types define the backend wire contract (snake_case
//! field names like `product_id` and `slot_details`).
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, products, addresses, slots, orders, payment

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
