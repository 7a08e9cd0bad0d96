//! GreenKart client library - cart and checkout engine.
//!
//! This crate holds the client-side logic of the grocery ordering app:
//! an in-memory cart keyed by product, derived pricing over a fetched
//! catalog, delivery-date scheduling under a 9 AM cutoff rule, and a
//! checkout session that composes all of it into an order submission.
//!
//! # Architecture
//!
//! - [`ApiClient`](api::ApiClient) - REST client for the grocery backend
//!   (`reqwest`, bearer auth from the session store, `moka` catalog cache)
//! - [`CartStore`](cart::CartStore) - injectable shared cart state
//! - [`pricing`] - pure derivation of line items and totals
//! - [`schedule`] - cutoff-time delivery window, injected clock
//! - [`CheckoutSession`](checkout::CheckoutSession) - the state machine
//!   from session init through order submission
//!
//! # Example
//!
//! ```rust,ignore
//! use greenkart_client::{ApiClient, CartStore, CheckoutSession, SessionStore};
//!
//! let session = SessionStore::new();
//! let api = ApiClient::new(&config, session.clone())?;
//! let cart = CartStore::new();
//! cart.add(product.id);
//!
//! let checkout = CheckoutSession::new(api, cart, chrono::Local::now().naive_local());
//! checkout.load().await;
//! checkout.confirm().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod pricing;
pub mod schedule;
pub mod session;

pub use api::{ApiClient, ApiError, CheckoutBackend};
pub use cart::CartStore;
pub use catalog::ProductCatalog;
pub use checkout::{CheckoutError, CheckoutPhase, CheckoutSession};
pub use config::{ClientConfig, ConfigError};
pub use schedule::DeliveryWindow;
pub use session::SessionStore;
