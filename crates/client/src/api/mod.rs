//! REST client for the GreenKart grocery backend.
//!
//! # Architecture
//!
//! - Plain JSON over `reqwest`; the backend is the source of truth
//! - Bearer token attached from the [`SessionStore`](crate::session::SessionStore)
//!   when present; requests without a token go out unauthenticated and fail
//!   server-side through ordinary error handling
//! - Product list cached in-memory via `moka` (5 minute TTL); slots and
//!   addresses are always fetched fresh
//!
//! # Example
//!
//! ```rust,ignore
//! use greenkart_client::{ApiClient, ClientConfig, SessionStore};
//!
//! let config = ClientConfig::from_env()?;
//! let api = ApiClient::new(&config, SessionStore::new())?;
//!
//! let products = api.fetch_products().await?;
//! let slots = api.fetch_slots().await?;
//! ```

mod client;

pub use client::{ApiClient, LoginContact, Profile};

use greenkart_core::{Address, OrderRequest, Product, Slot};
use thiserror::Error;

/// Errors that can occur when talking to the grocery backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connectivity, timeout, malformed response).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request completed but the server returned an error status.
    ///
    /// `message` carries the body's `error` field verbatim when present.
    #[error("API error: {status} - {}", message.as_deref().unwrap_or("(no message)"))]
    Api { status: u16, message: Option<String> },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Failed to build a request URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Whether this is a completed request the server rejected, as opposed
    /// to a transport-level failure.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// The backend operations a checkout session depends on.
///
/// [`ApiClient`] is the production implementation; tests drive the session
/// through an in-memory fake.
pub trait CheckoutBackend: Send + Sync {
    /// Fetch the product catalog.
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// Fetch the user's saved addresses.
    fn fetch_addresses(&self) -> impl Future<Output = Result<Vec<Address>, ApiError>> + Send;

    /// Fetch available delivery slots.
    fn fetch_slots(&self) -> impl Future<Output = Result<Vec<Slot>, ApiError>> + Send;

    /// Submit an assembled order.
    fn submit_order(&self, order: &OrderRequest)
    -> impl Future<Output = Result<(), ApiError>> + Send;
}
