//! `ApiClient` implementation.

use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use greenkart_core::{
    Address, AddressId, CategoryId, NewAddress, OrderRequest, PlacedOrder, Product, ProductId, Slot,
};

use crate::config::ClientConfig;
use crate::session::SessionStore;

use super::{ApiError, CheckoutBackend};

const PRODUCTS_CACHE_KEY: &str = "products";
const PRODUCTS_CACHE_TTL: Duration = Duration::from_secs(300);

/// Error body shape used by the backend for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for the GreenKart REST backend.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    session: SessionStore,
    products_cache: Cache<&'static str, Vec<Product>>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let products_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(PRODUCTS_CACHE_TTL)
            .build();

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            session,
            products_cache,
        })
    }

    /// The session store this client reads its bearer token from.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    /// Attach the bearer token when one is present in the session.
    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Fetch the full product catalog.
    ///
    /// Cached for 5 minutes; catalog data changes rarely and every screen
    /// needs it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not parse.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(products) = self.products_cache.get(PRODUCTS_CACHE_KEY).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let url = self.endpoint("api/products")?;
        let products: Vec<Product> = check_json(self.client.get(url).send().await?).await?;

        self.products_cache
            .insert(PRODUCTS_CACHE_KEY, products.clone())
            .await;

        Ok(products)
    }

    /// Fetch products related to one product within a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not parse.
    #[instrument(skip(self), fields(category = %category_id, product = %product_id))]
    pub async fn fetch_related_products(
        &self,
        category_id: CategoryId,
        product_id: ProductId,
    ) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint(&format!("api/products/related/{category_id}/{product_id}"))?;
        check_json(self.client.get(url).send().await?).await
    }

    /// Invalidate the cached product list.
    pub async fn invalidate_products(&self) {
        self.products_cache.invalidate(PRODUCTS_CACHE_KEY).await;
    }

    // =========================================================================
    // Slots
    // =========================================================================

    /// Fetch available delivery slots. Never cached - fetched fresh each
    /// checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not parse.
    #[instrument(skip(self))]
    pub async fn fetch_slots(&self) -> Result<Vec<Slot>, ApiError> {
        let url = self.endpoint("api/slots")?;
        check_json(self.client.get(url).send().await?).await
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// Fetch the logged-in user's saved addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not parse.
    #[instrument(skip(self))]
    pub async fn fetch_addresses(&self) -> Result<Vec<Address>, ApiError> {
        let url = self.endpoint("api/users/addresses")?;
        check_json(self.with_auth(self.client.get(url)).send().await?).await
    }

    /// Create a new address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, address))]
    pub async fn create_address(&self, address: &NewAddress) -> Result<(), ApiError> {
        let url = self.endpoint("api/users/addresses")?;
        check_status(
            self.with_auth(self.client.post(url))
                .json(address)
                .send()
                .await?,
        )
        .await
    }

    /// Mark an address as the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self), fields(address = %address_id))]
    pub async fn set_default_address(&self, address_id: AddressId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("api/users/addresses/{address_id}"))?;
        check_status(
            self.with_auth(self.client.put(url))
                .json(&serde_json::json!({ "is_default": true }))
                .send()
                .await?,
        )
        .await
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self), fields(address = %address_id))]
    pub async fn delete_address(&self, address_id: AddressId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("api/users/addresses/{address_id}"))?;
        check_status(self.with_auth(self.client.delete(url)).send().await?).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Submit an assembled order.
    ///
    /// A 2xx response means the order was accepted; the body is ignored
    /// beyond that. Non-2xx surfaces the server's `error` message through
    /// [`ApiError::Api`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the order.
    #[instrument(skip(self, order), fields(items = order.items.len()))]
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<(), ApiError> {
        let url = self.endpoint("api/orders")?;
        check_status(
            self.with_auth(self.client.post(url))
                .json(order)
                .send()
                .await?,
        )
        .await
    }

    /// Fetch the logged-in user's order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not parse.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<PlacedOrder>, ApiError> {
        let url = self.endpoint("api/orders/my-orders")?;
        check_json(self.with_auth(self.client.get(url)).send().await?).await
    }

    // =========================================================================
    // Auth & Profile
    // =========================================================================

    /// Request a one-time password for the given contact.
    ///
    /// Returns the server's confirmation message, when it sends one.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, contact))]
    pub async fn send_otp(&self, contact: &LoginContact) -> Result<Option<String>, ApiError> {
        let url = self.endpoint("api/users/send-otp")?;
        let body: SendOtpResponse =
            check_json(self.client.post(url).json(contact).send().await?).await?;
        Ok(body.message)
    }

    /// Verify a one-time password and store the returned token in the
    /// session under the fixed token key.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the OTP is rejected.
    #[instrument(skip(self, contact, otp_code))]
    pub async fn verify_otp(&self, contact: &LoginContact, otp_code: &str) -> Result<(), ApiError> {
        let url = self.endpoint("api/users/verify-otp")?;
        let request = VerifyOtpRequest {
            contact: contact.clone(),
            otp_code: otp_code.to_string(),
        };
        let body: VerifyOtpResponse =
            check_json(self.client.post(url).json(&request).send().await?).await?;
        self.session.set_token(body.token.into());
        Ok(())
    }

    /// Fetch the logged-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not parse.
    #[instrument(skip(self))]
    pub async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        let url = self.endpoint("api/users/profile")?;
        check_json(self.with_auth(self.client.get(url)).send().await?).await
    }

    /// Update the logged-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[instrument(skip(self, profile))]
    pub async fn update_profile(&self, profile: &Profile) -> Result<(), ApiError> {
        let url = self.endpoint("api/users/profile")?;
        check_status(
            self.with_auth(self.client.put(url))
                .json(profile)
                .send()
                .await?,
        )
        .await
    }
}

impl CheckoutBackend for ApiClient {
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        Self::fetch_products(self).await
    }

    async fn fetch_addresses(&self) -> Result<Vec<Address>, ApiError> {
        Self::fetch_addresses(self).await
    }

    async fn fetch_slots(&self) -> Result<Vec<Slot>, ApiError> {
        Self::fetch_slots(self).await
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<(), ApiError> {
        Self::submit_order(self, order).await
    }
}

// =============================================================================
// Response Handling
// =============================================================================

/// Check the status and parse a JSON body.
async fn check_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(api_error(status.as_u16(), &text));
    }

    serde_json::from_str(&text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %text.chars().take(500).collect::<String>(),
            "Failed to parse backend response"
        );
        ApiError::Parse(e.to_string())
    })
}

/// Check the status, ignoring any success body.
async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let text = response.text().await.unwrap_or_default();
    Err(api_error(status.as_u16(), &text))
}

/// Build an [`ApiError::Api`], pulling the `error` field out of the body
/// when the backend sent one.
fn api_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty());
    ApiError::Api { status, message }
}

// =============================================================================
// Auth & Profile Types
// =============================================================================

/// The contact a user logs in with. The backend keys the OTP request on
/// either `phone` or `email`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LoginContact {
    Phone { phone: String },
    Email { email: String },
}

impl LoginContact {
    /// Classify raw login input the way the app does: anything containing
    /// an `@` is an email, everything else a phone number.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.contains('@') {
            Self::Email {
                email: input.to_string(),
            }
        } else {
            Self::Phone {
                phone: input.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct VerifyOtpRequest {
    #[serde(flatten)]
    contact: LoginContact,
    otp_code: String,
}

#[derive(Debug, Deserialize)]
struct VerifyOtpResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct SendOtpResponse {
    #[serde(default)]
    message: Option<String>,
}

/// User profile as exchanged with `api/users/profile`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub alternate_email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}
