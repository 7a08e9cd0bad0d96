//! Command implementations for the GreenKart CLI.

use secrecy::SecretString;
use thiserror::Error;

use greenkart_client::checkout::CheckoutError;
use greenkart_client::{ApiClient, ApiError, ClientConfig, ConfigError, SessionStore};

pub mod browse;
pub mod checkout;
pub mod login;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Client configuration could not be loaded from the environment.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A backend request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The checkout session refused the operation.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// A `--item` argument did not parse.
    #[error("invalid cart item {0:?}: expected <product-id>:<quantity>")]
    InvalidCartItem(String),
}

/// Build an API client from the environment, seeding the session with a
/// token when one is given.
pub fn connect(token: Option<String>) -> Result<(ApiClient, SessionStore), CliError> {
    let config = ClientConfig::from_env()?;
    let session = SessionStore::new();
    if let Some(token) = token {
        session.set_token(SecretString::from(token));
    }
    let api = ApiClient::new(&config, session.clone())?;
    Ok((api, session))
}
