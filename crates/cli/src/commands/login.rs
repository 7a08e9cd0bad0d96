//! OTP login commands.

use secrecy::ExposeSecret;

use greenkart_client::api::LoginContact;

use super::{CliError, connect};

/// Request an OTP for the given phone number or email.
pub async fn send(contact: &str) -> Result<(), CliError> {
    let (api, _session) = connect(None)?;
    let contact = LoginContact::parse(contact);

    let message = api.send_otp(&contact).await?;
    match message {
        Some(message) => tracing::info!("OTP requested: {message}"),
        None => tracing::info!("OTP requested"),
    }
    Ok(())
}

/// Verify an OTP and print the resulting auth token.
pub async fn verify(contact: &str, otp: &str) -> Result<(), CliError> {
    let (api, session) = connect(None)?;
    let contact = LoginContact::parse(contact);

    api.verify_otp(&contact, otp).await?;

    match session.token() {
        // The token is the command's output; later commands take it as -t.
        Some(token) => tracing::info!("Logged in. Token: {}", token.expose_secret()),
        None => tracing::warn!("Login succeeded but the server returned no token"),
    }
    Ok(())
}
