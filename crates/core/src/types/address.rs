//! Saved delivery addresses.

use serde::{Deserialize, Serialize};

use super::id::AddressId;

/// A saved address as returned by `GET api/users/addresses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "address_id")]
    pub id: AddressId,
    pub name: String,
    pub phone: String,
    #[serde(rename = "address_line1")]
    pub line1: String,
    #[serde(rename = "address_line2", default)]
    pub line2: Option<String>,
    #[serde(rename = "address_line3", default)]
    pub line3: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Single-line form used in the order payload: `"line1, city - pincode"`.
    #[must_use]
    pub fn order_line(&self) -> String {
        format!("{}, {} - {}", self.line1, self.city, self.pincode)
    }
}

/// Payload for `POST api/users/addresses`.
#[derive(Debug, Clone, Serialize)]
pub struct NewAddress {
    pub name: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: String,
    pub address_line3: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    /// The first address a user creates becomes their default.
    pub is_default: bool,
}

/// Pick the address to preselect at checkout: the first one flagged as
/// default, or the first in the list when none is flagged.
#[must_use]
pub fn default_address(addresses: &[Address]) -> Option<&Address> {
    addresses
        .iter()
        .find(|a| a.is_default)
        .or_else(|| addresses.first())
}
