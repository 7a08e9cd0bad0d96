//! Delivery time slots.

use serde::{Deserialize, Serialize};

use super::id::SlotId;

/// A delivery slot as returned by `GET api/slots`.
///
/// Slot identity is opaque to the client: an id plus a human-readable
/// description. Slot/date compatibility is validated server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(rename = "slot_id")]
    pub id: SlotId,
    #[serde(rename = "slot_details")]
    pub details: String,
}
