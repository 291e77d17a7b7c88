//! Domain models for the hostel console.
//!
//! This module contains the client-side representations of the
//! platform's core entities as returned by its REST API.

pub mod booking;
pub mod session;
pub mod user;

// Re-export all models for convenient access
pub use booking::{Booking, BookingSource, BookingStatus};
pub use session::{Session, UserPatch};
pub use user::{Role, User};

use serde::{Deserialize, Deserializer};

/// Raw identifier as the API may deliver it (some endpoints send numeric
/// ids, others strings).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Deserialize an id field that may arrive as a JSON string or number.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(RawId::into_string)
}

/// Deserialize an optional id field that may arrive as a JSON string,
/// number, null, or be absent entirely.
pub(crate) fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(RawId::into_string))
}
