use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Notification window for non-pending online bookings, in days
pub const ATTENTION_WINDOW_DAYS: f64 = 7.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Booking lifecycle status.
///
/// The backend's status set is open-ended; values outside the known ones
/// collapse to `Unknown` so a single odd record cannot sink a whole
/// fetch. Unknown statuses never count as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    Unknown,
}

impl<'de> Deserialize<'de> for BookingStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "pending" => BookingStatus::Pending,
            "confirmed" => BookingStatus::Confirmed,
            "checked_in" => BookingStatus::CheckedIn,
            "checked_out" => BookingStatus::CheckedOut,
            "cancelled" => BookingStatus::Cancelled,
            _ => BookingStatus::Unknown,
        })
    }
}

/// Where a booking was created. Unrecognized sources collapse to
/// `Unknown` and never count as online.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingSource {
    Online,
    OnSite,
    Unknown,
}

impl<'de> Deserialize<'de> for BookingSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "online" => BookingSource::Online,
            "on_site" => BookingSource::OnSite,
            _ => BookingSource::Unknown,
        })
    }
}

/// Booking record as returned by the bookings endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(deserialize_with = "super::id_string")]
    pub id: String,
    pub student_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_phone: Option<String>,
    #[serde(default, deserialize_with = "super::opt_id_string")]
    pub room_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<BookingSource>,
}

impl Booking {
    /// Age of the booking in days at `now`, with millisecond precision
    pub fn age_days(&self, now: DateTime<Utc>) -> f64 {
        (now - self.created_at).num_milliseconds() as f64 / MILLIS_PER_DAY
    }

    /// Check whether this booking belongs in the operator's notification
    /// feed at `now`.
    ///
    /// Pending bookings always need attention no matter how old they are.
    /// Anything else only qualifies when it was made online within the
    /// last seven days (inclusive).
    pub fn needs_attention(&self, now: DateTime<Utc>) -> bool {
        if self.status == BookingStatus::Pending {
            return true;
        }
        self.source == Some(BookingSource::Online)
            && self.age_days(now) <= ATTENTION_WINDOW_DAYS
    }
}
