use serde::{Deserialize, Serialize};

/// Operator role as assigned by the platform backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    HostelAdmin,
    Tenant,
    User,
    Custodian,
}

impl Role {
    /// Get the wire representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::HostelAdmin => "hostel_admin",
            Role::Tenant => "tenant",
            Role::User => "user",
            Role::Custodian => "custodian",
        }
    }

    /// Check whether this role receives booking alerts.
    ///
    /// Only hostel admins and custodians operate a hostel day-to-day, so
    /// only they get the polled notification feed.
    pub fn receives_booking_alerts(&self) -> bool {
        matches!(self, Role::HostelAdmin | Role::Custodian)
    }
}

/// Authenticated user account as returned by the auth endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "super::id_string")]
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub role: Role,
    #[serde(default, deserialize_with = "super::opt_id_string")]
    pub hostel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    /// Set transiently after a login where the server demanded a password
    /// change. Never part of the wire payload.
    #[serde(skip)]
    pub password_change_required: bool,
}
