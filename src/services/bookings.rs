use std::sync::Arc;

use serde_json::Value;

use crate::error::{AppError, AppResult, AuthError};
use crate::models::Booking;
use crate::services::response::parse_envelope;
use crate::token_store::TokenStore;

/// How many recent bookings a single fetch asks for
pub const RECENT_BOOKINGS_LIMIT: usize = 50;

/// Bearer-authenticated client for the bookings endpoints
pub struct BookingsClient {
    client: reqwest::Client,
    base_url: String,
    token_store: Arc<dyn TokenStore>,
}

impl BookingsClient {
    /// Create a new bookings client against the given API base URL
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token_store: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token_store,
        }
    }

    fn bearer(&self) -> AppResult<String> {
        self.token_store
            .load_token()
            .ok_or_else(|| AppError::Auth(AuthError::InvalidToken))
    }

    async fn get_data(&self, request: reqwest::RequestBuilder) -> AppResult<Value> {
        let token = self.bearer()?;
        let response = request
            .bearer_auth(&token)
            .send()
            .await
            .map_err(AuthError::from)?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("");
        let body = response.text().await.map_err(AuthError::from)?;

        Ok(parse_envelope(status.as_u16(), reason, &body)?)
    }

    /// Fetch the most recent bookings for a hostel, newest-first as the
    /// backend returns them, capped at [`RECENT_BOOKINGS_LIMIT`]
    pub async fn recent_bookings(&self, hostel_id: &str) -> AppResult<Vec<Booking>> {
        let request = self
            .client
            .get(format!("{}/bookings", self.base_url))
            .query(&[("hostel_id", hostel_id)])
            .query(&[("limit", RECENT_BOOKINGS_LIMIT)]);
        let data = self.get_data(request).await?;
        serde_json::from_value(data).map_err(|_| AppError::Auth(AuthError::MalformedShape))
    }

    /// Resolve the hostel assigned to the signed-in custodian
    pub async fn my_hostel(&self) -> AppResult<String> {
        let request = self.client.get(format!("{}/custodians/my-hostel", self.base_url));
        let data = self.get_data(request).await?;

        match data.get("hostel_id") {
            Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => Err(AppError::Auth(AuthError::MalformedShape)),
        }
    }
}
