use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{AppResult, AuthError};
use crate::models::{Role, User};
use crate::services::response::{parse_envelope, status_message};
use crate::token_store::TokenStore;

/// Credentials recognized for the offline super-admin session.
///
/// This bypass exists for environments without a reachable backend and is
/// gated by `LOCAL_ADMIN_ENABLED`; it short-circuits before any HTTP call.
pub const LOCAL_ADMIN_IDENTIFIER: &str = "matthew";
pub const LOCAL_ADMIN_PASSWORD: &str = "1100211Matt.";

/// Reserved token value denoting the local, backend-less session
pub const LOCAL_SESSION_TOKEN: &str = "hostel-console.local-admin";

#[derive(Serialize)]
struct LoginRequest<'a> {
    identifier: &'a str,
    password: &'a str,
    #[serde(rename = "challengeToken", skip_serializing_if = "Option::is_none")]
    challenge_token: Option<&'a str>,
}

/// Normalized outcome of a successful login response
#[derive(Debug)]
pub(crate) struct LoginPayload {
    pub token: String,
    pub user: User,
    pub requires_password_change: bool,
}

/// All HTTP interaction for authentication.
///
/// Owns token persistence: it is the only component allowed to write the
/// token store. Normalizes the backend's response variance (flat vs nested
/// payloads, inconsistent error bodies) into the [`AuthError`] taxonomy.
pub struct AuthGateway {
    client: reqwest::Client,
    base_url: String,
    token_store: Arc<dyn TokenStore>,
    local_admin_enabled: bool,
}

impl AuthGateway {
    /// Create a new gateway against the given API base URL
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token_store: Arc<dyn TokenStore>,
        local_admin_enabled: bool,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token_store,
            local_admin_enabled,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The fixed user synthesized for the local super-admin session
    fn local_admin_user() -> User {
        User {
            id: "local-super-admin".to_string(),
            email: "superadmin@local".to_string(),
            name: "Super Admin".to_string(),
            username: Some(LOCAL_ADMIN_IDENTIFIER.to_string()),
            role: Role::SuperAdmin,
            hostel_id: None,
            profile_picture: None,
            password_change_required: false,
        }
    }

    /// Authenticate against the platform and persist the issued token.
    ///
    /// Failures map onto the [`AuthError`] taxonomy so the login form can
    /// show the server's own message where one exists.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        challenge_token: Option<&str>,
    ) -> AppResult<User> {
        if self.local_admin_enabled
            && identifier == LOCAL_ADMIN_IDENTIFIER
            && password == LOCAL_ADMIN_PASSWORD
        {
            info!("Starting local super-admin session (no backend)");
            self.token_store.save_token(LOCAL_SESSION_TOKEN)?;
            self.token_store.set_password_change_required(false)?;
            return Ok(Self::local_admin_user());
        }

        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest {
                identifier,
                password,
                challenge_token,
            })
            .send()
            .await
            .map_err(AuthError::from)?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("");
        // Never assume the body is non-empty or valid JSON
        let body = response.text().await.map_err(AuthError::from)?;

        let payload = parse_login_response(status.as_u16(), reason, &body)?;

        self.token_store.save_token(&payload.token)?;
        self.token_store
            .set_password_change_required(payload.requires_password_change)?;

        let mut user = payload.user;
        user.password_change_required = payload.requires_password_change;
        info!("Signed in as {} ({})", user.name, user.role.as_str());
        Ok(user)
    }

    /// Revoke the current session.
    ///
    /// The local token is removed before the network call, so a failed
    /// call can never leave a revoked-looking but still-valid session.
    /// Network failure is logged, never returned.
    pub async fn logout(&self) {
        let token = self.token_store.load_token();
        self.token_store.clear_token();

        let token = match token {
            // Nothing to revoke remotely for a local session
            Some(t) if t != LOCAL_SESSION_TOKEN => t,
            _ => return,
        };

        match self
            .client
            .post(self.url("/auth/logout"))
            .bearer_auth(&token)
            .send()
            .await
        {
            Ok(_) => debug!("Logout acknowledged by server"),
            Err(e) => warn!("Logout call failed (token already removed locally): {}", e),
        }
    }

    /// Resolve the signed-in user from the persisted token.
    ///
    /// Returns `None` on every failure. The token is evicted whenever the
    /// server actually answered and the answer proves it unusable; a
    /// transport-level failure keeps the token, since connectivity loss is
    /// not proof of revocation.
    pub async fn get_current_user(&self) -> Option<User> {
        let token = self.token_store.load_token()?;

        if token == LOCAL_SESSION_TOKEN {
            if self.local_admin_enabled {
                return Some(Self::local_admin_user());
            }
            // Bypass since disabled: the sentinel is no longer honored
            self.token_store.clear_token();
            return None;
        }

        let response = match self
            .client
            .get(self.url("/auth/profile"))
            .bearer_auth(&token)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Profile fetch failed, keeping token: {}", e);
                return None;
            }
        };

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("");
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                warn!("Profile body read failed, keeping token: {}", e);
                return None;
            }
        };

        match parse_profile_response(status.as_u16(), reason, &body) {
            Ok(user) => Some(user),
            Err(AuthError::InvalidToken) => {
                info!("Stored session token is no longer valid, clearing it");
                self.token_store.clear_token();
                None
            }
            Err(e) => {
                warn!("Profile fetch returned an unusable response ({}), clearing token", e);
                self.token_store.clear_token();
                None
            }
        }
    }
}

/// Parse a login response body into a normalized token/user pair.
///
/// Accepts both shapes the backend emits: flat `{token, user}` and nested
/// `{data: {token, user}}`.
pub(crate) fn parse_login_response(
    status: u16,
    reason: &str,
    body: &str,
) -> Result<LoginPayload, AuthError> {
    if !(200..300).contains(&status) {
        return Err(AuthError::BadStatus {
            status,
            message: status_message(status, reason, body),
        });
    }
    if body.trim().is_empty() {
        return Err(AuthError::EmptyBody);
    }
    let value: Value = serde_json::from_str(body).map_err(|_| AuthError::MalformedJson)?;
    if value.get("success").and_then(Value::as_bool) != Some(true) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "login rejected by server".to_string());
        return Err(AuthError::Rejected(message));
    }

    let scopes = [Some(&value), value.get("data")];
    for scope in scopes.into_iter().flatten() {
        let token = scope.get("token").and_then(Value::as_str);
        let user_value = scope.get("user");
        if let (Some(token), Some(user_value)) = (token, user_value) {
            let user: User = serde_json::from_value(user_value.clone())
                .map_err(|_| AuthError::MalformedShape)?;
            let requires_password_change = value
                .get("requiresPasswordChange")
                .or_else(|| scope.get("requiresPasswordChange"))
                .and_then(Value::as_bool)
                .unwrap_or(false);
            return Ok(LoginPayload {
                token: token.to_string(),
                user,
                requires_password_change,
            });
        }
    }

    Err(AuthError::MalformedShape)
}

/// Parse a profile response body into the signed-in user
pub(crate) fn parse_profile_response(
    status: u16,
    reason: &str,
    body: &str,
) -> Result<User, AuthError> {
    let data = parse_envelope(status, reason, body)?;
    let user_value = data.get("user").ok_or(AuthError::MalformedShape)?;
    serde_json::from_value(user_value.clone()).map_err(|_| AuthError::MalformedShape)
}
