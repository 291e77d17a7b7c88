use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::AppResult;
use crate::models::{Session, User, UserPatch};
use crate::services::AuthGateway;

/// Single source of truth for "who is signed in".
///
/// An explicitly constructed instance injected into consumers; the
/// application entry point owns its lifecycle. All network interaction
/// goes through the auth gateway.
pub struct SessionService {
    gateway: Arc<AuthGateway>,
    state: RwLock<Session>,
}

impl SessionService {
    /// Create a fresh, unresolved session backed by the given gateway
    pub fn new(gateway: Arc<AuthGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(Session::default()),
        }
    }

    /// Resolve a user from the persisted token at startup.
    ///
    /// Never fails from the caller's point of view: network errors and
    /// invalid tokens both resolve to an unauthenticated session. The
    /// loading flag is set for the duration of the attempt.
    pub async fn initialize(&self) {
        {
            let mut state = self.state.write().await;
            state.is_loading = true;
        }

        let user = self.gateway.get_current_user().await;
        match &user {
            Some(u) => info!("Restored session for {} ({})", u.name, u.role.as_str()),
            None => debug!("No restorable session"),
        }

        let mut state = self.state.write().await;
        state.user = user;
        state.is_loading = false;
    }

    /// Sign in. On success the session becomes authenticated; on failure
    /// the error propagates to the caller (the login form shows it) and
    /// the session stays unauthenticated.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        challenge_token: Option<&str>,
    ) -> AppResult<User> {
        {
            let mut state = self.state.write().await;
            state.is_loading = true;
        }

        let result = self.gateway.login(identifier, password, challenge_token).await;

        let mut state = self.state.write().await;
        state.is_loading = false;
        match result {
            Ok(user) => {
                state.user = Some(user.clone());
                Ok(user)
            }
            Err(e) => {
                state.user = None;
                Err(e)
            }
        }
    }

    /// Sign out and reset the session to its pristine app-start state.
    ///
    /// The gateway removes the local token before its network call, so the
    /// in-memory reset here can never race a still-valid stored credential.
    /// The consuming shell is expected to navigate back to its sign-in
    /// entry point afterwards rather than keep any view state alive.
    pub async fn logout(&self) {
        self.gateway.logout().await;
        let mut state = self.state.write().await;
        *state = Session::default();
        info!("Session closed");
    }

    /// Shallow-merge profile changes into the signed-in user; no-op when
    /// unauthenticated
    pub async fn update_user(&self, patch: UserPatch) {
        let mut state = self.state.write().await;
        if let Some(user) = state.user.as_mut() {
            user.apply(patch);
        }
    }

    /// Clone of the current session state
    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    /// Clone of the signed-in user, if any
    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    /// Whether a user is currently signed in
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    /// Whether a resolution or login attempt is in flight
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }
}
