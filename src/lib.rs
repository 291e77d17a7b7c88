//! Hostel Console Client Core
//!
//! This module exposes the console's client-side core for use by the
//! binary, tests and embedding shells: session bootstrap, the
//! authentication gateway and the booking-notification poller, all
//! speaking to the platform REST API.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod token_store;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult, AuthError};

use services::{AuthGateway, BookingsClient, NotificationPoller, SessionService};
use std::sync::Arc;
use token_store::{FileTokenStore, TokenStore};

/// Application state wiring the console's shared components together.
///
/// Constructed once by the entry point; consumers receive the `Arc`
/// handles they need instead of reaching for globals.
pub struct ConsoleState {
    pub config: AppConfig,
    pub token_store: Arc<dyn TokenStore>,
    pub auth: Arc<AuthGateway>,
    pub bookings: Arc<BookingsClient>,
    pub session: Arc<SessionService>,
    pub poller: Arc<NotificationPoller>,
}

impl ConsoleState {
    /// Create console state with the default file-backed token store
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let token_store: Arc<dyn TokenStore> =
            Arc::new(FileTokenStore::new(config.token_path.clone()));
        Self::with_token_store(config, token_store)
    }

    /// Create console state around an externally provided token store
    pub fn with_token_store(
        config: AppConfig,
        token_store: Arc<dyn TokenStore>,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.api.timeout())
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))?;

        let auth = Arc::new(AuthGateway::new(
            client.clone(),
            config.api.base_url.clone(),
            Arc::clone(&token_store),
            config.local_admin_enabled,
        ));
        let bookings = Arc::new(BookingsClient::new(
            client,
            config.api.base_url.clone(),
            Arc::clone(&token_store),
        ));
        let session = Arc::new(SessionService::new(Arc::clone(&auth)));
        let poller = Arc::new(
            NotificationPoller::new(Arc::clone(&bookings))
                .with_poll_interval(config.poll_interval()),
        );

        Ok(Self {
            config,
            token_store,
            auth,
            bookings,
            session,
            poller,
        })
    }
}
