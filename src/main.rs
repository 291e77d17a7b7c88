//! Hostel Console Monitor
//!
//! Headless entry point for the console's client core. It restores (or
//! opens) an operator session against the platform REST API and, for
//! hostel admins and custodians, runs the booking-notification poller
//! until interrupted.

use hostel_console::config::AppConfig;
use hostel_console::error::{AppError, AppResult};
use hostel_console::services::badge_label;
use hostel_console::ConsoleState;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    // Initialize tracing/logging with config
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("hostel_console={},reqwest=warn", config.log_level).into()
            }),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║           Hostel Console Monitor Starting                 ║");
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);
    info!("API base URL: {}", config.api_base_url());
    info!("Poll interval: {}s", config.poll_interval_secs);

    // =========================================================================
    // SESSION BOOTSTRAP
    // =========================================================================
    let credentials = config
        .login_identifier
        .clone()
        .zip(config.login_password.clone());

    let state = ConsoleState::new(config)?;
    info!("✓ Console state initialized");

    state.session.initialize().await;

    if !state.session.is_authenticated().await {
        match credentials {
            Some((identifier, password)) => {
                info!("No restorable session; signing in as {}", identifier);
                let user = state.session.login(&identifier, &password, None).await.map_err(|e| {
                    error!("Sign-in failed: {}", e);
                    e
                })?;
                if user.password_change_required {
                    warn!("The server requires a password change for this account");
                }
            }
            None => {
                error!("No session could be restored and no CONSOLE_IDENTIFIER/CONSOLE_PASSWORD were provided");
                return Err(AppError::Message(
                    "not signed in; set CONSOLE_IDENTIFIER and CONSOLE_PASSWORD or sign in via the console".to_string(),
                ));
            }
        }
    }

    let user = state
        .session
        .current_user()
        .await
        .ok_or_else(|| AppError::Message("session lost during startup".to_string()))?;
    info!("✓ Signed in as {} ({})", user.name, user.role.as_str());

    // =========================================================================
    // BACKGROUND TASKS
    // =========================================================================
    let poller_handle = match state.poller.resolve_hostel(&user).await {
        Some(hostel_id) => {
            let handle = state.poller.clone().spawn(hostel_id);
            info!("✓ Booking notification poller started");
            Some(handle)
        }
        None => {
            info!("Role {} does not receive booking alerts; poller idle", user.role.as_str());
            None
        }
    };

    // Periodic badge report while we wait for shutdown
    let report_poller = state.poller.clone();
    let report_handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(60));
        ticker.tick().await; // skip the immediate tick
        loop {
            ticker.tick().await;
            let count = report_poller.unread_count().await;
            info!("Bookings needing attention: {}", badge_label(count));
        }
    });

    info!("Monitor running. Press Ctrl+C to stop.");
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }

    // =========================================================================
    // SHUTDOWN
    // =========================================================================
    info!("Shutting down...");
    report_handle.abort();
    if let Some(handle) = poller_handle {
        handle.stop();
    }
    info!("Goodbye");

    Ok(())
}
