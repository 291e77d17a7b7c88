use std::env;
use std::time::Duration;

/// REST API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub poll_interval_secs: u64,
    pub token_path: String,
    pub log_level: String,
    pub environment: String,
    /// Allow the offline super-admin credential bypass. Defaults to true
    /// only in the development environment.
    pub local_admin_enabled: bool,
    /// Optional operator credentials for headless sign-in at startup
    pub login_identifier: Option<String>,
    pub login_password: Option<String>,
}

impl ApiConfig {
    /// Create API config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api".to_string());

        let timeout_secs = env::var("API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(15);

        if base_url.trim().is_empty() {
            return Err("API_BASE_URL must not be empty".to_string());
        }

        if timeout_secs == 0 {
            return Err("API_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(Self {
            // Trailing slashes break naive path joining
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: 15,
        }
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let api = ApiConfig::from_env()?;

        let poll_interval_secs = env::var("POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let token_path = env::var("SESSION_TOKEN_PATH")
            .unwrap_or_else(|_| ".hostel-console/token".to_string());

        let log_level = env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string());

        let environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string());

        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, valid_log_levels
            ));
        }

        // Validate environment
        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&environment.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid ENVIRONMENT: {}. Must be one of: {:?}",
                environment, valid_environments
            ));
        }

        if poll_interval_secs == 0 {
            return Err("POLL_INTERVAL_SECS must be greater than 0".to_string());
        }

        let environment = environment.to_lowercase();

        let local_admin_enabled = env::var("LOCAL_ADMIN_ENABLED")
            .ok()
            .and_then(|s| s.parse::<bool>().ok())
            .unwrap_or(environment == "development");

        let login_identifier = env::var("CONSOLE_IDENTIFIER").ok();
        let login_password = env::var("CONSOLE_PASSWORD").ok();

        Ok(Self {
            api,
            poll_interval_secs,
            token_path,
            log_level: log_level.to_lowercase(),
            environment,
            local_admin_enabled,
            login_identifier,
            login_password,
        })
    }

    /// Get poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Get API base URL (convenience method)
    pub fn api_base_url(&self) -> &str {
        &self.api.base_url
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            poll_interval_secs: 30,
            token_path: ".hostel-console/token".to_string(),
            log_level: "info".to_string(),
            environment: "development".to_string(),
            local_admin_enabled: true,
            login_identifier: None,
            login_password: None,
        }
    }
}
