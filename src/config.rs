//! Application configuration.
//!
//! Built once at process start from the environment (after a `.env` load) and
//! passed by reference into every component; there is no ambient global.

use bon::Builder;
use std::env;

const DEFAULT_APP_NAME: &str = "flood-backend";

/// Settings for the service and its upstream clients.
///
/// The builder is mainly for tests and embedding; production code goes
/// through [`AppConfig::from_env`].
#[derive(Debug, Clone, Builder)]
pub struct AppConfig {
    /// Application name, used for logging context.
    #[builder(default = DEFAULT_APP_NAME.to_string())]
    pub app_name: String,
    /// Static bearer token protecting the BOM-backed endpoints.
    pub api_token: Option<String>,
    /// Bearer token for the digital-twin platform.
    pub dt_api_token: Option<String>,
    /// Base URL of the digital-twin platform, trailing slash included.
    pub dt_base_url: Option<String>,
    /// API key for the commercial weather API.
    pub google_api_key: Option<String>,
    /// Base URL override for the commercial weather API.
    pub google_base_url: Option<String>,
}

impl AppConfig {
    /// Reads configuration from the process environment. Unset and empty
    /// variables are treated alike as absent.
    pub fn from_env() -> Self {
        Self {
            app_name: env_opt("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            api_token: env_opt("API_TOKEN"),
            dt_api_token: env_opt("DT_API_TOKEN"),
            dt_base_url: env_opt("DT_BASE_URL"),
            google_api_key: env_opt("GOOGLE_API_KEY"),
            google_base_url: env_opt("GOOGLE_BASE_URL"),
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_leave_secrets_unset() {
        let config = AppConfig::builder().build();
        assert_eq!(config.app_name, "flood-backend");
        assert!(config.api_token.is_none());
        assert!(config.dt_base_url.is_none());
    }

    #[test]
    fn builder_accepts_explicit_values() {
        let config = AppConfig::builder()
            .api_token("secret".to_string())
            .dt_base_url("http://twin.example/".to_string())
            .build();
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.dt_base_url.as_deref(), Some("http://twin.example/"));
    }
}
