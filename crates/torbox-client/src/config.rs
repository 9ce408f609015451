//! Public configuration for the TorBox client.

use std::time::Duration;

use torbox_core::Credential;

/// Default API root. Endpoint paths are joined under it.
pub const DEFAULT_BASE_URL: &str = "https://api.torbox.app/v1/api/";

/// Configuration for the TorBox client.
///
/// Use the builder pattern methods to customize the client configuration.
///
/// # Example
///
/// ```
/// use torbox_client::TorBoxClientConfig;
/// use std::time::Duration;
///
/// let config = TorBoxClientConfig::new()
///     .with_timeout(Duration::from_secs(60))
///     .with_api_key("my-key");
/// ```
#[derive(Debug, Clone)]
pub struct TorBoxClientConfig {
    /// Base URL for the API
    pub(crate) base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Total request timeout
    pub(crate) timeout: Duration,
    /// Connection establishment timeout
    pub(crate) connect_timeout: Duration,
    /// Credential installed at construction
    pub(crate) credential: Credential,
}

impl Default for TorBoxClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("torbox-client/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            credential: Credential::none(),
        }
    }
}

impl TorBoxClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `TORBOX_BASE_URL`, `TORBOX_API_KEY` and
    /// `TORBOX_BEARER_TOKEN`. A bearer token wins over an API key.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(url) = non_empty("TORBOX_BASE_URL") {
            config = config.with_base_url(url);
        }
        if let Some(key) = non_empty("TORBOX_API_KEY") {
            config = config.with_api_key(key);
        }
        if let Some(token) = non_empty("TORBOX_BEARER_TOKEN") {
            config = config.with_bearer_token(token);
        }
        config
    }

    /// Set the base URL for the API.
    ///
    /// Defaults to `https://api.torbox.app/v1/api/`.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the total request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    ///
    /// Defaults to 10 seconds.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Authenticate with an API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.credential = Credential::api_key(key);
        self
    }

    /// Authenticate with a bearer token.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.credential = Credential::bearer(token);
        self
    }

    /// Base URL with the trailing slash `Url::join` needs.
    pub(crate) fn normalized_base_url(&self) -> String {
        let trimmed = self.base_url.trim();
        if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use torbox_core::AuthMode;

    #[test]
    fn test_default_config() {
        let config = TorBoxClientConfig::new();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.user_agent.contains("torbox-client"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(!config.credential.is_present());
    }

    #[test]
    fn test_builder_pattern() {
        let config = TorBoxClientConfig::new()
            .with_base_url("https://custom.api/v2")
            .with_user_agent("test-agent")
            .with_timeout(Duration::from_secs(60))
            .with_connect_timeout(Duration::from_secs(2))
            .with_bearer_token("secret");

        assert_eq!(config.base_url, "https://custom.api/v2");
        assert_eq!(config.normalized_base_url(), "https://custom.api/v2/");
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.credential.mode(), AuthMode::BearerToken);
        assert_eq!(config.credential.value(), "secret");
    }

    #[test]
    fn test_env_lookup_prefers_bearer_token() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TORBOX_BASE_URL", "http://localhost:9000/api"),
            ("TORBOX_API_KEY", "key"),
            ("TORBOX_BEARER_TOKEN", "token"),
        ]);
        let config =
            TorBoxClientConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.normalized_base_url(), "http://localhost:9000/api/");
        assert_eq!(config.credential.mode(), AuthMode::BearerToken);
    }

    #[test]
    fn test_env_lookup_ignores_blank_values() {
        let config = TorBoxClientConfig::from_lookup(|key| match key {
            "TORBOX_API_KEY" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.credential.is_present());
    }
}
