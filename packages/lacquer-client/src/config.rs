//! Backend endpoint configuration.

use std::time::Duration;

/// Default backend host.
pub const DEFAULT_BASE_URL: &str = "https://lacquer.up.railway.app";

/// Default host for the random-word dictionary endpoints, which are served
/// from a different deployment than the main API.
pub const DEFAULT_DICTIONARY_URL: &str = "https://lacquer-server.onrender.com";

/// Backend routes consumed by the client.
pub mod endpoints {
    pub const LOGIN: &str = "/auth/login";
    pub const SIGNUP: &str = "/auth/register";
    pub const RESEND_VERIFICATION: &str = "/auth/resend";
    pub const PROFILE: &str = "/auth/profile";
    pub const TAGS: &str = "/tag";
    pub const DECKS: &str = "/deck";
    pub const BADGES: &str = "/badge";
    pub const DICTIONARY_SEARCH_EN: &str = "/search/en";
    pub const DICTIONARY_SEARCH_VN: &str = "/search/vn";
    pub const RANDOM_WORD_EN: &str = "/random/en";
    pub const RANDOM_WORD_VN: &str = "/random/vn";
}

/// API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the main backend
    pub base_url: String,
    /// Base URL for random-word lookups
    pub dictionary_url: String,
    /// Overall per-request timeout
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            dictionary_url: DEFAULT_DICTIONARY_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    /// Build a config from `LACQUER_API_URL` / `LACQUER_DICTIONARY_URL`,
    /// falling back to the hosted defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("LACQUER_API_URL") {
            config.base_url = url;
        }
        if let Ok(url) = std::env::var("LACQUER_DICTIONARY_URL") {
            config.dictionary_url = url;
        }
        config
    }

    /// Set the backend base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the random-word host.
    pub fn with_dictionary_url(mut self, url: impl Into<String>) -> Self {
        self.dictionary_url = url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_hosted_backend() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.dictionary_url, DEFAULT_DICTIONARY_URL);
    }

    #[test]
    fn builder_overrides() {
        let config = ApiConfig::default()
            .with_base_url("http://localhost:3000")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
