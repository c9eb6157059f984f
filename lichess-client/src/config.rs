//! Configuration for the Lichess client.
//!
//! Every value has a compile-time default and can be overridden at runtime via
//! a dedicated environment variable.

/// Default API host.
const DEFAULT_BASE_URL: &str = "https://lichess.org";

/// Default user agent sent with every request.
const DEFAULT_USER_AGENT: &str = concat!("lichess-client/", env!("CARGO_PKG_VERSION"));

/// Connection settings shared by every request of one client.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Personal API token. Empty means only public endpoints are reachable.
    pub token: String,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build a configuration from `LICHESS_BASE_URL`, `LICHESS_TOKEN` and
    /// `LICHESS_USER_AGENT`.
    pub fn from_env() -> Self {
        Self {
            base_url: get_base_url(),
            token: get_token(),
            user_agent: get_user_agent(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("")
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &if self.token.is_empty() { "<none>" } else { "<redacted>" })
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Get the API base URL.
///
/// Priority:
/// 1. `LICHESS_BASE_URL` env variable if set
/// 2. `https://lichess.org` as fallback
pub fn get_base_url() -> String {
    if let Ok(url) = std::env::var("LICHESS_BASE_URL") {
        return url;
    }

    DEFAULT_BASE_URL.to_string()
}

/// Get the API token.
///
/// Priority:
/// 1. `LICHESS_TOKEN` env variable if set
/// 2. empty (anonymous access)
pub fn get_token() -> String {
    std::env::var("LICHESS_TOKEN").unwrap_or_default()
}

/// Get the user agent.
///
/// Priority:
/// 1. `LICHESS_USER_AGENT` env variable if set
/// 2. `lichess-client/<version>` as fallback
pub fn get_user_agent() -> String {
    if let Ok(agent) = std::env::var("LICHESS_USER_AGENT") {
        return agent;
    }

    DEFAULT_USER_AGENT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_base_url() {
        let url = get_base_url();
        match std::env::var("LICHESS_BASE_URL") {
            Ok(val) => assert_eq!(url, val),
            Err(_) => assert_eq!(url, DEFAULT_BASE_URL),
        }
    }

    #[test]
    fn test_get_user_agent_default() {
        if std::env::var("LICHESS_USER_AGENT").is_err() {
            assert!(get_user_agent().starts_with("lichess-client/"));
        }
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::new("lip_secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("lip_secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_with_base_url() {
        let config = ClientConfig::new("t").with_base_url("http://127.0.0.1:9663");
        assert_eq!(config.base_url, "http://127.0.0.1:9663");
        assert_eq!(config.token, "t");
    }
}
