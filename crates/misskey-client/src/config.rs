//! Builder settings shared by the async and blocking clients.

use std::time::Duration;

use crate::address::normalize_address;
use crate::error::{Error, Result};

/// Default timeout for requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the instance address.
pub const ADDRESS_ENV: &str = "MISSKEY_ADDRESS";

/// Environment variable holding an access token.
pub const TOKEN_ENV: &str = "MISSKEY_TOKEN";

/// Settings collected by a client builder.
#[derive(Clone)]
pub struct ClientConfig {
    pub address: Option<String>,
    pub token: Option<String>,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Settings from `MISSKEY_ADDRESS` and `MISSKEY_TOKEN`; unset or empty
    /// variables are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v: &String| !v.trim().is_empty());
        Self {
            address: non_empty(ADDRESS_ENV),
            token: non_empty(TOKEN_ENV),
            ..Self::default()
        }
    }

    /// The normalized base address.
    pub fn base_address(&self) -> Result<String> {
        let address = self
            .address
            .as_deref()
            .ok_or_else(|| Error::Config("address is required".to_string()))?;
        normalize_address(address)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("misskey-client/{}", env!("CARGO_PKG_VERSION")))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: None,
            token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("address", &self.address)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_address() {
        assert!(matches!(
            ClientConfig::default().base_address().unwrap_err(),
            Error::Config(_)
        ));
    }

    #[test]
    fn normalizes_address() {
        let config = ClientConfig {
            address: Some("misskey.example.com/".into()),
            ..Default::default()
        };
        assert_eq!(config.base_address().unwrap(), "https://misskey.example.com");
    }

    #[test]
    fn reads_lookup_and_skips_blank_values() {
        let config = ClientConfig::from_lookup(|key| match key {
            ADDRESS_ENV => Some("misskey.example.com".into()),
            TOKEN_ENV => Some("   ".into()),
            _ => None,
        });
        assert_eq!(config.address.as_deref(), Some("misskey.example.com"));
        assert!(config.token.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn default_user_agent_names_the_crate() {
        assert!(ClientConfig::default().user_agent().starts_with("misskey-client/"));
    }

    #[test]
    fn debug_redacts_token() {
        let config = ClientConfig {
            token: Some("hunter2".into()),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
