//! Backend (auth + data store) configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the backend project (auth and table endpoints hang off it).
    #[serde(default)]
    pub url: String,

    /// Publishable anonymous key, sent as the `apikey` header.
    #[serde(default)]
    pub anon_key: String,
}

impl BackendConfig {
    /// Check if the backend config has the minimum required fields.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.anon_key.is_empty()
    }

    /// Fail fast when the section is incomplete.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when `url` or `anon_key` is empty.
    pub fn require(&self) -> Result<(), ConfigError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(ConfigError::NotConfigured {
                section: "backend".into(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = BackendConfig::default();
        assert!(!config.is_configured());
        assert!(config.require().is_err());
    }

    #[test]
    fn configured_when_url_and_key_set() {
        let config = BackendConfig {
            url: "https://proj.example.co".into(),
            anon_key: "anon_123".into(),
        };
        assert!(config.is_configured());
        assert!(config.require().is_ok());
    }
}
