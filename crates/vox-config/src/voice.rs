//! Voice platform API configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_api_base() -> String {
    "https://api.vapi.ai".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VoicePlatformConfig {
    /// Base URL of the voice platform API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Bearer API key.
    #[serde(default)]
    pub api_key: String,
}

impl Default for VoicePlatformConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: String::new(),
        }
    }
}

impl VoicePlatformConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_base.is_empty() && !self.api_key.is_empty()
    }

    /// Fail fast when the section is incomplete.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when `api_key` is empty.
    pub fn require(&self) -> Result<(), ConfigError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(ConfigError::NotConfigured {
                section: "voice".into(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_base_but_no_key() {
        let config = VoicePlatformConfig::default();
        assert_eq!(config.api_base, "https://api.vapi.ai");
        assert!(!config.is_configured());
    }

    #[test]
    fn configured_when_key_set() {
        let config = VoicePlatformConfig {
            api_key: "vk_test".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }
}
