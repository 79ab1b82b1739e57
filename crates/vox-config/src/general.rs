//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit for list commands.
const fn default_limit() -> u32 {
    50
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Entry URL the console was opened with, if any. A `token` query
    /// parameter on it is consumed by the magic-link handler at startup.
    #[serde(default)]
    pub entry_url: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            entry_url: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.default_limit, 50);
        assert!(config.entry_url.is_empty());
    }
}
