//! # vox-config
//!
//! Layered configuration loading for Voxboard using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`VOXBOARD_*` prefix, `__` as separator)
//! 2. Project-level `.voxboard/config.toml`
//! 3. User-level `~/.config/voxboard/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `VOXBOARD_BACKEND__URL` -> `backend.url`,
//! `VOXBOARD_VOICE__API_KEY` -> `voice.api_key`, etc. The `__` (double
//! underscore) separates nested config sections.
//!
//! There is deliberately no module-scope singleton and no lazy
//! self-initialization: the host application loads a `VoxConfig` once at
//! startup and constructs every client from it explicitly.

mod backend;
mod error;
mod general;
mod voice;

pub use backend::BackendConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use voice::VoicePlatformConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VoxConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub voice: VoicePlatformConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl VoxConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` — use [`VoxConfig::load_with_dotenv`] if you
    /// need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if any layer fails to parse or merge.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// This is the typical entry point for the CLI and tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if any layer fails to parse or merge.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add additional
    /// providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".voxboard/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("VOXBOARD_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("voxboard").join("config.toml"))
    }
}
