use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error(transparent)]
    Config(#[from] vox_config::ConfigError),

    /// 401 from the platform. Distinguished because it triggers the
    /// re-authentication flow (prompt for a fresh API key, retry once).
    #[error("voice API rejected the key: {0}")]
    Unauthorized(String),

    /// 404 from the platform. On delete this means "already gone".
    #[error("voice API record not found: {0}")]
    NotFound(String),

    #[error("voice API error: {0}")]
    ApiError(String),
}
