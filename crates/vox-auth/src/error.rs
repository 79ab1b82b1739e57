use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Config(#[from] vox_config::ConfigError),

    #[error("not authenticated — run `vox auth login`")]
    NotAuthenticated,

    #[error("account already registered")]
    AlreadyRegistered,

    #[error("auth API error: {0}")]
    ApiError(String),

    #[error("token store error: {0}")]
    TokenStoreError(String),
}
