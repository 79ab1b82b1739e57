use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Config(#[from] vox_config::ConfigError),

    /// Any non-2xx from the table or RPC endpoints, carrying the most
    /// specific message the backend provided. Row-level authorization
    /// failures arrive through here too — the directory does not
    /// re-implement the server's rules.
    #[error("directory error: {0}")]
    ApiError(String),
}
