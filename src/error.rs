use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Invalid rank table: {0}")]
    RankTableError(String),

    #[error("JSON error: {0}")]
    JsonError(String),
}
