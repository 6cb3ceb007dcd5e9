use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Ledger error: {0}")]
    LedgerError(String),
}

pub type Result<T> = std::result::Result<T, WebhookError>;
