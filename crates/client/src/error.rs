use optikpi_signing::{ConfigurationError, SigningError};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error(transparent)]
    Signing(#[from] SigningError),
    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),
}
