use crate::algorithm::HashAlgorithm;

/// Invalid identity, algorithm or key parameters.
///
/// Always fatal to the signing attempt. Nothing in this crate retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("key length for {algorithm} must be between 1 and {max} bytes, got {requested}")]
    InvalidKeyLength {
        algorithm: HashAlgorithm,
        requested: usize,
        max: usize,
    },
    #[error("{0} cannot be sent as an HTTP header value")]
    InvalidHeaderValue(&'static str),
}

/// The payload has no canonical JSON form.
#[derive(Debug, thiserror::Error)]
#[error("payload cannot be canonically serialized: {0}")]
pub struct SerializationError(#[from] serde_json::Error);

#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

/// Failure to read signature headers off a received request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("missing {0} header")]
    Missing(&'static str),
    #[error("{0} header is not visible ASCII")]
    NotAscii(&'static str),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
