//! Request signing for the Optikpi data pipeline API.
//!
//! A signing key is derived from the client's identity with an HKDF-style
//! construction, then used to HMAC the canonical JSON body. Everything here
//! is pure computation: no I/O, no logging, no shared state.

pub mod algorithm;
pub mod context;
pub mod encoding;
pub mod error;
pub mod headers;
pub mod key;
pub mod signing;

pub use algorithm::HashAlgorithm;
pub use context::{AuthContext, mask_token};
pub use encoding::CanonicalPayload;
pub use error::{ConfigurationError, HeaderError, SerializationError, SigningError};
pub use headers::SignatureHeaders;
pub use key::{DEFAULT_KEY_LENGTH, DerivedKey, KeyDeriver, SIGNING_INFO, derive_key};
pub use signing::{
    RequestSigner, SignatureResult, SignatureVerifier, SignedPayload, sign, verify,
};
