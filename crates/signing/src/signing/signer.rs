use serde::{Deserialize, Serialize};

use crate::algorithm::HashAlgorithm;
use crate::context::AuthContext;
use crate::encoding::CanonicalPayload;
use crate::error::{ConfigurationError, SigningError};
use crate::key::{KeyDeriver, SIGNING_INFO};

/// Signature header values for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureResult {
    /// Lowercase hex HMAC, two characters per digest byte.
    pub signature: String,
    pub algorithm: HashAlgorithm,
}

/// A signed body. `body` is what must go over the wire, byte for byte.
#[derive(Debug, Clone)]
pub struct SignedPayload {
    pub body: CanonicalPayload,
    pub signature: SignatureResult,
}

/// Signs request payloads for one [`AuthContext`].
///
/// Holds no mutable state and derives the key afresh on every call, so a
/// single signer can be shared across threads.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    context: AuthContext,
    algorithm: HashAlgorithm,
}

impl RequestSigner {
    pub fn new(context: AuthContext) -> Self {
        Self {
            context,
            algorithm: HashAlgorithm::default(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn context(&self) -> &AuthContext {
        &self.context
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Canonicalizes `payload` once and signs those bytes.
    pub fn sign<T: Serialize + ?Sized>(&self, payload: &T) -> Result<SignedPayload, SigningError> {
        let body = CanonicalPayload::encode(payload)?;
        let signature = self.sign_canonical(&body)?;
        Ok(SignedPayload { body, signature })
    }

    pub fn sign_canonical(
        &self,
        payload: &CanonicalPayload,
    ) -> Result<SignatureResult, ConfigurationError> {
        // The signing key is always DEFAULT_KEY_LENGTH bytes, whatever the
        // digest size of the algorithm.
        let key = KeyDeriver::new(self.algorithm).derive_for(&self.context, SIGNING_INFO)?;
        let digest = self.algorithm.mac(key.as_bytes(), &[payload.as_bytes()]);
        Ok(SignatureResult {
            signature: hex::encode(digest),
            algorithm: self.algorithm,
        })
    }
}

/// Signs `payload` for `context`. See [`RequestSigner::sign`].
pub fn sign<T: Serialize + ?Sized>(
    payload: &T,
    context: &AuthContext,
    algorithm: HashAlgorithm,
) -> Result<SignatureResult, SigningError> {
    RequestSigner::new(context.clone())
        .with_algorithm(algorithm)
        .sign(payload)
        .map(|signed| signed.signature)
}
