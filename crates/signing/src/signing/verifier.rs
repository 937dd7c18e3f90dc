use serde::Serialize;
use subtle::ConstantTimeEq;

use super::signer::RequestSigner;
use crate::algorithm::HashAlgorithm;
use crate::context::AuthContext;
use crate::encoding::CanonicalPayload;
use crate::error::{ConfigurationError, SigningError};

/// Checks claimed signatures against a recomputed one.
///
/// A mismatch is `Ok(false)`. Errors are reserved for inputs that could not
/// have been signed at all, so an `Err` can never be mistaken for success.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    signer: RequestSigner,
}

impl SignatureVerifier {
    pub fn new(context: AuthContext) -> Self {
        Self {
            signer: RequestSigner::new(context),
        }
    }

    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.signer = self.signer.with_algorithm(algorithm);
        self
    }

    pub fn context(&self) -> &AuthContext {
        self.signer.context()
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.signer.algorithm()
    }

    pub fn verify<T: Serialize + ?Sized>(
        &self,
        payload: &T,
        claimed: &str,
    ) -> Result<bool, SigningError> {
        let body = CanonicalPayload::encode(payload)?;
        Ok(self.verify_canonical(&body, claimed)?)
    }

    /// Comparison is case-sensitive: signatures are always lowercase hex.
    pub fn verify_canonical(
        &self,
        payload: &CanonicalPayload,
        claimed: &str,
    ) -> Result<bool, ConfigurationError> {
        let expected = self.signer.sign_canonical(payload)?;
        Ok(expected
            .signature
            .as_bytes()
            .ct_eq(claimed.as_bytes())
            .into())
    }
}

/// Verifies `claimed` for `payload`. See [`SignatureVerifier::verify`].
pub fn verify<T: Serialize + ?Sized>(
    payload: &T,
    claimed: &str,
    context: &AuthContext,
    algorithm: HashAlgorithm,
) -> Result<bool, SigningError> {
    SignatureVerifier::new(context.clone())
        .with_algorithm(algorithm)
        .verify(payload, claimed)
}
