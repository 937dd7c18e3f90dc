//! HKDF-style derivation of the per-request signing key.
//!
//! The construction is RFC 5869 extract-then-expand with one deliberate
//! deviation in the extract step, see [`extract`]. Keys are derived fresh on
//! every call; nothing here caches or holds state between calls.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::algorithm::HashAlgorithm;
use crate::context::AuthContext;
use crate::error::ConfigurationError;

/// Info label used for request-signing keys.
pub const SIGNING_INFO: &str = "hmac-signing";

/// Derived key length in bytes, independent of the hash algorithm.
pub const DEFAULT_KEY_LENGTH: usize = 32;

/// Key material produced by [`KeyDeriver`]. Wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey(Vec<u8>);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl AsRef<[u8]> for DerivedKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerivedKey(<{} bytes redacted>)", self.0.len())
    }
}

/// Derives signing keys for a fixed hash algorithm and output length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDeriver {
    algorithm: HashAlgorithm,
    length: usize,
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}

impl KeyDeriver {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            length: DEFAULT_KEY_LENGTH,
        }
    }

    /// Sets the output length. Must be in `1..=255 * digest_size`.
    pub fn with_length(mut self, length: usize) -> Result<Self, ConfigurationError> {
        let max = self.algorithm.max_output_len();
        if length == 0 || length > max {
            return Err(ConfigurationError::InvalidKeyLength {
                algorithm: self.algorithm,
                requested: length,
                max,
            });
        }
        self.length = length;
        Ok(self)
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn derive(
        &self,
        auth_token: &str,
        account_id: &str,
        workspace_id: &str,
        info: &str,
    ) -> Result<DerivedKey, ConfigurationError> {
        require("auth_token", auth_token)?;
        require("account_id", account_id)?;
        require("workspace_id", workspace_id)?;
        require("info", info)?;

        let salt = [account_id.as_bytes(), workspace_id.as_bytes()].concat();
        let prk = extract(self.algorithm, auth_token.as_bytes(), &salt);
        Ok(DerivedKey(expand(
            self.algorithm,
            &prk,
            info.as_bytes(),
            self.length,
        )))
    }

    pub fn derive_for(
        &self,
        context: &AuthContext,
        info: &str,
    ) -> Result<DerivedKey, ConfigurationError> {
        self.derive(
            context.auth_token(),
            context.account_id(),
            context.workspace_id(),
            info,
        )
    }
}

/// Derives a key of `length` bytes. See [`KeyDeriver`].
pub fn derive_key(
    auth_token: &str,
    account_id: &str,
    workspace_id: &str,
    info: &str,
    algorithm: HashAlgorithm,
    length: usize,
) -> Result<DerivedKey, ConfigurationError> {
    KeyDeriver::new(algorithm)
        .with_length(length)?
        .derive(auth_token, account_id, workspace_id, info)
}

fn require(field: &'static str, value: &str) -> Result<(), ConfigurationError> {
    if value.is_empty() {
        return Err(ConfigurationError::MissingField(field));
    }
    Ok(())
}

/// HKDF-Extract with key and message SWAPPED relative to RFC 5869.
///
/// The auth token (`ikm`) keys the HMAC and `account_id + workspace_id`
/// (`salt`) is the message: `PRK = HMAC(ikm, salt)`. Every deployed server
/// and every other client SDK derives keys this way. Do not "fix" this to
/// `HMAC(salt, ikm)`: signatures would stop verifying everywhere with no
/// error beyond an unauthorized response.
fn extract(algorithm: HashAlgorithm, ikm: &[u8], salt: &[u8]) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(algorithm.mac(ikm, &[salt]))
}

/// HKDF-Expand: `T(i) = HMAC(prk, T(i-1) || info || i)` for `i = 1..=n`.
///
/// `length` has already been bounded by `max_output_len`, so the block
/// counter fits in one byte.
fn expand(algorithm: HashAlgorithm, prk: &[u8], info: &[u8], length: usize) -> Vec<u8> {
    let blocks = length.div_ceil(algorithm.digest_size());
    let mut okm = Vec::with_capacity(blocks * algorithm.digest_size());
    let mut previous = Zeroizing::new(Vec::new());
    for counter in 1..=blocks {
        let block = algorithm.mac(prk, &[previous.as_slice(), info, &[counter as u8]]);
        okm.extend_from_slice(&block);
        previous.zeroize();
        *previous = block;
    }
    okm[length..].zeroize();
    okm.truncate(length);
    okm
}
