mod signer;
mod verifier;

pub use signer::{RequestSigner, SignatureResult, SignedPayload, sign};
pub use verifier::{SignatureVerifier, verify};
