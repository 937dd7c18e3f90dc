use serde::Serialize;

use crate::error::SerializationError;

/// Exact bytes that are both signed and sent as the request body.
///
/// JSON payloads are written compactly (`,` and `:` with no whitespace) with
/// object keys in insertion order. Keys are never sorted: the server signs
/// the body it receives, so any reordering changes the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPayload(Vec<u8>);

impl CanonicalPayload {
    /// Serializes `payload` to its canonical form.
    ///
    /// A payload that serializes to a JSON string is taken to be
    /// pre-serialized and its contents are used verbatim, without quoting.
    /// Map fields should be ordered collections (`serde_json::Map`,
    /// `IndexMap`, `BTreeMap`) or structs; `HashMap` iteration order is not
    /// stable across runs.
    pub fn encode<T: Serialize + ?Sized>(payload: &T) -> Result<Self, SerializationError> {
        let body = serde_json::to_vec(payload)?;
        if body.first() == Some(&b'"') {
            let raw: String = serde_json::from_slice(&body)?;
            return Ok(Self::raw(raw));
        }
        Ok(Self(body))
    }

    /// Uses an already serialized body as-is.
    pub fn raw(body: impl Into<String>) -> Self {
        Self(body.into().into_bytes())
    }

    /// Wraps body bytes exactly as they arrived off the wire.
    pub fn from_bytes(body: impl Into<Vec<u8>>) -> Self {
        Self(body.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalPayload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<CanonicalPayload> for Vec<u8> {
    fn from(payload: CanonicalPayload) -> Self {
        payload.0
    }
}
