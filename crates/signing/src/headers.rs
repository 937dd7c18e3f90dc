//! Request headers shared with the ingestion API.

use http::{HeaderMap, HeaderName, HeaderValue};

use crate::algorithm::HashAlgorithm;
use crate::context::AuthContext;
use crate::error::{ConfigurationError, HeaderError};
use crate::signing::SignatureResult;

pub const TOKEN_HEADER: &str = "x-optikpi-token";
pub const ACCOUNT_ID_HEADER: &str = "x-optikpi-account-id";
pub const WORKSPACE_ID_HEADER: &str = "x-optikpi-workspace-id";
pub const SIGNATURE_HEADER: &str = "x-hmac-signature";
pub const ALGORITHM_HEADER: &str = "x-hmac-algorithm";

/// Identity plus signature, as carried on a signed request.
#[derive(Debug, Clone)]
pub struct SignatureHeaders {
    pub context: AuthContext,
    pub signature: SignatureResult,
}

impl SignatureHeaders {
    pub fn new(context: AuthContext, signature: SignatureResult) -> Self {
        Self { context, signature }
    }

    pub fn to_header_map(&self) -> Result<HeaderMap, ConfigurationError> {
        let mut token = header_value("auth_token", self.context.auth_token())?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::with_capacity(5);
        headers.insert(HeaderName::from_static(TOKEN_HEADER), token);
        headers.insert(
            HeaderName::from_static(ACCOUNT_ID_HEADER),
            header_value("account_id", self.context.account_id())?,
        );
        headers.insert(
            HeaderName::from_static(WORKSPACE_ID_HEADER),
            header_value("workspace_id", self.context.workspace_id())?,
        );
        headers.insert(
            HeaderName::from_static(SIGNATURE_HEADER),
            header_value("signature", &self.signature.signature)?,
        );
        headers.insert(
            HeaderName::from_static(ALGORITHM_HEADER),
            HeaderValue::from_static(self.signature.algorithm.as_str()),
        );
        Ok(headers)
    }

    /// Reads the headers of a received request.
    ///
    /// A missing algorithm header means sha256.
    pub fn from_header_map(headers: &HeaderMap) -> Result<Self, HeaderError> {
        let context = AuthContext::new(
            read(headers, TOKEN_HEADER)?,
            read(headers, ACCOUNT_ID_HEADER)?,
            read(headers, WORKSPACE_ID_HEADER)?,
        )?;
        let signature = read(headers, SIGNATURE_HEADER)?.to_string();
        let algorithm = match headers.get(ALGORITHM_HEADER) {
            Some(_) => read(headers, ALGORITHM_HEADER)?.parse::<HashAlgorithm>()?,
            None => HashAlgorithm::default(),
        };
        Ok(Self {
            context,
            signature: SignatureResult {
                signature,
                algorithm,
            },
        })
    }
}

fn header_value(field: &'static str, value: &str) -> Result<HeaderValue, ConfigurationError> {
    HeaderValue::from_str(value).map_err(|_| ConfigurationError::InvalidHeaderValue(field))
}

fn read<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, HeaderError> {
    headers
        .get(name)
        .ok_or(HeaderError::Missing(name))?
        .to_str()
        .map_err(|_| HeaderError::NotAscii(name))
}
