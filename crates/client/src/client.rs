use http::header::{CONTENT_TYPE, HeaderValue, USER_AGENT as USER_AGENT_HEADER};
use http::{HeaderMap, Method, Request};
use optikpi_signing::{CanonicalPayload, RequestSigner, SignatureHeaders};
use serde::Serialize;
use tracing::debug;

use crate::config::{ClientConfig, ConfigUpdate};
use crate::endpoint::Endpoint;
use crate::error::ClientError;

pub const USER_AGENT: &str = concat!("Optikpi-DataPipeline-SDK-Rust/", env!("CARGO_PKG_VERSION"));

/// Builds signed ingestion requests. Sending them is up to the caller.
#[derive(Debug, Clone)]
pub struct PipelineClient {
    config: ClientConfig,
    signer: RequestSigner,
}

/// A ready-to-send request. `body` holds exactly the bytes that were signed.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: CanonicalPayload,
}

impl SignedRequest {
    pub fn into_http(self) -> Result<Request<Vec<u8>>, ClientError> {
        let mut builder = Request::builder().method(self.method).uri(self.url);
        if let Some(headers) = builder.headers_mut() {
            headers.extend(self.headers);
        }
        Ok(builder.body(self.body.into_bytes())?)
    }
}

impl PipelineClient {
    /// Validates `config` up front; a client never exists with a bad identity.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let context = config.validate()?;
        let signer = RequestSigner::new(context).with_algorithm(config.algorithm);
        Ok(Self { config, signer })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn update_config(&mut self, update: ConfigUpdate) -> Result<(), ClientError> {
        self.config.update(update)?;
        self.signer =
            RequestSigner::new(self.config.validate()?).with_algorithm(self.config.algorithm);
        debug!(config = ?self.config, "client configuration updated");
        Ok(())
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint.path())
    }

    /// Signs `payload` and wraps it in a POST to `endpoint`.
    ///
    /// `payload` may be a single record, an array of records, or an already
    /// serialized JSON string (sent verbatim).
    pub fn prepare<T: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        payload: &T,
    ) -> Result<SignedRequest, ClientError> {
        let signed = self.signer.sign(payload)?;
        let mut headers =
            SignatureHeaders::new(self.signer.context().clone(), signed.signature).to_header_map()?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT_HEADER, HeaderValue::from_static(USER_AGENT));

        debug!(%endpoint, bytes = signed.body.len(), "prepared signed request");
        Ok(SignedRequest {
            method: Method::POST,
            url: self.url(endpoint),
            headers,
            body: signed.body,
        })
    }

    pub fn customer_profile<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<SignedRequest, ClientError> {
        self.prepare(Endpoint::Customers, payload)
    }

    pub fn account_event<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<SignedRequest, ClientError> {
        self.prepare(Endpoint::AccountEvents, payload)
    }

    pub fn deposit_event<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<SignedRequest, ClientError> {
        self.prepare(Endpoint::DepositEvents, payload)
    }

    pub fn withdraw_event<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<SignedRequest, ClientError> {
        self.prepare(Endpoint::WithdrawEvents, payload)
    }

    pub fn gaming_activity_event<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<SignedRequest, ClientError> {
        self.prepare(Endpoint::GamingActivityEvents, payload)
    }

    pub fn wallet_balance_event<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<SignedRequest, ClientError> {
        self.prepare(Endpoint::WalletBalanceEvents, payload)
    }

    pub fn refer_friend_event<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<SignedRequest, ClientError> {
        self.prepare(Endpoint::ReferFriendEvents, payload)
    }

    pub fn extended_attributes<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<SignedRequest, ClientError> {
        self.prepare(Endpoint::ExtendedAttributes, payload)
    }
}
