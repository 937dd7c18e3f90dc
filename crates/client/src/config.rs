use std::fmt;
use std::time::Duration;

use http::Uri;
use optikpi_signing::{AuthContext, ConfigurationError, HashAlgorithm, mask_token};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "https://demo.optikpi.com/apigw/ingest";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Client settings.
///
/// Serialized with the keys used by the other SDKs (`authToken`, `baseURL`,
/// ...) and durations in seconds. `timeout`, `retries` and `retry_delay` are
/// carried for whatever transport sends the prepared requests.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(rename = "baseURL", default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub auth_token: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub workspace_id: String,
    #[serde(default = "default_timeout", with = "seconds")]
    pub timeout: Duration,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay", with = "seconds")]
    pub retry_delay: Duration,
    /// Sent in the algorithm header.
    #[serde(default)]
    pub algorithm: HashAlgorithm,
}

/// Overrides applied by [`ClientConfig::update`]. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub base_url: Option<String>,
    pub auth_token: Option<String>,
    pub account_id: Option<String>,
    pub workspace_id: Option<String>,
    pub timeout: Option<Duration>,
    pub retries: Option<u32>,
    pub retry_delay: Option<Duration>,
    pub algorithm: Option<HashAlgorithm>,
}

impl ClientConfig {
    pub fn new(
        auth_token: impl Into<String>,
        account_id: impl Into<String>,
        workspace_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: auth_token.into(),
            account_id: account_id.into(),
            workspace_id: workspace_id.into(),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            algorithm: HashAlgorithm::default(),
        }
    }

    /// Reads `AUTH_TOKEN`, `ACCOUNT_ID`, `WORKSPACE_ID` and, optionally,
    /// `API_BASE_URL` and `HMAC_ALGORITHM`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(
            lookup("AUTH_TOKEN").unwrap_or_default(),
            lookup("ACCOUNT_ID").unwrap_or_default(),
            lookup("WORKSPACE_ID").unwrap_or_default(),
        );
        if let Some(base_url) = lookup("API_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(algorithm) = lookup("HMAC_ALGORITHM") {
            config.algorithm = algorithm.parse()?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Checks identity fields and the base URL, returning the signing identity.
    pub fn validate(&self) -> Result<AuthContext, ClientError> {
        let context = AuthContext::new(
            self.auth_token.clone(),
            self.account_id.clone(),
            self.workspace_id.clone(),
        )?;
        if self.base_url.trim().is_empty() {
            return Err(ConfigurationError::MissingField("base_url").into());
        }
        let uri: Uri = self.base_url.parse().map_err(|e: http::uri::InvalidUri| {
            ClientError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: e.to_string(),
            }
        })?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(ClientError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "expected an absolute http(s) URL".to_string(),
            });
        }
        Ok(context)
    }

    pub fn auth_context(&self) -> Result<AuthContext, ClientError> {
        self.validate()
    }

    /// Applies `update` if the result validates; otherwise leaves `self` untouched.
    pub fn update(&mut self, update: ConfigUpdate) -> Result<(), ClientError> {
        let mut next = self.clone();
        if let Some(base_url) = update.base_url {
            next.base_url = base_url;
        }
        if let Some(auth_token) = update.auth_token {
            next.auth_token = auth_token;
        }
        if let Some(account_id) = update.account_id {
            next.account_id = account_id;
        }
        if let Some(workspace_id) = update.workspace_id {
            next.workspace_id = workspace_id;
        }
        if let Some(timeout) = update.timeout {
            next.timeout = timeout;
        }
        if let Some(retries) = update.retries {
            next.retries = retries;
        }
        if let Some(retry_delay) = update.retry_delay {
            next.retry_delay = retry_delay;
        }
        if let Some(algorithm) = update.algorithm {
            next.algorithm = algorithm;
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Copy safe to log or display: the token is cut to its first 8 characters.
    pub fn masked(&self) -> Self {
        Self {
            auth_token: mask_token(&self.auth_token),
            ..self.clone()
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("auth_token", &mask_token(&self.auth_token))
            .field("account_id", &self.account_id)
            .field("workspace_id", &self.workspace_id)
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .field("retry_delay", &self.retry_delay)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

fn default_retry_delay() -> Duration {
    DEFAULT_RETRY_DELAY
}

mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(de::Error::custom)
    }
}
