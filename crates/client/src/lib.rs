pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;

pub use client::{PipelineClient, SignedRequest, USER_AGENT};
pub use config::{ClientConfig, ConfigUpdate};
pub use endpoint::Endpoint;
pub use error::ClientError;
