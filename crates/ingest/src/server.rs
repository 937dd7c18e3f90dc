use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use optikpi_client::Endpoint;
use optikpi_signing::{AuthContext, CanonicalPayload, SignatureHeaders, SignatureVerifier};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::IngestError;

/// Identity this service accepts requests from.
#[derive(Debug, Clone)]
pub struct AppState {
    pub context: AuthContext,
}

/// Body of a successful ingestion response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReceipt {
    pub success: bool,
    pub endpoint: String,
    pub records: usize,
}

pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/healthcheck", get(|| async move { (StatusCode::OK, "Ok").into_response() }));

    for endpoint in Endpoint::ALL {
        router = router.route(
            endpoint.path(),
            post(
                move |State(state): State<AppState>, headers: HeaderMap, body: Bytes| async move {
                    ingest(endpoint, &state, &headers, body)
                },
            ),
        );
    }

    router.with_state(state)
}

pub async fn run(host: String, port: u16, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("binding {host}:{port}"))?;
    info!(address = %listener.local_addr()?, "ingest service listening");

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("serving ingest routes")?;

    Ok(())
}

/// Authenticates one request against the configured identity.
///
/// The signature is checked over the body bytes exactly as received; the
/// body is only parsed as JSON once it is known to be authentic.
fn ingest(
    endpoint: Endpoint,
    state: &AppState,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Json<IngestReceipt>, IngestError> {
    let claimed = SignatureHeaders::from_header_map(headers)?;
    if !claimed.context.matches(&state.context) {
        warn!(%endpoint, account_id = claimed.context.account_id(), "unknown credentials");
        return Err(IngestError::Unauthorized("unknown credentials".to_string()));
    }

    let payload = CanonicalPayload::from_bytes(body.to_vec());
    let verified = SignatureVerifier::new(state.context.clone())
        .with_algorithm(claimed.signature.algorithm)
        .verify_canonical(&payload, &claimed.signature.signature)?;
    if !verified {
        warn!(%endpoint, algorithm = %claimed.signature.algorithm, "signature mismatch");
        return Err(IngestError::Unauthorized("signature mismatch".to_string()));
    }

    let value: Value = serde_json::from_slice(payload.as_bytes())
        .map_err(|e| IngestError::BadRequest(format!("body is not valid JSON: {e}")))?;
    let records = match &value {
        Value::Array(items) => items.len(),
        _ => 1,
    };

    info!(%endpoint, records, "accepted signed payload");
    Ok(Json(IngestReceipt {
        success: true,
        endpoint: endpoint.path().to_string(),
        records,
    }))
}
