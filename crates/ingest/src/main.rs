use anyhow::Context;
use clap::Parser;
use optikpi_ingest::{AppState, run};
use optikpi_signing::AuthContext;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
struct Args {
    #[clap(long, default_value = "127.0.0.1")]
    host: String,
    #[clap(long, default_value = "3000")]
    port: u16,
    #[clap(long, env = "AUTH_TOKEN", hide_env_values = true)]
    auth_token: String,
    #[clap(long, env = "ACCOUNT_ID")]
    account_id: String,
    #[clap(long, env = "WORKSPACE_ID")]
    workspace_id: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let context = AuthContext::new(args.auth_token, args.account_id, args.workspace_id)
        .context("invalid ingest credentials")?;
    tracing::info!(?context, "starting ingest service");

    run(args.host, args.port, AppState { context }).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}
