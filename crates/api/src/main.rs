//! Verdant - lead capture and email-marketing HTTP service
//!
//! Main entry point for the axum server.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use verdant_api::utils::logging::init_tracing;
use verdant_api::{router, AppContext};
use verdant_infra::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing().map_err(|err| anyhow::anyhow!(err))?;

    let config = config::load().context("failed to load configuration")?;
    let bind_addr = config.server.bind_addr.clone();
    info!(environment = %config.environment, "Verdant starting...");

    let context = AppContext::new(config).context("failed to initialise application context")?;
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    info!(%bind_addr, "Verdant listening");
    axum::serve(listener, router(context)).await.context("server error")?;
    Ok(())
}
