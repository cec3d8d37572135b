//! One-off set-up of the folder/list taxonomy in the Brevo account.
//!
//! Runs the same set-up as `POST /api/brevo/setup-organization`, paced with
//! the configured delays. Exits non-zero when any item failed.

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{error, info};
use verdant_api::utils::logging::init_tracing;
use verdant_core::{OrganizationService, Pacing};
use verdant_infra::{config, BrevoClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing().map_err(|err| anyhow::anyhow!(err))?;

    let config = config::load().context("failed to load configuration")?;
    let client = BrevoClient::from_config(&config).context("failed to build Brevo client")?;
    let service = OrganizationService::new(Arc::new(client)).with_pacing(Pacing::from(config.setup));

    info!("setting up Brevo organization structure");
    let report = service.setup_organization(&config.taxonomy()).await;

    info!(
        folders_created = report.folders_created,
        folders_reused = report.folders_reused,
        lists_created = report.lists_created,
        lists_existing = report.lists_existing,
        lists_skipped = report.lists_skipped,
        "organization setup complete"
    );
    for (folder, id) in &report.folders {
        info!(%folder, id, "folder ready");
    }
    for list in &report.lists {
        info!(list = %list.name, id = list.id, folder = %list.folder, "list created");
    }

    if !report.failures.is_empty() {
        for failure in &report.failures {
            error!(%failure, "setup item failed");
        }
        bail!("{} setup item(s) failed", report.failures.len());
    }
    Ok(())
}
