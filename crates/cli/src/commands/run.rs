use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};
use vault_recall_service::{OpenAiConnector, TourOptions, run_tour};

use crate::config;

pub(crate) async fn run(
    config_path: Option<&Path>,
    service_id: Option<String>,
    wait: bool,
) -> Result<()> {
    let config = config::load(config_path)?;
    tracing::debug!(?config, "configuration loaded");

    let vault = config.vault.connect(config.http_timeout)?;
    let connector = OpenAiConnector::new(config.openai_base_url.clone(), config.http_timeout);

    let outcome = run_tour(&vault, &connector, &TourOptions { service_id })
        .await
        .inspect_err(|e| {
            if e.is_vault_failure() {
                tracing::error!("stopped at the vault step, no model service was contacted");
            }
        })?;
    println!("{}", outcome.text);

    if wait {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).context("failed to read from stdin")?;
    }
    Ok(())
}
