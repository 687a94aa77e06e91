use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vault_recall_core::constants::{SERVICE_GPT4, SERVICE_GPT35};

mod commands;
mod config;


#[derive(Parser)]
#[command(name = "vault-recall")]
#[command(
    about = "Recall stored facts into a personalized tour prompt, with OpenAI credentials from Azure Key Vault",
    long_about = None
)]
struct Cli {
    /// Config file path (default: user config dir, vault-recall/secrets.toml)
    #[arg(short, long, env = "VAULT_RECALL_CONFIG")]
    config: Option<PathBuf>,
    /// Chat service answering the prompt; defaults to the last registered (gpt4)
    #[arg(short, long, value_parser = [SERVICE_GPT35, SERVICE_GPT4])]
    service: Option<String>,
    /// Exit right after printing instead of waiting for a line on stdin
    #[arg(long)]
    no_wait: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?)
        .init();

    let cli = Cli::parse();
    commands::run::run(cli.config.as_deref(), cli.service, !cli.no_wait).await
}
