use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wizard_core::Wizard;
use workflow_client::HttpWorkflowClient;

mod config;
mod session;
mod terminal;

use config::load_settings;

/// Walks through a project specification: pick a project and template,
/// answer the generated questions, then generate the document.
#[derive(Parser, Debug)]
struct Args {
    /// TOML settings file; `spec_wizard.toml` is read when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    project: Option<String>,
    #[arg(long)]
    template: Option<String>,
    /// Overrides `RUST_LOG`.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match args.log_level.as_deref() {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    let client = Arc::new(HttpWorkflowClient::new(settings.into_client_options())?);
    info!(server_url = %client.server_url(), "using workflow server");
    let wizard = Wizard::with_client(client);

    session::run(
        wizard,
        session::Preset {
            project: args.project,
            template: args.template,
        },
    )
    .await
}
