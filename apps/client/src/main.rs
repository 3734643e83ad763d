mod api_client;
mod cli;
mod config;
mod errors;
mod models;
mod platform;
mod presentation;
mod session;
mod views;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::AtsApiClient;
use crate::cli::{Cli, Output};
use crate::config::Config;
use crate::platform::LocalPlatform;
use crate::session::{SessionController, UploadPolicy};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the rendered pages
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting ATS client v{}", env!("CARGO_PKG_VERSION"));

    let backend = Arc::new(AtsApiClient::new(&config)?);
    info!("Scoring backend at {}", backend.base_url());

    let platform = Arc::new(LocalPlatform::new(config.output_dir.clone()));
    let controller = SessionController::new(UploadPolicy::from_config(&config), backend, platform);

    cli::run(cli, controller, Output::detect()).await
}
