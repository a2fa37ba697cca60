use std::path::PathBuf;

use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use a3s_upload_guard::{sink, GuardConfig, S3Notification, ValidationPipeline};

#[derive(Parser)]
#[command(
    name = "a3s-upload-guard",
    about = "Validate uploaded objects against the upload policy and alert on violations"
)]
struct Cli {
    /// Notification document to evaluate (reads stdin when omitted)
    #[arg(short, long)]
    event: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the response document
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GuardConfig::load(path)?.with_env_overrides(),
        None => GuardConfig::from_env(),
    };

    let raw = match &cli.event {
        Some(path) => tokio::fs::read(path).await?,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            buf
        }
    };
    let batch = S3Notification::from_slice(&raw)?.into_batch();

    let mut pipeline = ValidationPipeline::new(config.policy.clone());
    match sink::from_config(&config).await {
        Some(alert_sink) => pipeline = pipeline.with_sink(alert_sink),
        None => tracing::info!("No alert topic configured; alerts will be skipped"),
    }

    let result = pipeline.evaluate(&batch).await;
    tracing::info!(
        status = result.status_code,
        records = batch.len(),
        "Batch evaluated"
    );

    println!("{}", serde_json::to_string(&result.to_response())?);
    Ok(())
}
