//! `mailsearch` - find stored email by sender and recipient.
//!
//! Reads one search request (`{"from", "to", "subject"}`) from a file or
//! stdin and prints the response envelope as JSON.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailsearch_core::{Config, EmailRepository, SearchService};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "mailsearch", version, about)]
struct Args {
    /// Configuration file (defaults to the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Message database, overriding the configured path.
    #[arg(long)]
    database: Option<PathBuf>,

    /// Request file; `-` or absent reads stdin.
    request: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr; stdout carries only the response.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailsearch=info,mailsearch_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)
        .await
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;

    let database_path = args.database.unwrap_or_else(|| config.database_path());
    if let Some(parent) = database_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let database = database_path
        .to_str()
        .context("database path is not valid UTF-8")?;
    let repo = EmailRepository::new(database)
        .await
        .with_context(|| format!("opening database {database}"))?;
    info!("Opened message database at {database}");

    let raw = read_request(args.request).await?;
    let service = SearchService::new(repo, config.accepted_domains());
    let response = service.handle(&raw).await;

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Read the request payload from `path`, or stdin for `None`/`-`.
async fn read_request(path: Option<PathBuf>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) if path.as_os_str() != "-" => tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading request from {}", path.display())),
        _ => {
            let mut raw = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut raw)
                .await
                .context("reading request from stdin")?;
            Ok(raw)
        }
    }
}
