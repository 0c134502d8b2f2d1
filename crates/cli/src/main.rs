//! Operational entry point for the document preview subsystem.
//!
//! Resolves documents against the live metadata API, exercises the
//! preview service, and exposes cache maintenance. Logging goes to
//! stderr so stdout stays scriptable.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bienestar_client::ApiClient;
use bienestar_core::{AppConfig, DocumentCache};
use bienestar_preview::{PreviewService, PreviewUrl, ViewPlan, ViewerKind};

#[derive(Parser)]
#[command(name = "bienestar-docs", version, about = "Document preview tooling for the Bienestar intranet")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a document and print its view plan.
    View {
        /// Document id.
        id: i64,
    },
    /// Download a document's binary payload to disk.
    Download {
        /// Document id.
        id: i64,

        /// Output path (defaults to the document title).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Cache maintenance.
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Drop TTL-expired entries.
    Prune,
    /// Empty the store and wipe persisted state.
    Clear,
}

fn kind_label(kind: ViewerKind) -> &'static str {
    match kind {
        ViewerKind::Pdf => "pdf",
        ViewerKind::Image => "image",
        ViewerKind::Download => "download",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    tracing::debug!("configuration loaded: persistence={:?}", config.persistence);

    match cli.command {
        Command::View { id } => {
            let api = ApiClient::from_config(&config)?;
            let doc = api.get_document(id).await?;

            let mut service = PreviewService::from_config(&config).await?;
            match service.view(&doc).await {
                ViewPlan::Inline { kind, url } => {
                    let (confidence, url) = match url {
                        PreviewUrl::Validated(url) => ("validated", url),
                        PreviewUrl::Pending(url) => ("pending", url),
                    };
                    println!("{} preview ({confidence}): {url}", kind_label(kind));
                }
                ViewPlan::Download => {
                    println!("no inline preview for {:?}; use `bienestar-docs download {id}`", doc.title);
                }
            }
            service.dispose().await;
        }
        Command::Download { id, out } => {
            let api = ApiClient::from_config(&config)?;
            let doc = api.get_document(id).await?;
            let payload = api.download(id).await?;

            let out = out.unwrap_or_else(|| PathBuf::from(&doc.title));
            std::fs::write(&out, &payload)?;
            println!("wrote {} bytes to {}", payload.len(), out.display());
        }
        Command::Cache { command } => {
            let cache = DocumentCache::open(&config).await;
            match command {
                CacheCommand::Prune => {
                    let removed = cache.prune_expired().await;
                    println!("pruned {removed} expired entries");
                }
                CacheCommand::Clear => {
                    cache.clear().await;
                    println!("cache cleared");
                }
            }
        }
    }

    Ok(())
}
