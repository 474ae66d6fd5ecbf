// activity-feed: render recent GitHub repository activity as an HTML fragment.
// Serves a cached snapshot for 30 seconds before asking the API again.

mod app;
mod cache;
mod diagnostics;
mod error;
mod github;
mod render;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{App, Outcome, RepoEvents};
use crate::cache::{CacheGate, DEFAULT_CACHE_KEY, FileStore};
use crate::diagnostics::TracingDiagnostics;
use crate::github::GitHubClient;
use crate::render::{FileTarget, Projector, RenderTarget, RepoLinks, StdoutTarget};

#[derive(Parser)]
#[command(name = "activity-feed", version, about = "Render recent GitHub repository activity as HTML")]
struct Cli {
    /// Repository owner
    #[arg(long, default_value = "thomasmoelhave")]
    owner: String,
    /// Repository name
    #[arg(long, default_value = "tpie")]
    repo: String,
    /// Write the fragment to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Directory holding the snapshot cache (default: platform cache dir)
    #[arg(long)]
    cache_dir: Option<PathBuf>,
    /// Storage key of the snapshot
    #[arg(long, default_value = DEFAULT_CACHE_KEY)]
    cache_key: String,
    /// JSON-P callback name sent to the API
    #[arg(long, default_value = "tpieevents")]
    callback: String,
    /// Ignore and do not write the snapshot cache
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> error::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "activity_feed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let store = if cli.no_cache {
        None
    } else {
        cli.cache_dir
            .clone()
            .map(FileStore::new)
            .or_else(FileStore::open_default)
    };
    match &store {
        Some(store) => tracing::debug!(dir = %store.dir().display(), "using snapshot cache"),
        None => tracing::debug!("snapshot cache disabled"),
    }

    let gate = CacheGate::new(store, cli.cache_key.clone(), TracingDiagnostics);
    let projector = Projector::new(RepoLinks::new(&cli.owner, &cli.repo));
    let mut app = App::new(gate, projector);

    let client = GitHubClient::from_env()?;
    let mut source = RepoEvents::new(client, &cli.owner, &cli.repo, &cli.callback);

    match cli.output {
        Some(path) => run(&mut app, &mut source, &mut FileTarget::new(path)).await,
        None => run(&mut app, &mut source, &mut StdoutTarget).await,
    }

    Ok(())
}

/// Refresh once. Failures are logged; whatever was rendered so far stays.
async fn run<T: RenderTarget>(
    app: &mut App<FileStore, TracingDiagnostics, chrono::Local>,
    source: &mut RepoEvents,
    target: &mut T,
) {
    match app.refresh(source, target).await {
        Ok(Outcome::Cached) => tracing::info!("rendered cached activity"),
        Ok(Outcome::Fetched) => tracing::info!("rendered fetched activity"),
        Err(e) => tracing::warn!("activity refresh failed: {}", e),
    }
}
