use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tempvault_core::app::{App, AppBuilder};
use tempvault_core::{ArtifactId, ArtifactStore, InMemoryArtifactStore, StoreConfig};

/// tempvault - temporary store for rendered reports
#[derive(Parser)]
#[command(name = "tempvault")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Lifetime of each stored report, in minutes (overrides PDF_TTL_MINUTES)
    #[arg(long, global = true)]
    ttl_minutes: Option<u64>,

    /// Maximum number of reports held at once (overrides PDF_MAX_ITEMS)
    #[arg(long, global = true)]
    max_items: Option<NonZeroUsize>,

    /// Seconds between two GC sweeps
    #[arg(long, global = true)]
    sweep_interval_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render some fake reports, store them, read and delete a few
    Demo {
        /// Number of reports to render
        #[arg(short, long, default_value = "5")]
        count: usize,
    },

    /// Keep a store alive, printing its status until Ctrl+C
    Watch {
        /// Seconds between two status lines
        #[arg(long, default_value = "10")]
        every: u64,
    },
}

/// Stand-in for the PDF renderer: returns a document and its download name.
fn render_report(user: &str) -> (Bytes, String) {
    let body = format!("%PDF-1.4\n% assessment report for {user}\n%%EOF\n");
    let filename = format!(
        "diagnostico_{}_{}.pdf",
        user.replace(' ', "_"),
        chrono::Local::now().date_naive()
    );
    (Bytes::from(body), filename)
}

/// What a `GET /pdfs/{id}` handler does with the raw path segment.
fn fetch(store: &InMemoryArtifactStore, raw_id: &str) -> Option<(Bytes, String)> {
    let id: ArtifactId = raw_id.parse().ok()?;
    let artifact = store.get(&id)?;
    let disposition = format!("attachment; filename=\"{}\"", artifact.filename());
    Some((artifact.into_bytes(), disposition))
}

fn load_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = StoreConfig::from_env().context("failed to load store configuration")?;
    if let Some(ttl) = cli.ttl_minutes {
        config.ttl_minutes = ttl;
    }
    if let Some(max) = cli.max_items {
        config.max_items = max;
    }
    if let Some(secs) = cli.sweep_interval_secs {
        config.sweep_interval = Duration::from_secs(secs);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "tempvault=debug,tempvault_core=debug,info"
    } else {
        "tempvault=info,tempvault_core=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config(&cli)?;
    tracing::info!(
        ttl_minutes = config.ttl_minutes,
        max_items = config.max_items.get(),
        sweep_interval_secs = config.sweep_interval.as_secs(),
        "configuration loaded"
    );

    let app = AppBuilder::new(config).build()?;

    let result = match cli.command {
        Commands::Demo { count } => cmd_demo(&app, count),
        Commands::Watch { every } => cmd_watch(&app, every).await,
    };

    app.shutdown().await.context("GC loop did not stop cleanly")?;
    result
}

fn cmd_demo(app: &App, count: usize) -> Result<()> {
    let store = Arc::clone(app.store());

    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let (bytes, filename) = render_report(&format!("User {i}"));
        let id = store.save(bytes, &filename);
        println!("stored {filename} -> /pdfs/{id}");
        ids.push(id);
    }

    println!("status: {}", serde_json::to_string(&app.status())?);

    if let Some(first) = ids.first() {
        match fetch(&store, &first.to_string()) {
            Some((bytes, disposition)) => {
                println!("GET /pdfs/{first}: {} bytes, {disposition}", bytes.len())
            }
            None => println!("GET /pdfs/{first}: 404 (evicted)"),
        }
    }

    if fetch(&store, "not-a-valid-uuid").is_none() {
        println!("GET /pdfs/not-a-valid-uuid: 404");
    }

    if let Some(last) = ids.last() {
        println!("DELETE /pdfs/{last}: {}", store.delete(last));
        println!("DELETE /pdfs/{last}: {}", store.delete(last));
    }

    println!("status: {}", serde_json::to_string(&app.status())?);
    Ok(())
}

async fn cmd_watch(app: &App, every: u64) -> Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_secs(every.max(1)));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let status = app.status();
                tracing::info!(
                    count = status.count,
                    ttl_minutes = status.ttl_minutes,
                    max_items = status.max_items,
                    "store status"
                );
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl+C")?;
                tracing::info!("Ctrl+C received");
                return Ok(());
            }
        }
    }
}
