//! jc-site - journal club archive site
//!
//! `serve` (default) runs the HTTP service; `render` writes a static export.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jc_common::config::{self, TomlConfig};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jc_site::controller::ViewMode;
use jc_site::export::export_site;
use jc_site::{build_router, AppState, SiteSettings};

/// Command-line arguments for jc-site
#[derive(Parser, Debug)]
#[command(name = "jc-site")]
#[command(about = "Journal club archive: filterable list, timeline and deck views")]
#[command(version)]
struct Args {
    /// Root folder holding data/journal_club.json
    #[arg(short, long, global = true)]
    root_folder: Option<PathBuf>,

    /// Data file (overrides the root folder's data/journal_club.json)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Config file (defaults to the platform config location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the site over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "JC_PORT")]
        port: Option<u16>,

        /// Address to bind
        #[arg(long, env = "JC_BIND")]
        bind: Option<String>,
    },
    /// Write a static export of the site
    Render {
        /// Output directory
        #[arg(short, long, default_value = "public")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(config::config_file_path);
    let (toml_config, config_error) = match config_path.as_deref().map(TomlConfig::load) {
        Some(Ok(loaded)) => (loaded, None),
        Some(Err(e)) => (TomlConfig::default(), Some(e)),
        None => (TomlConfig::default(), None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", toml_config.logging.level))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting jc-site v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if let (Some(path), Some(e)) = (&config_path, config_error) {
        warn!("Ignoring config file {}: {}", path.display(), e);
    }

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let data_path = config::resolve_data_file(args.data.as_deref(), &root_folder, &toml_config);
    info!("Data file: {}", data_path.display());

    let site = SiteSettings {
        title: toml_config.site.title.clone(),
        default_view: toml_config
            .site
            .default_view
            .as_deref()
            .map(|view| {
                view.parse::<ViewMode>().unwrap_or_else(|e| {
                    warn!("{}; using list view", e);
                    ViewMode::default()
                })
            })
            .unwrap_or_default(),
    };

    let state = AppState::load(&data_path, site).await;

    match args.command.unwrap_or(Command::Serve { port: None, bind: None }) {
        Command::Serve { port, bind } => {
            let port = port.unwrap_or_else(|| toml_config.port());
            let bind = bind.unwrap_or_else(|| toml_config.bind().to_string());
            serve(state, &bind, port).await
        }
        Command::Render { out } => {
            let catalog = state.catalog().await;
            let report = export_site(catalog, &state.site, &data_path, &out)
                .await
                .context("Static export failed")?;
            for file in &report.files {
                info!("Wrote {}", file.display());
            }
            Ok(())
        }
    }
}

async fn serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("Invalid bind address {bind}:{port}"))?;

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("jc-site listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
