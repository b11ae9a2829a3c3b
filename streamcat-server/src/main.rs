//! streamcat - unified multi-protocol music catalog service
//!
//! Loads the seed snapshot into one in-memory Store and serves it over REST, GraphQL, SOAP and
//! gRPC at the same time. Settings resolve as command line > environment > TOML file > defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use streamcat_common::config::{
    self, ListenerConfig, TomlConfig, DEFAULT_GRAPHQL_PORT, DEFAULT_GRPC_PORT, DEFAULT_REST_PORT,
    DEFAULT_SOAP_PORT,
};
use streamcat_common::{SeedData, SongRefPolicy, Store};
use streamcat_server::api::buildinfo::BuildInfo;
use streamcat_server::server::{self, Listeners};
use streamcat_server::AppState;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SongRefs {
    Tolerate,
    Validate,
}

impl From<SongRefs> for SongRefPolicy {
    fn from(value: SongRefs) -> Self {
        match value {
            SongRefs::Tolerate => SongRefPolicy::Tolerate,
            SongRefs::Validate => SongRefPolicy::Validate,
        }
    }
}

/// Command-line arguments for streamcat
#[derive(Parser, Debug)]
#[command(name = "streamcat")]
#[command(about = "Music catalog served over REST, GraphQL, SOAP and gRPC")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "STREAMCAT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding users.json, songs.json and playlists.json
    #[arg(short, long, env = "STREAMCAT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Address every listener binds to
    #[arg(long, env = "STREAMCAT_HOST")]
    host: Option<String>,

    #[arg(long, env = "STREAMCAT_REST_PORT")]
    rest_port: Option<u16>,

    #[arg(long, env = "STREAMCAT_GRAPHQL_PORT")]
    graphql_port: Option<u16>,

    #[arg(long, env = "STREAMCAT_SOAP_PORT")]
    soap_port: Option<u16>,

    #[arg(long, env = "STREAMCAT_GRPC_PORT")]
    grpc_port: Option<u16>,

    /// Write-time handling of playlist song references
    #[arg(long, value_enum, env = "STREAMCAT_SONG_REFS")]
    song_refs: Option<SongRefs>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "STREAMCAT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Save the effective configuration to this file and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

impl Args {
    /// Fold command-line values over the file configuration
    fn apply(&self, config: &mut TomlConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        for (port, listener) in [
            (self.rest_port, &mut config.rest),
            (self.graphql_port, &mut config.graphql),
            (self.soap_port, &mut config.soap),
            (self.grpc_port, &mut config.grpc),
        ] {
            if port.is_some() {
                listener.port = port;
            }
        }
        if let Some(policy) = self.song_refs {
            config.catalog.song_refs = policy.into();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

fn listeners(config: &TomlConfig) -> Listeners {
    let port = |listener: &ListenerConfig, default| {
        listener.enabled.then(|| listener.port_or(default))
    };
    Listeners {
        host: config.host.clone(),
        rest: port(&config.rest, DEFAULT_REST_PORT),
        graphql: port(&config.graphql, DEFAULT_GRAPHQL_PORT),
        soap: port(&config.soap, DEFAULT_SOAP_PORT),
        grpc: port(&config.grpc, DEFAULT_GRPC_PORT),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins; otherwise start at info and switch to the configured level once known
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    let build = BuildInfo::current();
    info!(
        "Starting streamcat v{} [{}] built {} ({})",
        build.version, build.git_hash, build.build_timestamp, build.build_profile
    );

    let mut config =
        config::load_or_default(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);

    if !from_env {
        filter_handle
            .reload(EnvFilter::new(&config.logging.level))
            .context("Failed to apply log level")?;
    }

    if let Some(path) = &args.write_config {
        config::write_toml_config(&config, path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let seed = SeedData::load_dir(&config.data_dir).context("Failed to load seed data")?;
    let store = Store::from_seed(seed, config.catalog.song_refs)
        .context("Seed data violates catalog invariants")?;
    if store.verify_indexes().is_err() {
        warn!("Indexes disagree with the seed snapshot, rebuilding");
        store
            .rebuild_indexes()
            .context("Failed to rebuild catalog indexes")?;
    }
    info!("Song reference policy: {:?}", store.song_ref_policy());

    let state = AppState::from_store(store);
    server::run(listeners(&config), state, shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
