//! Attendance service - clock-in/out registration and shift compliance API.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use attendance_service as app;
use clap::Parser;

use app::api::{self, AppState};
use app::config::{AppConfig, ConfigLoadResult};
use app::db::{self, SqlStore};
use app::directory::DirectoryClient;
use app::store::{AttendanceStore, MemoryStore};

/// Employee time-and-attendance backend.
#[derive(Parser)]
#[command(name = "attendance-service")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Explicit config file path
    #[arg(long, conflicts_with = "dev")]
    config: Option<PathBuf>,

    /// Keep records in memory instead of PostgreSQL
    #[arg(long)]
    in_memory: bool,

    /// Override the configured listen address
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = match (&cli.config, cli.dev) {
        (Some(path), _) => path.clone(),
        (None, true) => PathBuf::from("config.toml"),
        (None, false) => AppConfig::default_path(),
    };

    let (mut config, created) = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => (config, false),
        ConfigLoadResult::Missing => {
            let config = AppConfig::default();
            config
                .save(&config_path)
                .with_context(|| format!("Failed to write default config to {}", config_path.display()))?;
            (config, true)
        }
        ConfigLoadResult::Invalid(e) => bail!("Invalid config {}: {e}", config_path.display()),
    };
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    let _log_guard = app::logging::init(&config.logging);

    tracing::info!("Attendance service starting...");
    if created {
        tracing::warn!("Config missing, wrote defaults to {:?}", config_path);
    } else {
        tracing::info!("Config loaded from {:?}", config_path);
    }

    let policy = config.attendance.policy()?;
    tracing::info!(
        "Timezone: {}, entry cutoff: {}",
        policy.timezone,
        policy
            .entry_cutoff
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    let store: Arc<dyn AttendanceStore> = if cli.in_memory {
        tracing::warn!("Using in-memory store; records are lost on shutdown");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(connect_database(&config).await?)
    };

    let directory = DirectoryClient::new(&config.directory).context("Failed to build directory client")?;
    let state = AppState::new(store, Arc::new(directory), policy);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Attendance service stopped");
    Ok(())
}

/// Connect, apply the schema and log what the database holds.
async fn connect_database(config: &AppConfig) -> anyhow::Result<SqlStore> {
    let conn = db::connect(&config.database.connection_string())
        .await
        .context("Failed to connect to database")?;
    db::ensure_schema(&conn).await.context("Failed to apply schema")?;

    // Log connection info
    if let Ok(version) = db::get_version(&conn).await {
        tracing::info!("PostgreSQL: {}", version);
    }

    if let Ok(counts) = db::get_table_counts(&conn).await {
        tracing::info!(
            "Tables: {} entries, {} exits, {} shift parameter sets",
            counts.entries,
            counts.exits,
            counts.shift_parameters
        );
    }

    Ok(SqlStore::new(conn))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
