use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use company_directory::{config::AppConfig, module, telemetry, DirectoryModule};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const DEFAULT_CONFIG_PATH: &str = "config/directory.yaml";

#[derive(Parser, Debug)]
#[command(name = "directory-server")]
#[command(author, version, about = "Company directory HTTP server")]
struct Cli {
    /// YAML configuration file (defaults to config/directory.yaml when present)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run migrations and serve HTTP (default)
    Run,
    /// Apply database migrations and exit
    Migrate,
    /// Print the effective configuration as JSON and exit
    PrintConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_PATH)).filter(|p| p.exists()));
    let config = AppConfig::load(config_path.as_deref()).context("failed to load configuration")?;

    let command = cli.command.unwrap_or(Command::Run);
    if command == Command::PrintConfig {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    telemetry::init_tracing(&config);
    ensure_sqlite_dir(&config.database.url)?;

    match command {
        Command::Migrate => {
            let db = module::connect(&config.database).await?;
            module::migrate(&db).await?;
        }
        Command::Run => run(config).await?,
        Command::PrintConfig => {}
    }

    Ok(())
}

async fn run(config: AppConfig) -> Result<()> {
    let module = Arc::new(DirectoryModule::init(config).await?);

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    module.serve(cancel).await
}

/// Cancel on Ctrl+C or SIGTERM
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("Received terminate signal, shutting down");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    cancel.cancel();
}

/// Create the parent directory of a file-backed SQLite database
fn ensure_sqlite_dir(url: &str) -> Result<()> {
    let Some(rest) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let file = rest.split('?').next().unwrap_or_default();
    if file.is_empty() || file.contains(":memory:") {
        return Ok(());
    }

    if let Some(parent) = Path::new(file).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}
