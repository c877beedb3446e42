mod daemon;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tipline_config::AppConfig;
use tipline_runtime::{CacheStore, SystemSnapshot};

use crate::daemon::{DAEMON_PROCESS_ENV, StartOutcome};

#[derive(Debug, Parser)]
#[command(
    name = "tipline",
    version,
    about = "Context-aware terminal tips for your shell prompt"
)]
struct Cli {
    /// Config file (defaults to ~/.config/tipline/config.toml).
    #[arg(long, global = true, env = "TIPLINE_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Print the current tip (the default when no command is given).
    Get,
    /// Run the refresh loop in the foreground.
    Daemon,
    /// Start the refresh loop in the background.
    Start,
    /// Stop the background refresh loop.
    Stop,
    /// Stop, then start the background refresh loop.
    Restart,
    /// Report whether the background refresh loop is running.
    Status,
    /// Print CPU, memory and disk usage on one line.
    Stats,
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.telemetry.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load_from(&config_path)?;
    init_tracing(&config);

    let store = daemon::store_for(&config);

    if std::env::var(DAEMON_PROCESS_ENV).ok().as_deref() == Some("1") {
        return daemon::run_daemon_process(config, store).await;
    }

    match cli.command.unwrap_or(Commands::Get) {
        Commands::Get => {
            println!("{}", store.read()?);
        }
        Commands::Daemon => {
            daemon::run_daemon_process(config, store).await?;
        }
        Commands::Start => {
            start(&store, &config_path)?;
        }
        Commands::Stop => {
            println!("{}", daemon::daemon_stop(&store)?);
        }
        Commands::Restart => {
            println!("{}", daemon::daemon_stop(&store)?);
            start(&store, &config_path)?;
        }
        Commands::Status => {
            println!("{}", daemon::daemon_status(&store)?);
            println!("- cache: {}", store.cache_file().display());
            println!("- log: {}", store.log_file().display());
        }
        Commands::Stats => {
            let home = dirs::home_dir();
            println!("{}", SystemSnapshot::collect(home.as_deref()).render());
        }
    }

    Ok(())
}

fn start(store: &CacheStore, config_path: &Path) -> Result<()> {
    let outcome = daemon::daemon_start(store, config_path)?;
    println!("{outcome}");
    if let StartOutcome::Started(_) = outcome {
        println!("cache file: {}", store.cache_file().display());
    }
    Ok(())
}
