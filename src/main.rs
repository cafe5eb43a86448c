//! Schooldash CLI
//!
//! Command-line entry point: serve the dashboard, validate the datasets,
//! export the computed dashboard or print a default configuration.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use schooldash::config::{generate_default_config, Config, LoggingConfig};
use schooldash::dashboard::Dashboard;
use schooldash::api::{serve, AppState};
use schooldash::dataset::{load_datasets, Datasets};

#[derive(Parser)]
#[command(name = "schooldash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Schools of Berlin dashboard server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to the standard locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory, overrides the config file
    #[arg(short, long, global = true)]
    data_dir: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the datasets and serve the dashboard
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Load the datasets and report row counts
    Check,

    /// Write the computed dashboard as JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print a commented default config file
    InitConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = setup(cli.config, cli.data_dir)?;
            if let Some(host) = host {
                config.api.host = host;
            }
            if let Some(port) = port {
                config.api.port = port;
            }

            tracing::info!("Starting Schooldash v{}", env!("CARGO_PKG_VERSION"));
            let datasets = load(&config)?;

            let started = std::time::Instant::now();
            let state = AppState::new(datasets, config.api.clone());
            tracing::info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Dashboard computed"
            );

            serve(state, &config.api).await?;
        }
        Commands::Check => {
            let config = setup(cli.config, cli.data_dir)?;
            let datasets = load(&config)?;
            println!("{}", datasets.stats());
            if !datasets.is_complete() {
                anyhow::bail!("At least one dataset is empty");
            }
        }
        Commands::Export { out } => {
            let config = setup(cli.config, cli.data_dir)?;
            let datasets = load(&config)?;
            let dashboard = Dashboard::build(&datasets);
            let json = serde_json::to_string_pretty(&dashboard)?;

            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "Dashboard exported");
                }
                None => println!("{}", json),
            }
        }
        Commands::InitConfig => {
            print!("{}", generate_default_config());
        }
    }

    Ok(())
}

/// Resolve the configuration and install logging
fn setup(path: Option<PathBuf>, data_dir: Option<String>) -> anyhow::Result<Config> {
    let (mut config, defaults) = match path {
        Some(path) => (Config::load_with_env(&path)?, None),
        None => {
            let mut defaults = Config::load_default();
            (std::mem::take(&mut defaults.config), Some(defaults))
        }
    };
    if let Some(dir) = data_dir {
        config.data.dir = dir;
    }

    init_logging(&config.logging)?;
    if let Some(defaults) = defaults {
        defaults.report();
    }
    Ok(config)
}

fn load(config: &Config) -> anyhow::Result<Datasets> {
    load_datasets(&config.data.sources())
        .with_context(|| format!("Failed to load datasets from {}", config.data.dir))
}

/// Install the tracing subscriber; `RUST_LOG` overrides the configured level
fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("schooldash={},tower_http=info", config.level))
    });

    let writer = match &config.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_json() {
        registry.with(fmt::layer().json().with_writer(writer)).init();
    } else {
        registry.with(fmt::layer().with_writer(writer)).init();
    }

    Ok(())
}
