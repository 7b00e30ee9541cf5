use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use civicfeed::api::Resource;
use civicfeed::app::{App, AppEvent};
use civicfeed::catalog;
use civicfeed::config::Config;
use civicfeed::ui;

/// Get the config directory path (~/.config/civicfeed/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("civicfeed"))
}

/// Create the config directory with user-only permissions.
fn ensure_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }
    Ok(())
}

/// Route logs to `civicfeed.log` when requested; the TUI owns the terminal.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("civicfeed=info"));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(
    name = "civicfeed",
    about = "Browse civic platform feeds, listings and events from the terminal"
)]
struct Args {
    /// Config file (default: ~/.config/civicfeed/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Listing to open: posts, initiatives, housing, jobs, events, organizations
    #[arg(long, default_value = "posts", value_parser = parse_resource)]
    resource: Resource,

    /// Start filtered to a category code (1-6)
    #[arg(long, value_name = "N")]
    category: Option<i32>,

    /// Write logs to civicfeed.log in the config directory
    #[arg(long)]
    log: bool,
}

fn parse_resource(s: &str) -> Result<Resource, String> {
    Resource::from_name(s).ok_or_else(|| {
        let names: Vec<&str> = Resource::ALL.iter().map(|r| r.name()).collect();
        format!("unknown resource '{s}' (expected one of: {})", names.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    ensure_config_dir(&config_dir)?;
    let log_path = args.log.then(|| config_dir.join("civicfeed.log"));
    init_tracing(log_path.as_deref())?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(url) = args.api_url {
        config.api_base_url = url;
        config.validate().context("Invalid --api-url")?;
    }

    if let Some(code) = args.category {
        if catalog::position(code).is_none() {
            anyhow::bail!("Unknown category code {code} (expected 1-6)");
        }
    }

    let mut app = App::new(&config, args.resource, args.category)
        .context("Failed to create application")?;

    tracing::info!(
        resource = args.resource.name(),
        api = %app.client.base_url(),
        "Starting civicfeed"
    );

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
