//! Accord CLI
//!
//! Composes account menus against a static site fixture and manages the
//! operator settings blob.

use std::path::{Path, PathBuf};

use accord_kernel::catalog::{COMMERCE_ENDPOINTS, ROUTE_SHORTLIST};
use accord_kernel::config::Config;
use accord_kernel::host::{MenuHost, SiteFixture};
use accord_kernel::menu;
use accord_kernel::settings::{
    FileSettingsStore, SettingsStore, load_snapshot, sanitize, save_settings,
};
use accord_kernel::tap::RequestState;
use accord_sdk::item_map::ItemMap;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Accord: account menu reconciliation for membership and commerce sites.
#[derive(Parser)]
#[command(name = "accord", version, about, long_about = None)]
struct Cli {
    /// Site fixture (overrides ACCORD_FIXTURE_PATH).
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Settings file (overrides ACCORD_SETTINGS_PATH).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a composed menu as JSON.
    Compose {
        #[arg(long, value_enum)]
        surface: SurfaceArg,
    },

    /// Print the URL the commerce menu renders for one endpoint.
    EndpointUrl {
        endpoint: String,

        /// URL to fall back to instead of the platform's own.
        #[arg(long)]
        fallback: Option<String>,
    },

    /// Validate or persist a settings blob.
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// List known membership routes and hideable commerce endpoints.
    Catalog,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Report which custom items a submitted blob would keep.
    Validate { file: PathBuf },

    /// Validate a submitted blob and write it to the settings file.
    Save { file: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum SurfaceArg {
    Membership,
    Commerce,
}

/// A rendered commerce entry.
#[derive(Serialize)]
struct CommerceLink {
    label: String,
    url: String,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(fixture) = cli.fixture {
        config.fixture_path = Some(fixture);
    }
    if let Some(settings) = cli.settings {
        config.settings_path = settings;
    }

    match cli.command {
        Commands::Compose { surface } => cmd_compose(&config, surface),
        Commands::EndpointUrl { endpoint, fallback } => {
            cmd_endpoint_url(&config, &endpoint, fallback)
        }
        Commands::Settings { command } => match command {
            SettingsCommand::Validate { file } => cmd_settings_validate(&file),
            SettingsCommand::Save { file } => cmd_settings_save(&config, &file),
        },
        Commands::Catalog => {
            cmd_catalog();
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Fixture host with the engine installed, plus a fresh request state.
fn request(config: &Config) -> Result<(MenuHost, RequestState)> {
    let fixture_path = config.require_fixture()?;
    let fixture = SiteFixture::load(fixture_path)
        .with_context(|| format!("failed to load fixture {}", fixture_path.display()))?;
    let host = fixture.build_host().context("invalid fixture")?;
    menu::install(&host);

    let store = FileSettingsStore::new(&config.settings_path)?;
    let mut snapshot = load_snapshot(&store)
        .with_context(|| format!("failed to load {}", config.settings_path.display()))?;
    if let Some(slug) = &config.user_base_slug {
        snapshot = snapshot.with_user_base_slug(slug);
    }

    info!(
        integration = snapshot.integration_enabled,
        custom_only = snapshot.custom_only_enabled,
        custom_items = snapshot.custom_items.len(),
        "settings loaded"
    );
    Ok((host, RequestState::new(fixture.viewer, snapshot)))
}

fn cmd_compose(config: &Config, surface: SurfaceArg) -> Result<()> {
    let (host, state) = request(config)?;
    let json = match surface {
        SurfaceArg::Membership => serde_json::to_string_pretty(&host.membership_menu(&state))?,
        SurfaceArg::Commerce => {
            let links: ItemMap<CommerceLink> = host
                .commerce_menu(&state)
                .into_iter()
                .map(|(endpoint, label)| {
                    let url = host.commerce_endpoint_url(&state, &endpoint);
                    (endpoint, CommerceLink { label, url })
                })
                .collect();
            serde_json::to_string_pretty(&links)?
        }
    };
    println!("{json}");
    Ok(())
}

fn cmd_endpoint_url(config: &Config, endpoint: &str, fallback: Option<String>) -> Result<()> {
    let (host, state) = request(config)?;
    let url = match fallback {
        Some(fallback) => menu::resolve_endpoint_url(&host, &state, endpoint, fallback),
        None => host.commerce_endpoint_url(&state, endpoint),
    };
    println!("{url}");
    Ok(())
}

/// Read a submitted blob from a JSON or YAML file.
fn read_submitted(file: &Path) -> Result<serde_json::Value> {
    let source = FileSettingsStore::new(file)?;
    source
        .load()
        .with_context(|| format!("failed to read {}", file.display()))?
        .with_context(|| format!("{} is empty", file.display()))
}

fn cmd_settings_validate(file: &Path) -> Result<()> {
    let report = sanitize(&read_submitted(file)?)?;
    for rejection in &report.rejected {
        warn!(id = rejection.id, reason = %rejection.reason, "custom item rejected");
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_settings_save(config: &Config, file: &Path) -> Result<()> {
    let submitted = read_submitted(file)?;
    let store = FileSettingsStore::new(&config.settings_path)?;
    let report = save_settings(&store, &submitted)
        .with_context(|| format!("failed to save {}", config.settings_path.display()))?;

    for rejection in &report.rejected {
        warn!(id = rejection.id, reason = %rejection.reason, "custom item rejected");
    }
    info!(
        path = %config.settings_path.display(),
        kept = report.settings.custom_items.len(),
        rejected = report.rejected.len(),
        "settings saved"
    );
    Ok(())
}

fn cmd_catalog() {
    println!("Membership routes:");
    for entry in ROUTE_SHORTLIST {
        println!("  {:<26} {}", entry.name, entry.label);
    }
    println!("Commerce endpoints:");
    for entry in COMMERCE_ENDPOINTS {
        println!("  {:<26} {}", entry.name, entry.label);
    }
}
