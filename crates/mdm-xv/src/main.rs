//! mdm-xv - bearer token manager and device lookup for an MDM inventory API.
//!
//! Signs the operator in once, keeps the token in a local cache until it
//! expires, and uses it to look devices up by serial number or user email.

mod prompt;
mod table;

use std::io;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mdm_xv_core::api::{ApiClient, DeviceFilter, DEVICE_TABLE_SECTIONS};
use mdm_xv_core::auth::{FileTokenCache, KeyringSecretStore, TokenManager, TokenSource};
use mdm_xv_core::utils::format_expiry;
use mdm_xv_core::Config;

use prompt::{prompt_line, TerminalPrompt};

type Manager = TokenManager<FileTokenCache, KeyringSecretStore>;

#[derive(Parser)]
#[command(
    name = "mdm-xv",
    version,
    about = "Extended view of Apple device data via the MDM inventory API"
)]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate or reuse a bearer token
    Token,
    /// Look up a device by serial number
    Lookup {
        /// Serial number (prompted for when omitted)
        serial: Option<String>,
    },
    /// Look up devices by user email
    Email {
        /// Email address (prompted for when omitted)
        email: Option<String>,
    },
    /// Clear all stored credentials and the cached token
    Reset,
}

/// Initialize the tracing subscriber for logging
fn init_tracing(verbose: bool) {
    // RUST_LOG wins; otherwise warn, or debug with --verbose
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load().context("Failed to load configuration")?;
    debug!(token_file = %config.token_file.display(), "Configuration loaded");

    let manager = build_manager(&config)?;

    match cli.command {
        Command::Token => run_token(&manager).await,
        Command::Lookup { serial } => run_lookup(&manager, serial).await,
        Command::Email { email } => run_email(&manager, email).await,
        Command::Reset => run_reset(&manager),
    }
}

fn build_manager(config: &Config) -> Result<Manager> {
    let api = ApiClient::with_timeout(config.request_timeout)
        .context("Failed to create HTTP client")?;
    Ok(TokenManager::new(
        FileTokenCache::new(&config.token_file),
        KeyringSecretStore::new(&config.service_name),
        api,
    ))
}

async fn run_token(manager: &Manager) -> Result<()> {
    let outcome = manager.ensure_token(&mut TerminalPrompt).await?;

    match outcome.source {
        TokenSource::Cache => println!("✅ Valid token found: {}", outcome.record.token),
        TokenSource::Issued => println!("✅ New token: {}", outcome.record.token),
    }
    println!("Expires: {}", format_expiry(&outcome.record.expires_at));
    Ok(())
}

async fn run_lookup(manager: &Manager, serial: Option<String>) -> Result<()> {
    let serial = argument_or_prompt(serial, "🔍 Enter Serial Number: ")?;
    if serial.is_empty() {
        bail!("A serial number is required");
    }

    let found = query(manager, DeviceFilter::SerialNumber(serial)).await?;
    if !found {
        println!("❌ No device found.");
    }
    Ok(())
}

async fn run_email(manager: &Manager, email: Option<String>) -> Result<()> {
    let email = argument_or_prompt(email, "📧 Enter Email Address: ")?;
    if email.is_empty() {
        bail!("An email address is required");
    }

    let found = query(manager, DeviceFilter::Email(email)).await?;
    if !found {
        println!("❌ No devices found for this email.");
    }
    Ok(())
}

/// Run an inventory query and print the table. Returns false when nothing matched.
async fn query(manager: &Manager, filter: DeviceFilter) -> Result<bool> {
    let session = manager.ensure_session(&mut TerminalPrompt).await?;
    info!(filter = %filter, source = %session.source, "Querying inventory");

    let inventory = manager
        .api()
        .fetch_computers(
            &session.base_url,
            &session.record.token,
            &filter,
            &DEVICE_TABLE_SECTIONS,
        )
        .await
        .context("Inventory query failed")?;

    if inventory.results.is_empty() {
        return Ok(false);
    }

    table::print_device_table(&inventory.results);
    Ok(true)
}

fn run_reset(manager: &Manager) -> Result<()> {
    println!("⚠️  Resetting credentials and token...");
    manager.reset()?;
    Ok(())
}

fn argument_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v.trim().to_string()),
        None => prompt_line(label).context("Failed to read input"),
    }
}
