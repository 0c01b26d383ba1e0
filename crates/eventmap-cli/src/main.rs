//! Eventmap CLI - log in to the eventmap backend and browse events.
//!
//! The session (user record and bearer token) is cached locally, so a valid
//! session is resumed without asking for credentials and events remain
//! available offline.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use eventmap_core::auth::token_expires_at;
use eventmap_core::utils::{
    format_ampm, format_bytes, format_phone, maps_url, truncate_string, Platform,
};
use eventmap_core::{
    ApiClient, AuthContext, CacheManager, Config, FileStore, LoginError, SessionManager,
};

/// Log file written next to the cache entries
const LOG_FILE: &str = "eventmap.log";

/// Event names longer than this are truncated in listings
const EVENT_NAME_WIDTH: usize = 40;

#[derive(Parser)]
#[command(name = "eventmap", version, about = "Log in and browse events on the map")]
struct Cli {
    /// Base URL of the eventmap API (overrides the config file)
    #[arg(long, env = "EVENTMAP_API_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in, or resume the cached session if it is still valid
    Login {
        #[arg(long, env = "EVENTMAP_EMAIL")]
        email: Option<String>,

        /// Authenticate even if a valid session is cached
        #[arg(long)]
        force: bool,
    },
    /// Show the cached session
    Status,
    /// List events, from the network or the local cache
    Events {
        /// Which maps application the printed links target
        #[arg(long, value_enum, default_value_t = MapsPlatform::Android)]
        maps: MapsPlatform,
    },
    /// Remove the cached session
    Logout,
}

#[derive(Clone, Copy, ValueEnum)]
enum MapsPlatform {
    Ios,
    Android,
}

impl From<MapsPlatform> for Platform {
    fn from(platform: MapsPlatform) -> Self {
        match platform {
            MapsPlatform::Ios => Platform::Ios,
            MapsPlatform::Android => Platform::Android,
        }
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing(log_dir: &Path) -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, LOG_FILE));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config, using defaults: {:#}", e);
            Config::default()
        }
    };
    if let Some(url) = cli.api_url {
        config.api_base_url = Some(url);
    }

    let cache_dir = config.cache_dir()?;
    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;
    let _guard = init_tracing(&cache_dir);
    info!(base_url = config.base_url(), "Eventmap starting");

    let api = ApiClient::new(config.base_url(), config.request_timeout())
        .context("Failed to build HTTP client")?;
    let store = FileStore::new(cache_dir).context("Failed to open cache")?;
    let context = Arc::new(AuthContext::new());
    let session = SessionManager::new(api, CacheManager::new(store), context);

    match cli.command {
        Command::Login { email, force } => login(&session, &mut config, email, force).await,
        Command::Status => status(&session).await,
        Command::Events { maps } => list_events(&session, maps.into()).await,
        Command::Logout => {
            session.logout().await.context("Failed to remove cached session")?;
            println!("Logged out.");
            Ok(())
        }
    }
}

async fn login(
    session: &SessionManager<FileStore>,
    config: &mut Config,
    email: Option<String>,
    force: bool,
) -> Result<()> {
    if !force {
        let restored = session.restore().await;
        if restored.should_resume() {
            if let Some(user) = restored.user {
                println!("Already logged in as {} <{}>", user.full_name(), user.email);
                return Ok(());
            }
        }
    }

    let email = match email.or_else(|| config.last_email.clone()) {
        Some(email) if !email.trim().is_empty() => email,
        _ => prompt("Email: ")?,
    };
    let password = match std::env::var("EVENTMAP_PASSWORD") {
        Ok(password) => password,
        Err(_) => rpassword::prompt_password("Password: ")?,
    };

    match session.login(&email, &password).await {
        Ok(user) => {
            config.last_email = Some(user.email.clone());
            if let Err(e) = config.save() {
                warn!(error = %e, "Failed to save config");
            }
            println!("Logged in as {} <{}>", user.full_name(), user.email);
            Ok(())
        }
        Err(e @ LoginError::Rejected(_)) => bail!("Authentication Error: {}", e),
        Err(e) => Err(e.into()),
    }
}

async fn status(session: &SessionManager<FileStore>) -> Result<()> {
    let restored = session.restore().await;

    match restored.user {
        Some(ref user) => {
            println!("User:    {} <{}>", user.full_name(), user.email);
            println!("Mobile:  {}", format_phone(&user.mobile));
        }
        None => println!("User:    (none)"),
    }

    match session.cached_token().await {
        Some(token) => {
            let state = if restored.token_valid { "valid" } else { "expired" };
            match token_expires_at(&token) {
                Some(expires) => {
                    let local = expires.with_timezone(&Local);
                    println!(
                        "Token:   {} (expires {} {})",
                        state,
                        local.format("%b %d, %Y"),
                        format_ampm(&local)
                    );
                }
                None => println!("Token:   {}", state),
            }
        }
        None => println!("Token:   (none)"),
    }

    let size = session.cache().store().size_on_disk().await?;
    println!("Cache:   {} in {}", format_bytes(size, 1), session.cache().store().cache_dir().display());

    if !restored.should_resume() {
        println!("\nRun `eventmap login` to start a session.");
    }
    Ok(())
}

async fn list_events(session: &SessionManager<FileStore>, platform: Platform) -> Result<()> {
    let events = session.events().await.context("No events available")?;

    println!("{} event(s) found", events.len());
    for event in &events {
        let name = truncate_string(event.display_name(), EVENT_NAME_WIDTH);
        let when = event
            .date_time
            .map(|dt| {
                let local = dt.with_timezone(&Local);
                format!("{} {}", local.format("%b %d"), format_ampm(&local))
            })
            .unwrap_or_default();
        println!(
            "  {:<width$} {:<16} {}",
            name,
            when,
            maps_url(event.position, event.display_name(), platform),
            width = EVENT_NAME_WIDTH
        );
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
