//! WorldWise CLI - Track the cities you have visited.
//!
//! # Usage
//!
//! ```bash
//! # List visited cities
//! worldwise -e user@email.com -p password cities list
//!
//! # Show distinct countries
//! worldwise cities countries
//!
//! # Add a city
//! worldwise cities add --name Lisbon --country Portugal --emoji 🇵🇹 --lat 38.72 --lng -9.14
//!
//! # Delete a city
//! worldwise cities delete 73930385
//! ```
//!
//! Credentials may also come from `WORLDWISE_EMAIL` / `WORLDWISE_PASSWORD`.
//!
//! # Commands
//!
//! - `whoami` - Sign in and show the signed-in user
//! - `cities` - List, show, add and delete cities

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use worldwise_client::{AppState, ClientConfig};
use worldwise_core::CityId;

mod commands;

use commands::CliError;
use commands::cities::AddCity;

#[derive(Parser)]
#[command(name = "worldwise")]
#[command(author, version, about = "WorldWise trip tracker")]
struct Cli {
    /// Email to sign in with
    #[arg(short, long, env = "WORLDWISE_EMAIL", global = true)]
    email: Option<String>,

    /// Password to sign in with
    #[arg(short, long, env = "WORLDWISE_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and show who you are
    Whoami,
    /// Manage visited cities
    Cities {
        #[command(subcommand)]
        action: CityCommand,
    },
}

#[derive(Subcommand)]
enum CityCommand {
    /// List visited cities
    List,
    /// List the distinct countries visited
    Countries,
    /// Show one city
    Show {
        /// City ID
        id: CityId,
    },
    /// Add a visited city
    Add(AddCity),
    /// Delete a city
    Delete {
        /// City ID
        id: CityId,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "worldwise=info,worldwise_client=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), CliError> {
    let state = AppState::new(config).await?;
    commands::login(&state, cli.email.as_deref(), cli.password.as_deref())?;

    match cli.command {
        Commands::Whoami => commands::whoami(&state)?,
        Commands::Cities { action } => match action {
            CityCommand::List => commands::cities::list(&state)?,
            CityCommand::Countries => commands::cities::countries(&state)?,
            CityCommand::Show { id } => commands::cities::show(&state, id).await?,
            CityCommand::Add(args) => commands::cities::add(&state, args).await?,
            CityCommand::Delete { id } => commands::cities::delete(&state, id).await?,
        },
    }
    Ok(())
}
