//! Bocado CLI - cart, session and REST API front-end.
//!
//! # Usage
//!
//! ```bash
//! # Sign in as an existing user
//! bocado session sign-in --user 3
//!
//! # Browse and fill the cart
//! bocado restaurants search sushi
//! bocado products menu 4
//! bocado cart add --restaurant 4 --product 12 --quantity 2
//! bocado cart show
//!
//! # Place the order
//! bocado cart address "Av. Providencia 1234"
//! bocado cart payment efectivo
//! bocado cart checkout
//!
//! # Check where a navigation ends up for the signed-in user
//! bocado navigate /mis-productos
//! ```
//!
//! # Commands
//!
//! - `cart` - Inspect and change the cart, check out
//! - `session` - Sign in, sign out, show the signed-in user
//! - `users`, `restaurants`, `products`, `orders`, `drivers` - REST API access
//! - `navigate` - Run the route guard for a path
//!
//! Cart and session state live in one JSON file (`BOCADO_STATE_FILE`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bocado_client::{ApiConfig, ClientConfig};

mod commands;

use commands::Context;
use commands::cart::CartAction;
use commands::drivers::DriverAction;
use commands::orders::OrderAction;
use commands::products::ProductAction;
use commands::restaurants::RestaurantAction;
use commands::session::SessionAction;
use commands::users::UserAction;

#[derive(Parser)]
#[command(name = "bocado")]
#[command(author, version, about = "Bocado food-delivery client")]
struct Cli {
    /// REST API base URL (overrides `BOCADO_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// State file (overrides `BOCADO_STATE_FILE`)
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the signed-in session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Restaurants
    Restaurants {
        #[command(subcommand)]
        action: RestaurantAction,
    },
    /// Products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Couriers
    Drivers {
        #[command(subcommand)]
        action: DriverAction,
    },
    /// Resolve a navigation through the route guard
    Navigate {
        /// Path such as `/carrito` or `/restaurante/4`
        path: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bocado_cli=info,bocado_client=info".into());

    // Logs go to stderr so command output on stdout stays clean
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration first (needed for Sentry init)
    let config = load_config(&cli);
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result = match config {
        Ok(config) => run(cli.command, Context::new(config)).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config.api = ApiConfig::new(url)?;
    }
    if let Some(path) = &cli.state_file {
        config.state_file.clone_from(path);
    }
    Ok(config)
}

async fn run(command: Commands, ctx: Context) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Cart { action } => commands::cart::run(&ctx, action).await,
        Commands::Session { action } => commands::session::run(&ctx, action).await,
        Commands::Users { action } => commands::users::run(&ctx, action).await,
        Commands::Restaurants { action } => commands::restaurants::run(&ctx, action).await,
        Commands::Products { action } => commands::products::run(&ctx, action).await,
        Commands::Orders { action } => commands::orders::run(&ctx, action).await,
        Commands::Drivers { action } => commands::drivers::run(&ctx, action).await,
        Commands::Navigate { path } => commands::navigate::run(&ctx, &path),
    }
}
