//! Catalog CLI - Product catalog administration from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (any email, password of 6+ characters)
//! catalog login -e admin@example.com -p hunter22
//!
//! # Add a product with one variant and a generated description
//! catalog add -n "Ground Nut Oil" -b Dhara -c "Oils & Ghee" \
//!     --variant "1L:180:220:40:GNO1L" --describe
//!
//! # Browse
//! catalog list --search oil
//! catalog show <PRODUCT_ID>
//! catalog stats
//! ```
//!
//! # Commands
//!
//! - `login` / `signup` / `logout` / `whoami` - Admin identity
//! - `list` / `show` / `stats` - Browse the catalog
//! - `add` / `edit` / `delete` - Change the catalog
//! - `brands` / `categories` - Reference lists
//!
//! # Environment Variables
//!
//! - `CATALOG_DATA_DIR` - Where products and the identity are stored
//! - `CLAUDE_API_KEY` - Enables `--describe` and `--disclaim`
//! - `RUST_LOG` - Log filter (default: `catalog_admin=info,catalog_cli=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_admin::{AdminConfig, AppError, LogFormat};

mod commands;

use commands::Context;
use commands::products::{EditArgs, ProductArgs};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about = "Product catalog admin")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in as an admin
    Login {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 6 characters)
        #[arg(short, long)]
        password: String,
    },
    /// Create an admin account and sign in
    Signup {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 6 characters)
        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in admin
    Whoami,
    /// List products
    List {
        /// Only products whose name or category contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Show at most this many products
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one product in full
    Show {
        /// Product ID
        id: String,
    },
    /// Add a product
    Add(ProductArgs),
    /// Edit a product
    Edit(EditArgs),
    /// Delete a product
    Delete {
        /// Product ID
        id: String,
    },
    /// Catalog totals and the most recent products
    Stats,
    /// List the known brands
    Brands,
    /// List the known categories
    Categories,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AdminConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Text);
            tracing::error!("{}", AppError::from(e).user_message());
            std::process::exit(2);
        }
    };

    init_tracing(config.log_format);

    let ctx = Context::new(&config);

    if let Err(e) = run(cli, &ctx).await {
        tracing::debug!(error = %e, "Command failed");
        tracing::error!("{}", e.user_message());
        std::process::exit(1);
    }
}

/// Install the global subscriber. Logs go to stderr; stdout carries command output.
fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "catalog_admin=info,catalog_cli=info".into());

    let json = format == LogFormat::Json;
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli, ctx: &Context) -> Result<(), AppError> {
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(ctx, &email, password, &mut out)?;
        }
        Commands::Signup { email, password } => {
            commands::auth::signup(ctx, &email, password, &mut out)?;
        }
        Commands::Logout => commands::auth::logout(ctx, &mut out)?,
        Commands::Whoami => commands::auth::whoami(ctx, &mut out)?,
        Commands::List { search, limit } => {
            commands::products::list(ctx, search.as_deref(), limit, &mut out)?;
        }
        Commands::Show { id } => commands::products::show(ctx, &id, &mut out)?,
        Commands::Add(args) => commands::products::add(ctx, args, &mut out).await?,
        Commands::Edit(args) => commands::products::edit(ctx, args, &mut out).await?,
        Commands::Delete { id } => commands::products::delete(ctx, &id, &mut out)?,
        Commands::Stats => commands::products::stats(ctx, &mut out)?,
        Commands::Brands => commands::catalog::brands(&mut out)?,
        Commands::Categories => commands::catalog::categories(&mut out)?,
    }
    Ok(())
}
