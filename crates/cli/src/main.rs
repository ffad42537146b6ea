//! CotizaciónPro CLI - Compose, save and share quotes from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Who am I signed in as
//! cotiza whoami
//!
//! # Compose the draft (kept locally between runs)
//! cotiza draft customer --name "Juan Pérez" --phone "55 1234 5678"
//! cotiza draft set 1 description "Pintura vinílica"
//! cotiza draft set 1 quantity 2
//! cotiza draft set 1 price 100
//! cotiza draft add
//! cotiza draft show
//!
//! # Save it and share it
//! cotiza commit
//! cotiza show <ID>
//! cotiza share <ID>
//! ```
//!
//! # Commands
//!
//! - `whoami` - Greet the signed-in user
//! - `draft` - Inspect and edit the local draft
//! - `commit` - Save the draft as a quote
//! - `show` - Render a saved quote
//! - `share` - Print the share summary of a saved quote

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cotizapro_core::LineItemField;
use cotizapro_engine::{EngineConfig, EngineError};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "cotiza")]
#[command(author, version, about = "CotizaciónPro quotes from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Greet the signed-in user
    Whoami,
    /// Inspect and edit the local draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
    /// Save the draft as a quote
    Commit,
    /// Render a saved quote
    Show {
        /// Quote id
        id: String,
    },
    /// Print the share summary of a saved quote
    Share {
        /// Quote id
        id: String,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    /// Show rows and live totals
    Show,
    /// Set customer fields
    Customer {
        /// Customer name
        #[arg(short, long)]
        name: Option<String>,

        /// Phone or WhatsApp number
        #[arg(short, long)]
        phone: Option<String>,
    },
    /// Append a blank row
    Add,
    /// Set one field of a row
    Set {
        /// Row number (1-based) or row id
        item: String,

        /// `description`, `quantity` or `price`
        field: LineItemField,

        /// New value
        value: String,
    },
    /// Remove a row
    Remove {
        /// Row number (1-based) or row id
        item: String,
    },
    /// Throw the draft away
    Discard,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &EngineConfig) -> Option<sentry::ClientInitGuard> {
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

/// Map tracing levels to Sentry: errors and warnings become events, the rest
/// breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cotizapro_engine=info,cotizapro_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            let err = EngineError::from(e);
            tracing::error!("{err}");
            commands::fail(&err.user_message());
        }
    };

    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, Context::new(config)).await {
        e.report();
        commands::fail(&e.user_message());
    }
}

async fn run(cli: Cli, ctx: Context) -> Result<(), EngineError> {
    match cli.command {
        Commands::Whoami => commands::quote::whoami(&ctx).await?,
        Commands::Draft { action } => match action {
            DraftAction::Show => commands::draft::show(&ctx),
            DraftAction::Customer { name, phone } => {
                commands::draft::customer(&ctx, name, phone);
            }
            DraftAction::Add => commands::draft::add(&ctx),
            DraftAction::Set { item, field, value } => {
                commands::draft::set(&ctx, &item, field, &value)?;
            }
            DraftAction::Remove { item } => commands::draft::remove(&ctx, &item)?,
            DraftAction::Discard => commands::draft::discard(&ctx),
        },
        Commands::Commit => commands::quote::commit(&ctx).await?,
        Commands::Show { id } => commands::quote::show(&ctx, &id).await?,
        Commands::Share { id } => commands::quote::share(&ctx, &id).await?,
    }
    Ok(())
}
