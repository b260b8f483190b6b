use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use painto_application::{BootstrapOptions, Storefront};
use painto_core::locale::Locale;
use painto_infrastructure::{ConfigService, PaintoPaths};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "painto")]
#[command(about = "Painto storefront CLI - bilingual dictionaries and Shopify cart sessions", long_about = None)]
struct Cli {
    /// Root directory for config, client state, dictionaries and logs
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Config file to use instead of <home>/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the built-in demo catalog instead of Shopify
    #[arg(long, global = true)]
    offline: bool,

    /// Also write logs to a daily rolling file in the logs directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or change the active language
    Locale {
        #[command(subcommand)]
        action: LocaleAction,
    },
    /// Look up a dictionary key in the active language
    Translate {
        key: String,
        /// Text shown when no dictionary has the key (empty shows the key)
        #[arg(long, default_value = "")]
        fallback: String,
    },
    /// Manage the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Create a fresh cart for one variant and print its checkout URL
    BuyNow {
        variant_id: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// List products with their purchasable variant ids
    Products {
        #[arg(long, default_value_t = 10)]
        first: u32,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Walk through add, update, remove and checkout against the demo catalog
    Demo,
}

#[derive(Subcommand)]
enum LocaleAction {
    /// Print the active language and document attributes
    Show,
    /// Switch language (en, he)
    Set { locale: Locale },
    /// List supported languages
    List,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a variant, creating the cart on first use
    Add {
        variant_id: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Print the cart as the mini cart shows it
    Show {
        /// Print the raw cart snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a line's quantity (0 removes it)
    Update { line_id: String, quantity: u32 },
    /// Remove lines by id
    Remove {
        #[arg(required = true)]
        line_ids: Vec<String>,
    },
    /// Forget the persisted cart id
    Clear,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config file if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = PaintoPaths::new(cli.home.as_deref());
    let log_dir = if cli.log_file {
        Some(paths.logs_dir()?)
    } else {
        None
    };
    let _log_guard = logging::init(log_dir.as_deref())?;

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path.clone()),
        None => ConfigService::new(cli.home.as_deref())?,
    };

    if let Commands::Config { action } = &cli.command {
        return match action {
            ConfigAction::Show => commands::config::show(&config_service),
            ConfigAction::Init => commands::config::init(&config_service),
        };
    }

    let config = config_service
        .load()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    let options = BootstrapOptions {
        home: cli.home.clone(),
        offline: cli.offline || matches!(cli.command, Commands::Demo),
    };
    let storefront = Storefront::bootstrap(config, options).await?;

    match cli.command {
        Commands::Locale { action } => match action {
            LocaleAction::Show => commands::locale::show(&storefront),
            LocaleAction::Set { locale } => commands::locale::set(&storefront, locale).await,
            LocaleAction::List => commands::locale::list(&storefront),
        },
        Commands::Translate { key, fallback } => {
            println!("{}", storefront.translate(&key, &fallback));
            Ok(())
        }
        Commands::Cart { action } => match action {
            CartAction::Add {
                variant_id,
                quantity,
            } => commands::cart::add(&storefront, &variant_id, quantity).await,
            CartAction::Show { json } => commands::cart::show(&storefront, json).await,
            CartAction::Update { line_id, quantity } => {
                commands::cart::update(&storefront, &line_id, quantity).await
            }
            CartAction::Remove { line_ids } => commands::cart::remove(&storefront, &line_ids).await,
            CartAction::Clear => commands::cart::clear(&storefront).await,
        },
        Commands::BuyNow {
            variant_id,
            quantity,
        } => commands::cart::buy_now(&storefront, &variant_id, quantity).await,
        Commands::Products { first } => commands::cart::products(&storefront, first).await,
        Commands::Demo => commands::demo::run(&storefront).await,
        Commands::Config { .. } => Ok(()),
    }
}
