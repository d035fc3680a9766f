//! CLI administration tool for shorturl.
//!
//! Inspects and creates links directly against the database, without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Totals and the most recent links
//! cargo run --bin shorturl-admin -- stats
//!
//! # Look up a link by code or id (does not count as a click)
//! cargo run --bin shorturl-admin -- lookup aZ3kQ9
//! cargo run --bin shorturl-admin -- show 42
//!
//! # Create a link
//! cargo run --bin shorturl-admin -- shorten https://example.com --length 8
//!
//! # Database tools
//! cargo run --bin shorturl-admin -- db check
//! cargo run --bin shorturl-admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or `DB_*` components), the `DB_*`
//! pool settings, `SHORT_URL_DOMAIN`, `SHORT_CODE_LENGTH`. Values are
//! validated the same way before anything runs.

use shorturl::application::services::{ShortenService, StatsService};
use shorturl::config;
use shorturl::domain::entities::UrlRecord;
use shorturl::domain::repositories::UrlRepository;
use shorturl::infrastructure::persistence::PgUrlRepository;
use shorturl::server::create_pool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shorturl.
#[derive(Parser)]
#[command(name = "shorturl-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Show link and click totals with the most recent links
    Stats {
        /// Number of recent links to list
        #[arg(short, long, default_value_t = 10)]
        limit: i64,
    },

    /// Look up a link by short code
    Lookup {
        /// Short code to resolve
        code: String,
    },

    /// Look up a link by id
    Show {
        /// Record id
        id: i64,
    },

    /// Create a short link
    Shorten {
        /// URL to shorten (must start with http:// or https://)
        url: String,

        /// Code length (4-10), defaults to SHORT_CODE_LENGTH
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    if config.uses_memory_store() {
        anyhow::bail!("shorturl-admin needs a PostgreSQL DATABASE_URL");
    }

    let pool = create_pool(&config).await?;
    let repository = Arc::new(PgUrlRepository::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::Stats { limit } => handle_stats(repository, limit).await?,
        Commands::Lookup { code } => {
            let record = repository.find_by_code(&code).await?;
            print_lookup(record, &code);
        }
        Commands::Show { id } => {
            let record = repository.find_by_id(id).await?;
            print_lookup(record, &id.to_string());
        }
        Commands::Shorten { url, length } => {
            let service = ShortenService::new(repository, config.short_url_domain.clone());
            let length = length.unwrap_or(config.short_code_length);
            let shortened = service.shorten(url, length).await?;

            println!("{}", "Short link created".green().bold());
            println!("  Short URL: {}", shortened.short_url.bright_white().bold());
            println!("  Target:    {}", shortened.original_url);
        }
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    pool.close().await;

    Ok(())
}

/// Prints totals and the newest links.
async fn handle_stats(repository: Arc<PgUrlRepository>, limit: i64) -> Result<()> {
    let service = StatsService::new(repository);
    let page = service.page(1, limit).await?;

    println!("{}", "Statistics".bright_blue().bold());
    println!();
    println!(
        "  Links:  {}",
        page.total.to_string().bright_green().bold()
    );
    println!();

    if page.records.is_empty() {
        println!("{}", "  No links yet".dimmed());
        return Ok(());
    }

    println!("{}", "  Recent links".bright_blue());
    for record in &page.records {
        print_record(record);
    }
    println!();

    Ok(())
}

fn print_lookup(record: Option<UrlRecord>, key: &str) {
    match record {
        Some(record) => print_record(&record),
        None => println!("{} {}", "Not found:".red().bold(), key),
    }
}

fn print_record(record: &UrlRecord) {
    println!(
        "  #{:<6} {:<10} {:>8} clicks  {}",
        record.id,
        record.short_code.bright_white().bold(),
        record.clicks.to_string().bright_green(),
        record.original_url
    );
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Migrate => {
            println!("{}", "Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to migrate")?;

            println!("{}", "Migrations applied".green().bold());
        }
    }

    Ok(())
}
