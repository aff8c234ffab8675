//! CLI administration tool for housing-ledger.
//!
//! Provides commands for inspecting accounts, viewing statistics, and
//! performing database checks without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Show an account with its residents
//! cargo run --bin admin -- account show 0123456789
//!
//! # Delete an account (asks for confirmation)
//! cargo run --bin admin -- account delete 0123456789
//!
//! # Preview generated account numbers (no database needed)
//! cargo run --bin admin -- account generate-number --count 5
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`:
//!   PostgreSQL connection, required by every command except
//!   `account generate-number`

use housing_ledger::application::services::{AccountService, ResidentService};
use housing_ledger::config::{Config, StorageBackend};
use housing_ledger::infrastructure::persistence::{PgAccountRepository, PgResidentRepository};
use housing_ledger::server::connect_pool;
use housing_ledger::utils::account_number::{
    AccountNumberGenerator, Sha256AccountNumberGenerator,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing housing-ledger.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show account and resident counts
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Account operations
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

/// Account subcommands.
#[derive(Subcommand)]
enum AccountAction {
    /// Show an account and its residents
    Show {
        /// 10-digit account number
        number: String,
    },

    /// Delete an account and its residents
    Delete {
        /// 10-digit account number
        number: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Print freshly generated account numbers
    GenerateNumber {
        /// How many numbers to print
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Commands::Account {
        action: AccountAction::GenerateNumber { count },
    } = &cli.command
    {
        return generate_numbers(*count);
    }

    let config = Config {
        storage_backend: StorageBackend::Postgres,
        ..Config::from_env()?
    };
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
        Commands::Account { action } => {
            let service = account_service(&pool, config.account_number_max_attempts);
            handle_account_action(action, &service).await?
        }
    }

    Ok(())
}

fn account_service(pool: &PgPool, max_attempts: usize) -> AccountService<PgAccountRepository> {
    AccountService::new(
        Arc::new(PgAccountRepository::new(Arc::new(pool.clone()))),
        Arc::new(Sha256AccountNumberGenerator),
        max_attempts,
    )
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of accounts
/// - Total number of residents
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let accounts = account_service(pool, 1)
        .count_accounts()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let residents = ResidentService::new(Arc::new(PgResidentRepository::new(Arc::new(
        pool.clone(),
    ))))
    .count_residents()
    .await
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "  Accounts:  {}",
        accounts.to_string().bright_green().bold()
    );
    println!(
        "  Residents: {}",
        residents.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
                    .fetch_one(pool)
                    .await
                    .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}

/// Dispatches account commands.
async fn handle_account_action(
    action: AccountAction,
    service: &AccountService<PgAccountRepository>,
) -> Result<()> {
    match action {
        AccountAction::Show { number } => show_account(service, &number).await,
        AccountAction::Delete { number, yes } => delete_account(service, &number, yes).await,
        AccountAction::GenerateNumber { count } => generate_numbers(count),
    }
}

/// Prints an account and its residents.
async fn show_account(service: &AccountService<PgAccountRepository>, number: &str) -> Result<()> {
    let account = service
        .get_by_number(number)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Account {number} not found"))?;
    let details = service
        .get_details(account.id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!("{}", "🏠 Account".bright_blue().bold());
    println!();
    println!("  Number:  {}", account.account_number.cyan());
    println!("  ID:      {}", account.id.to_string().bright_black());
    println!("  Address: {}", account.address);
    println!("  Area:    {}", account.area);
    println!(
        "  Lease:   {} → {}",
        account.start_date.format("%Y-%m-%d"),
        account.end_date.format("%Y-%m-%d")
    );
    println!();

    if details.residents.is_empty() {
        println!("  {}", "No residents".yellow());
    } else {
        println!("  {}", "Residents:".bright_white().bold());
        for r in &details.residents {
            println!(
                "    {} {} {}",
                r.last_name.cyan(),
                r.first_name,
                r.middle_name.as_deref().unwrap_or("")
            );
        }
    }
    println!();

    Ok(())
}

/// Deletes an account by number after confirmation.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes` is given
/// - Residents of the account are deleted with it
async fn delete_account(
    service: &AccountService<PgAccountRepository>,
    number: &str,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑️  Delete Account".bright_blue().bold());
    println!();

    let account = service
        .get_by_number(number)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Account {number} not found"))?;

    println!("  Number:  {}", account.account_number.cyan());
    println!("  Address: {}", account.address);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this account and all its residents?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_account(account.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete account: {}", e))?;

    println!();
    println!("{}", "✅ Account deleted".green().bold());
    println!();

    Ok(())
}

/// Prints generated account numbers without touching the database.
fn generate_numbers(count: usize) -> Result<()> {
    let generator = Sha256AccountNumberGenerator;

    for _ in 0..count.max(1) {
        println!("{}", generator.generate());
    }

    Ok(())
}
