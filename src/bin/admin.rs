//! CLI administration tool for link-shortener.
//!
//! Issues and inspects bearer tokens, lists an owner's links, and checks the
//! database, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Issue a token (prompts for the subject when --subject is omitted)
//! cargo run --bin admin -- token issue --subject alice --ttl 86400
//!
//! # Inspect a token
//! cargo run --bin admin -- token inspect eyJhbGciOi...
//!
//! # List an owner's live links
//! cargo run --bin admin -- links list --owner alice
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `TOKEN_SIGNING_SECRET` (token commands): secret shared with the server
//! - `TOKEN_TTL_SECONDS` (optional): default lifetime for issued tokens
//! - `DATABASE_URL` or `DB_*` (links and db commands): PostgreSQL connection

use link_shortener::application::services::AuthService;
use link_shortener::config::{Config, mask_connection_string};
use link_shortener::domain::entities::UserId;
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing link-shortener.
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
    /// Issue and inspect bearer tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Inspect stored links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Token subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Issue a signed bearer token
    Issue {
        /// Token subject (user id); prompted for when omitted
        #[arg(short, long)]
        subject: Option<String>,

        /// Lifetime in seconds (defaults to TOKEN_TTL_SECONDS or 3600)
        #[arg(short, long)]
        ttl: Option<u64>,
    },

    /// Verify a token and show its subject and expiry
    Inspect {
        /// The token to inspect
        token: String,
    },
}

/// Link subcommands.
#[derive(Subcommand)]
enum LinksAction {
    /// List an owner's live links in creation order
    List {
        /// Owner user id
        #[arg(short, long)]
        owner: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Token { action } => handle_token_action(action)?,
        Commands::Links { action } => handle_links_action(action).await?,
        Commands::Db { action } => handle_db_action(action).await?,
    }

    Ok(())
}

fn auth_service() -> Result<AuthService> {
    let secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;
    anyhow::ensure!(!secret.is_empty(), "TOKEN_SIGNING_SECRET must not be empty");

    Ok(AuthService::new(secret))
}

async fn connect() -> Result<PgPool> {
    let database_url = Config::load_database_url().context("Failed to load database configuration")?;

    println!(
        "{} {}",
        "Database:".bright_black(),
        mask_connection_string(&database_url).bright_black()
    );

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

/// Dispatches token commands.
fn handle_token_action(action: TokenAction) -> Result<()> {
    let auth = auth_service()?;

    match action {
        TokenAction::Issue { subject, ttl } => issue_token(&auth, subject, ttl),
        TokenAction::Inspect { token } => inspect_token(&auth, &token),
    }
}

/// Issues a token with an interactive prompt for the subject.
///
/// The token is signed with `TOKEN_SIGNING_SECRET`, so it is only accepted by
/// servers sharing that secret.
fn issue_token(auth: &AuthService, subject: Option<String>, ttl: Option<u64>) -> Result<()> {
    println!("{}", "🔑 Issue Bearer Token".bright_blue().bold());
    println!();

    let subject = match subject {
        Some(s) => s,
        None => Input::new()
            .with_prompt("Subject (user id)")
            .interact_text()?,
    };
    anyhow::ensure!(!subject.trim().is_empty(), "Subject must not be empty");

    let ttl_seconds = match ttl {
        Some(t) => t,
        None => std::env::var("TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600),
    };
    anyhow::ensure!(ttl_seconds > 0, "TTL must be greater than 0");

    let ttl = chrono::Duration::try_seconds(i64::try_from(ttl_seconds)?)
        .context("TTL is out of range")?;

    let subject = UserId::new(subject);
    let token = auth.issue(&subject, ttl);
    let verified = auth.decode(&token).context("Issued token failed verification")?;

    println!("{}", "Token details:".bright_white().bold());
    println!("  Subject: {}", subject.as_str().cyan());
    println!(
        "  Expires: {}",
        verified
            .expires_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    println!("  Token:   {}", token.bright_yellow().bold());
    println!();
    println!("{}", "Add this to your requests:".bright_white());
    println!(
        "  {}: Bearer {}",
        "Authorization".bright_cyan(),
        token.bright_yellow()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/link/get-links",
        token.bright_yellow()
    );
    println!();

    Ok(())
}

fn inspect_token(auth: &AuthService, token: &str) -> Result<()> {
    match auth.decode(token) {
        Ok(verified) => {
            println!("{}", "✅ Token is valid".green().bold());
            println!("  Subject: {}", verified.subject.as_str().cyan());
            println!(
                "  Expires: {}",
                verified
                    .expires_at
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string()
                    .bright_black()
            );
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "❌ Token rejected:".red().bold(), e);
            anyhow::bail!("Token rejected: {e}")
        }
    }
}

/// Dispatches link commands.
async fn handle_links_action(action: LinksAction) -> Result<()> {
    match action {
        LinksAction::List { owner } => {
            let pool = connect().await?;
            list_links(pool, UserId::new(owner)).await
        }
    }
}

/// Lists an owner's live links.
///
/// # Output Format
///
/// ```text
/// 📋 Links owned by alice
///
///   Seq   Hash       Created              Source
///   ─────────────────────────────────────────────────────────────
///   1     3xK9aQ2m   2025-01-15 10:30     https://example.com/a
/// ```
async fn list_links(pool: PgPool, owner: UserId) -> Result<()> {
    println!(
        "{} {}",
        "📋 Links owned by".bright_blue().bold(),
        owner.as_str().cyan().bold()
    );
    println!();

    let repo = PgLinkRepository::new(Arc::new(pool));
    let links = repo
        .list_by_owner(&owner)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<10} {:<20} {}",
        "Seq".bright_white().bold(),
        "Hash".bright_white().bold(),
        "Created".bright_white().bold(),
        "Source".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<5} {:<10} {:<20} {}",
            link.seq.to_string().bright_black(),
            link.hash.cyan(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.source_link
        );
    }

    println!();
    println!(
        "  Total: {}",
        links.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let pool = connect().await?;
            sqlx::query("SELECT 1").fetch_one(&pool).await?;

            let links: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE deleted_at IS NULL")
                    .fetch_one(&pool)
                    .await
                    .context("Failed to query links table, are migrations applied?")?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!(
                "  Live links: {}",
                links.to_string().bright_green().bold()
            );
        }
    }

    Ok(())
}
