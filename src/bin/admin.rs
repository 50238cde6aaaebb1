//! CLI administration tool for artifact-redirector.
//!
//! Inspects and maintains the link cache without going through the HTTP
//! service.
//!
//! # Usage
//!
//! ```bash
//! # Check the key-value store connection
//! cargo run --bin admin -- store check
//!
//! # Look up a cached link
//! cargo run --bin admin -- get coredns-linux-amd64.zip
//!
//! # Pin a link by hand
//! cargo run --bin admin -- set coredns-linux-amd64.zip https://example.com/coredns.zip
//!
//! # List upstream artifacts without touching the cache
//! cargo run --bin admin -- artifacts --project coredns-custom-build
//!
//! # Run one refresh pass now (or into memory only)
//! cargo run --bin admin -- refresh
//! cargo run --bin admin -- refresh --dry-run
//! ```
//!
//! # Environment Variables
//!
//! Same as the service; see `artifact_redirector::config`.

use artifact_redirector::application::services::{LinkMapRefresher, RefreshOutcome};
use artifact_redirector::config::{self, Config, mask_connection_string};
use artifact_redirector::domain::refresh_clock::RefreshClock;
use artifact_redirector::domain::repositories::{ArtifactSource, KeyValueStore};
use artifact_redirector::domain::slug::sanitize_slug;
use artifact_redirector::infrastructure::appveyor::{AppveyorClient, AppveyorSource};
use artifact_redirector::infrastructure::store::{MemoryStore, RedisStore};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;
use url::Url;

/// CLI tool for managing artifact-redirector.
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
    /// Key-value store operations
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },

    /// Show the cached link for a slug
    Get {
        /// Artifact slug (path components are stripped)
        slug: String,
    },

    /// Store a link by hand
    Set {
        /// Artifact slug (path components are stripped)
        slug: String,

        /// Absolute download URL
        url: String,

        /// Skip confirmation prompt when overwriting
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List upstream artifacts without writing them
    Artifacts {
        /// Only this project (default: all configured projects)
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Run one refresh pass now
    Refresh {
        /// Write into memory instead of the configured store
        #[arg(long)]
        dry_run: bool,
    },
}

/// Store operation subcommands.
#[derive(Subcommand)]
enum StoreAction {
    /// Check store connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Store { action } => handle_store_action(action, &config).await?,
        Commands::Get { slug } => get_link(&config, &slug).await?,
        Commands::Set { slug, url, yes } => set_link(&config, &slug, &url, yes).await?,
        Commands::Artifacts { project } => list_artifacts(&config, project).await?,
        Commands::Refresh { dry_run } => refresh(&config, dry_run).await?,
    }

    Ok(())
}

async fn connect_store(config: &Config) -> Result<RedisStore> {
    RedisStore::connect(&config.redis_url, &config.redis_key_prefix)
        .await
        .context("Failed to connect to key-value store")
}

/// Builds one source per configured project, optionally narrowed to `only`.
fn build_sources(config: &Config, only: Option<&str>) -> Result<Vec<Arc<dyn ArtifactSource>>> {
    let registry = config.registry()?;
    let client = Arc::new(AppveyorClient::new(config.appveyor_config()?)?);

    let sources: Vec<Arc<dyn ArtifactSource>> = registry
        .ids()
        .filter(|id| only.is_none_or(|p| id.slug() == p))
        .map(|id| Arc::new(AppveyorSource::new(id, client.clone())) as Arc<dyn ArtifactSource>)
        .collect();

    if sources.is_empty() {
        anyhow::bail!("Project {:?} is not configured", only.unwrap_or_default());
    }

    Ok(sources)
}

/// Handles store diagnostic commands.
async fn handle_store_action(action: StoreAction, config: &Config) -> Result<()> {
    match action {
        StoreAction::Check => {
            println!(
                "{} {}",
                "🔍 Checking store at".bright_blue(),
                mask_connection_string(&config.redis_url).bright_white()
            );

            let store = connect_store(config).await?;
            if !store.health_check().await {
                anyhow::bail!("Store answered the connection but failed PING");
            }

            println!("{}", "✅ Store connection OK".green().bold());
        }
    }

    Ok(())
}

async fn get_link(config: &Config, slug: &str) -> Result<()> {
    let key = sanitize_slug(slug).context("Invalid slug")?;
    let store = connect_store(config).await?;

    match store.get(key).await? {
        Some(url) if !url.is_empty() => {
            println!("  {} → {}", key.cyan(), url.bright_white());
        }
        _ => println!("{}", format!("  No cached link for {}", key).yellow()),
    }

    Ok(())
}

/// Stores a link after validating it.
///
/// # Safety
///
/// - The URL must be absolute
/// - Overwriting an existing value requires confirmation (default: No)
async fn set_link(config: &Config, slug: &str, url: &str, skip_confirm: bool) -> Result<()> {
    let key = sanitize_slug(slug).context("Invalid slug")?;
    let url = Url::parse(url).context("URL must be absolute")?;
    let store = connect_store(config).await?;

    if let Some(existing) = store.get(key).await?
        && !skip_confirm
    {
        println!("  Current: {}", existing.bright_black());
        println!("  New:     {}", url.as_str().bright_white());
        println!();

        let confirmed = Confirm::new()
            .with_prompt(format!("Overwrite {}?", key))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    store.set(key, url.as_str()).await?;

    println!("{}", "✅ Link stored".green().bold());
    println!(
        "  {}",
        "It will be replaced by the next refresh if upstream publishes the same name."
            .bright_black()
    );

    Ok(())
}

/// Lists upstream artifacts per project.
///
/// # Output Format
///
/// ```text
/// 📦 missdeer/coredns-custom-build
///   coredns-linux-amd64.zip         https://...
/// ```
async fn list_artifacts(config: &Config, project: Option<String>) -> Result<()> {
    for source in build_sources(config, project.as_deref())? {
        println!("{} {}", "📦".bright_blue(), source.id().to_string().bold());

        match source.list_artifacts().await {
            Ok(entries) if entries.is_empty() => {
                println!("{}", "  No artifacts in the last build".yellow());
            }
            Ok(entries) => {
                for entry in &entries {
                    println!(
                        "  {:<40} {}",
                        entry.base_name.cyan(),
                        entry.download_url.bright_black()
                    );
                }
                println!("  Total: {}", entries.len().to_string().bright_white().bold());
            }
            Err(e) => println!("  {} {}", "❌".red(), e.to_string().red()),
        }
        println!();
    }

    Ok(())
}

/// Runs one refresh pass, ignoring the rate limit of any running service.
async fn refresh(config: &Config, dry_run: bool) -> Result<()> {
    let memory = Arc::new(MemoryStore::new());
    let store: Arc<dyn KeyValueStore> = if dry_run {
        println!("{}", "⚠️  Dry run: writing into memory only".yellow());
        memory.clone()
    } else {
        Arc::new(connect_store(config).await?)
    };

    let refresher = LinkMapRefresher::new(
        build_sources(config, None)?,
        store,
        Arc::new(RefreshClock::new()),
        config.refresh_min_interval(),
    );

    println!("{}", "🔄 Refreshing...".bright_blue());

    match refresher.refresh_all().await {
        RefreshOutcome::Completed(report) => {
            println!(
                "  Sources: {} ({} failed)",
                report.sources.to_string().bright_white().bold(),
                report.failed_sources.to_string().red()
            );
            println!(
                "  Stored:  {} ({} failed)",
                report.stored.to_string().bright_green().bold(),
                report.failed_writes.to_string().red()
            );
        }
        RefreshOutcome::Skipped { retry_in } => {
            println!(
                "{}",
                format!("  Skipped, retry in {}s", retry_in.as_secs()).yellow()
            );
        }
    }

    if dry_run {
        println!();
        for (key, url) in memory.snapshot() {
            println!("  {:<40} {}", key.cyan(), url.bright_black());
        }
    }

    Ok(())
}
