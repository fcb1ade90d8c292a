//! MPN Migrate
//!
//! Copies every product's `shopify--facts.mpn` value into `custom.mpn`
//! through the Admin GraphQL API, pacing itself against the store's
//! leaky-bucket rate limit. Re-running is safe: products that already have
//! `custom.mpn` are skipped.
//!
//! ```text
//! SHOPIFY_ACCESS_TOKEN=shpat_... mpn-migrate --store my-store.myshopify.com
//! SHOPIFY_ACCESS_TOKEN_DEPOT=shpat_... mpn-migrate --profile bikedepot scan
//! ```

#![allow(clippy::print_stdout, reason = "CLI tool outputs to stdout")]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod reporter;

use cli::{Cli, Commands};
use mpn_core::config::resolve_store_config;

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    // Configuration errors are fatal before any network activity
    let store = resolve_store_config(
        cli.store.as_deref(),
        cli.profile.as_deref(),
        &cli.api_version,
        |var| std::env::var(var).ok(),
    )?;
    let limits = cli.limits.to_config()?;
    tracing::debug!(?store, ?limits, "Configuration resolved");

    match cli.command.unwrap_or_else(|| Commands::Migrate(cli::MigrateArgs::default())) {
        Commands::Migrate(args) => commands::handle_migrate(store, limits, args).await,
        Commands::Scan { json } => commands::handle_scan(store, limits, json).await,
    }
}
