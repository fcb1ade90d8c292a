//! Orchestration of a migration run: scan → filter → confirm → update → report.

use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use mpn_core::engine::PREVIEW_LIMIT;
use mpn_core::{
    AdminApiClient, BatchUpdater, CatalogScanner, MigrationObserver, MigrationPlan,
    MigrationSummary, RequestExecutor, TracingObserver,
};
use mpn_types::{MetafieldSpec, RateLimitConfig, StoreConfig};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::MigrateArgs;
use crate::reporter::ConsoleReporter;

/// Human-readable lines go to stdout, or to stderr when stdout carries JSON.
#[derive(Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    fn line(self, text: impl std::fmt::Display) {
        if self.json {
            eprintln!("{}", text);
        } else {
            println!("{}", text);
        }
    }

    /// Rewrite the current terminal line in place.
    fn inline(self, text: &str) {
        let written = if self.json {
            let mut stderr = std::io::stderr().lock();
            write!(stderr, "{}", text).and_then(|()| stderr.flush())
        } else {
            let mut stdout = std::io::stdout().lock();
            write!(stdout, "{}", text).and_then(|()| stdout.flush())
        };
        if let Err(e) = written {
            tracing::debug!("Failed to write progress line: {}", e);
        }
    }
}

/// What a scan result means for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlanOutcome {
    /// Nothing in the catalog carries a source value.
    NoSourceValues,
    /// Every product with a source value already has a target value.
    AllMigrated,
    Proceed,
}

impl PlanOutcome {
    fn of(plan: &MigrationPlan) -> Self {
        if plan.total_with_source == 0 {
            Self::NoSourceValues
        } else if plan.is_empty() {
            Self::AllMigrated
        } else {
            Self::Proceed
        }
    }

    fn exit_message(self) -> Option<String> {
        match self {
            Self::NoSourceValues => Some(format!(
                "No products found with {} metafield. Exiting.",
                MetafieldSpec::SOURCE_MPN.qualified_name()
            )),
            Self::AllMigrated => Some(format!(
                "\nAll products already have {} populated. Exiting.",
                MetafieldSpec::TARGET_MPN.qualified_name()
            )),
            Self::Proceed => None,
        }
    }
}

fn build_executor(
    store: &StoreConfig,
    limits: RateLimitConfig,
    json: bool,
) -> Result<RequestExecutor<AdminApiClient>> {
    let observer: Arc<dyn MigrationObserver> = if json {
        Arc::new(TracingObserver)
    } else {
        Arc::new(ConsoleReporter::new(limits.throttle_threshold))
    };
    let client = AdminApiClient::new(store).context("building Admin API client")?;
    Ok(RequestExecutor::new(client, limits, observer))
}

async fn scan_plan(executor: &mut RequestExecutor<AdminApiClient>, out: Output) -> Result<MigrationPlan> {
    out.line("Fetching all products...");
    let candidates = CatalogScanner::default()
        .scan(executor)
        .await
        .context("scanning product catalog")?;
    out.line(format!("\nTotal products found: {}", candidates.len()));
    Ok(MigrationPlan::from_candidates(candidates))
}

fn print_analysis(plan: &MigrationPlan, out: Output) {
    let source = MetafieldSpec::SOURCE_MPN.qualified_name();
    out.line(format!("\n{}", "=== ANALYSIS ===".cyan().bold()));
    out.line(format!("Total products with {}: {}", source, plan.total_with_source));
    out.line(format!("Products needing migration: {}", plan.to_update.len()));
    out.line(format!("Products already migrated: {}", plan.already_migrated));
}

fn print_preview(plan: &MigrationPlan, out: Output) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Product", "MPN"]);
    for (i, candidate) in plan.preview(PREVIEW_LIMIT).iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&candidate.title),
            Cell::new(&candidate.source_value),
        ]);
    }

    out.line(format!("\n{}", "=== UPDATE SUMMARY ===".cyan().bold()));
    out.line(format!("Total products to migrate: {}", plan.to_update.len()));
    out.line(format!(
        "\nThe following products will have {} populated:",
        MetafieldSpec::TARGET_MPN.qualified_name()
    ));
    out.line(table);
    let remaining = plan.remaining_after_preview(PREVIEW_LIMIT);
    if remaining > 0 {
        out.line(format!("  ... and {} more", remaining));
    }
}

/// Fixed countdown before the first write. Only an external interrupt
/// (Ctrl+C) cancels it.
async fn countdown(seconds: u64, out: Output) {
    out.line(format!(
        "\n{}\n",
        format!("⚠️  Starting update in {} seconds... Press Ctrl+C to cancel", seconds).yellow()
    ));
    for remaining in (1..=seconds).rev() {
        let text = format!(
            "\rStarting in {} second{}...",
            remaining,
            if remaining > 1 { "s" } else { "" }
        );
        out.inline(&text);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    out.line("");
}

fn print_summary(summary: &MigrationSummary) {
    println!("\n{}", "=== MIGRATION SUMMARY ===".cyan().bold());
    println!("Total products processed: {}", summary.total_processed);
    println!("Successfully migrated: {}", summary.succeeded.to_string().green());
    let failed = summary.failed.to_string();
    println!("Failed: {}", if summary.is_clean() { failed.normal() } else { failed.red() });
    println!("Already migrated: {}", summary.already_migrated);

    if !summary.errors.is_empty() {
        println!("\n{}", "=== ERRORS ===".red().bold());
        for error in &summary.errors {
            println!("  {}", error);
        }
    }

    println!("\n✅ Migration complete!");
}

pub async fn handle_migrate(store: StoreConfig, limits: RateLimitConfig, args: MigrateArgs) -> Result<()> {
    let out = Output { json: args.json };
    let source = MetafieldSpec::SOURCE_MPN.qualified_name();
    let target = MetafieldSpec::TARGET_MPN.qualified_name();

    out.line("Starting MPN metafield migration script...\n");
    out.line(format!("This will copy values from {} to {} on {}\n", source, target, store.store_domain));

    let mut executor = build_executor(&store, limits, args.json)?;
    let plan = scan_plan(&mut executor, out).await?;
    let outcome = PlanOutcome::of(&plan);

    if outcome != PlanOutcome::NoSourceValues {
        print_analysis(&plan, out);
    }
    if let Some(message) = outcome.exit_message() {
        out.line(message);
        return Ok(());
    }

    print_preview(&plan, out);

    if !args.yes && args.countdown > 0 {
        countdown(args.countdown, out).await;
    }
    out.line(format!("\n{}\n", "🚀 Starting update process...".bold()));

    let config = executor.config().clone();
    let throttle = executor.throttle();
    out.line(format!(
        "Processing {} products in ~{} API requests ({} products per request)...",
        plan.to_update.len(),
        plan.estimated_requests(config.metafields_per_mutation),
        config.metafields_per_mutation
    ));
    out.line(format!(
        "Rate limit config: Max {} points, restores at {} points/sec\n",
        throttle.maximum_available, throttle.restore_rate
    ));

    let result = BatchUpdater::default().run(&mut executor, &plan.to_update).await;
    let summary = MigrationSummary::new(&plan, result);

    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Migration finished"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

pub async fn handle_scan(store: StoreConfig, limits: RateLimitConfig, json: bool) -> Result<()> {
    let out = Output { json };
    let mut executor = build_executor(&store, limits, json)?;
    let plan = scan_plan(&mut executor, out).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    print_analysis(&plan, out);
    if !plan.is_empty() {
        print_preview(&plan, out);
    }
    println!("\n{}", "Dry run: no metafields were written.".yellow());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpn_types::ProductCandidate;

    fn candidate(n: usize, target: Option<&str>) -> ProductCandidate {
        ProductCandidate::new(
            format!("gid://shopify/Product/{}", n),
            format!("Product {}", n),
            format!("MPN-{}", n),
            target.map(str::to_string),
        )
    }

    #[test]
    fn test_empty_catalog_exits_without_analysis() {
        let plan = MigrationPlan::from_candidates(vec![]);
        let outcome = PlanOutcome::of(&plan);
        assert_eq!(outcome, PlanOutcome::NoSourceValues);
        assert_eq!(
            outcome.exit_message().as_deref(),
            Some("No products found with shopify--facts.mpn metafield. Exiting.")
        );
    }

    #[test]
    fn test_fully_migrated_catalog_exits() {
        let plan = MigrationPlan::from_candidates(vec![
            candidate(1, Some("MPN-1")),
            candidate(2, Some("MPN-2")),
        ]);
        let outcome = PlanOutcome::of(&plan);
        assert_eq!(outcome, PlanOutcome::AllMigrated);
        assert_eq!(
            outcome.exit_message().as_deref(),
            Some("\nAll products already have custom.mpn populated. Exiting.")
        );
    }

    #[test]
    fn test_pending_work_proceeds() {
        let plan = MigrationPlan::from_candidates(vec![
            candidate(1, Some("MPN-1")),
            candidate(2, None),
            candidate(3, Some("")),
        ]);
        let outcome = PlanOutcome::of(&plan);
        assert_eq!(outcome, PlanOutcome::Proceed);
        assert_eq!(outcome.exit_message(), None);
        assert_eq!(plan.to_update.len(), 2);
    }
}
