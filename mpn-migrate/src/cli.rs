use clap::{Args, Parser, Subcommand};
use mpn_types::{ConfigError, RateLimitConfig, StoreConfig};

#[derive(Parser)]
#[command(
    name = "mpn-migrate",
    about = "Copy product MPNs from shopify--facts.mpn to custom.mpn",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, env = "SHOPIFY_STORE", global = true, help = "Store domain, e.g. my-store.myshopify.com")]
    pub store: Option<String>,

    #[arg(long, global = true, help = "Built-in store profile (columns, bikedepot)")]
    pub profile: Option<String>,

    #[arg(
        long,
        env = "SHOPIFY_API_VERSION",
        global = true,
        default_value = StoreConfig::DEFAULT_API_VERSION
    )]
    pub api_version: String,

    #[arg(short, long, env = "RUST_LOG", global = true, default_value = "warn")]
    pub log_level: String,

    #[command(flatten)]
    pub limits: LimitArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Scan, confirm, and copy every missing value (default if no command specified)")]
    Migrate(MigrateArgs),

    #[command(about = "Scan the catalog and report what would be migrated, without writing")]
    Scan {
        #[arg(long, help = "Output the plan as JSON")]
        json: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    #[arg(short, long, help = "Start immediately, skipping the countdown")]
    pub yes: bool,

    #[arg(long, default_value_t = 8, help = "Seconds to wait before writing (Ctrl+C to cancel)")]
    pub countdown: u64,

    #[arg(long, help = "Output the final summary as JSON")]
    pub json: bool,
}

impl Default for MigrateArgs {
    fn default() -> Self {
        Self { yes: false, countdown: 8, json: false }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct LimitArgs {
    #[arg(long, global = true, help = "Metafields per mutation (max 25)")]
    pub batch_size: Option<usize>,

    #[arg(long, global = true, help = "Slow down below this many available points")]
    pub throttle_threshold: Option<f64>,

    #[arg(long, global = true, help = "Minimum delay between batches in milliseconds")]
    pub min_batch_delay_ms: Option<u64>,

    #[arg(long, global = true, help = "Retries for a throttled request")]
    pub max_retries: Option<u32>,

    #[arg(long, global = true, help = "Backoff multiplier between retries")]
    pub retry_backoff: Option<u32>,
}

impl LimitArgs {
    /// Apply overrides on top of the defaults and validate the result.
    pub fn to_config(&self) -> Result<RateLimitConfig, ConfigError> {
        let defaults = RateLimitConfig::default();
        RateLimitConfig {
            metafields_per_mutation: self.batch_size.unwrap_or(defaults.metafields_per_mutation),
            throttle_threshold: self.throttle_threshold.unwrap_or(defaults.throttle_threshold),
            min_batch_delay_ms: self.min_batch_delay_ms.unwrap_or(defaults.min_batch_delay_ms),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff: self.retry_backoff.unwrap_or(defaults.retry_backoff),
            ..defaults
        }
        .validated()
    }
}
