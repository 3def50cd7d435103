use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use item_ratings::{
    ActivityMode, FetchRequest, FetchResponse, Platform, Rating, RatingsConfig, RatingsService,
    RatingsStore, VoteTally, score,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "item-ratings", about = "Community ratings for in-game items")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch ratings for a JSON list of requests
    Fetch {
        /// JSON array of {"referenceId": .., "availablePerks": [..]}
        #[arg(short, long)]
        requests: PathBuf,

        #[arg(short, long, value_enum, default_value = "steam")]
        platform: Platform,

        #[arg(short, long, value_enum, default_value = "any")]
        mode: ActivityMode,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        endpoint: Option<String>,

        #[arg(long, env = "RATINGS_API_KEY")]
        api_key: Option<String>,

        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Score a single tally offline
    Score {
        #[arg(long)]
        total: u32,
        #[arg(long)]
        downvotes: u32,
        #[arg(long, default_value_t = 0)]
        review_total: u32,
        #[arg(long, default_value_t = 0)]
        review_downvotes: u32,
        /// Highest vote count known for any item
        #[arg(long)]
        max_votes: u32,
        /// JSON config file (for the review vote weight)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&PathBuf>) -> Result<RatingsConfig> {
    match path {
        Some(path) => RatingsConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(RatingsConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Fetch {
            requests,
            platform,
            mode,
            config,
            endpoint,
            api_key,
            output,
        } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(endpoint) = endpoint {
                config.endpoint = endpoint;
            }
            if api_key.is_some() {
                config.api_key = api_key;
            }
            config.validate()?;

            let raw = std::fs::read_to_string(&requests)
                .with_context(|| format!("Failed to read {}", requests.display()))?;
            let requests: Vec<FetchRequest> =
                serde_json::from_str(&raw).context("Failed to parse fetch requests")?;

            run_fetch(&config, requests, platform, mode, output).await
        }
        Command::Score {
            total,
            downvotes,
            review_total,
            review_downvotes,
            max_votes,
            config,
        } => {
            if downvotes > total || review_downvotes > review_total {
                bail!("downvotes cannot exceed total votes");
            }
            let config = load_config(config.as_ref())?;
            let response = FetchResponse::new(
                0,
                VoteTally::new(total, downvotes),
                VoteTally::new(review_total, review_downvotes),
            );
            println!("{:.1}", score(&response, max_votes, &config.scoring()));
            Ok(())
        }
    }
}

async fn run_fetch(
    config: &RatingsConfig,
    requests: Vec<FetchRequest>,
    platform: Platform,
    mode: ActivityMode,
    output: OutputFormat,
) -> Result<()> {
    let start = Instant::now();
    let store = Arc::new(RatingsStore::new());
    let service = RatingsService::from_config(config, Arc::clone(&store))
        .context("Failed to build ratings client")?;

    let outcome = service.bulk_fetch(&requests, platform, mode).await;

    let mut ratings: Vec<Rating> = store.snapshot().ratings.into_values().collect();
    ratings.sort_by(|a, b| {
        b.overall_score
            .total_cmp(&a.overall_score)
            .then(a.reference_id.cmp(&b.reference_id))
    });

    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ratings)?);
        }
        OutputFormat::Table => {
            println!("{:>12}  {:<24}  {:>5}  {:>7}", "ITEM", "ROLL", "SCORE", "VOTES");
            for rating in &ratings {
                println!(
                    "{:>12}  {:<24}  {:>5.1}  {:>7}",
                    rating.reference_id, rating.roll, rating.overall_score, rating.rating_count
                );
            }
            println!(
                "\n{} of {} items rated, {} of {} batches failed [{:.2}s]",
                outcome.received,
                outcome.requested,
                outcome.batches_failed,
                outcome.batches_attempted,
                start.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}
