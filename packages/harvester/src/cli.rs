//! Command-line interface for the harvester.

use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{
    HarvestConfig, DEFAULT_MAX_RETRIES, DEFAULT_ROUND, DEFAULT_TIMEOUT_MS, REGION_CODES,
    RESULTS_URL,
};
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::report::{render_reports, OutputFormat, RegionReport, DEFAULT_CHART_WIDTH};
use crate::retry::{Backoff, RetryPolicy};
use crate::types::{CandidateRegistry, ResultRecord};

/// Volby Harvester - Download Czech presidential election results from volby.cz.
#[derive(Parser)]
#[command(name = "volby-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download and display results per region.
    Results {
        /// Election round (1 or 2)
        #[arg(short, long, default_value_t = DEFAULT_ROUND)]
        round: u8,

        /// Region NUTS code; repeat for several (default: all 13 regions)
        #[arg(long = "region", value_name = "CODE")]
        regions: Vec<String>,

        /// Show percentages instead of vote counts
        #[arg(short, long)]
        percent: bool,

        /// Show the districts (okresy) of each region instead of region totals
        #[arg(long)]
        districts: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Bar length of the largest value in text charts
        #[arg(long, default_value_t = DEFAULT_CHART_WIDTH)]
        width: usize,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// List the default region codes.
    Regions,
}

/// Network settings shared by commands that download results.
#[derive(Debug, clap::Args)]
pub struct FetchArgs {
    /// Results endpoint
    #[arg(long, default_value = RESULTS_URL)]
    pub url: String,

    /// Timeout per attempt in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Retries after the first failed attempt
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Delay before each retry in milliseconds (0 retries immediately)
    #[arg(long, default_value_t = 0)]
    pub retry_delay_ms: u64,

    /// Double the retry delay after every failed attempt
    #[arg(long)]
    pub exponential: bool,

    /// Upper bound for exponential retry delays in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub max_retry_delay_ms: u64,
}

impl FetchArgs {
    pub fn retry_policy(&self) -> RetryPolicy {
        let delay = Duration::from_millis(self.retry_delay_ms);
        let backoff = if delay.is_zero() {
            Backoff::None
        } else if self.exponential {
            Backoff::Exponential {
                base: delay,
                max: Duration::from_millis(self.max_retry_delay_ms).max(delay),
            }
        } else {
            Backoff::Fixed(delay)
        };
        RetryPolicy::new(self.max_retries, backoff)
    }

    /// Combine these settings with a round and region list.
    pub fn harvest_config(&self, round: u8, regions: Vec<String>) -> HarvestConfig {
        let config = HarvestConfig::new()
            .with_results_url(self.url.clone())
            .with_round(round)
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_retry(self.retry_policy());

        if regions.is_empty() {
            config
        } else {
            config.with_regions(regions)
        }
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Results {
            round,
            regions,
            percent,
            districts,
            format,
            width,
            fetch,
        } => {
            let config = fetch.harvest_config(round, regions);
            results_command(config, percent, districts, format, width)
        }
        Commands::Regions => {
            for code in REGION_CODES {
                println!("{code}");
            }
            Ok(())
        }
    }
}

/// Execute the results command.
fn results_command(
    config: HarvestConfig,
    percent: bool,
    districts: bool,
    format: OutputFormat,
    width: usize,
) -> Result<()> {
    // Validate inputs before making HTTP requests
    config.validate()?;

    let registry = CandidateRegistry::presidential_2023_round(config.round);
    let round = config.round;
    let region_count = config.regions.len();
    let pipeline = Pipeline::from_config(config)?;

    if format == OutputFormat::Text {
        println!(
            "{} round {} for {} region(s)",
            style("Downloading").bold(),
            style(round).cyan(),
            style(region_count).green()
        );
        println!();
    }

    // Create progress spinner
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Downloading results...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let progress = pb.clone();
    let pipeline = pipeline.with_attempt_hook(move |region, attempt, max| {
        progress.set_message(attempt_message(region, attempt, max));
    });

    let mut reports = Vec::new();
    let mut collect = |record: &ResultRecord| -> Result<()> {
        pb.set_message(format!("Processed {}", record.region_name()));
        reports.push(RegionReport::new(record, &registry, percent)?);
        Ok(())
    };

    let outcome = if districts {
        pipeline.run_districts_with(&mut collect)
    } else {
        pipeline.run_with(&mut collect)
    };
    pb.finish_and_clear();
    outcome?;

    print!("{}", render_reports(&reports, format, width)?);

    if format == OutputFormat::Text {
        println!();
        println!(
            "{} {} result set(s)",
            style("Done:").green().bold(),
            reports.len()
        );
    }

    Ok(())
}

/// Spinner text for one fetch attempt.
fn attempt_message(region: &str, attempt: u32, max_attempts: u32) -> String {
    format!("Fetching {region}, attempt {attempt} of {max_attempts}")
}
