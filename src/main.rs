//! # Snow Conditions
//!
//! A batch job that builds one aggregated weather and snow-conditions
//! document for a fixed set of ski areas and stores it in Redis for a
//! separate reader to serve.
//!
//! ## Usage
//!
//! ```sh
//! REDIS_URL=redis://localhost:6379 \
//! WEATHER_API_ENDPOINT=https://weather.example.com/timeline \
//! WEATHER_API_KEY=... \
//! snow_conditions
//! ```
//!
//! ## Architecture
//!
//! Each invocation runs the pipeline once:
//! 1. **Registry**: the curated locations and their metadata
//! 2. **Fetching**: one weather API call per location
//! 3. **Scraping**: snowfall figures from each forecast page (unless `--no-snowfall`)
//! 4. **Assembly**: merge everything into a single `ConditionsRecord`
//! 5. **Publishing**: write the record to `latest-conditions`, no expiry
//!
//! Any failure aborts the run before the cache is touched and the process
//! exits non-zero.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod assemble;
mod cli;
mod errors;
mod models;
mod outputs;
mod registry;
mod scrapers;
mod utils;
mod weather;

use assemble::assemble;
use cli::Cli;
use errors::ConditionsError;
use models::ConditionsRecord;
use outputs::cache::{ConditionsStore, RedisStore, publish};
use outputs::json;
use registry::Registry;
use scrapers::{ScrapeSnowfall, SnowForecastScraper};
use weather::{FetchWeather, WeatherClient};

#[tokio::main]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("snow_conditions starting up");

    let args = Cli::parse();
    debug!(
        endpoint = %args.weather_api_endpoint,
        locations = ?args.locations,
        no_snowfall = args.no_snowfall,
        concurrency = args.concurrency,
        dry_run = args.dry_run,
        "Parsed CLI arguments"
    );

    let result = run(&args).await;
    let elapsed = start_time.elapsed();
    match result {
        Ok(()) => {
            info!(?elapsed, "Execution complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(?elapsed, error = %e, "Conditions run failed; nothing was published");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Cli) -> Result<(), ConditionsError> {
    let registry = match &args.locations {
        Some(path) => Registry::from_yaml_file(path)?,
        None => Registry::builtin(),
    };
    if registry.is_empty() {
        return Err(ConditionsError::Config("location registry is empty".to_string()));
    }

    let timeout = args.timeout();
    let fetcher = WeatherClient::new(&args.weather_api_endpoint, &args.weather_api_key, timeout)?;
    let scraper = if args.no_snowfall {
        None
    } else {
        Some(SnowForecastScraper::new(timeout)?)
    };

    if args.dry_run {
        let record = assemble(&registry, &fetcher, scraper.as_ref(), args.concurrency).await?;
        println!("{}", json::to_json_pretty(&record)?);
        return Ok(());
    }

    let redis_url = args.redis_url.as_deref().ok_or_else(|| {
        ConditionsError::Config("REDIS_URL is required unless --dry-run is set".to_string())
    })?;
    let store = RedisStore::connect(redis_url).await?;

    collect_and_publish(&registry, &fetcher, scraper.as_ref(), args.concurrency, &store).await?;
    Ok(())
}

/// Assemble the full record and, only if that succeeds, publish it.
#[instrument(level = "info", skip_all)]
async fn collect_and_publish<F, S, C>(
    registry: &Registry,
    fetcher: &F,
    scraper: Option<&S>,
    concurrency: usize,
    store: &C,
) -> Result<ConditionsRecord, ConditionsError>
where
    F: FetchWeather,
    S: ScrapeSnowfall,
    C: ConditionsStore,
{
    let record = assemble(registry, fetcher, scraper, concurrency).await?;
    publish(&record, store).await?;
    Ok(record)
}
