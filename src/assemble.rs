//! Record assembly: fetch, scrape and merge every registered location.
//!
//! Locations are processed as a `futures` stream, `concurrency` at a time
//! (1 means strictly sequential). The first failure aborts the whole
//! assembly, so a returned [`ConditionsRecord`] always holds exactly one
//! entry per registry location.

use crate::errors::ConditionsError;
use crate::models::{ConditionsRecord, WeatherObservation};
use crate::registry::{LocationMetadata, Registry};
use crate::scrapers::ScrapeSnowfall;
use crate::weather::FetchWeather;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::time::Instant;
use tracing::{error, info, instrument};

/// Build the conditions record for every location in `registry`.
///
/// When `scraper` is `None` the job runs without snowfall scraping and
/// entries carry no `snowfall` field.
///
/// # Arguments
///
/// * `registry` - Locations to collect, with the metadata overlaid on each entry
/// * `fetcher` - Weather source queried once per location
/// * `scraper` - Optional snowfall source queried with each forecast URL
/// * `concurrency` - Locations in flight at once (values below 1 count as 1)
///
/// # Returns
///
/// A record with exactly one entry per registry location in registry order,
/// or the first fetch or scrape error encountered.
#[instrument(level = "info", skip_all, fields(locations = registry.len(), scrape = scraper.is_some()))]
pub async fn assemble<F, S>(
    registry: &Registry,
    fetcher: &F,
    scraper: Option<&S>,
    concurrency: usize,
) -> Result<ConditionsRecord, ConditionsError>
where
    F: FetchWeather,
    S: ScrapeSnowfall,
{
    let t0 = Instant::now();
    let data: Vec<WeatherObservation> = stream::iter(registry.iter())
        .map(|(id, meta)| assemble_location(id, meta, fetcher, scraper))
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    info!(
        count = data.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Assembled conditions record"
    );
    Ok(ConditionsRecord::new(data))
}

async fn assemble_location<F, S>(
    id: &str,
    meta: &LocationMetadata,
    fetcher: &F,
    scraper: Option<&S>,
) -> Result<WeatherObservation, ConditionsError>
where
    F: FetchWeather,
    S: ScrapeSnowfall,
{
    let mut observation = fetcher.fetch(id).await.inspect_err(|e| {
        error!(location = id, error = %e, "Weather fetch failed");
    })?;
    observation.overlay(meta);

    if let Some(scraper) = scraper {
        let summary = scraper.scrape(&meta.forecast_url).await.inspect_err(|e| {
            error!(location = id, error = %e, "Snowfall scrape failed");
        })?;
        observation.snowfall = Some(summary);
    }

    Ok(observation)
}
