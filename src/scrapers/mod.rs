//! Supplemental data scraped from public forecast pages.
//!
//! The weather API has no reliable snowfall forecast for ski areas, so the
//! scraping variant of the job reads it from the resort's snow-forecast page.
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | snow-forecast.com | [`snow_forecast`] | HTML scraping | `.snow-amount` cells, three per day |
//!
//! A page that cannot be fetched fails the run; a cell that cannot be parsed
//! counts as zero.

pub mod snow_forecast;

pub use snow_forecast::{ScrapeSnowfall, SnowForecastScraper};
