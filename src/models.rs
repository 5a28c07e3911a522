//! Data models for weather observations and the published conditions record.
//!
//! - [`WeatherObservation`]: one location's weather API response, passed
//!   through as an opaque JSON object with our own metadata overlaid
//! - [`SnowfallSummary`]: rolling snowfall totals scraped from a forecast page
//! - [`ConditionsRecord`]: the document stored in the cache
//!
//! Overlay field names use camelCase to match the API payload they sit
//! beside, hence the `rename` attributes.

use crate::registry::LocationMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Figures per day on the forecast page (one per ~8 hour period).
pub const PERIODS_PER_DAY: usize = 3;

/// Weather API response for a single location.
///
/// The API owns the shape of `payload`; we only read a couple of fields for
/// logging and otherwise pass it through untouched.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WeatherObservation {
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "webCamUrl", default)]
    pub webcam_url: String,
    #[serde(rename = "forecastUrl", default)]
    pub forecast_url: String,
    #[serde(rename = "googleMapsUrl", default)]
    pub map_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snowfall: Option<SnowfallSummary>,
}

impl WeatherObservation {
    /// Copy the registry metadata onto this observation.
    pub fn overlay(&mut self, meta: &LocationMetadata) {
        self.title = meta.title.clone();
        self.webcam_url = meta.webcam_url.clone();
        self.forecast_url = meta.forecast_url.clone();
        self.map_url = meta.map_url.clone();
    }

    /// The address the API resolved the location query to, if any.
    pub fn resolved_address(&self) -> Option<&str> {
        self.payload.get("resolvedAddress").and_then(Value::as_str)
    }
}

/// Snowfall totals for the next 1, 3 and 7 days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct SnowfallSummary {
    #[serde(rename = "next1Days")]
    pub next_1_days: f64,
    #[serde(rename = "next3Days")]
    pub next_3_days: f64,
    #[serde(rename = "next7Days")]
    pub next_7_days: f64,
}

impl SnowfallSummary {
    /// Sum per-period figures into 1/3/7-day windows.
    ///
    /// The first day is the first three figures, three days the first nine,
    /// and the whole page counts as the seven day total. Short pages sum
    /// whatever is available instead of failing.
    pub fn from_figures(figures: &[f64]) -> Self {
        let window = |n: usize| figures[..n.min(figures.len())].iter().sum::<f64>();
        Self {
            next_1_days: window(PERIODS_PER_DAY),
            next_3_days: window(3 * PERIODS_PER_DAY),
            next_7_days: figures.iter().sum(),
        }
    }
}

/// The single document published per run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConditionsRecord {
    pub data: Vec<WeatherObservation>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl ConditionsRecord {
    pub fn new(data: Vec<WeatherObservation>) -> Self {
        Self {
            data,
            updated_at: Utc::now(),
        }
    }
}
