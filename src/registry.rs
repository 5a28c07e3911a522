//! Static location registry.
//!
//! Maps a weather API location query (e.g. `"mt-baker-washington"`) to the
//! descriptive metadata the API does not supply: a display title, a webcam
//! page, a snow-forecast page and a map link.
//!
//! The registry is built explicitly, either from the curated built-in table
//! ([`Registry::builtin`]) or from a YAML file ([`Registry::from_yaml_file`]),
//! and handed to the assembler. It is never mutated after construction.
//!
//! # YAML format
//!
//! ```yaml
//! whistler-blackcomb-mountain:
//!   title: Whistler Blackcomb
//!   webcam_url: https://www.whistlerblackcomb.com/the-mountain/mountain-conditions/mountain-cams.aspx
//!   forecast_url: https://www.snow-forecast.com/resorts/Whistler-Blackcomb/6day/mid
//!   map_url: https://maps.app.goo.gl/7YTvXnCQPS32mxE9A
//! ```

use crate::errors::ConditionsError;
use itertools::Itertools;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

/// Metadata attached to every record emitted for a location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocationMetadata {
    pub title: String,
    pub webcam_url: String,
    pub forecast_url: String,
    pub map_url: String,
}

impl LocationMetadata {
    fn new(title: &str, webcam_url: &str, forecast_url: &str, map_url: &str) -> Self {
        Self {
            title: title.to_string(),
            webcam_url: webcam_url.to_string(),
            forecast_url: forecast_url.to_string(),
            map_url: map_url.to_string(),
        }
    }

    fn validate(&self, id: &str) -> Result<(), ConditionsError> {
        let fields = [
            ("title", &self.title),
            ("webcam_url", &self.webcam_url),
            ("forecast_url", &self.forecast_url),
            ("map_url", &self.map_url),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConditionsError::Config(format!(
                    "location {id:?} is missing {name}"
                )));
            }
        }
        for (name, value) in &fields[1..] {
            Url::parse(value).map_err(|e| {
                ConditionsError::Config(format!("location {id:?} has an invalid {name} {value:?}: {e}"))
            })?;
        }
        Ok(())
    }
}

/// Immutable identifier → metadata table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    locations: BTreeMap<String, LocationMetadata>,
}

impl Registry {
    /// The curated set of tracked ski areas.
    pub fn builtin() -> Self {
        let entries = [
            (
                "whistler-blackcomb-mountain",
                LocationMetadata::new(
                    "Whistler Blackcomb",
                    "https://www.whistlerblackcomb.com/the-mountain/mountain-conditions/mountain-cams.aspx",
                    "https://www.snow-forecast.com/resorts/Whistler-Blackcomb/6day/mid",
                    "https://maps.app.goo.gl/7YTvXnCQPS32mxE9A",
                ),
            ),
            (
                "mt-baker-washington",
                LocationMetadata::new(
                    "Mount Baker",
                    "https://www.snowstash.com/usa/washington/mt-baker/snow-cams",
                    "https://www.snow-forecast.com/resorts/Mount-Baker/6day/mid",
                    "https://maps.app.goo.gl/gaqSji8YiTb8RacY6",
                ),
            ),
            (
                "20955-hemlock-valley-rd",
                LocationMetadata::new(
                    "Sasquatch Mountain Resort",
                    "https://sasquatchmountain.ca/weather-and-conditions/webcams/",
                    "https://www.snow-forecast.com/resorts/HemlockResort/6day/mid",
                    "https://maps.app.goo.gl/o5CWVongU85nwqhT7",
                ),
            ),
            (
                "cypress-mountain-vancouver",
                LocationMetadata::new(
                    "Cypress Mountain",
                    "https://cypressmountain.com/downhill-conditions-and-cams",
                    "https://www.snow-forecast.com/resorts/Cypress-Mountain/6day/mid",
                    "https://maps.app.goo.gl/pJkSrmDLMb4RikAd8",
                ),
            ),
            // Disabled: weather for these is almost identical to Cypress.
            //
            // "seymour-mountain-vancouver":
            //   webcam   https://www.youtube.com/watch?v=vLawo-FrBKk
            //   forecast https://www.snow-forecast.com/resorts/Mount-Seymour/6day/mid
            // "grouse-mountain-vancouver":
            //   webcam   https://www.grousemountain.com/web-cams
            //   forecast https://www.snow-forecast.com/resorts/Grouse-Mountain/6day/mid
        ];

        Self {
            locations: entries
                .into_iter()
                .map(|(id, meta)| (id.to_string(), meta))
                .collect(),
        }
    }

    /// Build a registry from arbitrary entries, rejecting duplicate
    /// identifiers and incomplete metadata.
    pub fn from_entries<I>(entries: I) -> Result<Self, ConditionsError>
    where
        I: IntoIterator<Item = (String, LocationMetadata)>,
    {
        let entries: Vec<(String, LocationMetadata)> = entries.into_iter().collect();

        let duplicates: Vec<&String> = entries.iter().map(|(id, _)| id).duplicates().collect();
        if !duplicates.is_empty() {
            return Err(ConditionsError::Config(format!(
                "duplicate location identifiers: {}",
                duplicates.iter().join(", ")
            )));
        }

        for (id, meta) in &entries {
            if id.trim().is_empty() {
                return Err(ConditionsError::Config("empty location identifier".to_string()));
            }
            meta.validate(id)?;
        }

        Ok(Self {
            locations: entries.into_iter().collect(),
        })
    }

    /// Load a registry from a YAML mapping of identifier → metadata.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConditionsError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConditionsError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let registry = Self::from_yaml_str(&raw)?;
        info!(count = registry.len(), "Loaded location registry");
        Ok(registry)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConditionsError> {
        let parsed: BTreeMap<String, LocationMetadata> = serde_yaml::from_str(raw)
            .map_err(|e| ConditionsError::Config(format!("invalid registry YAML: {e}")))?;
        Self::from_entries(parsed)
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn get(&self, id: &str) -> Option<&LocationMetadata> {
        self.locations.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LocationMetadata)> {
        self.locations.iter().map(|(id, meta)| (id.as_str(), meta))
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn fixture_metadata(title: &str) -> LocationMetadata {
    let slug = title.to_lowercase().replace(' ', "-");
    LocationMetadata {
        title: title.to_string(),
        webcam_url: format!("https://cams.example.com/{slug}"),
        forecast_url: format!("https://forecast.example.com/{slug}"),
        map_url: format!("https://maps.example.com/{slug}"),
    }
}
