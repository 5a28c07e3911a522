//! Weather API client.
//!
//! One GET per location against a timeline-style weather API:
//!
//! ```text
//! {endpoint}/{location}?unitGroup=metric&key={api_key}&contentType=json
//! ```
//!
//! The response body is decoded into a [`WeatherObservation`]. There is no
//! retry; any failure is returned to the caller, which aborts the run.

use crate::errors::ConditionsError;
use crate::models::WeatherObservation;
use crate::utils::truncate_for_log;
use reqwest::Client;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};
use url::Url;

/// Fetch the current weather observation for one location query.
pub trait FetchWeather {
    async fn fetch(&self, location_id: &str) -> Result<WeatherObservation, ConditionsError>;
}

/// HTTP implementation of [`FetchWeather`].
#[derive(Clone)]
pub struct WeatherClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl WeatherClient {
    /// Create a client for `endpoint` authenticating with `api_key`.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Base URL of the weather API; a trailing `/` is ignored
    /// * `api_key` - Key sent as the `key` query parameter
    /// * `timeout` - Per-request timeout; `None` leaves requests unbounded
    ///
    /// # Returns
    ///
    /// The client, or a configuration error if `endpoint` is not a URL.
    pub fn new(
        endpoint: &str,
        api_key: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ConditionsError> {
        Url::parse(endpoint).map_err(|e| {
            ConditionsError::Config(format!("invalid weather API endpoint {endpoint:?}: {e}"))
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ConditionsError::network(endpoint, e))?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Request URL without the query string, safe to log.
    fn location_url(&self, location_id: &str) -> String {
        format!("{}/{}", self.endpoint, urlencoding::encode(location_id))
    }

    fn request_url(&self, location_id: &str) -> Result<Url, ConditionsError> {
        let mut url = Url::parse(&self.location_url(location_id)).map_err(|e| {
            ConditionsError::Config(format!("cannot build request URL for {location_id:?}: {e}"))
        })?;
        url.query_pairs_mut()
            .append_pair("unitGroup", "metric")
            .append_pair("key", &self.api_key)
            .append_pair("contentType", "json");
        Ok(url)
    }
}

impl fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl FetchWeather for WeatherClient {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, location_id: &str) -> Result<WeatherObservation, ConditionsError> {
        let t0 = Instant::now();
        let url = self.request_url(location_id)?;
        let log_url = self.location_url(location_id);

        let body = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| ConditionsError::network(&log_url, e.without_url()))?
            .text()
            .await
            .map_err(|e| ConditionsError::network(&log_url, e.without_url()))?;
        debug!(bytes = body.len(), "Received weather response");

        let observation: WeatherObservation =
            serde_json::from_str(&body).map_err(|e| ConditionsError::Decode {
                location: location_id.to_string(),
                preview: truncate_for_log(&body, 300),
                source: e,
            })?;

        info!(
            resolved_address = observation.resolved_address().unwrap_or("<unknown>"),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched weather"
        );
        Ok(observation)
    }
}
