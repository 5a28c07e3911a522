//! Error taxonomy for a conditions run.
//!
//! Every variant is fatal to the run. The only tolerated failure, a snow
//! figure that does not parse, never surfaces here: see
//! [`crate::utils::parse_amount_or_zero`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConditionsError {
    /// Bad process configuration or registry data.
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport failure or non-success status from an upstream source.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The weather API answered with something that is not an observation.
    #[error("could not decode weather response for {location}: {source} (body: {preview})")]
    Decode {
        location: String,
        preview: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("could not serialize conditions record: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ConditionsError {
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }
}
