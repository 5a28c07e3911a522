//! Command-line interface definitions.
//!
//! Every option can also come from the environment, which is how the job is
//! normally configured when run from a scheduler.

use clap::Parser;
use clap::builder::{FalseyValueParser, RangedU64ValueParser};
use std::path::PathBuf;
use std::time::Duration;

/// Collect ski-area weather and snowfall and publish it to Redis.
///
/// # Examples
///
/// ```sh
/// # Configured from the environment
/// REDIS_URL=redis://localhost:6379 \
/// WEATHER_API_ENDPOINT=https://weather.example.com/timeline \
/// WEATHER_API_KEY=... \
/// snow_conditions
///
/// # Weather only, printed instead of published
/// snow_conditions --no-snowfall --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Redis connection URL (required unless --dry-run)
    #[arg(long, env = "REDIS_URL", hide_env_values = true)]
    pub redis_url: Option<String>,

    /// Base URL of the weather API
    #[arg(long, env = "WEATHER_API_ENDPOINT")]
    pub weather_api_endpoint: String,

    /// Weather API key
    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true)]
    pub weather_api_key: String,

    /// YAML file replacing the built-in location registry
    #[arg(short, long, env = "LOCATIONS_FILE")]
    pub locations: Option<PathBuf>,

    /// Skip scraping snowfall from forecast pages
    #[arg(long, env = "SKIP_SNOWFALL", value_parser = FalseyValueParser::new())]
    pub no_snowfall: bool,

    /// Number of locations processed at once
    #[arg(long, default_value_t = 1, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub concurrency: usize,

    /// Per-request timeout in seconds (no timeout when unset)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the record to stdout instead of writing it to Redis
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 5] = [
        "snow_conditions",
        "--weather-api-endpoint",
        "https://weather.example.com/timeline",
        "--weather-api-key",
        "k",
    ];

    #[test]
    fn test_cli_parsing() {
        let mut argv = REQUIRED.to_vec();
        argv.extend(["--redis-url", "redis://localhost:6379"]);
        let cli = Cli::parse_from(argv);

        assert_eq!(cli.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(cli.weather_api_endpoint, "https://weather.example.com/timeline");
        assert_eq!(cli.concurrency, 1);
        assert!(!cli.dry_run);
        assert_eq!(cli.timeout(), None);
    }

    #[test]
    fn test_cli_options() {
        let mut argv = REQUIRED.to_vec();
        argv.extend([
            "--no-snowfall",
            "--dry-run",
            "--concurrency",
            "4",
            "--timeout-secs",
            "30",
            "-l",
            "/etc/snow/locations.yaml",
        ]);
        let cli = Cli::parse_from(argv);

        assert!(cli.no_snowfall);
        assert!(cli.dry_run);
        assert_eq!(cli.concurrency, 4);
        assert_eq!(cli.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cli.locations, Some(PathBuf::from("/etc/snow/locations.yaml")));
    }

    #[test]
    fn test_cli_rejects_zero_concurrency() {
        let mut argv = REQUIRED.to_vec();
        argv.extend(["--concurrency", "0"]);
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
