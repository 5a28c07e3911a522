//! snow-forecast.com resort page scraper.
//!
//! Resort pages (e.g. `https://www.snow-forecast.com/resorts/Mount-Baker/6day/mid`)
//! render a forecast table with one `.snow-amount` cell per ~8 hour period,
//! in chronological order. The page is server-rendered, so a plain GET is
//! enough; no JavaScript runs.

use crate::errors::ConditionsError;
use crate::models::{PERIODS_PER_DAY, SnowfallSummary};
use crate::utils::parse_amount_or_zero;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

static SNOW_AMOUNT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".snow-amount").expect("static selector is valid"));

/// Produce a [`SnowfallSummary`] for a forecast page.
pub trait ScrapeSnowfall {
    async fn scrape(&self, forecast_url: &str) -> Result<SnowfallSummary, ConditionsError>;
}

#[derive(Debug, Clone)]
pub struct SnowForecastScraper {
    http: Client,
}

impl SnowForecastScraper {
    pub fn new(timeout: Option<Duration>) -> Result<Self, ConditionsError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ConditionsError::network("snow-forecast client", e))?;
        Ok(Self { http })
    }
}

impl ScrapeSnowfall for SnowForecastScraper {
    #[instrument(level = "info", skip(self))]
    async fn scrape(&self, forecast_url: &str) -> Result<SnowfallSummary, ConditionsError> {
        info!("Scraping forecast page");
        let html = self
            .http
            .get(forecast_url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| ConditionsError::network(forecast_url, e))?
            .text()
            .await
            .map_err(|e| ConditionsError::network(forecast_url, e))?;

        let figures = extract_figures(&html);
        if figures.len() < 3 * PERIODS_PER_DAY {
            warn!(
                count = figures.len(),
                "Forecast page has fewer figures than expected; summing what is available"
            );
        }

        let summary = SnowfallSummary::from_figures(&figures);
        info!(
            periods = figures.len(),
            next_1_days = summary.next_1_days,
            next_3_days = summary.next_3_days,
            next_7_days = summary.next_7_days,
            "Scraped snowfall"
        );
        Ok(summary)
    }
}

/// Pull every `.snow-amount` figure out of a page, in document order.
///
/// # Arguments
///
/// * `html` - The full forecast page
///
/// # Returns
///
/// One figure per matched element. Text that does not parse as a number
/// counts as `0.0`.
pub fn extract_figures(html: &str) -> Vec<f64> {
    let document = Html::parse_document(html);
    let figures: Vec<f64> = document
        .select(&SNOW_AMOUNT)
        .map(|el| parse_amount_or_zero(&el.text().collect::<String>()))
        .collect();
    debug!(?figures, "Extracted snow amounts");
    figures
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn forecast_page(cells: &[&str]) -> String {
        let cells = cells
            .iter()
            .map(|c| format!(r#"<td class="forecast-table__cell"><span class="snow-amount">{c}</span></td>"#))
            .collect::<String>();
        format!(
            r#"<html><body><table><tr class="forecast-table__row">{cells}</tr></table>
            <p class="snow-amount-legend">cm</p></body></html>"#
        )
    }

    #[test]
    fn test_extract_figures_in_order() {
        let html = forecast_page(&["2", "1", "0.5", " 1 "]);
        assert_eq!(extract_figures(&html), vec![2.0, 1.0, 0.5, 1.0]);
    }

    #[test]
    fn test_extract_figures_unparseable_is_zero() {
        let html = forecast_page(&["trace", "—", "", "4"]);
        assert_eq!(extract_figures(&html), vec![0.0, 0.0, 0.0, 4.0]);
    }

    #[test]
    fn test_extract_figures_nested_text() {
        let html = r#"<div class="snow-amount"><span>1</span><span>5</span></div>"#;
        assert_eq!(extract_figures(html), vec![15.0]);
    }

    #[test]
    fn test_extract_figures_none() {
        assert!(extract_figures("<html><body>No table</body></html>").is_empty());
    }

    #[tokio::test]
    async fn test_scrape_summary() {
        let server = MockServer::start().await;
        let page = forecast_page(&["2.0", "1.0", "0.5", "1.0", "0", "0", "0", "0", "0", "3.0"]);
        Mock::given(method("GET"))
            .and(path("/resorts/Mount-Baker/6day/mid"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .expect(1)
            .mount(&server)
            .await;

        let scraper = SnowForecastScraper::new(None).unwrap();
        let summary = scraper
            .scrape(&format!("{}/resorts/Mount-Baker/6day/mid", server.uri()))
            .await
            .unwrap();

        assert_eq!(summary.next_1_days, 3.5);
        assert_eq!(summary.next_3_days, 4.5);
        assert_eq!(summary.next_7_days, 7.5);
    }

    #[tokio::test]
    async fn test_scrape_short_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(forecast_page(&["1", "trace"])))
            .mount(&server)
            .await;

        let scraper = SnowForecastScraper::new(None).unwrap();
        let summary = scraper.scrape(&server.uri()).await.unwrap();
        assert_eq!(summary.next_1_days, 1.0);
        assert_eq!(summary.next_3_days, 1.0);
        assert_eq!(summary.next_7_days, 1.0);
    }

    #[tokio::test]
    async fn test_scrape_missing_page_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let scraper = SnowForecastScraper::new(None).unwrap();
        assert!(matches!(
            scraper.scrape(&server.uri()).await,
            Err(ConditionsError::Network { .. })
        ));
    }
}
