use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use common::{Error, MarketData, Observation, Result};

const BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Historical daily-close client for the Yahoo Finance chart API.
///
/// Unauthenticated endpoint; one GET per instrument per run. Null
/// closes in the payload are kept as `None` so the detector can treat
/// them as gaps.
pub struct YahooClient {
    base_url: String,
    http: Client,
}

impl YahooClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the client at a different host. Used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::builder()
                .use_rustls_tls()
                .user_agent("mawatch/0.1")
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketData for YahooClient {
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>> {
        // period2 is exclusive; push it to the start of the next day so
        // the last requested session is included.
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end
            .checked_add_days(Days::new(1))
            .unwrap_or(end)
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();
        let url = format!(
            "{}/v8/finance/chart/{symbol}?period1={period1}&period2={period2}&interval=1d",
            self.base_url
        );

        debug!(symbol, %start, %end, "Fetching daily closes");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::MarketData(format!(
                "chart request for '{symbol}' failed: HTTP {status}: {body}"
            )));
        }

        let payload: ChartResponse =
            serde_json::from_str(&body).map_err(|e| Error::MarketData(e.to_string()))?;
        observations_from(payload, symbol)
    }
}

fn observations_from(payload: ChartResponse, symbol: &str) -> Result<Vec<Observation>> {
    if let Some(err) = payload.chart.error {
        return Err(Error::MarketData(format!(
            "chart API error for '{symbol}': {} ({})",
            err.description, err.code
        )));
    }

    // No result block means no data for the range; an empty series is a
    // valid outcome that the monitor maps to a retrieval-empty verdict.
    let Some(result) = payload.chart.result.and_then(|mut r| {
        if r.is_empty() {
            None
        } else {
            Some(r.swap_remove(0))
        }
    }) else {
        return Ok(Vec::new());
    };

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let observations = result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(&ts, close)| {
            DateTime::from_timestamp(ts, 0).map(|dt| Observation {
                date: dt.date_naive(),
                close,
            })
        })
        .collect();

    Ok(observations)
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> Result<Vec<Observation>> {
        let payload: ChartResponse = serde_json::from_str(body).unwrap();
        observations_from(payload, "TEST")
    }

    #[test]
    fn decodes_closes_with_nulls_preserved() {
        // 2026-01-05, 2026-01-06, 2026-01-07 at 00:00 UTC
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1767571200, 1767657600, 1767744000],
                    "indicators": { "quote": [{ "close": [101.5, null, 99.25] }] }
                }],
                "error": null
            }
        }"#;
        let obs = decode(body).unwrap();
        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0].close, Some(101.5));
        assert_eq!(obs[1].close, None);
        assert_eq!(obs[2].close, Some(99.25));
        assert_eq!(
            obs[0].date,
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
        );
        assert!(obs.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn missing_result_block_is_empty_not_error() {
        let body = r#"{ "chart": { "result": null, "error": null } }"#;
        assert!(decode(body).unwrap().is_empty());
    }

    #[test]
    fn chart_error_surfaces_as_fault() {
        let body = r#"{
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        }"#;
        let err = decode(body).unwrap_err();
        assert!(err.to_string().contains("delisted"), "got: {err}");
    }

    #[test]
    fn empty_quote_arrays_yield_empty_series() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [],
                    "indicators": { "quote": [{ "close": [] }] }
                }],
                "error": null
            }
        }"#;
        assert!(decode(body).unwrap().is_empty());
    }
}
