//! Yahoo Finance data adapter.
//!
//! Reads daily closes from Yahoo's v8 chart API. One request per symbol and no
//! retries: a failed request aborts the run.

use crate::domain::error::TrendguardError;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::{DataPort, Lookback};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

const CHART_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new() -> Result<Self, TrendguardError> {
        Self::with_base_url(CHART_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, TrendguardError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| TrendguardError::retrieval("*", format!("HTTP client setup failed: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<PriceSeries, TrendguardError> {
        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => {
                TrendguardError::retrieval(symbol, format!("unknown instrument: {}", err.description))
            }
            Some(err) => TrendguardError::retrieval(symbol, format!("{}: {}", err.code, err.description)),
            None => TrendguardError::retrieval(symbol, "empty result with no error"),
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| TrendguardError::retrieval(symbol, "result array is empty"))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| TrendguardError::retrieval(symbol, "no timestamps"))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| TrendguardError::retrieval(symbol, "no quote data"))?;

        let mut dates: Vec<NaiveDate> = Vec::with_capacity(timestamps.len());
        let mut closes: Vec<Option<f64>> = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| TrendguardError::retrieval(symbol, format!("invalid timestamp: {ts}")))?;

            // intraday refresh can repeat the last trading day
            if dates.last() == Some(&date) {
                if let Some(close) = quote.close.get(i).copied().flatten() {
                    if let Some(last) = closes.last_mut() {
                        *last = Some(close);
                    }
                }
                continue;
            }

            dates.push(date);
            closes.push(quote.close.get(i).copied().flatten());
        }

        PriceSeries::from_gappy(symbol, dates, closes)
    }
}

impl DataPort for YahooAdapter {
    fn fetch_series(
        &self,
        symbol: &str,
        lookback: &Lookback,
    ) -> Result<PriceSeries, TrendguardError> {
        let url = format!("{}/{}", self.base_url, symbol);
        let range = lookback.period.to_string();
        tracing::debug!(symbol, range = %range, interval = %lookback.interval, "requesting chart");

        let resp = self
            .client
            .get(&url)
            .query(&[("range", range.as_str()), ("interval", lookback.interval.as_str())])
            .send()
            .map_err(|e| TrendguardError::retrieval(symbol, format!("request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| TrendguardError::retrieval(symbol, format!("failed to read response: {e}")))?;

        // not-found responses still carry a chart error body
        match serde_json::from_str::<ChartResponse>(&body) {
            Ok(chart) => Self::parse_response(symbol, chart),
            Err(_) if !status.is_success() => {
                Err(TrendguardError::retrieval(symbol, format!("HTTP {status}")))
            }
            Err(e) => Err(TrendguardError::retrieval(
                symbol,
                format!("failed to parse response: {e}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(symbol: &str, json: &str) -> Result<PriceSeries, TrendguardError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooAdapter::parse_response(symbol, resp)
    }

    #[test]
    fn parses_closes_and_fills_nulls() {
        // 2024-01-02, 2024-01-03, 2024-01-04 at 14:30 UTC
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704205800, 1704292200, 1704378600],
                    "indicators": { "quote": [{ "close": [4742.83, null, 4688.68] }] }
                }],
                "error": null
            }
        }"#;
        let series = parse("^GSPC", json).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![4742.83, 4742.83, 4688.68]);
        assert_eq!(
            series.points()[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn repeated_trading_day_keeps_latest_close() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704205800, 1704292200, 1704300000],
                    "indicators": { "quote": [{ "close": [10.0, 11.0, 11.5] }] }
                }],
                "error": null
            }
        }"#;
        let series = parse("QYLD", json).unwrap();
        assert_eq!(series.closes(), vec![10.0, 11.5]);
    }

    #[test]
    fn not_found_names_the_instrument() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        }"#;
        let err = parse("NOPE", json).unwrap_err();
        match err {
            TrendguardError::Retrieval { symbol, reason } => {
                assert_eq!(symbol, "NOPE");
                assert!(reason.starts_with("unknown instrument"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn all_null_closes_is_an_error() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704205800],
                    "indicators": { "quote": [{ "close": [null] }] }
                }],
                "error": null
            }
        }"#;
        assert!(matches!(parse("^VIX", json), Err(TrendguardError::Retrieval { .. })));
    }

    #[test]
    fn missing_timestamps_is_an_error() {
        let json = r#"{
            "chart": {
                "result": [{ "indicators": { "quote": [{ "close": [] }] } }],
                "error": null
            }
        }"#;
        assert!(parse("^VIX", json).is_err());
    }
}
