//! CSV file data adapter.
//!
//! One file per instrument at `<dir>/<symbol>.csv` with a header row and
//! `date,close` columns. Empty close cells are gap-filled.

use crate::domain::error::TrendguardError;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::{DataPort, Lookback};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_series(
        &self,
        symbol: &str,
        lookback: &Lookback,
    ) -> Result<PriceSeries, TrendguardError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| {
            TrendguardError::retrieval(symbol, format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut rows: Vec<(NaiveDate, Option<f64>)> = Vec::new();

        for result in rdr.records() {
            let record = result
                .map_err(|e| TrendguardError::retrieval(symbol, format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| TrendguardError::retrieval(symbol, "missing date column"))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                TrendguardError::retrieval(symbol, format!("invalid date '{}': {}", date_str, e))
            })?;

            let close = match record.get(1).map(str::trim) {
                None | Some("") => None,
                Some(raw) => Some(raw.parse::<f64>().map_err(|e| {
                    TrendguardError::retrieval(symbol, format!("invalid close '{}': {}", raw, e))
                })?),
            };

            rows.push((date, close));
        }

        rows.sort_by_key(|(date, _)| *date);

        if let Some(&(last, _)) = rows.last() {
            if let Some(start) = lookback.period.start_from(last) {
                rows.retain(|(date, _)| *date >= start);
            }
        }

        let (dates, closes): (Vec<NaiveDate>, Vec<Option<f64>>) = rows.into_iter().unzip();
        PriceSeries::from_gappy(symbol, dates, closes)
    }
}
