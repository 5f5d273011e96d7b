#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use trendguard::domain::error::TrendguardError;
use trendguard::domain::price_series::{PricePoint, PriceSeries};
use trendguard::ports::data_port::{DataPort, Lookback};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<f64>>,
    pub errors: HashMap<String, String>,
    pub requests: RefCell<Vec<String>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_series(mut self, symbol: &str, closes: Vec<f64>) -> Self {
        self.data.insert(symbol.to_string(), closes);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(
        &self,
        symbol: &str,
        _lookback: &Lookback,
    ) -> Result<PriceSeries, TrendguardError> {
        self.requests.borrow_mut().push(symbol.to_string());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TrendguardError::Retrieval {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        let closes = self.data.get(symbol).cloned().unwrap_or_default();
        make_series(symbol, &closes)
    }
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 3).unwrap()
}

/// Daily series starting at `start_date()`.
pub fn make_series(symbol: &str, closes: &[f64]) -> Result<PriceSeries, TrendguardError> {
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: start_date() + chrono::Duration::days(i as i64),
            close,
        })
        .collect();
    PriceSeries::new(symbol, points)
}

pub fn flat(value: f64, len: usize) -> Vec<f64> {
    vec![value; len]
}

/// `len - 1` points at `history` followed by one final close.
pub fn flat_then(history: f64, len: usize, last: f64) -> Vec<f64> {
    let mut closes = vec![history; len - 1];
    closes.push(last);
    closes
}

/// Linear ramp from `from` to `to` over `len` points.
pub fn ramp(from: f64, to: f64, len: usize) -> Vec<f64> {
    let step = if len > 1 {
        (to - from) / (len - 1) as f64
    } else {
        0.0
    };
    (0..len).map(|i| from + step * i as f64).collect()
}

/// Writes `closes` as `<dir>/<symbol>.csv` with daily dates from `start_date()`.
pub fn write_prices(dir: &Path, symbol: &str, closes: &[f64]) {
    let mut content = String::from("date,close\n");
    for (i, close) in closes.iter().enumerate() {
        let date = start_date() + chrono::Duration::days(i as i64);
        content.push_str(&format!("{},{}\n", date.format("%Y-%m-%d"), close));
    }
    fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}
