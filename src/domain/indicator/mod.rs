//! Rolling indicators over closing prices.
//!
//! - `IndicatorPoint`: a single point in an indicator time series
//! - `IndicatorType`: indicator identity + window (serves as HashMap key)
//! - `IndicatorSeries`: a time series of indicator values
//! - `IndicatorSet`: every indicator computed for one price series

pub mod percentile;
pub mod sma;

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

use crate::domain::error::TrendguardError;
use crate::domain::price_series::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorType {
    Sma(usize),
    Percentile75(usize),
}

impl IndicatorType {
    pub fn window(&self) -> usize {
        match self {
            IndicatorType::Sma(w) | IndicatorType::Percentile75(w) => *w,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(window) => write!(f, "SMA{}", window),
            IndicatorType::Percentile75(window) => write!(f, "M75_{}", window),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Value at the final index; an error when that point is still in warmup.
    pub fn latest(&self, symbol: &str) -> Result<f64, TrendguardError> {
        match self.values.last() {
            Some(point) if point.valid => Ok(point.value),
            _ => Err(TrendguardError::InsufficientData {
                symbol: symbol.to_string(),
                observations: self.values.len(),
                required: self.indicator_type.window(),
            }),
        }
    }
}

/// Indicators computed for one instrument.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    pub symbol: String,
    pub series: HashMap<IndicatorType, IndicatorSeries>,
}

impl IndicatorSet {
    pub fn get(&self, indicator_type: IndicatorType) -> Option<&IndicatorSeries> {
        self.series.get(&indicator_type)
    }

    /// Latest value of a computed indicator.
    ///
    /// Asking for an indicator that was never computed is reported the same way
    /// as a short series: there is no value at the final index.
    pub fn latest(&self, indicator_type: IndicatorType) -> Result<f64, TrendguardError> {
        match self.series.get(&indicator_type) {
            Some(series) => series.latest(&self.symbol),
            None => Err(TrendguardError::InsufficientData {
                symbol: self.symbol.clone(),
                observations: 0,
                required: indicator_type.window(),
            }),
        }
    }
}

pub fn compute_indicators(series: &PriceSeries, types: &[IndicatorType]) -> IndicatorSet {
    let mut map = HashMap::with_capacity(types.len());
    for &indicator_type in types {
        if map.contains_key(&indicator_type) {
            continue;
        }
        let computed = match indicator_type {
            IndicatorType::Sma(window) => sma::calculate_sma(series, window),
            IndicatorType::Percentile75(window) => {
                percentile::calculate_percentile(series, window, 0.75)
            }
        };
        map.insert(indicator_type, computed);
    }
    IndicatorSet {
        symbol: series.symbol().to_string(),
        series: map,
    }
}
