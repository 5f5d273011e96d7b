//! Latest indicator readings consumed by the decision policy.

use std::collections::BTreeMap;

use crate::domain::error::TrendguardError;
use crate::domain::indicator::{IndicatorSet, IndicatorType};
use crate::domain::price_series::PriceSeries;
use crate::domain::threshold::ThresholdConfig;
use crate::domain::window::{VolatilityWindow, WindowRole};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmaReading {
    pub window: usize,
    pub value: f64,
}

/// Latest price and trend SMAs for one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSnapshot {
    pub label: String,
    pub latest_price: f64,
    pub sma: BTreeMap<WindowRole, SmaReading>,
}

impl SignalSnapshot {
    pub fn new(label: impl Into<String>, latest_price: f64) -> Self {
        Self {
            label: label.into(),
            latest_price,
            sma: BTreeMap::new(),
        }
    }

    pub fn with_sma(mut self, role: WindowRole, window: usize, value: f64) -> Self {
        self.sma.insert(role, SmaReading { window, value });
        self
    }

    pub fn from_indicators(
        label: &str,
        series: &PriceSeries,
        indicators: &IndicatorSet,
        thresholds: &ThresholdConfig,
    ) -> Result<Self, TrendguardError> {
        let required = thresholds.longest_trend_window();
        if series.len() < required {
            return Err(TrendguardError::InsufficientData {
                symbol: series.symbol().to_string(),
                observations: series.len(),
                required,
            });
        }

        let mut snapshot = Self::new(label, series.latest().close);
        for role in WindowRole::ALL {
            let window = thresholds.window(role);
            let value = indicators.latest(IndicatorType::Sma(window))?;
            snapshot = snapshot.with_sma(role, window, value);
        }
        Ok(snapshot)
    }

    pub fn reading(&self, role: WindowRole) -> Option<SmaReading> {
        self.sma.get(&role).copied()
    }

    /// Strictly below the SMA for `role`; false when the role was not computed.
    pub fn below(&self, role: WindowRole) -> bool {
        self.reading(role)
            .is_some_and(|r| self.latest_price < r.value)
    }

    /// Strictly above the SMA for `role`; false when the role was not computed.
    pub fn above(&self, role: WindowRole) -> bool {
        self.reading(role)
            .is_some_and(|r| self.latest_price > r.value)
    }

    /// Distance of the price from the SMA for `role` (positive when above).
    pub fn diff(&self, role: WindowRole) -> Option<f64> {
        self.reading(role).map(|r| self.latest_price - r.value)
    }

    /// Every breached SMA window, ascending and without duplicates.
    pub fn breached_windows(&self) -> Vec<usize> {
        let mut windows: Vec<usize> = self
            .sma
            .values()
            .filter(|r| self.latest_price < r.value)
            .map(|r| r.window)
            .collect();
        windows.sort_unstable();
        windows.dedup();
        windows
    }
}

/// Latest value and rolling 75th percentiles of the risk gauge.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilitySnapshot {
    pub label: String,
    pub latest: f64,
    pub p75: BTreeMap<VolatilityWindow, f64>,
}

impl VolatilitySnapshot {
    pub fn new(label: impl Into<String>, latest: f64) -> Self {
        Self {
            label: label.into(),
            latest,
            p75: BTreeMap::new(),
        }
    }

    pub fn with_p75(mut self, window: VolatilityWindow, value: f64) -> Self {
        self.p75.insert(window, value);
        self
    }

    pub fn from_indicators(
        label: &str,
        series: &PriceSeries,
        indicators: &IndicatorSet,
    ) -> Result<Self, TrendguardError> {
        let mut snapshot = Self::new(label, series.latest().close);
        for window in VolatilityWindow::ALL {
            let value = indicators.latest(IndicatorType::Percentile75(window.window()))?;
            snapshot = snapshot.with_p75(window, value);
        }
        Ok(snapshot)
    }

    /// Latest above the threshold, or any percentile above its scaled threshold.
    pub fn is_high(&self, threshold: f64) -> bool {
        self.latest > threshold
            || self
                .p75
                .iter()
                .any(|(window, &value)| value > threshold * window.threshold_factor())
    }
}
