//! Tunable decision parameters.

use crate::domain::error::TrendguardError;
use crate::domain::indicator::IndicatorType;
use crate::domain::window::{VolatilityWindow, WindowRole};

pub const DEFAULT_TREND_SMA_PERIOD: usize = 50;

/// The two caller-tunable parameters; every other window is fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdConfig {
    pub volatility_threshold: f64,
    pub trend_sma_period: usize,
}

impl ThresholdConfig {
    pub fn new(volatility_threshold: f64, trend_sma_period: usize) -> Result<Self, TrendguardError> {
        if !(volatility_threshold.is_finite() && volatility_threshold > 0.0) {
            return Err(TrendguardError::invalid(
                "signals",
                "threshold",
                "volatility threshold must be positive",
            ));
        }
        if trend_sma_period == 0 {
            return Err(TrendguardError::invalid(
                "signals",
                "sma_period",
                "trend SMA period must be at least 1",
            ));
        }
        Ok(Self {
            volatility_threshold,
            trend_sma_period,
        })
    }

    pub fn window(&self, role: WindowRole) -> usize {
        role.window(self.trend_sma_period)
    }

    pub fn trend_indicators(&self) -> Vec<IndicatorType> {
        WindowRole::ALL
            .iter()
            .map(|&role| IndicatorType::Sma(self.window(role)))
            .collect()
    }

    pub fn volatility_indicators(&self) -> Vec<IndicatorType> {
        VolatilityWindow::ALL
            .iter()
            .map(|w| IndicatorType::Percentile75(w.window()))
            .collect()
    }

    /// Longest trend window; a tracked series must be at least this long.
    pub fn longest_trend_window(&self) -> usize {
        WindowRole::ALL
            .iter()
            .map(|&role| self.window(role))
            .max()
            .unwrap_or(self.trend_sma_period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_threshold() {
        assert!(ThresholdConfig::new(0.0, 50).is_err());
        assert!(ThresholdConfig::new(-3.0, 50).is_err());
        assert!(ThresholdConfig::new(f64::NAN, 50).is_err());
    }

    #[test]
    fn rejects_zero_period() {
        let err = ThresholdConfig::new(28.0, 0).unwrap_err();
        assert!(matches!(err, TrendguardError::ConfigInvalid { ref key, .. } if key == "sma_period"));
    }

    #[test]
    fn trend_indicators_include_custom_period() {
        let cfg = ThresholdConfig::new(28.0, 21).unwrap();
        assert!(cfg.trend_indicators().contains(&IndicatorType::Sma(21)));
        assert_eq!(cfg.trend_indicators().len(), 6);
    }

    #[test]
    fn longest_window_respects_large_trend_period() {
        assert_eq!(ThresholdConfig::new(28.0, 50).unwrap().longest_trend_window(), 365);
        assert_eq!(ThresholdConfig::new(28.0, 400).unwrap().longest_trend_window(), 400);
    }
}
