//! Simple Moving Average.
//!
//! SMA(n)[i] = sum(C[i-j] for j in 0..n) / n
//! Warmup: first (n-1) observations are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceSeries;

pub fn calculate_sma(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let points = series.points();
    let mut values = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        let valid = period > 0 && i + 1 >= period;

        let value = if valid {
            let window = &points[i + 1 - period..=i];
            window.iter().map(|p| p.close).sum::<f64>() / period as f64
        } else {
            f64::NAN
        };

        values.push(IndicatorPoint {
            date: point.date,
            valid,
            value,
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_series;

    #[test]
    fn sma_warmup() {
        let series = calculate_sma(&make_series(&[10.0, 20.0, 30.0, 40.0, 50.0]), 3);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[4].valid);
        assert!(series.values[0].value.is_nan());
    }

    #[test]
    fn sma_basic_calculation() {
        let series = calculate_sma(&make_series(&[10.0, 20.0, 30.0, 40.0, 50.0]), 3);

        assert!((series.values[2].value - 20.0).abs() < 1e-12);
        assert!((series.values[3].value - 30.0).abs() < 1e-12);
        assert!((series.values[4].value - 40.0).abs() < 1e-12);
    }

    #[test]
    fn sma_constant_series() {
        let prices = vec![42.5; 400];
        let series = calculate_sma(&make_series(&prices), 365);

        for point in series.values.iter().filter(|p| p.valid) {
            assert!((point.value - 42.5).abs() < 1e-9);
        }
        assert_eq!(series.values.iter().filter(|p| p.valid).count(), 36);
    }

    #[test]
    fn sma_window_longer_than_series() {
        let series = calculate_sma(&make_series(&[1.0, 2.0]), 5);
        assert!(series.values.iter().all(|p| !p.valid));
    }

    #[test]
    fn sma_window_of_one_is_price() {
        let series = calculate_sma(&make_series(&[3.0, 7.0]), 1);
        assert_eq!(series.values[0].value, 3.0);
        assert_eq!(series.values[1].value, 7.0);
    }

    #[test]
    fn sma_indicator_type() {
        let series = calculate_sma(&make_series(&[1.0]), 92);
        assert_eq!(series.indicator_type, IndicatorType::Sma(92));
    }
}
