//! Rolling percentile.
//!
//! Linear interpolation between closest ranks over the sorted trailing window:
//! rank = q * (n - 1); P = lo + (hi - lo) * frac(rank).
//! Warmup: first (n-1) observations are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceSeries;

pub fn calculate_percentile(series: &PriceSeries, period: usize, quantile: f64) -> IndicatorSeries {
    let points = series.points();
    let mut values = Vec::with_capacity(points.len());
    let mut scratch: Vec<f64> = Vec::with_capacity(period);

    for (i, point) in points.iter().enumerate() {
        let valid = period > 0 && i + 1 >= period;

        let value = if valid {
            scratch.clear();
            scratch.extend(points[i + 1 - period..=i].iter().map(|p| p.close));
            scratch.sort_by(f64::total_cmp);
            interpolate(&scratch, quantile)
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
        indicator_type: IndicatorType::Percentile75(period),
        values,
    }
}

/// Percentile of an already sorted, non-empty slice.
pub fn interpolate(sorted: &[f64], quantile: f64) -> f64 {
    let rank = quantile.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
