//! Closing-price series for a single instrument.

use chrono::NaiveDate;

use crate::domain::error::TrendguardError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Ordered `(date, close)` observations with strictly increasing dates.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, TrendguardError> {
        let symbol = symbol.into();
        if points.is_empty() {
            return Err(TrendguardError::retrieval(&symbol, "empty price series"));
        }
        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(TrendguardError::retrieval(
                &symbol,
                format!("dates not strictly increasing at {}", pair[1].date),
            ));
        }
        if let Some(bad) = points.iter().find(|p| !p.close.is_finite()) {
            return Err(TrendguardError::retrieval(
                &symbol,
                format!("non-finite close on {}", bad.date),
            ));
        }
        Ok(Self { symbol, points })
    }

    /// Build a series from dates and possibly-missing closes, gap-filling first.
    pub fn from_gappy(
        symbol: impl Into<String>,
        dates: Vec<NaiveDate>,
        closes: Vec<Option<f64>>,
    ) -> Result<Self, TrendguardError> {
        let symbol = symbol.into();
        if dates.len() != closes.len() {
            return Err(TrendguardError::retrieval(
                &symbol,
                format!("{} dates but {} closes", dates.len(), closes.len()),
            ));
        }
        let filled = fill_gaps(closes)
            .ok_or_else(|| TrendguardError::retrieval(&symbol, "no closing prices"))?;
        let points = dates
            .into_iter()
            .zip(filled)
            .map(|(date, close)| PricePoint { date, close })
            .collect();
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> PricePoint {
        // non-empty by construction
        self.points[self.points.len() - 1]
    }
}

/// Forward-fill then back-fill missing values. `None` when every value is missing.
pub fn fill_gaps(values: Vec<Option<f64>>) -> Option<Vec<f64>> {
    let first = values.iter().flatten().copied().find(|v| v.is_finite())?;
    let mut last = first;
    Some(
        values
            .into_iter()
            .map(|v| {
                if let Some(v) = v.filter(|v| v.is_finite()) {
                    last = v;
                }
                last
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn rejects_empty_series() {
        let err = PriceSeries::new("^VIX", vec![]).unwrap_err();
        assert!(matches!(err, TrendguardError::Retrieval { ref symbol, .. } if symbol == "^VIX"));
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let points = vec![
            PricePoint { date: day(2), close: 1.0 },
            PricePoint { date: day(2), close: 2.0 },
        ];
        assert!(PriceSeries::new("X", points).is_err());
    }

    #[test]
    fn latest_is_last_point() {
        let points = vec![
            PricePoint { date: day(1), close: 10.0 },
            PricePoint { date: day(2), close: 12.5 },
        ];
        let series = PriceSeries::new("X", points).unwrap();
        assert_eq!(series.latest().close, 12.5);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn fill_gaps_forward_then_backward() {
        let filled = fill_gaps(vec![None, Some(2.0), None, Some(4.0), None]).unwrap();
        assert_eq!(filled, vec![2.0, 2.0, 2.0, 4.0, 4.0]);
    }

    #[test]
    fn fill_gaps_treats_nan_as_missing() {
        let filled = fill_gaps(vec![Some(1.0), Some(f64::NAN), Some(3.0)]).unwrap();
        assert_eq!(filled, vec![1.0, 1.0, 3.0]);
    }

    #[test]
    fn fill_gaps_all_missing() {
        assert!(fill_gaps(vec![None, None]).is_none());
    }

    #[test]
    fn from_gappy_fills_and_validates() {
        let series =
            PriceSeries::from_gappy("QYLD", vec![day(1), day(2), day(3)], vec![None, Some(17.0), None])
                .unwrap();
        assert_eq!(series.closes(), vec![17.0, 17.0, 17.0]);
    }

    #[test]
    fn from_gappy_length_mismatch() {
        let err = PriceSeries::from_gappy("QYLD", vec![day(1)], vec![]).unwrap_err();
        assert!(matches!(err, TrendguardError::Retrieval { .. }));
    }
}
