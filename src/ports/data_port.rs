//! Price retrieval port trait.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};

use crate::domain::error::TrendguardError;
use crate::domain::price_series::PriceSeries;

/// Span of history to retrieve, counted back from the most recent observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Days(u32),
    Months(u32),
    Years(u32),
}

impl Period {
    /// First date inside the period ending at `last`.
    pub fn start_from(&self, last: NaiveDate) -> Option<NaiveDate> {
        match *self {
            Period::Days(n) => last.checked_sub_days(Days::new(u64::from(n))),
            Period::Months(n) => last.checked_sub_months(Months::new(n)),
            Period::Years(n) => last.checked_sub_months(Months::new(n.checked_mul(12)?)),
        }
    }
}

impl FromStr for Period {
    type Err = TrendguardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (count, unit) = s.split_at(split);
        let invalid = || {
            TrendguardError::invalid(
                "data",
                "lookback",
                format!("'{s}' is not a period like 2y, 6mo or 30d"),
            )
        };
        let count: u32 = count.parse().map_err(|_| invalid())?;
        if count == 0 {
            return Err(invalid());
        }
        match unit {
            "d" => Ok(Period::Days(count)),
            "mo" => Ok(Period::Months(count)),
            "y" => Ok(Period::Years(count)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Days(n) => write!(f, "{n}d"),
            Period::Months(n) => write!(f, "{n}mo"),
            Period::Years(n) => write!(f, "{n}y"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookback {
    pub period: Period,
    pub interval: String,
}

impl Default for Lookback {
    fn default() -> Self {
        Self {
            period: Period::Years(2),
            interval: "1d".to_string(),
        }
    }
}

pub trait DataPort {
    /// Closing prices for `symbol` over `lookback`, gap-filled and in date order.
    fn fetch_series(
        &self,
        symbol: &str,
        lookback: &Lookback,
    ) -> Result<PriceSeries, TrendguardError>;
}
