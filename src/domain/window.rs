//! Semantic window roles for trend SMAs and volatility percentiles.

use std::fmt;

/// Role of a trend SMA. `Trend` is the caller-tunable window; the rest are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WindowRole {
    Trend,
    Month,
    Quarter,
    ThreeQuarter,
    Baseline,
    Year,
}

impl WindowRole {
    pub const ALL: [WindowRole; 6] = [
        WindowRole::Trend,
        WindowRole::Month,
        WindowRole::Quarter,
        WindowRole::ThreeQuarter,
        WindowRole::Baseline,
        WindowRole::Year,
    ];

    pub fn window(self, trend_period: usize) -> usize {
        match self {
            WindowRole::Trend => trend_period,
            WindowRole::Month => 31,
            WindowRole::Quarter => 92,
            WindowRole::ThreeQuarter => 150,
            WindowRole::Baseline => 200,
            WindowRole::Year => 365,
        }
    }
}

impl fmt::Display for WindowRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WindowRole::Trend => "trend",
            WindowRole::Month => "month",
            WindowRole::Quarter => "quarter",
            WindowRole::ThreeQuarter => "three-quarter",
            WindowRole::Baseline => "baseline",
            WindowRole::Year => "year",
        };
        f.write_str(name)
    }
}

/// Rolling 75th-percentile windows on the risk gauge, each with the fraction
/// of the volatility threshold it is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VolatilityWindow {
    Week,
    Fortnight,
    Month,
}

impl VolatilityWindow {
    pub const ALL: [VolatilityWindow; 3] = [
        VolatilityWindow::Week,
        VolatilityWindow::Fortnight,
        VolatilityWindow::Month,
    ];

    pub fn window(self) -> usize {
        match self {
            VolatilityWindow::Week => 7,
            VolatilityWindow::Fortnight => 14,
            VolatilityWindow::Month => 30,
        }
    }

    pub fn threshold_factor(self) -> f64 {
        match self {
            VolatilityWindow::Week => 0.90,
            VolatilityWindow::Fortnight => 0.80,
            VolatilityWindow::Month => 0.75,
        }
    }
}

impl fmt::Display for VolatilityWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VolatilityWindow::Week => "Week",
            VolatilityWindow::Fortnight => "Fortnight",
            VolatilityWindow::Month => "Month",
        };
        f.write_str(name)
    }
}
