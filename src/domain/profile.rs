//! Strategy profiles: which instruments a signal run watches and how its
//! advice is worded.

use crate::domain::error::TrendguardError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    pub symbol: String,
    pub label: String,
}

impl Instrument {
    pub fn new(symbol: &str, label: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            label: label.to_string(),
        }
    }
}

/// Product-specific phrases substituted into the rendered advice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wording {
    /// Product sold on a severe signal, e.g. "Amundi Leveraged ETF".
    pub product: String,
    /// Kind of position, e.g. "leveraged" or "covered call".
    pub position_kind: String,
    /// What exposure is reduced under high volatility.
    pub exposure: String,
    pub major_alternative: String,
    pub partial_alternative: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyProfile {
    pub name: String,
    pub benchmark: Instrument,
    pub risk_gauge: Option<Instrument>,
    pub tracked: Vec<Instrument>,
    pub default_threshold: f64,
    pub wording: Wording,
}

impl StrategyProfile {
    /// Benchmark first, then tracked instruments, in evaluation order.
    pub fn evaluation_order(&self) -> Vec<&Instrument> {
        std::iter::once(&self.benchmark)
            .chain(self.tracked.iter())
            .collect()
    }
}

pub const PROFILE_NAMES: [&str; 4] = ["amumbo", "qyld", "jeqp", "lvdx"];

pub fn builtin_profile(name: &str) -> Result<StrategyProfile, TrendguardError> {
    let nasdaq_covered_call = |symbol: &str, label: &str| StrategyProfile {
        name: name.to_lowercase(),
        benchmark: Instrument::new("^NDX", "Nasdaq 100"),
        risk_gauge: Some(Instrument::new("^VXN", "VXN")),
        tracked: vec![Instrument::new(symbol, label)],
        default_threshold: 33.0,
        wording: Wording {
            product: "NDX covered call ETF".into(),
            position_kind: "covered call".into(),
            exposure: "NDX products".into(),
            major_alternative: "Global All-Cap ESG".into(),
            partial_alternative: "TDIV".into(),
        },
    };

    match name.to_lowercase().as_str() {
        "amumbo" => Ok(StrategyProfile {
            name: "amumbo".into(),
            benchmark: Instrument::new("^GSPC", "S&P 500"),
            risk_gauge: Some(Instrument::new("^VIX", "VIX")),
            tracked: vec![],
            default_threshold: 28.0,
            wording: Wording {
                product: "Amundi Leveraged ETF".into(),
                position_kind: "leveraged".into(),
                exposure: "leveraged products".into(),
                major_alternative: "ACWI IMI".into(),
                partial_alternative: "ACWI IMI".into(),
            },
        }),
        "qyld" => Ok(nasdaq_covered_call("QYLD", "QYLD")),
        "jeqp" => Ok(nasdaq_covered_call("JEQP.DE", "JEQP")),
        "lvdx" => Ok(StrategyProfile {
            name: "lvdx".into(),
            benchmark: Instrument::new("^GDAXI", "DAX"),
            risk_gauge: None,
            tracked: vec![Instrument::new("LVDX.DE", "LevDax daily ETF")],
            default_threshold: 28.0,
            wording: Wording {
                product: "LevDax daily ETF".into(),
                position_kind: "leveraged".into(),
                exposure: "leveraged products".into(),
                major_alternative: "Global All-Cap ESG".into(),
                partial_alternative: "EU All-Cap ESG".into(),
            },
        }),
        _ => Err(TrendguardError::UnknownProfile {
            name: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_builtin_profiles_resolve() {
        for name in PROFILE_NAMES {
            let profile = builtin_profile(name).unwrap();
            assert_eq!(profile.name, name);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(builtin_profile("QYLD").unwrap().name, "qyld");
    }

    #[test]
    fn unknown_profile() {
        let err = builtin_profile("tqqq").unwrap_err();
        assert!(matches!(err, TrendguardError::UnknownProfile { ref name } if name == "tqqq"));
    }

    #[test]
    fn evaluation_order_starts_with_benchmark() {
        let profile = builtin_profile("jeqp").unwrap();
        let symbols: Vec<&str> = profile
            .evaluation_order()
            .iter()
            .map(|i| i.symbol.as_str())
            .collect();
        assert_eq!(symbols, vec!["^NDX", "JEQP.DE"]);
    }

    #[test]
    fn volatility_families_have_distinct_defaults() {
        assert_eq!(builtin_profile("amumbo").unwrap().default_threshold, 28.0);
        assert_eq!(builtin_profile("qyld").unwrap().default_threshold, 33.0);
        assert!(builtin_profile("lvdx").unwrap().risk_gauge.is_none());
    }
}
