//! Configuration loading and validation.
//!
//! Turns raw `ConfigPort` lookups into validated settings. Malformed numbers
//! are rejected here rather than silently replaced by defaults.

use std::path::PathBuf;

use crate::domain::error::TrendguardError;
use crate::domain::simulation::{AssetConfig, GrowthScenario, SimulationConfig};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{Lookback, Period};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Yahoo,
    Csv,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSettings {
    pub source: DataSource,
    pub csv_dir: PathBuf,
    pub lookback: Lookback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub enabled: bool,
    pub output_dir: PathBuf,
}

pub fn load_data_settings(config: &dyn ConfigPort) -> Result<DataSettings, TrendguardError> {
    let source = match non_empty(config, "data", "source")
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        None | Some("yahoo") => DataSource::Yahoo,
        Some("csv") => DataSource::Csv,
        Some(other) => {
            return Err(TrendguardError::invalid(
                "data",
                "source",
                format!("unknown data source '{other}' (expected yahoo or csv)"),
            ));
        }
    };

    let csv_dir = match (source, non_empty(config, "data", "csv_dir")) {
        (_, Some(dir)) => PathBuf::from(dir),
        (DataSource::Csv, None) => {
            return Err(TrendguardError::ConfigMissing {
                section: "data".to_string(),
                key: "csv_dir".to_string(),
            });
        }
        (DataSource::Yahoo, None) => PathBuf::from("data"),
    };

    let mut lookback = Lookback::default();
    if let Some(period) = non_empty(config, "data", "lookback") {
        lookback.period = period.parse::<Period>()?;
    }
    if let Some(interval) = non_empty(config, "data", "interval") {
        lookback.interval = interval;
    }

    Ok(DataSettings {
        source,
        csv_dir,
        lookback,
    })
}

pub fn load_chart_settings(config: &dyn ConfigPort) -> ChartSettings {
    ChartSettings {
        enabled: config.get_bool("chart", "enabled", true),
        output_dir: PathBuf::from(
            non_empty(config, "chart", "output_dir").unwrap_or_else(|| "charts".to_string()),
        ),
    }
}

/// Simulation parameters from `[simulation]` and one `[asset.NAME]` section per
/// listed asset. Without an `assets` list the built-in example portfolio is used,
/// with any scalar overrides from `[simulation]` applied.
pub fn load_simulation_config(
    config: &dyn ConfigPort,
) -> Result<SimulationConfig, TrendguardError> {
    let defaults = SimulationConfig::example();

    let assets = match non_empty(config, "simulation", "assets") {
        None => defaults.assets.clone(),
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| load_asset(config, name))
            .collect::<Result<Vec<_>, _>>()?,
    };

    let scenario = match non_empty(config, "simulation", "scenario") {
        Some(s) => s.parse::<GrowthScenario>()?,
        None => defaults.scenario,
    };

    let simulation = SimulationConfig {
        assets,
        years: read_u32(config, "simulation", "years", defaults.years)?,
        tax_rate: read_f64(config, "simulation", "tax_rate", defaults.tax_rate)?,
        tax_free_allowance: read_f64(
            config,
            "simulation",
            "tax_free_allowance",
            defaults.tax_free_allowance,
        )?,
        monthly_savings: read_f64(
            config,
            "simulation",
            "monthly_savings",
            defaults.monthly_savings,
        )?,
        high_yield_assumption: read_f64(
            config,
            "simulation",
            "high_yield_assumption",
            defaults.high_yield_assumption,
        )?,
        scenario,
    };
    simulation.validate()?;
    Ok(simulation)
}

fn load_asset(config: &dyn ConfigPort, name: &str) -> Result<AssetConfig, TrendguardError> {
    let section = format!("asset.{name}");
    let optimistic_growth = require_f64(config, &section, "optimistic_growth")?;
    Ok(AssetConfig {
        name: name.to_string(),
        position: require_f64(config, &section, "position")?,
        dividend_yield: read_f64(config, &section, "dividend_yield", 0.0)?,
        // percent in the file, fraction in the model
        savings_allocation: require_f64(config, &section, "savings_allocation")? / 100.0,
        pessimistic_growth: read_f64(config, &section, "pessimistic_growth", optimistic_growth)?,
        optimistic_growth,
    })
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_f64(section: &str, key: &str, raw: &str) -> Result<f64, TrendguardError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TrendguardError::invalid(
            section,
            key,
            format!("'{raw}' is not a number"),
        )),
    }
}

fn read_f64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, TrendguardError> {
    match non_empty(config, section, key) {
        Some(raw) => parse_f64(section, key, &raw),
        None => Ok(default),
    }
}

fn require_f64(config: &dyn ConfigPort, section: &str, key: &str) -> Result<f64, TrendguardError> {
    let raw = non_empty(config, section, key).ok_or_else(|| TrendguardError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    })?;
    parse_f64(section, key, &raw)
}

fn read_u32(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: u32,
) -> Result<u32, TrendguardError> {
    match non_empty(config, section, key) {
        Some(raw) => raw.parse::<u32>().map_err(|_| {
            TrendguardError::invalid(section, key, format!("'{raw}' is not a whole number"))
        }),
        None => Ok(default),
    }
}
