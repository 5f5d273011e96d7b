//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

use crate::adapters::console_report;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart::SvgChartAdapter;
use crate::domain::config_validation::{
    DataSettings, DataSource, load_chart_settings, load_data_settings, load_simulation_config,
};
use crate::domain::error::TrendguardError;
use crate::domain::indicator::{IndicatorSet, IndicatorType, compute_indicators};
use crate::domain::policy::{self, Decision};
use crate::domain::price_series::PriceSeries;
use crate::domain::profile::{PROFILE_NAMES, StrategyProfile, builtin_profile};
use crate::domain::simulation::{CompoundingSimulator, GrowthScenario};
use crate::domain::snapshot::{SignalSnapshot, VolatilitySnapshot};
use crate::domain::threshold::{DEFAULT_TREND_SMA_PERIOD, ThresholdConfig};
use crate::domain::window::{VolatilityWindow, WindowRole};
use crate::ports::chart_port::{ChartLine, ChartPort, ComparisonChart, LineStyle};
use crate::ports::data_port::{DataPort, Lookback};

#[derive(Parser, Debug)]
#[command(
    name = "trendguard",
    about = "Trend and volatility rebalancing signals plus a portfolio compounding simulator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate rebalancing signals for a strategy profile
    Signals {
        /// Strategy profile (see `profiles`)
        profile: String,
        /// Volatility threshold; defaults to the profile's
        threshold: Option<u32>,
        /// Trend SMA period
        sma_period: Option<u32>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Skip chart rendering
        #[arg(long)]
        no_chart: bool,
    },
    /// Run the long-horizon compounding simulation
    Simulate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Growth scenario: pessimistic or optimistic
        #[arg(long)]
        scenario: Option<GrowthScenario>,
    },
    /// List the built-in strategy profiles
    Profiles,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Signals {
            profile,
            threshold,
            sma_period,
            config,
            no_chart,
        } => run_signals(&profile, threshold, sma_period, config.as_deref(), no_chart),
        Command::Simulate { config, scenario } => run_simulate(config.as_deref(), scenario),
        Command::Profiles => run_profiles(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

/// Load an INI file, or an empty configuration when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, TrendguardError> {
    match path {
        Some(path) => {
            info!("loading config from {}", path.display());
            FileConfigAdapter::from_file(path)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub fn build_thresholds(
    profile: &StrategyProfile,
    threshold: Option<u32>,
    sma_period: Option<u32>,
) -> Result<ThresholdConfig, TrendguardError> {
    ThresholdConfig::new(
        threshold.map(f64::from).unwrap_or(profile.default_threshold),
        sma_period
            .map(|p| p as usize)
            .unwrap_or(DEFAULT_TREND_SMA_PERIOD),
    )
}

pub fn build_data_port(settings: &DataSettings) -> Result<Box<dyn DataPort>, TrendguardError> {
    match settings.source {
        DataSource::Csv => {
            info!("reading prices from {}", settings.csv_dir.display());
            Ok(Box::new(CsvAdapter::new(settings.csv_dir.clone())))
        }
        DataSource::Yahoo => {
            #[cfg(feature = "yahoo")]
            {
                use crate::adapters::yahoo_adapter::YahooAdapter;
                Ok(Box::new(YahooAdapter::new()?))
            }

            #[cfg(not(feature = "yahoo"))]
            {
                Err(TrendguardError::invalid(
                    "data",
                    "source",
                    "yahoo feature is required for source = yahoo",
                ))
            }
        }
    }
}

fn run_signals(
    profile_name: &str,
    threshold: Option<u32>,
    sma_period: Option<u32>,
    config_path: Option<&Path>,
    no_chart: bool,
) -> Result<(), TrendguardError> {
    let profile = builtin_profile(profile_name)?;
    let thresholds = build_thresholds(&profile, threshold, sma_period)?;
    let config = load_config(config_path)?;
    let data_settings = load_data_settings(&config)?;
    let mut chart_settings = load_chart_settings(&config);
    if no_chart {
        chart_settings.enabled = false;
    }

    info!(
        profile = %profile.name,
        threshold = thresholds.volatility_threshold,
        sma_period = thresholds.trend_sma_period,
        "evaluating signals"
    );

    let data_port = build_data_port(&data_settings)?;
    let signal_run = run_signal_pipeline(
        data_port.as_ref(),
        &profile,
        thresholds,
        &data_settings.lookback,
    )?;

    let snapshots: Vec<SignalSnapshot> = signal_run
        .instruments
        .iter()
        .map(|i| i.snapshot.clone())
        .collect();
    println!(
        "{}",
        console_report::format_signal_report(
            &profile,
            &thresholds,
            signal_run.gauge.as_ref().map(|g| &g.snapshot),
            &snapshots,
            &signal_run.decision,
        )
    );

    if chart_settings.enabled {
        let chart_port = SvgChartAdapter::new(chart_settings.output_dir);
        for instrument in &signal_run.instruments {
            let chart = build_comparison_chart(
                &thresholds,
                instrument,
                signal_run.gauge.as_ref(),
            );
            match chart_port.render(&chart) {
                Ok(path) => info!("chart written to {}", path.display()),
                Err(e) => warn!("chart for {} not written: {e}", chart.symbol),
            }
        }
    }

    Ok(())
}

/// One retrieved instrument with its indicators and latest readings.
#[derive(Debug, Clone)]
pub struct InstrumentRun {
    pub label: String,
    pub series: PriceSeries,
    pub indicators: IndicatorSet,
    pub snapshot: SignalSnapshot,
}

#[derive(Debug, Clone)]
pub struct GaugeRun {
    pub series: PriceSeries,
    pub indicators: IndicatorSet,
    pub snapshot: VolatilitySnapshot,
}

#[derive(Debug, Clone)]
pub struct SignalRun {
    pub instruments: Vec<InstrumentRun>,
    pub gauge: Option<GaugeRun>,
    pub decision: Decision,
}

/// Retrieve every series the profile needs, compute indicators and evaluate
/// the decision policy. Any retrieval or data-length failure aborts the run.
pub fn run_signal_pipeline(
    data_port: &dyn DataPort,
    profile: &StrategyProfile,
    thresholds: ThresholdConfig,
    lookback: &Lookback,
) -> Result<SignalRun, TrendguardError> {
    let gauge = match &profile.risk_gauge {
        Some(instrument) => {
            info!("fetching {} ({})", instrument.label, instrument.symbol);
            let series = data_port.fetch_series(&instrument.symbol, lookback)?;
            let indicators = compute_indicators(&series, &thresholds.volatility_indicators());
            let snapshot = VolatilitySnapshot::from_indicators(&instrument.label, &series, &indicators)?;
            debug!(
                symbol = %instrument.symbol,
                latest = snapshot.latest,
                "risk gauge"
            );
            Some(GaugeRun {
                series,
                indicators,
                snapshot,
            })
        }
        None => None,
    };

    let trend_indicators = thresholds.trend_indicators();
    let mut instruments = Vec::new();
    for instrument in profile.evaluation_order() {
        info!("fetching {} ({})", instrument.label, instrument.symbol);
        let series = data_port.fetch_series(&instrument.symbol, lookback)?;
        let indicators = compute_indicators(&series, &trend_indicators);
        let snapshot =
            SignalSnapshot::from_indicators(&instrument.label, &series, &indicators, &thresholds)?;
        debug!(
            symbol = %instrument.symbol,
            price = snapshot.latest_price,
            breached = ?snapshot.breached_windows(),
            "trend readings"
        );
        instruments.push(InstrumentRun {
            label: instrument.label.clone(),
            series,
            indicators,
            snapshot,
        });
    }

    let snapshots: Vec<SignalSnapshot> = instruments.iter().map(|i| i.snapshot.clone()).collect();
    let decision = policy::evaluate(
        thresholds,
        &snapshots,
        gauge.as_ref().map(|g| &g.snapshot),
    );
    info!(
        severity = ?decision.primary.severity(),
        high_volatility = decision.high_volatility,
        "decision"
    );

    Ok(SignalRun {
        instruments,
        gauge,
        decision,
    })
}

fn sma_style(role: WindowRole) -> LineStyle {
    match role {
        WindowRole::Baseline => LineStyle::Solid,
        WindowRole::Trend | WindowRole::ThreeQuarter => LineStyle::Dashed,
        _ => LineStyle::Dotted,
    }
}

fn indicator_values(indicators: &IndicatorSet, indicator_type: IndicatorType) -> Vec<Option<f64>> {
    indicators
        .get(indicator_type)
        .map(|s| {
            s.values
                .iter()
                .map(|p| p.valid.then_some(p.value))
                .collect()
        })
        .unwrap_or_default()
}

/// Chart of one instrument against the risk gauge, on the instrument's dates.
/// Gauge values are matched by date; days the gauge did not trade are gaps.
pub fn build_comparison_chart(
    thresholds: &ThresholdConfig,
    instrument: &InstrumentRun,
    gauge: Option<&GaugeRun>,
) -> ComparisonChart {
    let dates: Vec<_> = instrument.series.points().iter().map(|p| p.date).collect();

    let mut left = vec![ChartLine {
        label: format!("{} Close", instrument.label),
        style: LineStyle::Solid,
        values: instrument.series.closes().into_iter().map(Some).collect(),
    }];
    let mut seen = Vec::new();
    for role in WindowRole::ALL {
        let window = thresholds.window(role);
        if seen.contains(&window) {
            continue;
        }
        seen.push(window);
        left.push(ChartLine {
            label: format!("{} SMA{}", instrument.label, window),
            style: sma_style(role),
            values: indicator_values(&instrument.indicators, IndicatorType::Sma(window)),
        });
    }

    let mut right = Vec::new();
    let mut title = format!("{} (last {} observations)", instrument.label, dates.len());
    if let Some(gauge) = gauge {
        title = format!("{} and {}", instrument.label, gauge.snapshot.label);
        let gauge_dates: Vec<_> = gauge.series.points().iter().map(|p| p.date).collect();
        let align = |values: Vec<Option<f64>>| -> Vec<Option<f64>> {
            let by_date: HashMap<_, _> = gauge_dates.iter().copied().zip(values).collect();
            dates
                .iter()
                .map(|d| by_date.get(d).copied().flatten())
                .collect()
        };

        right.push(ChartLine {
            label: format!("{} Close", gauge.snapshot.label),
            style: LineStyle::Solid,
            values: align(gauge.series.closes().into_iter().map(Some).collect()),
        });
        for window in VolatilityWindow::ALL {
            let indicator_type = IndicatorType::Percentile75(window.window());
            right.push(ChartLine {
                label: format!("{} {}", gauge.snapshot.label, indicator_type),
                style: LineStyle::Dashed,
                values: align(indicator_values(&gauge.indicators, indicator_type)),
            });
        }
    }

    ComparisonChart {
        symbol: instrument.series.symbol().to_string(),
        title,
        dates,
        left,
        right,
        threshold: gauge.map(|_| thresholds.volatility_threshold),
    }
}

fn run_simulate(
    config_path: Option<&Path>,
    scenario: Option<GrowthScenario>,
) -> Result<(), TrendguardError> {
    let config = load_config(config_path)?;
    let mut simulation = load_simulation_config(&config)?;
    if let Some(scenario) = scenario {
        simulation.scenario = scenario;
    }

    info!(
        assets = simulation.assets.len(),
        years = simulation.years,
        scenario = %simulation.scenario,
        "running simulation"
    );
    let simulator = CompoundingSimulator::new(simulation)?;
    let report = simulator.run();
    println!("{}", console_report::format_simulation_report(&report));
    Ok(())
}

fn run_profiles() -> Result<(), TrendguardError> {
    let profiles = PROFILE_NAMES
        .iter()
        .map(|name| builtin_profile(name))
        .collect::<Result<Vec<_>, _>>()?;
    print!("{}", console_report::format_profiles(&profiles));
    Ok(())
}
