//! Long-horizon portfolio compounding simulation.
//!
//! Yearly ticks of growth, dividend reinvestment (DRIP) after tax, and savings
//! contributions until the portfolio sustains itself, followed by a one-time
//! retirement restructuring that sells non-distributing assets into a
//! high-yield holding.
//!
//! All rates are in percent units and divided by 100 at the point of use.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::TrendguardError;

const ALLOCATION_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrowthScenario {
    Pessimistic,
    #[default]
    Optimistic,
}

impl FromStr for GrowthScenario {
    type Err = TrendguardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pessimistic" | "defensive" => Ok(GrowthScenario::Pessimistic),
            "optimistic" | "expected" => Ok(GrowthScenario::Optimistic),
            other => Err(TrendguardError::invalid(
                "simulation",
                "scenario",
                format!("unknown scenario '{other}' (expected pessimistic or optimistic)"),
            )),
        }
    }
}

impl fmt::Display for GrowthScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthScenario::Pessimistic => f.write_str("pessimistic"),
            GrowthScenario::Optimistic => f.write_str("optimistic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetConfig {
    pub name: String,
    /// Current value in currency.
    pub position: f64,
    /// Dividend yield in percent.
    pub dividend_yield: f64,
    /// Fraction of new savings directed to this asset.
    pub savings_allocation: f64,
    /// Expected yearly growth in percent, bear case.
    pub pessimistic_growth: f64,
    /// Expected yearly growth in percent, bull case.
    pub optimistic_growth: f64,
}

impl AssetConfig {
    pub fn growth(&self, scenario: GrowthScenario) -> f64 {
        match scenario {
            GrowthScenario::Pessimistic => self.pessimistic_growth,
            GrowthScenario::Optimistic => self.optimistic_growth,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub assets: Vec<AssetConfig>,
    pub years: u32,
    /// Tax (and other deductions) on dividends and realized gains, in percent.
    pub tax_rate: f64,
    /// Dividends per year exempt from tax, in currency.
    pub tax_free_allowance: f64,
    pub monthly_savings: f64,
    /// Yield in percent of the holding that absorbs liquidated assets.
    pub high_yield_assumption: f64,
    pub scenario: GrowthScenario,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), TrendguardError> {
        if self.assets.is_empty() {
            return Err(TrendguardError::invalid(
                "simulation",
                "assets",
                "at least one asset is required",
            ));
        }
        if self.years == 0 {
            return Err(TrendguardError::invalid(
                "simulation",
                "years",
                "years must be at least 1",
            ));
        }
        if !(0.0..100.0).contains(&self.tax_rate) {
            return Err(TrendguardError::invalid(
                "simulation",
                "tax_rate",
                "tax_rate must be in [0, 100)",
            ));
        }
        if !(self.tax_free_allowance >= 0.0) {
            return Err(TrendguardError::invalid(
                "simulation",
                "tax_free_allowance",
                "tax_free_allowance must be non-negative",
            ));
        }
        if !(self.monthly_savings >= 0.0) {
            return Err(TrendguardError::invalid(
                "simulation",
                "monthly_savings",
                "monthly_savings must be non-negative",
            ));
        }
        if !(self.high_yield_assumption > 0.0) {
            return Err(TrendguardError::invalid(
                "simulation",
                "high_yield_assumption",
                "high_yield_assumption must be positive",
            ));
        }

        for asset in &self.assets {
            let section = format!("asset.{}", asset.name);
            if !(asset.position >= 0.0) {
                return Err(TrendguardError::invalid(&section, "position", "position must be non-negative"));
            }
            if !(asset.dividend_yield >= 0.0) {
                return Err(TrendguardError::invalid(
                    &section,
                    "dividend_yield",
                    "dividend_yield must be non-negative",
                ));
            }
            if !(asset.savings_allocation >= 0.0) {
                return Err(TrendguardError::invalid(
                    &section,
                    "savings_allocation",
                    "savings_allocation must be non-negative",
                ));
            }
            if !asset.pessimistic_growth.is_finite() || !asset.optimistic_growth.is_finite() {
                return Err(TrendguardError::invalid(&section, "growth", "growth rates must be finite"));
            }
            // a yearly loss beyond 100% would drive the position negative
            for (key, growth) in [
                ("pessimistic_growth", asset.pessimistic_growth),
                ("optimistic_growth", asset.optimistic_growth),
            ] {
                if growth < -100.0 {
                    return Err(TrendguardError::invalid(
                        &section,
                        key,
                        "growth must not be below -100%",
                    ));
                }
            }
        }

        let total: f64 = self.assets.iter().map(|a| a.position).sum();
        if total <= 0.0 {
            return Err(TrendguardError::invalid(
                "simulation",
                "assets",
                "total portfolio value must be positive",
            ));
        }

        let allocated: f64 = self.assets.iter().map(|a| a.savings_allocation).sum();
        if (allocated - 1.0).abs() > ALLOCATION_TOLERANCE {
            return Err(TrendguardError::invalid(
                "simulation",
                "savings_allocation",
                format!("savings allocations sum to {:.4}%, expected 100%", allocated * 100.0),
            ));
        }
        Ok(())
    }

    /// Built-in example portfolio.
    pub fn example() -> Self {
        // (name, position, yield %, savings %, pessimistic %, optimistic %)
        const ROWS: [(&str, f64, f64, f64, f64, f64); 14] = [
            ("USAe", 5256.0, 1.12, 24.0, 8.0, 10.0),
            ("JapH", 1904.0, 2.36, 10.0, 6.5, 8.0),
            ("R_EU", 1439.0, 3.75, 10.0, 5.0, 7.0),
            ("Amum", 1416.0, 0.00, 10.0, 11.5, 15.0),
            ("spgIT", 1167.0, 0.44, 8.0, 10.0, 12.5),
            ("EUm", 1086.0, 0.00, 7.5, 6.0, 8.0),
            ("tdiv", 801.0, 5.19, 6.0, 7.5, 9.5),
            ("wSC", 733.5, 0.00, 5.0, 4.5, 6.5),
            ("QuantgMF", 730.08, 1.89, 6.0, 6.5, 8.0),
            ("R_EM", 658.95, 4.31, 5.0, 7.0, 7.0),
            ("EM_SC", 340.44, 2.34, 2.5, 6.0, 8.0),
            ("EM_IMI", 233.25, 2.61, 2.5, 5.5, 7.5),
            ("QED_AP", 214.78, 5.50, 2.0, 4.0, 4.75),
            ("CSI300", 183.22, 0.00, 1.5, 7.0, 8.0),
        ];

        SimulationConfig {
            assets: ROWS
                .iter()
                .map(|&(name, position, dividend_yield, savings, pessimistic, optimistic)| {
                    AssetConfig {
                        name: name.to_string(),
                        position,
                        dividend_yield,
                        savings_allocation: savings / 100.0,
                        pessimistic_growth: pessimistic,
                        optimistic_growth: optimistic,
                    }
                })
                .collect(),
            years: 35,
            tax_rate: 26.0,
            tax_free_allowance: 1200.0,
            monthly_savings: 1500.0,
            high_yield_assumption: 3.5,
            scenario: GrowthScenario::Optimistic,
        }
    }
}

/// Mutable per-run state. Every vector is parallel to the configured assets.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub positions: Vec<f64>,
    pub dividend_yields: Vec<f64>,
    pub allocation: Vec<f64>,
    /// Starting position plus every contribution made since.
    pub cost_basis: Vec<f64>,
    pub contributed: Vec<f64>,
    pub total_value: f64,
    pub blended_yield: f64,
    /// First year the contribution gate was skipped. Set once, never reset.
    pub snowball_year: Option<u32>,
}

impl PortfolioState {
    fn recompute(&mut self) {
        self.total_value = self.positions.iter().sum();
        self.allocation = if self.total_value > 0.0 {
            self.positions.iter().map(|p| p / self.total_value).collect()
        } else {
            vec![0.0; self.positions.len()]
        };
        self.blended_yield = self
            .allocation
            .iter()
            .zip(&self.dividend_yields)
            .map(|(a, y)| a * y)
            .sum();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub blended_yield: f64,
    pub projected_income: f64,
    pub allocation: Vec<f64>,
}

impl PortfolioSummary {
    fn from_state(state: &PortfolioState) -> Self {
        Self {
            total_value: state.total_value,
            blended_yield: state.blended_yield,
            projected_income: state.total_value * state.blended_yield / 100.0,
            allocation: state.allocation.clone(),
        }
    }
}

/// Growth estimates and reinvestment weights known before the first tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Outlook {
    pub defensive_growth: f64,
    pub expected_growth: f64,
    pub drip_allocation: Vec<f64>,
    /// Blended growth rate in percent used by the contribution gate.
    pub growth_factor: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearRecord {
    pub year: u32,
    pub gross_dividend: f64,
    pub net_dividend: f64,
    /// Portfolio value after growth and reinvestment, before contributions.
    pub value_after_growth: f64,
    pub contribution: f64,
    /// True only for the year the snowball latch was set.
    pub snowball_reached: bool,
    pub total_value: f64,
    pub blended_yield: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestructuredPortfolio {
    /// Surviving asset names in configured order, then the high-yield bucket if any.
    pub labels: Vec<String>,
    pub positions: Vec<f64>,
    pub dividend_yields: Vec<f64>,
    pub liquidated: Vec<String>,
    pub capital_gains_tax: f64,
    pub summary: PortfolioSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub asset_names: Vec<String>,
    pub scenario: GrowthScenario,
    pub years: u32,
    pub initial: PortfolioSummary,
    pub outlook: Outlook,
    pub timeline: Vec<YearRecord>,
    pub snowball_year: Option<u32>,
    pub final_summary: PortfolioSummary,
    pub restructured: RestructuredPortfolio,
}

pub const HIGH_YIELD_BUCKET: &str = "High-Yield World";

pub struct CompoundingSimulator {
    config: SimulationConfig,
    growth: Vec<f64>,
    savings_allocation: Vec<f64>,
    start_allocation: Vec<f64>,
    drip_allocation: Vec<f64>,
    growth_factor: f64,
    annual_savings: f64,
}

impl CompoundingSimulator {
    pub fn new(config: SimulationConfig) -> Result<Self, TrendguardError> {
        config.validate()?;

        let growth: Vec<f64> = config.assets.iter().map(|a| a.growth(config.scenario)).collect();
        let savings_allocation: Vec<f64> = config.assets.iter().map(|a| a.savings_allocation).collect();

        let total: f64 = config.assets.iter().map(|a| a.position).sum();
        let start_allocation: Vec<f64> = config.assets.iter().map(|a| a.position / total).collect();

        let yield_sum: f64 = config.assets.iter().map(|a| a.dividend_yield).sum();
        let yield_weights: Vec<f64> = config
            .assets
            .iter()
            .map(|a| if yield_sum > 0.0 { a.dividend_yield / yield_sum } else { 0.0 })
            .collect();

        let drip_allocation: Vec<f64> = yield_weights
            .iter()
            .zip(&savings_allocation)
            .map(|(w, s)| (w + s) / 2.0)
            .collect();

        let growth_factor = (0..growth.len())
            .map(|i| {
                growth[i] * (drip_allocation[i] + savings_allocation[i] + start_allocation[i]) / 3.0
            })
            .sum();

        let annual_savings = config.monthly_savings * 12.0;

        Ok(Self {
            config,
            growth,
            savings_allocation,
            start_allocation,
            drip_allocation,
            growth_factor,
            annual_savings,
        })
    }

    pub fn initial_state(&self) -> PortfolioState {
        let mut state = PortfolioState {
            positions: self.config.assets.iter().map(|a| a.position).collect(),
            dividend_yields: self.config.assets.iter().map(|a| a.dividend_yield).collect(),
            allocation: Vec::new(),
            cost_basis: self.config.assets.iter().map(|a| a.position).collect(),
            contributed: vec![0.0; self.config.assets.len()],
            total_value: 0.0,
            blended_yield: 0.0,
            snowball_year: None,
        };
        state.recompute();
        state
    }

    pub fn outlook(&self) -> Outlook {
        let blend = |rates: &dyn Fn(&AssetConfig) -> f64| -> f64 {
            self.config
                .assets
                .iter()
                .enumerate()
                .map(|(i, a)| rates(a) * (self.savings_allocation[i] + self.start_allocation[i]) / 2.0)
                .sum()
        };
        Outlook {
            defensive_growth: blend(&|a| a.pessimistic_growth),
            expected_growth: blend(&|a| a.growth(self.config.scenario)),
            drip_allocation: self.drip_allocation.clone(),
            growth_factor: self.growth_factor,
        }
    }

    /// Dividend after tax on the part above the allowance.
    pub fn net_dividend(&self, gross: f64) -> f64 {
        let allowance = self.config.tax_free_allowance;
        if gross > allowance {
            (gross - allowance) * (1.0 - self.config.tax_rate / 100.0) + allowance
        } else {
            gross
        }
    }

    /// Value below which new savings are still contributed.
    pub fn contribution_ceiling(&self) -> f64 {
        (100.0 - self.growth_factor) * self.annual_savings
    }

    /// Advance one simulated year.
    pub fn step(&self, state: &mut PortfolioState, year: u32) -> YearRecord {
        let prior_total = state.total_value;
        let gross_dividend = prior_total * state.blended_yield / 100.0;
        let net_dividend = self.net_dividend(gross_dividend);

        for (i, position) in state.positions.iter_mut().enumerate() {
            *position += *position * self.growth[i] / 100.0 + self.drip_allocation[i] * net_dividend;
        }
        let value_after_growth: f64 = state.positions.iter().sum();

        let mut contribution = 0.0;
        let mut snowball_reached = false;
        if prior_total < self.contribution_ceiling() {
            for (i, position) in state.positions.iter_mut().enumerate() {
                let amount = self.savings_allocation[i] * self.annual_savings;
                *position += amount;
                state.contributed[i] += amount;
                state.cost_basis[i] += amount;
                contribution += amount;
            }
        } else if state.snowball_year.is_none() {
            state.snowball_year = Some(year);
            snowball_reached = true;
        }

        state.recompute();

        YearRecord {
            year,
            gross_dividend,
            net_dividend,
            value_after_growth,
            contribution,
            snowball_reached,
            total_value: state.total_value,
            blended_yield: state.blended_yield,
        }
    }

    /// Sell every zero-yield asset, pay tax on the gain over its cost basis,
    /// and move the proceeds into one high-yield holding.
    pub fn restructure(&self, state: &PortfolioState) -> RestructuredPortfolio {
        let tax = self.config.tax_rate / 100.0;
        let mut labels = Vec::new();
        let mut positions = Vec::new();
        let mut dividend_yields = Vec::new();
        let mut liquidated = Vec::new();
        let mut bucket = 0.0;
        let mut capital_gains_tax = 0.0;

        for (i, asset) in self.config.assets.iter().enumerate() {
            let value = state.positions[i];
            let cost_basis = state.cost_basis[i];
            if state.dividend_yields[i] > 0.0 {
                labels.push(asset.name.clone());
                positions.push(value);
                dividend_yields.push(state.dividend_yields[i]);
                continue;
            }
            let gain = (value - cost_basis).max(0.0);
            capital_gains_tax += gain * tax;
            bucket += value - gain * tax;
            liquidated.push(asset.name.clone());
        }

        if !liquidated.is_empty() {
            labels.push(HIGH_YIELD_BUCKET.to_string());
            positions.push(bucket);
            dividend_yields.push(self.config.high_yield_assumption);
        }

        let mut after = PortfolioState {
            cost_basis: positions.clone(),
            contributed: vec![0.0; positions.len()],
            positions: positions.clone(),
            dividend_yields: dividend_yields.clone(),
            allocation: Vec::new(),
            total_value: 0.0,
            blended_yield: 0.0,
            snowball_year: state.snowball_year,
        };
        after.recompute();

        RestructuredPortfolio {
            labels,
            positions,
            dividend_yields,
            liquidated,
            capital_gains_tax,
            summary: PortfolioSummary::from_state(&after),
        }
    }

    pub fn run(&self) -> SimulationReport {
        let mut state = self.initial_state();
        let initial = PortfolioSummary::from_state(&state);

        let mut timeline = Vec::with_capacity(self.config.years as usize);
        for year in 0..self.config.years {
            let record = self.step(&mut state, year);
            if record.snowball_reached {
                tracing::info!(year, total = record.total_value, "snowball effect reached");
            }
            timeline.push(record);
        }

        let final_summary = PortfolioSummary::from_state(&state);
        let restructured = self.restructure(&state);

        SimulationReport {
            asset_names: self.config.assets.iter().map(|a| a.name.clone()).collect(),
            scenario: self.config.scenario,
            years: self.config.years,
            initial,
            outlook: self.outlook(),
            timeline,
            snowball_year: state.snowball_year,
            final_summary,
            restructured,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn asset(name: &str, position: f64, dividend_yield: f64, savings: f64, growth: f64) -> AssetConfig {
        AssetConfig {
            name: name.into(),
            position,
            dividend_yield,
            savings_allocation: savings,
            pessimistic_growth: growth / 2.0,
            optimistic_growth: growth,
        }
    }

    fn two_asset_config() -> SimulationConfig {
        SimulationConfig {
            assets: vec![asset("DIV", 6000.0, 4.0, 0.5, 6.0), asset("GROW", 4000.0, 0.0, 0.5, 10.0)],
            years: 10,
            tax_rate: 25.0,
            tax_free_allowance: 100.0,
            monthly_savings: 100.0,
            high_yield_assumption: 3.5,
            scenario: GrowthScenario::Optimistic,
        }
    }

    #[test]
    fn example_portfolio_is_valid() {
        let config = SimulationConfig::example();
        assert!(config.validate().is_ok());
        assert_eq!(config.assets.len(), 14);
    }

    #[test]
    fn rejects_allocations_not_summing_to_one() {
        let mut config = two_asset_config();
        config.assets[0].savings_allocation = 0.6;
        let err = CompoundingSimulator::new(config).err().unwrap();
        assert!(matches!(err, TrendguardError::ConfigInvalid { ref key, .. } if key == "savings_allocation"));
    }

    #[test]
    fn rejects_negative_position() {
        let mut config = two_asset_config();
        config.assets[1].position = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_growth_below_total_loss() {
        let mut config = two_asset_config();
        config.assets[0].pessimistic_growth = -100.5;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            TrendguardError::ConfigInvalid { ref section, ref key, .. }
                if section == "asset.DIV" && key == "pessimistic_growth"
        ));

        let mut config = two_asset_config();
        config.assets[1].optimistic_growth = -100.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_years_and_empty_assets() {
        let mut config = two_asset_config();
        config.years = 0;
        assert!(config.validate().is_err());

        let mut config = two_asset_config();
        config.assets.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn scenario_parsing() {
        assert_eq!("Pessimistic".parse::<GrowthScenario>().unwrap(), GrowthScenario::Pessimistic);
        assert_eq!("optimistic".parse::<GrowthScenario>().unwrap(), GrowthScenario::Optimistic);
        assert!("bullish".parse::<GrowthScenario>().is_err());
    }

    #[test]
    fn initial_state_allocations_and_yield() {
        let sim = CompoundingSimulator::new(two_asset_config()).unwrap();
        let state = sim.initial_state();
        assert_relative_eq!(state.total_value, 10_000.0);
        assert_relative_eq!(state.allocation[0], 0.6);
        assert_relative_eq!(state.blended_yield, 2.4);
    }

    #[test]
    fn net_dividend_taxes_only_above_allowance() {
        let sim = CompoundingSimulator::new(two_asset_config()).unwrap();
        assert_relative_eq!(sim.net_dividend(80.0), 80.0);
        // (240 - 100) * 0.75 + 100
        assert_relative_eq!(sim.net_dividend(240.0), 205.0);
    }

    #[test]
    fn drip_allocation_averages_yield_weight_and_savings() {
        let sim = CompoundingSimulator::new(two_asset_config()).unwrap();
        let outlook = sim.outlook();
        assert_relative_eq!(outlook.drip_allocation[0], 0.75);
        assert_relative_eq!(outlook.drip_allocation[1], 0.25);
        // growth factor: 6 * (0.75 + 0.5 + 0.6) / 3 + 10 * (0.25 + 0.5 + 0.4) / 3
        assert_relative_eq!(outlook.growth_factor, 3.7 + 3.8333333333333335, epsilon = 1e-12);
    }

    #[test]
    fn step_conserves_value_before_contributions() {
        let sim = CompoundingSimulator::new(two_asset_config()).unwrap();
        let mut state = sim.initial_state();
        for year in 0..5 {
            let prior_positions = state.positions.clone();
            let prior_total = state.total_value;
            let record = sim.step(&mut state, year);
            let growth: f64 = prior_positions[0] * 0.06 + prior_positions[1] * 0.10;
            assert_relative_eq!(
                record.value_after_growth,
                prior_total + growth + record.net_dividend,
                epsilon = 1e-9
            );
            assert_relative_eq!(
                record.total_value,
                record.value_after_growth + record.contribution,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn contributions_follow_savings_allocation() {
        let sim = CompoundingSimulator::new(two_asset_config()).unwrap();
        let mut state = sim.initial_state();
        let record = sim.step(&mut state, 0);
        assert_relative_eq!(record.contribution, 1200.0);
        assert_relative_eq!(state.contributed[0], 600.0);
        assert_relative_eq!(state.contributed[1], 600.0);
        assert_relative_eq!(state.cost_basis[1], 4600.0);
        assert!(state.snowball_year.is_none());
    }

    #[test]
    fn snowball_latch_is_set_once_and_never_reset() {
        // shrinking portfolio: gate skipped at first, contributions resume later
        let config = SimulationConfig {
            assets: vec![asset("ONLY", 20_000.0, 0.0, 1.0, -20.0)],
            years: 6,
            tax_rate: 26.0,
            tax_free_allowance: 0.0,
            monthly_savings: 10.0,
            high_yield_assumption: 3.5,
            scenario: GrowthScenario::Optimistic,
        };
        let sim = CompoundingSimulator::new(config).unwrap();
        // growth factor -20 * (0.5 + 1 + 1) / 3, ceiling (100 + 50/3) * 120
        assert_relative_eq!(sim.contribution_ceiling(), 14_000.0, epsilon = 1e-9);

        let report = sim.run();
        assert_eq!(report.snowball_year, Some(0));
        assert_eq!(report.timeline.iter().filter(|r| r.snowball_reached).count(), 1);
        assert!(report.timeline[0].snowball_reached);
        assert_eq!(report.timeline[1].contribution, 0.0);
        assert!(report.timeline[2].contribution > 0.0);
        assert!(!report.timeline[2].snowball_reached);
    }

    #[test]
    fn restructuring_is_noop_for_all_yielding_portfolio() {
        let config = SimulationConfig {
            assets: vec![asset("A", 5000.0, 2.0, 0.5, 5.0), asset("B", 5000.0, 4.0, 0.5, 7.0)],
            ..two_asset_config()
        };
        let sim = CompoundingSimulator::new(config).unwrap();
        let mut state = sim.initial_state();
        for year in 0..3 {
            sim.step(&mut state, year);
        }
        let restructured = sim.restructure(&state);
        assert_eq!(restructured.positions, state.positions);
        assert_eq!(restructured.dividend_yields, state.dividend_yields);
        assert_eq!(restructured.summary.allocation, state.allocation);
        assert!(restructured.liquidated.is_empty());
        assert_eq!(restructured.capital_gains_tax, 0.0);
        assert_eq!(restructured.labels, vec!["A", "B"]);
    }

    #[test]
    fn restructuring_taxes_gain_over_cost_basis() {
        let sim = CompoundingSimulator::new(two_asset_config()).unwrap();
        let mut state = sim.initial_state();
        state.positions = vec![6000.0, 10_000.0];
        state.cost_basis = vec![6000.0, 6000.0];
        state.recompute();

        let restructured = sim.restructure(&state);
        // GROW basis 4000 + 2000, gain 4000, tax 1000
        assert_relative_eq!(restructured.capital_gains_tax, 1000.0);
        assert_eq!(restructured.labels, vec!["DIV".to_string(), HIGH_YIELD_BUCKET.to_string()]);
        assert_relative_eq!(restructured.positions[1], 9000.0);
        assert_relative_eq!(restructured.summary.total_value, 15_000.0);
        // (6000 * 4 + 9000 * 3.5) / 15000
        assert_relative_eq!(restructured.summary.blended_yield, 3.7);
        assert_relative_eq!(restructured.summary.projected_income, 555.0, epsilon = 1e-9);
    }

    #[test]
    fn restructuring_does_not_tax_losses() {
        let sim = CompoundingSimulator::new(two_asset_config()).unwrap();
        let mut state = sim.initial_state();
        state.positions = vec![6000.0, 3000.0];
        state.recompute();
        let restructured = sim.restructure(&state);
        assert_eq!(restructured.capital_gains_tax, 0.0);
        assert_relative_eq!(restructured.positions[1], 3000.0);
    }

    #[test]
    fn run_produces_one_record_per_year() {
        let sim = CompoundingSimulator::new(two_asset_config()).unwrap();
        let report = sim.run();
        assert_eq!(report.timeline.len(), 10);
        assert_eq!(report.timeline.last().unwrap().year, 9);
        assert_relative_eq!(report.final_summary.total_value, report.timeline[9].total_value);
        assert_eq!(report.restructured.liquidated, vec!["GROW".to_string()]);
    }

    #[test]
    fn example_portfolio_reaches_snowball() {
        let sim = CompoundingSimulator::new(SimulationConfig::example()).unwrap();
        let report = sim.run();
        assert!(report.snowball_year.is_some());
        assert!(report.final_summary.total_value > report.initial.total_value);
        let allocation_sum: f64 = report.restructured.summary.allocation.iter().sum();
        assert_relative_eq!(allocation_sum, 1.0, epsilon = 1e-9);
    }
}
