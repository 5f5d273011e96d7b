//! Plain-text reports for the terminal.
//!
//! Labels are padded to a fixed column so values line up across blocks.

use crate::domain::policy::{Decision, PrimaryMessage, SecondaryMessage};
use crate::domain::profile::StrategyProfile;
use crate::domain::simulation::SimulationReport;
use crate::domain::snapshot::{SignalSnapshot, VolatilitySnapshot};
use crate::domain::threshold::ThresholdConfig;
use crate::domain::window::WindowRole;
use std::fmt::Write as _;

const LABEL_WIDTH: usize = 34;
const SEPARATOR_WIDTH: usize = LABEL_WIDTH + 1 + 10;

fn row(out: &mut String, label: &str, value: f64) {
    let _ = writeln!(out, "{:<width$} {:>10.4}", label, value, width = LABEL_WIDTH);
}

fn separator(out: &mut String) {
    let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
}

/// Render the primary advice with the profile's product wording.
pub fn primary_text(message: &PrimaryMessage, profile: &StrategyProfile) -> String {
    let w = &profile.wording;
    match message {
        PrimaryMessage::VolatilityExit { instrument } if instrument.is_benchmark() => format!(
            "WARNING: High volatility and {} below SMA200. Sell the {} completely!",
            instrument.label, w.product
        ),
        PrimaryMessage::VolatilityExit { instrument } => format!(
            "WARNING: High volatility and {} below SMA200. Reduce exposure to {}!",
            instrument.label, w.exposure
        ),
        PrimaryMessage::VolatilityDerisk { .. } => format!(
            "WARNING: High volatility detected. Stop saving plan! Reduce exposure to {}!",
            w.exposure
        ),
        PrimaryMessage::TrendExit { instrument } => format!(
            "WARNING: {} is below SMA200. Market trend is too bearish. Sell the {} completely!",
            instrument.label, w.product
        ),
        PrimaryMessage::MajorReallocation { instrument } => format!(
            "WARNING: {} is below SMA150. Market trend is very bearish. Move 50% or at least Gains into {}!",
            instrument.label, w.major_alternative
        ),
        PrimaryMessage::PartialReallocation { instrument } => format!(
            "WARNING: {} is below SMAq. Market trend is bearish. Move 25% or at least 50% Gains into {}!",
            instrument.label, w.partial_alternative
        ),
        PrimaryMessage::HaltContributions { instrument, window } => format!(
            "WARNING: {} is below SMA{}. Market trend is slightly bearish. Stop saving plan!",
            instrument.label, window
        ),
        PrimaryMessage::BelowWindows {
            instrument,
            windows,
        } => {
            let names: Vec<String> = windows.iter().map(|w| format!("SMA{}", w)).collect();
            format!(
                "Attention: {} is below SMA for [{}] Consider reducing {} position!",
                instrument.label,
                names.join(", "),
                w.position_kind
            )
        }
        PrimaryMessage::Stable => {
            "Market conditions are stable. No immediate action needed.".to_string()
        }
    }
}

pub fn secondary_text(message: &SecondaryMessage, profile: &StrategyProfile) -> String {
    match message {
        SecondaryMessage::AddToPosition { instrument } => format!(
            "If previously below {} SMAq consider adding to your {} position!",
            instrument.label, profile.wording.position_kind
        ),
    }
}

pub fn format_signal_report(
    profile: &StrategyProfile,
    thresholds: &ThresholdConfig,
    gauge: Option<&VolatilitySnapshot>,
    instruments: &[SignalSnapshot],
    decision: &Decision,
) -> String {
    let mut out = String::new();

    if let Some(gauge) = gauge {
        row(&mut out, &format!("Latest {}:", gauge.label), gauge.latest);
        out.push('\n');
        for (window, value) in &gauge.p75 {
            row(
                &mut out,
                &format!("Latest {} M75 {} Diff:", gauge.label, window),
                thresholds.volatility_threshold * window.threshold_factor() - value,
            );
        }
        separator(&mut out);
    }

    for snapshot in instruments {
        let label = &snapshot.label;
        row(&mut out, &format!("Latest {} Price:", label), snapshot.latest_price);
        if let Some(reading) = snapshot.reading(WindowRole::Baseline) {
            row(&mut out, &format!("Latest {} SMA200:", label), reading.value);
        }
        out.push('\n');
        let diffs = [
            (WindowRole::Trend, format!("SMA{}", thresholds.trend_sma_period)),
            (WindowRole::Quarter, "SMA Quarter".to_string()),
            (WindowRole::ThreeQuarter, "SMA150".to_string()),
        ];
        for (role, name) in diffs {
            if let Some(diff) = snapshot.diff(role) {
                row(&mut out, &format!("Latest {} {} Diff:", label, name), diff);
            }
        }
        separator(&mut out);
    }

    out.push('\n');
    let _ = writeln!(out, "{}", primary_text(&decision.primary, profile));
    if let Some(secondary) = &decision.secondary {
        let _ = writeln!(out, "{}", secondary_text(secondary, profile));
    }
    out
}

pub fn format_profiles(profiles: &[StrategyProfile]) -> String {
    let mut out = String::new();
    for profile in profiles {
        let tracked: Vec<&str> = profile.tracked.iter().map(|i| i.symbol.as_str()).collect();
        let _ = writeln!(
            out,
            "{:<8} benchmark {:<8} gauge {:<6} tracked {:<10} threshold {}",
            profile.name,
            profile.benchmark.symbol,
            profile
                .risk_gauge
                .as_ref()
                .map(|g| g.symbol.as_str())
                .unwrap_or("-"),
            if tracked.is_empty() {
                "-".to_string()
            } else {
                tracked.join(",")
            },
            profile.default_threshold
        );
    }
    out
}

fn percent_list(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("{:.2}", v * 100.0)).collect();
    format!("[{}]", items.join(", "))
}

pub fn format_simulation_report(report: &SimulationReport) -> String {
    let mut out = String::new();
    let initial = &report.initial;

    let _ = writeln!(out, "Current Portfolio Value is {:.2}€", initial.total_value);
    let _ = writeln!(out, "Current Portfolio Yield is {:.2}%", initial.blended_yield);
    let _ = writeln!(
        out,
        "This Years' Expected Dividends are {:.2}€",
        initial.projected_income
    );
    let _ = writeln!(out, "Portfolio Allocations: {}", percent_list(&initial.allocation));
    out.push('\n');

    let _ = writeln!(
        out,
        "Defensive Portfolio growth estimation = {:.2}%",
        report.outlook.defensive_growth
    );
    let _ = writeln!(
        out,
        "Expect Portfolio to grow {:.2}% ({} scenario)",
        report.outlook.expected_growth, report.scenario
    );
    let _ = writeln!(
        out,
        "DRIP Allocations: {}",
        percent_list(&report.outlook.drip_allocation)
    );
    out.push('\n');

    match report.snowball_year {
        Some(year) => {
            let _ = writeln!(out, "Reached free rolling Snowball-Effect after {} years.", year);
        }
        None => {
            let _ = writeln!(out, "Snowball-Effect not reached within {} years.", report.years);
        }
    }
    out.push('\n');

    let last = &report.final_summary;
    let _ = writeln!(out, "After {} years:", report.years);
    let _ = writeln!(out, "Total Portfolio Value is {:.2}€", last.total_value);
    let _ = writeln!(out, "Portfolio Yield is {:.2}%", last.blended_yield);
    let _ = writeln!(out, "Expected Dividends are {:.2}€", last.projected_income);
    let _ = writeln!(out, "Portfolio Allocations: {}", percent_list(&last.allocation));
    out.push('\n');

    let restructured = &report.restructured;
    let _ = writeln!(
        out,
        "Retire and sell non-dividend positions for High Yield World ETF:"
    );
    if restructured.liquidated.is_empty() {
        let _ = writeln!(out, "No non-dividend positions to sell.");
    } else {
        let _ = writeln!(
            out,
            "Sold {} (capital gains tax {:.2}€)",
            restructured.liquidated.join(", "),
            restructured.capital_gains_tax
        );
    }
    let _ = writeln!(
        out,
        "Total Portfolio Value is {:.2}€",
        restructured.summary.total_value
    );
    let _ = writeln!(
        out,
        "Portfolio Yield is {:.2}%",
        restructured.summary.blended_yield
    );
    let _ = writeln!(
        out,
        "Expected Dividends are {:.2}€",
        restructured.summary.projected_income
    );
    let _ = writeln!(
        out,
        "Portfolio Allocations: {}",
        percent_list(&restructured.summary.allocation)
    );
    out
}
