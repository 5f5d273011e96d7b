//! Decision policy.
//!
//! A strictly ordered rule cascade. The same rule list is applied to each
//! instrument in evaluation order (benchmark first); the first rule that
//! matches any instrument decides the primary message.
//!
//! # Rule order
//!
//! 1. high volatility and below SMA200 -> exit entirely
//! 2. high volatility -> halt contributions, de-risk
//! 3. below SMA200 -> exit entirely
//! 4. below SMA150 -> reallocate a majority of gains
//! 5. below SMA quarter -> reallocate a partial share
//! 6. below trend SMA -> halt contributions
//! 7. below any SMA -> name the breached windows
//!
//! The secondary re-entry suggestion is evaluated independently of the primary.

use crate::domain::snapshot::{SignalSnapshot, VolatilitySnapshot};
use crate::domain::threshold::ThresholdConfig;
use crate::domain::window::WindowRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Stable,
    Info,
    Low,
    Moderate,
    High,
    Severe,
}

/// Instrument a message refers to: position in evaluation order plus label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentRef {
    pub index: usize,
    pub label: String,
}

impl InstrumentRef {
    pub fn is_benchmark(&self) -> bool {
        self.index == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryMessage {
    VolatilityExit { instrument: InstrumentRef },
    VolatilityDerisk { instrument: InstrumentRef },
    TrendExit { instrument: InstrumentRef },
    MajorReallocation { instrument: InstrumentRef },
    PartialReallocation { instrument: InstrumentRef },
    HaltContributions { instrument: InstrumentRef, window: usize },
    BelowWindows { instrument: InstrumentRef, windows: Vec<usize> },
    Stable,
}

impl PrimaryMessage {
    pub fn severity(&self) -> Severity {
        match self {
            PrimaryMessage::VolatilityExit { .. } | PrimaryMessage::TrendExit { .. } => {
                Severity::Severe
            }
            PrimaryMessage::MajorReallocation { .. } => Severity::High,
            PrimaryMessage::VolatilityDerisk { .. } | PrimaryMessage::PartialReallocation { .. } => {
                Severity::Moderate
            }
            PrimaryMessage::HaltContributions { .. } => Severity::Low,
            PrimaryMessage::BelowWindows { .. } => Severity::Info,
            PrimaryMessage::Stable => Severity::Stable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecondaryMessage {
    AddToPosition { instrument: InstrumentRef },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub primary: PrimaryMessage,
    pub secondary: Option<SecondaryMessage>,
    pub high_volatility: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    VolatilityAndBaseline,
    Volatility,
    Baseline,
    ThreeQuarter,
    Quarter,
    Trend,
    AnyWindow,
}

const RULES: [Rule; 7] = [
    Rule::VolatilityAndBaseline,
    Rule::Volatility,
    Rule::Baseline,
    Rule::ThreeQuarter,
    Rule::Quarter,
    Rule::Trend,
    Rule::AnyWindow,
];

impl Rule {
    fn apply(
        self,
        snapshot: &SignalSnapshot,
        instrument: InstrumentRef,
        high_volatility: bool,
    ) -> Option<PrimaryMessage> {
        match self {
            Rule::VolatilityAndBaseline => (high_volatility
                && snapshot.below(WindowRole::Baseline))
            .then_some(PrimaryMessage::VolatilityExit { instrument }),
            Rule::Volatility => {
                high_volatility.then_some(PrimaryMessage::VolatilityDerisk { instrument })
            }
            Rule::Baseline => snapshot
                .below(WindowRole::Baseline)
                .then_some(PrimaryMessage::TrendExit { instrument }),
            Rule::ThreeQuarter => snapshot
                .below(WindowRole::ThreeQuarter)
                .then_some(PrimaryMessage::MajorReallocation { instrument }),
            Rule::Quarter => snapshot
                .below(WindowRole::Quarter)
                .then_some(PrimaryMessage::PartialReallocation { instrument }),
            Rule::Trend => snapshot.reading(WindowRole::Trend).and_then(|r| {
                snapshot
                    .below(WindowRole::Trend)
                    .then_some(PrimaryMessage::HaltContributions {
                        instrument,
                        window: r.window,
                    })
            }),
            Rule::AnyWindow => {
                let windows = snapshot.breached_windows();
                (!windows.is_empty()).then_some(PrimaryMessage::BelowWindows { instrument, windows })
            }
        }
    }
}

/// Whether the risk gauge signals high volatility. Always false without a gauge.
pub fn high_volatility(thresholds: &ThresholdConfig, gauge: Option<&VolatilitySnapshot>) -> bool {
    gauge.is_some_and(|g| g.is_high(thresholds.volatility_threshold))
}

/// Evaluate the cascade over `instruments` (benchmark first).
pub fn evaluate(
    thresholds: ThresholdConfig,
    instruments: &[SignalSnapshot],
    gauge: Option<&VolatilitySnapshot>,
) -> Decision {
    let high_volatility = high_volatility(&thresholds, gauge);

    let primary = instruments
        .iter()
        .enumerate()
        .find_map(|(index, snapshot)| {
            RULES.iter().find_map(|rule| {
                rule.apply(snapshot, instrument_ref(index, snapshot), high_volatility)
            })
        })
        .unwrap_or(PrimaryMessage::Stable);

    let secondary = if high_volatility {
        None
    } else {
        instruments
            .iter()
            .enumerate()
            .find(|(_, s)| s.above(WindowRole::Quarter) && s.below(WindowRole::Trend))
            .map(|(index, s)| SecondaryMessage::AddToPosition {
                instrument: instrument_ref(index, s),
            })
    };

    Decision {
        primary,
        secondary,
        high_volatility,
    }
}

fn instrument_ref(index: usize, snapshot: &SignalSnapshot) -> InstrumentRef {
    InstrumentRef {
        index,
        label: snapshot.label.clone(),
    }
}
