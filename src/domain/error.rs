//! Domain error types.

/// Top-level error type for trendguard.
#[derive(Debug, thiserror::Error)]
pub enum TrendguardError {
    #[error("retrieval failed for {symbol}: {reason}")]
    Retrieval { symbol: String, reason: String },

    #[error("insufficient data for {symbol}: have {observations} observations, need {required}")]
    InsufficientData {
        symbol: String,
        observations: usize,
        required: usize,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown strategy profile: {name}")]
    UnknownProfile { name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TrendguardError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        TrendguardError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn retrieval(symbol: &str, reason: impl Into<String>) -> Self {
        TrendguardError::Retrieval {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&TrendguardError> for std::process::ExitCode {
    fn from(err: &TrendguardError) -> Self {
        let code: u8 = match err {
            TrendguardError::Io(_) => 1,
            TrendguardError::ConfigParse { .. }
            | TrendguardError::ConfigMissing { .. }
            | TrendguardError::ConfigInvalid { .. }
            | TrendguardError::UnknownProfile { .. } => 2,
            TrendguardError::Retrieval { .. } => 3,
            TrendguardError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
