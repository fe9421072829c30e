//! Domain error types.

use super::universe::TickerListError;

/// Top-level error type for quantrebal.
#[derive(Debug, thiserror::Error)]
pub enum QuantrebalError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("broker error: {reason}")]
    Broker { reason: String },

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

    #[error(transparent)]
    TickerList(#[from] TickerListError),

    #[error("empty candidate universe")]
    EmptyUniverse,

    #[error("factor count mismatch: {factors} factors but {directions} directions")]
    FactorCountMismatch { factors: usize, directions: usize },

    #[error("no candidates available for selection")]
    EmptySelection,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&QuantrebalError> for std::process::ExitCode {
    fn from(err: &QuantrebalError) -> Self {
        let code: u8 = match err {
            QuantrebalError::Io(_) => 1,
            QuantrebalError::ConfigParse { .. }
            | QuantrebalError::ConfigMissing { .. }
            | QuantrebalError::ConfigInvalid { .. }
            | QuantrebalError::TickerList(_) => 2,
            QuantrebalError::Data { .. } | QuantrebalError::Broker { .. } => 3,
            QuantrebalError::EmptyUniverse
            | QuantrebalError::FactorCountMismatch { .. }
            | QuantrebalError::EmptySelection => 5,
        };
        std::process::ExitCode::from(code)
    }
}
