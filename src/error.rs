use thiserror::Error;

/// Errors raised while recording or reading thought history
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Tool disabled by configuration: {0}")]
    ToolDisabled(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convert ValidationError to LedgerError
impl From<crate::validation::ValidationError> for LedgerError {
    fn from(err: crate::validation::ValidationError) -> Self {
        LedgerError::Validation {
            field: err.field().to_string(),
            reason: err.to_string(),
        }
    }
}

impl LedgerError {
    /// Message placed in the `error` field of a failed tool payload.
    /// Validation failures carry only the field-level reason.
    pub fn describe(&self) -> String {
        match self {
            LedgerError::Validation { reason, .. } => reason.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, LedgerError>;
