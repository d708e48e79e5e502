//! Error types for the investigation engine

use marlowe_validator::ValidatorError;
use thiserror::Error;

/// Internal engine errors
///
/// `investigate_claim` never returns these; a fault during an investigation
/// is converted into a FAILED investigation record instead.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Audit trail could not be written or read
    #[error("Audit error: {0}")]
    Audit(String),

    /// Evidence pool could not be updated
    #[error("Evidence pool error: {0}")]
    Pool(String),

    /// Any other internal fault
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidatorError> for EngineError {
    fn from(e: ValidatorError) -> Self {
        EngineError::Config(e.to_string())
    }
}
