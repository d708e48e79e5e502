//! Validator error types

use thiserror::Error;

/// Errors that can occur while setting up the validator
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
