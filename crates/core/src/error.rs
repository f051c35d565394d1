//! Error types for Stepscribe

use thiserror::Error;

use crate::test_case::TestStatus;

/// Result type alias using Stepscribe Error
pub type Result<T> = std::result::Result<T, Error>;

/// Stepscribe error types
///
/// Unrecognized steps and unresolved locators are not errors: they degrade to
/// manual placeholders and generic selectors. Only protocol misuse and
/// configuration problems surface here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid state transition: {operation} is not allowed from {from}")]
    InvalidTransition {
        operation: &'static str,
        from: TestStatus,
    },

    #[error("Locator must contain at least one candidate selector")]
    EmptyLocator,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_transition(operation: &'static str, from: TestStatus) -> Self {
        Error::InvalidTransition { operation, from }
    }
}
