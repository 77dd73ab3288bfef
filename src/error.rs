use thiserror::Error;

/// Crate-wide error type
///
/// Source adapters never surface this type to callers of
/// [`crate::DrugInfoAggregator::aggregate`]; their failures are folded into
/// [`crate::SourceResult::Failure`]. `Error` covers everything around the
/// core: configuration, input validation, client construction, output.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (permanent failures)
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Client errors (permanent - caller must fix the input)
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`]
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
