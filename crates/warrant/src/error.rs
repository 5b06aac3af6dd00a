//! Warrant model error types.

use thiserror::Error;

/// Warrant model errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A warrant or reference is missing a required field.
    #[error("invalid warrant: {0}")]
    Invalid(String),

    /// Failed to parse the textual form of a reference or warrant.
    #[error("failed to parse '{input}': {reason}")]
    Parse { input: String, reason: String },
}

impl Error {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
