use thiserror::Error;

/// Code the edge evaluator returns while its relationship snapshot is not
/// yet synchronized.
pub const CACHE_NOT_READY: &str = "cache_not_ready";

/// Client errors.
///
/// A negative access decision is not an error; it is `Ok(false)`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The edge evaluator has not synchronized yet. Retried once against the
    /// central service when raised by an edge check.
    #[error("edge authorizer cache not ready: {message}")]
    CacheNotReady { message: String },

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with an error response.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Invalid(#[from] warrant::Error),
}

impl Error {
    pub fn is_cache_not_ready(&self) -> bool {
        matches!(self, Self::CacheNotReady { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
