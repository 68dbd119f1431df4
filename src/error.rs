//! Error taxonomy for the trip planner.

use thiserror::Error as ThisError;

/// Failure of a single geocoding lookup, as seen at the provider boundary.
#[derive(Debug, ThisError)]
pub enum ProviderError {
    /// Network, timeout, or HTTP-level failure. Retryable.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Provider signalled a rate limit or exhausted quota. Retryable.
    #[error("rate limited by provider")]
    RateLimited,
    /// Provider answered definitively with no match for the name.
    #[error("no results")]
    NoResults,
    /// Provider rejected the request (malformed query, denied key, ...).
    #[error("provider rejected request: {0}")]
    Rejected(String),
}

impl ProviderError {
    /// Whether a retry has any chance of succeeding.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::RateLimited)
    }
}

#[derive(Debug, ThisError)]
pub enum Error {
    /// The request itself is unusable; nothing was looked up.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A name could not be resolved; the whole route computation aborts.
    #[error("could not geocode {name:?}")]
    Geocode {
        name: String,
        #[source]
        cause: ProviderError,
    },
    /// Missing credential or invalid settings. Fatal at construction time.
    #[error("configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn geocode(name: impl Into<String>, cause: ProviderError) -> Self {
        Self::Geocode { name: name.into(), cause }
    }
}
