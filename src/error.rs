//! Error types for the retrieval engine.
//!
//! Every per-strategy failure is carried as a value; the cascade aggregates
//! them into a [`LookupError`] instead of propagating the first one.

use thiserror::Error;

/// Failure of a single HTTP exchange, after the retry budget where applicable.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (timeout, connection reset) that survived
    /// every retry.
    #[error("request failed after {attempts} attempts: {message}")]
    Transport { message: String, attempts: u32 },

    /// Rate-limiting or blocking status that survived every retry.
    #[error("HTTP {status}: remote is rate limiting or blocking requests after {attempts} attempts")]
    Blocked { status: u16, attempts: u32 },

    /// Definitive 404 for the requested resource. Never retried.
    #[error("User not found")]
    NotFound,

    /// Any other unexpected status. Never retried.
    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

impl FetchError {
    /// Whether this failure came from the retryable class (budget exhausted)
    /// rather than a definitive answer from the remote.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Transport { .. } | FetchError::Blocked { .. }
        )
    }
}

/// Failure of one retrieval strategy.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Response arrived but could not be decoded.
    #[error("could not parse response: {0}")]
    Parse(String),

    /// Payload decoded but no user sub-structure was present at any
    /// candidate path.
    #[error("could not find user info in response")]
    MissingUser,

    /// Document contained none of the known embedded-data patterns.
    #[error("could not extract profile data from document")]
    NoEmbeddedData,

    /// Document exposed a numeric user id but no profile payload.
    #[error("only the numeric user id was found, not full profile data")]
    IdOnly,

    /// No id-bearing pattern matched the profile document.
    #[error("could not find user id for the secondary query")]
    NoUserId,

    /// Every rotating query token was tried without yielding profile data.
    #[error("no rotating query token yielded profile data")]
    TokensExhausted,
}

impl StrategyError {
    /// Transient errors could plausibly succeed on a later run; permanent
    /// ones are definitive for this strategy.
    pub fn is_transient(&self) -> bool {
        match self {
            StrategyError::Fetch(fetch) => fetch.is_transient(),
            _ => false,
        }
    }
}

/// One entry in the aggregated failure report.
#[derive(Debug)]
pub struct StrategyFailure {
    /// Strategy that produced the error.
    pub strategy: &'static str,
    pub error: StrategyError,
}

impl std::fmt::Display for StrategyFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.strategy, self.error)
    }
}

/// Terminal failure of a whole retrieval call.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The handle failed validation before any request was issued.
    #[error("invalid handle: {0}")]
    InvalidHandle(String),

    /// Every strategy failed; details carry one entry per strategy.
    #[error("all strategies failed to retrieve profile data")]
    Exhausted { failures: Vec<StrategyFailure> },
}

impl LookupError {
    /// Per-strategy failure details, empty for validation errors.
    pub fn failures(&self) -> &[StrategyFailure] {
        match self {
            LookupError::InvalidHandle(_) => &[],
            LookupError::Exhausted { failures } => failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(FetchError::Blocked {
            status: 429,
            attempts: 4
        }
        .is_transient());
        assert!(FetchError::Transport {
            message: "timeout".to_string(),
            attempts: 4
        }
        .is_transient());
        assert!(!FetchError::NotFound.is_transient());
        assert!(!FetchError::Status(500).is_transient());

        assert!(StrategyError::Fetch(FetchError::Blocked {
            status: 403,
            attempts: 4
        })
        .is_transient());
        assert!(!StrategyError::MissingUser.is_transient());
    }

    #[test]
    fn test_failure_display_includes_strategy_name() {
        let failure = StrategyFailure {
            strategy: "api-endpoint",
            error: StrategyError::Fetch(FetchError::NotFound),
        };
        assert_eq!(failure.to_string(), "api-endpoint: User not found");
    }
}
