//! Retrieval strategy cascade.
//!
//! Five strategies target distinct protocol surfaces of the same remote
//! service, ordered by decreasing reliability: the direct data endpoint
//! first, pattern-matching against unstable markup later. The cascade
//! stops at the first structurally valid payload and aggregates every
//! failure otherwise.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::RequestExecutor;
use crate::config::Settings;
use crate::contact::{self, CandidateEmails};
use crate::error::{LookupError, StrategyError, StrategyFailure};
use crate::normalize::normalize;
use crate::profile::Profile;

mod api;
mod graphql;
pub(crate) mod headers;
mod html;
mod mobile;
mod web;

pub use api::ApiEndpoint;
pub use graphql::GraphQl;
pub use html::HtmlDocument;
pub use mobile::MobileApi;
pub use web::WebApi;

/// One independent method of reaching the profile data.
#[async_trait]
pub trait ProfileStrategy: Send + Sync {
    /// Stable name used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// Fetch a raw payload for the handle. Errors are values; the cascade
    /// decides whether to continue.
    async fn attempt(
        &self,
        handle: &str,
        executor: &mut RequestExecutor,
    ) -> Result<Value, StrategyError>;
}

/// Outcome of one strategy invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    /// Retryable-class failure (rate limited, transport) that exhausted
    /// its budget.
    TransientError,
    /// Definitive failure for this strategy (not found, unparseable).
    PermanentError,
}

/// Record of one strategy invocation, kept for diagnosis.
#[derive(Debug, Clone)]
pub struct StrategyAttempt {
    pub strategy: &'static str,
    /// Retries consumed across every request the strategy issued.
    pub retries: u32,
    pub outcome: AttemptOutcome,
}

/// Canonical record plus the inferred contact candidates.
#[derive(Debug, Clone)]
pub struct ProfileReport {
    pub profile: Profile,
    pub emails: CandidateEmails,
}

/// The strategy cascade with its executor and attempt log.
///
/// Owns all mutable retrieval state; concurrent lookups must construct
/// independent instances.
pub struct ProfileLookup {
    executor: RequestExecutor,
    strategies: Vec<Box<dyn ProfileStrategy>>,
    attempts: Vec<StrategyAttempt>,
}

impl ProfileLookup {
    /// Cascade over the default strategy order with a real HTTP client.
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        Ok(Self::with_executor(RequestExecutor::new(settings)?))
    }

    /// Cascade over the default strategy order with a caller-supplied
    /// executor. Tests inject a canned transport this way.
    pub fn with_executor(executor: RequestExecutor) -> Self {
        Self {
            executor,
            strategies: default_strategies(),
            attempts: Vec::new(),
        }
    }

    /// Attempt log of the most recent [`retrieve`](Self::retrieve) call.
    pub fn attempts(&self) -> &[StrategyAttempt] {
        &self.attempts
    }

    /// Resolve a handle into a canonical record.
    ///
    /// Strategies run strictly in order; the first structurally valid
    /// payload wins and later strategies are never invoked. Only when
    /// every strategy fails does this return the aggregated error.
    pub async fn retrieve(&mut self, handle: &str) -> Result<Profile, LookupError> {
        validate_handle(handle)?;
        self.attempts.clear();
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            info!("trying strategy: {}", strategy.name());
            let retries_before = self.executor.total_retries();

            let result = strategy
                .attempt(handle, &mut self.executor)
                .await
                .and_then(|payload| normalize(&payload));
            let retries = self.executor.total_retries() - retries_before;

            match result {
                Ok(profile) => {
                    info!("strategy {} succeeded", strategy.name());
                    self.attempts.push(StrategyAttempt {
                        strategy: strategy.name(),
                        retries,
                        outcome: AttemptOutcome::Success,
                    });
                    return Ok(profile);
                }
                Err(error) => {
                    warn!("strategy {} failed: {}", strategy.name(), error);
                    if matches!(
                        error,
                        StrategyError::Fetch(crate::error::FetchError::NotFound)
                    ) {
                        // A definitive not-found from one surface makes the
                        // remaining attempts unlikely to differ, but every
                        // surface still gets its turn.
                        debug!("continuing cascade past a definitive not-found");
                    }
                    self.attempts.push(StrategyAttempt {
                        strategy: strategy.name(),
                        retries,
                        outcome: if error.is_transient() {
                            AttemptOutcome::TransientError
                        } else {
                            AttemptOutcome::PermanentError
                        },
                    });
                    failures.push(StrategyFailure {
                        strategy: strategy.name(),
                        error,
                    });
                }
            }
        }

        Err(LookupError::Exhausted { failures })
    }

    /// Resolve a handle and augment the record with contact candidates.
    pub async fn retrieve_report(&mut self, handle: &str) -> Result<ProfileReport, LookupError> {
        let profile = self.retrieve(handle).await?;
        let emails = contact::infer(&profile);
        Ok(ProfileReport { profile, emails })
    }
}

/// The fixed execution order: cheapest and most direct surface first, the
/// markup-dependent ones later.
fn default_strategies() -> Vec<Box<dyn ProfileStrategy>> {
    vec![
        Box::new(ApiEndpoint),
        Box::new(HtmlDocument),
        Box::new(GraphQl),
        Box::new(MobileApi),
        Box::new(WebApi),
    ]
}

/// One-shot convenience around [`ProfileLookup`].
pub async fn retrieve_profile(
    handle: &str,
    settings: Settings,
) -> Result<ProfileReport, LookupError> {
    // Plain client construction does not fail
    let mut lookup = ProfileLookup::new(settings).expect("direct-mode client construction");
    lookup.retrieve_report(handle).await
}

/// Handles are caller-owned opaque identifiers: non-empty, ASCII
/// alphanumeric plus `.`, `_`, and `-`.
fn validate_handle(handle: &str) -> Result<(), LookupError> {
    if handle.is_empty() {
        return Err(LookupError::InvalidHandle("handle is empty".to_string()));
    }
    if !handle
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(LookupError::InvalidHandle(format!(
            "handle contains unsupported characters: {handle:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_validation() {
        assert!(validate_handle("sea.farer_01").is_ok());
        assert!(validate_handle("plain").is_ok());
        assert!(matches!(
            validate_handle(""),
            Err(LookupError::InvalidHandle(_))
        ));
        assert!(matches!(
            validate_handle("has space"),
            Err(LookupError::InvalidHandle(_))
        ));
        assert!(matches!(
            validate_handle("@leading"),
            Err(LookupError::InvalidHandle(_))
        ));
    }

    #[test]
    fn test_default_order() {
        let names: Vec<&str> = default_strategies()
            .iter()
            .map(|strategy| strategy.name())
            .collect();
        assert_eq!(
            names,
            vec![
                "api-endpoint",
                "html-document",
                "graphql",
                "mobile-api",
                "web-api"
            ]
        );
    }
}
