//! Runtime settings for the retrieval engine.

use std::time::Duration;

/// Engine settings.
///
/// One value per retrieval call; concurrent lookups should each construct
/// their own so no rotation or retry state is shared.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Lower bound of the randomized pre-request delay in milliseconds.
    pub jitter_min_ms: u64,
    /// Upper bound of the randomized pre-request delay in milliseconds.
    pub jitter_max_ms: u64,
    /// Proxy endpoints rotated across attempts. Empty means direct.
    pub proxies: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_timeout: 15,
            jitter_min_ms: 1_000,
            jitter_max_ms: 3_000,
            proxies: Vec::new(),
        }
    }
}

impl Settings {
    /// Create settings with a proxy rotation list.
    pub fn with_proxies(proxies: Vec<String>) -> Self {
        Self {
            proxies,
            ..Default::default()
        }
    }

    /// Settings with the pre-request delay disabled. Used by tests so the
    /// only observable sleeps are backoff waits.
    pub fn without_jitter() -> Self {
        Self {
            jitter_min_ms: 0,
            jitter_max_ms: 0,
            ..Default::default()
        }
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}
