//! Client identity rotation.
//!
//! Supplies a randomized browser signature and the next proxy in the
//! rotation for each request attempt. A just-blocked signature is never
//! handed out twice in a row.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Realistic browser/OS signatures sampled per attempt.
const USER_AGENTS: [&str; 9] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (iPad; CPU OS 17_4_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36 Edg/123.0.0.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36 OPR/109.0.0.0",
];

/// Ephemeral client identity for one request attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientIdentity {
    pub user_agent: String,
    pub proxy: Option<String>,
}

/// Rotates browser signatures and proxies across request attempts.
///
/// State is local to one retrieval call; concurrent lookups must each own
/// their own rotator.
pub struct IdentityRotator {
    rng: StdRng,
    proxies: Vec<String>,
    proxy_index: usize,
    last_agent: Option<usize>,
}

impl IdentityRotator {
    /// Create a rotator seeded from the OS.
    pub fn new(proxies: Vec<String>) -> Self {
        Self::with_rng(StdRng::from_os_rng(), proxies)
    }

    /// Create a rotator with a fixed seed. Used by tests to pin the
    /// signature sequence.
    pub fn with_seed(seed: u64, proxies: Vec<String>) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), proxies)
    }

    fn with_rng(rng: StdRng, proxies: Vec<String>) -> Self {
        Self {
            rng,
            proxies,
            proxy_index: 0,
            last_agent: None,
        }
    }

    /// Next identity: a fresh signature paired with the next proxy in the
    /// rotation. Never repeats the previous signature when the pool allows.
    pub fn next_identity(&mut self) -> ClientIdentity {
        let mut index = self.rng.random_range(0..USER_AGENTS.len());
        while USER_AGENTS.len() > 1 && Some(index) == self.last_agent {
            index = self.rng.random_range(0..USER_AGENTS.len());
        }
        self.last_agent = Some(index);

        ClientIdentity {
            user_agent: USER_AGENTS[index].to_string(),
            proxy: self.next_proxy(),
        }
    }

    /// Next proxy in round-robin order, or `None` when no proxies are
    /// configured.
    pub fn next_proxy(&mut self) -> Option<String> {
        if self.proxies.is_empty() {
            return None;
        }
        let proxy = self.proxies[self.proxy_index % self.proxies.len()].clone();
        self.proxy_index = self.proxy_index.wrapping_add(1);
        Some(proxy)
    }
}
