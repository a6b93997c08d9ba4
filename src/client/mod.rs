//! Request execution with identity rotation and bounded retries.
//!
//! One [`RequestExecutor`] issues a single logical HTTP exchange at a time,
//! classifying block signals and retrying on an escalating schedule with a
//! fresh client identity per resend. Transport and sleeping sit behind
//! traits so the retry bound and backoff schedule are testable without a
//! network or a clock.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::FetchError;
use crate::identity::{ClientIdentity, IdentityRotator};

mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;

/// Retry budget after the initial attempt.
pub const MAX_RETRIES: u32 = 3;

/// Escalating backoff schedule, indexed by retry number. Deliberately a
/// fixed table rather than an exponential curve.
pub const RETRY_SCHEDULE: [Duration; 3] = [
    Duration::from_secs(2),
    Duration::from_secs(5),
    Duration::from_secs(10),
];

/// Status codes treated as rate-limiting or blocking. 201 is a vendor
/// quirk observed as a block signal, not a success.
const BLOCK_STATUSES: [u16; 4] = [429, 403, 401, 201];

/// A request to be issued, before identity and proxy are attached.
#[derive(Debug, Clone, Default)]
pub struct RequestSpec {
    pub url: String,
    /// Header set for this request, excluding `User-Agent`.
    pub headers: Vec<(String, String)>,
    /// Query parameters appended to the URL.
    pub query: Vec<(String, String)>,
    /// Pinned signature for the first attempt (e.g. a mobile client
    /// string). Retries always rotate to a fresh one.
    pub user_agent: Option<String>,
}

/// A fully prepared request handed to the transport.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub proxy: Option<String>,
}

/// Raw response surfaced to strategies.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Transport-level failure (timeout, connection reset, proxy error).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// One HTTP exchange. Implemented by the real reqwest client and by test
/// doubles serving canned responses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &PreparedRequest) -> Result<HttpResponse, TransportError>;
}

/// Suspension point used for jitter and backoff waits.
#[async_trait]
pub trait Sleep: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real sleeper backed by the tokio timer.
pub struct TokioSleep;

#[async_trait]
impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

enum StatusClass {
    Success,
    Blocked,
    NotFound,
    Fatal,
}

fn classify(status: u16) -> StatusClass {
    if status == 200 {
        StatusClass::Success
    } else if BLOCK_STATUSES.contains(&status) {
        StatusClass::Blocked
    } else if status == 404 {
        StatusClass::NotFound
    } else {
        StatusClass::Fatal
    }
}

/// Issues requests with retry, backoff, and identity rotation.
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    sleep: Arc<dyn Sleep>,
    rotator: IdentityRotator,
    settings: Settings,
    total_retries: u32,
    total_requests: u32,
}

impl RequestExecutor {
    /// Create an executor backed by a real HTTP client.
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(settings.timeout())?;
        let rotator = IdentityRotator::new(settings.proxies.clone());
        Ok(Self::with_parts(
            Arc::new(transport),
            Arc::new(TokioSleep),
            rotator,
            settings,
        ))
    }

    /// Assemble an executor from explicit parts. Tests inject a canned
    /// transport and a recording sleeper here.
    pub fn with_parts(
        transport: Arc<dyn Transport>,
        sleep: Arc<dyn Sleep>,
        rotator: IdentityRotator,
        settings: Settings,
    ) -> Self {
        Self {
            transport,
            sleep,
            rotator,
            settings,
            total_retries: 0,
            total_requests: 0,
        }
    }

    /// Retries consumed since construction, across all calls. The cascade
    /// snapshots this to attribute retries to individual strategies.
    pub fn total_retries(&self) -> u32 {
        self.total_retries
    }

    /// HTTP requests sent since construction, including retries.
    pub fn total_requests(&self) -> u32 {
        self.total_requests
    }

    /// Execute one logical exchange.
    ///
    /// Block signals and transport failures are retried up to
    /// [`MAX_RETRIES`] times on the [`RETRY_SCHEDULE`], rotating identity
    /// before each resend. A 404 or any other unexpected status
    /// short-circuits immediately without touching the retry budget.
    pub async fn execute(&mut self, spec: &RequestSpec) -> Result<HttpResponse, FetchError> {
        let mut attempt: u32 = 0;

        loop {
            let identity = self.identity_for(spec, attempt);
            self.jitter().await;

            let prepared = PreparedRequest {
                url: spec.url.clone(),
                headers: headers_with_agent(&spec.headers, &identity),
                query: spec.query.clone(),
                proxy: identity.proxy.clone(),
            };

            self.total_requests += 1;
            match self.transport.send(&prepared).await {
                Err(error) => {
                    if attempt >= MAX_RETRIES {
                        return Err(FetchError::Transport {
                            message: error.to_string(),
                            attempts: attempt + 1,
                        });
                    }
                    warn!("request to {} failed ({}), retrying", spec.url, error);
                    self.backoff(attempt).await;
                    attempt += 1;
                }
                Ok(response) => match classify(response.status) {
                    StatusClass::Success => return Ok(response),
                    StatusClass::NotFound => return Err(FetchError::NotFound),
                    StatusClass::Fatal => return Err(FetchError::Status(response.status)),
                    StatusClass::Blocked => {
                        if attempt >= MAX_RETRIES {
                            return Err(FetchError::Blocked {
                                status: response.status,
                                attempts: attempt + 1,
                            });
                        }
                        debug!(
                            "HTTP {} from {}, rotating identity and retrying",
                            response.status, spec.url
                        );
                        self.backoff(attempt).await;
                        attempt += 1;
                    }
                },
            }
        }
    }

    /// First attempt honors a strategy-pinned signature; every retry
    /// rotates to a fresh one so a just-blocked identity is not reused.
    fn identity_for(&mut self, spec: &RequestSpec, attempt: u32) -> ClientIdentity {
        match (&spec.user_agent, attempt) {
            (Some(pinned), 0) => ClientIdentity {
                user_agent: pinned.clone(),
                proxy: self.rotator.next_proxy(),
            },
            _ => self.rotator.next_identity(),
        }
    }

    /// Randomized pre-request delay, breaking up the request cadence.
    async fn jitter(&self) {
        let (min, max) = (self.settings.jitter_min_ms, self.settings.jitter_max_ms);
        if max == 0 || min > max {
            return;
        }
        let wait = Duration::from_millis(rand::rng().random_range(min..=max));
        self.sleep.sleep(wait).await;
    }

    async fn backoff(&mut self, attempt: u32) {
        let index = (attempt as usize).min(RETRY_SCHEDULE.len() - 1);
        let wait = RETRY_SCHEDULE[index];
        debug!("backing off {:?} before retry {}", wait, attempt + 1);
        self.total_retries += 1;
        self.sleep.sleep(wait).await;
    }
}

fn headers_with_agent(
    headers: &[(String, String)],
    identity: &ClientIdentity,
) -> Vec<(String, String)> {
    let mut all = Vec::with_capacity(headers.len() + 1);
    all.push(("User-Agent".to_string(), identity.user_agent.clone()));
    all.extend(headers.iter().cloned());
    all
}
