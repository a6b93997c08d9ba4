//! End-to-end cascade behavior against a canned transport.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use igscout::client::{HttpResponse, PreparedRequest, TransportError};
use igscout::{
    AttemptOutcome, IdentityRotator, LookupError, ProfileLookup, RequestExecutor, Settings, Sleep,
    Transport,
};

/// Transport answering from a routing closure and logging every request.
struct MockTransport {
    responder: Box<dyn Fn(&PreparedRequest) -> HttpResponse + Send + Sync>,
    requests: Mutex<Vec<PreparedRequest>>,
}

impl MockTransport {
    fn new(responder: impl Fn(&PreparedRequest) -> HttpResponse + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok((self.responder)(request))
    }
}

struct NoSleep;

#[async_trait]
impl Sleep for NoSleep {
    async fn sleep(&self, _duration: Duration) {}
}

fn lookup_with(transport: Arc<MockTransport>) -> ProfileLookup {
    let executor = RequestExecutor::with_parts(
        transport,
        Arc::new(NoSleep),
        IdentityRotator::with_seed(3, Vec::new()),
        Settings::without_jitter(),
    );
    ProfileLookup::with_executor(executor)
}

fn status(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        body: body.to_string(),
    }
}

fn is_direct_endpoint(request: &PreparedRequest) -> bool {
    request.query.iter().any(|(name, _)| name == "__a")
}

fn api_payload() -> String {
    json!({
        "graphql": {
            "user": {
                "username": "seafarer",
                "id": "4821",
                "full_name": "Sea Farer",
                "biography": "charts and tides",
                "edge_owner_to_timeline_media": {"count": 12},
                "edge_followed_by": {"count": 340},
                "edge_follow": {"count": 77},
                "is_private": false,
                "is_verified": true
            }
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_first_strategy_success_short_circuits() {
    let transport = Arc::new(MockTransport::new(|request| {
        if is_direct_endpoint(request) {
            status(200, &api_payload())
        } else {
            // Any other surface being reached is a short-circuit violation;
            // answer with data that would also normalize.
            status(200, &api_payload())
        }
    }));
    let mut lookup = lookup_with(transport.clone());

    let profile = lookup.retrieve("seafarer").await.unwrap();
    assert_eq!(profile.username.as_deref(), Some("seafarer"));
    assert_eq!(profile.total_posts, Some(12));
    assert_eq!(profile.total_followers, Some(340));

    // Exactly one request; variants b-e never invoked, zero retries.
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert!(is_direct_endpoint(&requests[0]));

    let attempts = lookup.attempts();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].strategy, "api-endpoint");
    assert_eq!(attempts[0].retries, 0);
    assert_eq!(attempts[0].outcome, AttemptOutcome::Success);
}

#[tokio::test]
async fn test_rate_limited_first_strategy_falls_back_to_html() {
    let document_payload = concat!(
        r#"<html><body><script>window.__additionalDataLoaded('user', "#,
        r#"{"user":{"username":"seafarer","pk":4821,"media_count":12}});</script></body></html>"#
    );

    let transport = Arc::new(MockTransport::new(move |request| {
        if is_direct_endpoint(request) {
            status(429, "")
        } else {
            status(200, document_payload)
        }
    }));
    let mut lookup = lookup_with(transport.clone());

    let profile = lookup.retrieve("seafarer").await.unwrap();
    assert_eq!(profile.username.as_deref(), Some("seafarer"));
    assert_eq!(profile.id.as_deref(), Some("4821"));
    assert_eq!(profile.total_posts, Some(12));

    // Four direct-endpoint sends (initial + 3 retries), then one document.
    let requests = transport.requests();
    assert_eq!(requests.len(), 5);
    assert!(requests[..4].iter().all(is_direct_endpoint));
    assert!(!is_direct_endpoint(&requests[4]));

    let attempts = lookup.attempts();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].strategy, "api-endpoint");
    assert_eq!(attempts[0].retries, 3);
    assert_eq!(attempts[0].outcome, AttemptOutcome::TransientError);
    assert_eq!(attempts[1].strategy, "html-document");
    assert_eq!(attempts[1].retries, 0);
    assert_eq!(attempts[1].outcome, AttemptOutcome::Success);
}

#[tokio::test]
async fn test_every_strategy_not_found() {
    let transport = Arc::new(MockTransport::new(|_| status(404, "")));
    let mut lookup = lookup_with(transport.clone());

    let error = lookup.retrieve("nobody-here").await.unwrap_err();
    let LookupError::Exhausted { failures } = error else {
        panic!("expected exhaustion");
    };

    assert_eq!(failures.len(), 5);
    for failure in &failures {
        assert_eq!(failure.error.to_string(), "User not found");
    }

    // Not-found is fatal per strategy: one request each, no retries.
    assert_eq!(transport.requests().len(), 5);
    assert!(lookup
        .attempts()
        .iter()
        .all(|attempt| attempt.outcome == AttemptOutcome::PermanentError));
}

#[tokio::test]
async fn test_unparseable_payload_falls_through_to_next_strategy() {
    let transport = Arc::new(MockTransport::new(|request| {
        if is_direct_endpoint(request) {
            status(200, "<!doctype html><html>login wall</html>")
        } else if request.url.ends_with("/web_profile_info/") {
            status(
                200,
                &json!({"data": {"user": {"username": "seafarer", "follower_count": 9}}})
                    .to_string(),
            )
        } else {
            status(200, "<html>no embedded data</html>")
        }
    }));
    let mut lookup = lookup_with(transport.clone());

    let profile = lookup.retrieve("seafarer").await.unwrap();
    assert_eq!(profile.total_followers, Some(9));

    // api (bad json), html (no patterns), graphql (no id) all failed.
    let attempts = lookup.attempts();
    assert_eq!(attempts.len(), 4);
    assert_eq!(attempts[3].strategy, "mobile-api");
    assert_eq!(attempts[3].outcome, AttemptOutcome::Success);
}

#[tokio::test]
async fn test_graphql_recovers_via_scraped_id() {
    let transport = Arc::new(MockTransport::new(|request| {
        if is_direct_endpoint(request) {
            status(403, "")
        } else if request.url.contains("/graphql/query/") {
            let hash = request
                .query
                .iter()
                .find(|(name, _)| name == "query_hash")
                .map(|(_, value)| value.clone())
                .unwrap_or_default();
            // Only the second rotating token still works.
            if hash == "c9100bf9110dd6361671f113dd02e7d6" {
                status(
                    200,
                    &json!({"data": {"user": {"username": "seafarer", "follower_count": 2}}})
                        .to_string(),
                )
            } else {
                status(200, "{}")
            }
        } else {
            // Document with an id marker but no full embedded payload.
            status(
                200,
                r#"<html>"ProfilePage":[{"logging_page_id":"profilePage_4821"</html>"#,
            )
        }
    }));
    let mut lookup = lookup_with(transport.clone());

    let profile = lookup.retrieve("seafarer").await.unwrap();
    assert_eq!(profile.username.as_deref(), Some("seafarer"));

    let attempts = lookup.attempts();
    assert_eq!(attempts[2].strategy, "graphql");
    assert_eq!(attempts[2].outcome, AttemptOutcome::Success);
}

#[tokio::test]
async fn test_invalid_handle_fails_before_any_request() {
    let transport = Arc::new(MockTransport::new(|_| status(200, "{}")));
    let mut lookup = lookup_with(transport.clone());

    let error = lookup.retrieve("not a handle").await.unwrap_err();
    assert!(matches!(error, LookupError::InvalidHandle(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_report_includes_contact_candidates() {
    let transport = Arc::new(MockTransport::new(|_| {
        status(
            200,
            &json!({
                "graphql": {
                    "user": {
                        "username": "seafarer",
                        "full_name": "Sea Farer",
                        "biography": "bookings: crew@harbor.example"
                    }
                }
            })
            .to_string(),
        )
    }));
    let mut lookup = lookup_with(transport);

    let report = lookup.retrieve_report("seafarer").await.unwrap();
    assert!(report.emails.found.contains("crew@harbor.example"));
    assert!(report.emails.potential.contains("seafarer@gmail.com"));
    assert!(report.emails.potential.contains("sea.farer@outlook.com"));
}
