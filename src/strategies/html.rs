//! Embedded structured data inside the rendered profile document.
//!
//! The document has carried its profile payload under several embeddings
//! over time. Each candidate pattern is tried in fixed priority order; the
//! first that yields a user object wins.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::{json, Value};
use tracing::debug;

use super::{headers, ProfileStrategy};
use crate::client::{RequestExecutor, RequestSpec};
use crate::error::StrategyError;

static SHARED_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)window\._sharedData\s*=\s*(\{.*?\});</script>").expect("valid pattern")
});

static ADDITIONAL_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)window\.__additionalDataLoaded\s*\(\s*['"]user['"]\s*,\s*(\{.*?\})\);</script>"#)
        .expect("valid pattern")
});

static PROFILE_PAGE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""ProfilePage":\[\{"logging_page_id":"profilePage_([0-9]+)""#)
        .expect("valid pattern")
});

static JSON_SCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/json"]"#).expect("valid selector")
});

/// Scrape of the profile page markup for embedded JSON.
pub struct HtmlDocument;

#[async_trait]
impl ProfileStrategy for HtmlDocument {
    fn name(&self) -> &'static str {
        "html-document"
    }

    async fn attempt(
        &self,
        handle: &str,
        executor: &mut RequestExecutor,
    ) -> Result<Value, StrategyError> {
        let spec = RequestSpec {
            url: format!("https://www.instagram.com/{handle}/"),
            headers: headers::document(),
            query: Vec::new(),
            user_agent: None,
        };

        let response = executor.execute(&spec).await?;
        extract_embedded(&response.body)
    }
}

/// Try each embedding pattern in priority order.
pub(crate) fn extract_embedded(html: &str) -> Result<Value, StrategyError> {
    if let Some(captures) = SHARED_DATA_RE.captures(html) {
        debug!("matched shared-data embedding");
        if let Some(payload) = route_embedded(parse_fragment(&captures[1])) {
            return payload;
        }
    }

    if let Some(captures) = ADDITIONAL_DATA_RE.captures(html) {
        debug!("matched additional-data embedding");
        if let Some(payload) = route_embedded(parse_fragment(&captures[1])) {
            return payload;
        }
    }

    if let Some(payload) = hypernova_payload(html) {
        debug!("matched hypernova embedding");
        if let Some(payload) = route_embedded(Some(payload)) {
            return payload;
        }
    }

    if PROFILE_PAGE_ID_RE.is_match(html) {
        // The id marker proves the profile exists but carries no payload.
        debug!("matched profile-page id marker only");
        return Err(StrategyError::IdOnly);
    }

    Err(StrategyError::NoEmbeddedData)
}

fn parse_fragment(fragment: &str) -> Option<Value> {
    serde_json::from_str(fragment).ok()
}

/// JSON script tags from the server-rendered shell. The payload is wrapped
/// in an HTML comment inside the tag.
fn hypernova_payload(html: &str) -> Option<Value> {
    let document = Html::parse_document(html);
    for element in document.select(&JSON_SCRIPT_SELECTOR) {
        if element.value().attr("data-hypernova-id").is_none() {
            continue;
        }
        let text: String = element.text().collect();
        let trimmed = text
            .trim()
            .trim_start_matches("<!--")
            .trim_end_matches("-->")
            .trim();
        if let Some(value) = parse_fragment(trimmed) {
            return Some(value);
        }
    }
    None
}

/// Navigate a decoded embedding to the profile payload, normalizer-shaped.
/// `None` means this embedding carried no recognizable user branch and the
/// next pattern should be tried.
fn route_embedded(data: Option<Value>) -> Option<Result<Value, StrategyError>> {
    let data = data?;

    if let Some(user) = data.pointer("/entry_data/ProfilePage/0/graphql/user") {
        if user.is_object() {
            return Some(Ok(json!({ "graphql": { "user": user } })));
        }
    }

    if data.get("user").map(Value::is_object).unwrap_or(false) {
        return Some(Ok(data));
    }

    None
}
