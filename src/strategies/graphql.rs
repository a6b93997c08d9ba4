//! Secondary query surface keyed by numeric id.
//!
//! The numeric id is not addressable directly; it is recovered by scanning
//! the profile document for id-bearing patterns, then used to query the
//! GraphQL-style endpoint with a set of rotating query tokens. Tokens age
//! out server-side, so each is tried in order until one yields data.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use tracing::debug;

use super::{headers, ProfileStrategy};
use crate::client::{RequestExecutor, RequestSpec};
use crate::error::StrategyError;

const QUERY_URL: &str = "https://www.instagram.com/graphql/query/";

/// Known query tokens, tried in order. These rotate server-side.
const QUERY_HASHES: [&str; 5] = [
    "d4d88dc1500312af6f937f7b804c68c3",
    "c9100bf9110dd6361671f113dd02e7d6",
    "7c16654f22c819fb63d1183034a5162f",
    "69cba1cc2991d4223954a05ddf2f7e32",
    "bfa387b2992c3a52dcbe447467b4b771",
];

/// Id-bearing patterns in the profile document, in scan order.
static USER_ID_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r#""profilePage_([0-9]+)""#).expect("valid pattern"),
        Regex::new(r#""user":\{"id":"([0-9]+)""#).expect("valid pattern"),
        Regex::new(r#""owner":\{"id":"([0-9]+)""#).expect("valid pattern"),
        Regex::new(r#"instagram://user\?username=.*?&id=([0-9]+)"#).expect("valid pattern"),
    ]
});

/// GraphQL-style query keyed by a scraped numeric id.
pub struct GraphQl;

#[async_trait]
impl ProfileStrategy for GraphQl {
    fn name(&self) -> &'static str {
        "graphql"
    }

    async fn attempt(
        &self,
        handle: &str,
        executor: &mut RequestExecutor,
    ) -> Result<Value, StrategyError> {
        let document_spec = RequestSpec {
            url: format!("https://www.instagram.com/{handle}/"),
            headers: headers::document_minimal(),
            query: Vec::new(),
            user_agent: None,
        };
        let document = executor.execute(&document_spec).await?;

        let user_id = scan_user_id(&document.body).ok_or(StrategyError::NoUserId)?;
        debug!("resolved numeric id {} for {}", user_id, handle);

        let referer = format!("https://www.instagram.com/{handle}/");
        for query_hash in QUERY_HASHES {
            let spec = RequestSpec {
                url: QUERY_URL.to_string(),
                headers: headers::graphql(&referer),
                query: vec![
                    ("query_hash".to_string(), query_hash.to_string()),
                    ("variables".to_string(), variables(&user_id)),
                ],
                user_agent: None,
            };

            let response = match executor.execute(&spec).await {
                Ok(response) => response,
                Err(error) => {
                    debug!("query token {} failed: {}", query_hash, error);
                    continue;
                }
            };

            match serde_json::from_str::<Value>(&response.body) {
                Ok(payload) if payload.pointer("/data/user").map(Value::is_object) == Some(true) => {
                    return Ok(json!({ "data": payload["data"] }));
                }
                _ => {
                    debug!("query token {} yielded no user data", query_hash);
                }
            }
        }

        Err(StrategyError::TokensExhausted)
    }
}

/// Scan document text for the numeric profile id.
pub(crate) fn scan_user_id(html: &str) -> Option<String> {
    USER_ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(html)
            .map(|captures| captures[1].to_string())
    })
}

/// Fixed inclusion flags expected by the query surface.
fn variables(user_id: &str) -> String {
    json!({
        "user_id": user_id,
        "include_reel": true,
        "include_chaining": true,
        "include_suggested_users": false,
        "include_logged_out_extras": false,
        "include_highlight_reels": true,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_profile_page_marker() {
        let html = r#"<script>"profilePage_4821"</script>"#;
        assert_eq!(scan_user_id(html).as_deref(), Some("4821"));
    }

    #[test]
    fn test_scan_user_id_object() {
        let html = r#"{"user":{"id":"991"}}"#;
        assert_eq!(scan_user_id(html).as_deref(), Some("991"));
    }

    #[test]
    fn test_scan_owner_id_object() {
        let html = r#"{"owner":{"id":"772"}}"#;
        assert_eq!(scan_user_id(html).as_deref(), Some("772"));
    }

    #[test]
    fn test_scan_deep_link() {
        let html = r#"href="instagram://user?username=seafarer&id=5150""#;
        assert_eq!(scan_user_id(html).as_deref(), Some("5150"));
    }

    #[test]
    fn test_scan_order_prefers_profile_page_marker() {
        let html = r#""profilePage_1" ... {"user":{"id":"2"}}"#;
        assert_eq!(scan_user_id(html).as_deref(), Some("1"));
    }

    #[test]
    fn test_scan_nothing() {
        assert_eq!(scan_user_id("<html>empty</html>"), None);
    }

    #[test]
    fn test_variables_blob_shape() {
        let parsed: Value = serde_json::from_str(&variables("42")).unwrap();
        assert_eq!(parsed["user_id"], "42");
        assert_eq!(parsed["include_reel"], true);
        assert_eq!(parsed["include_suggested_users"], false);
        assert_eq!(parsed.as_object().unwrap().len(), 6);
    }
}
