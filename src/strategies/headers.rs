//! Header sets for the retrieval surfaces.
//!
//! Three flavors: full desktop document headers, XHR-style JSON headers,
//! and the mobile client set. `User-Agent` is attached by the executor so
//! identity rotation stays in one place.

/// Application id expected by the JSON surfaces.
pub const APP_ID: &str = "936619743392459";

/// Secondary anti-abuse id sent by the web API surface.
pub const ASBD_ID: &str = "129477";

/// Mobile client signature pinned by the mobile API surface.
pub const MOBILE_AGENT: &str = "Instagram 219.0.0.12.117 Android";

const BASE_REFERER: &str = "https://www.instagram.com/";

fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Full browser document navigation headers.
pub fn document() -> Vec<(String, String)> {
    pairs(&[
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
        ("Accept-Language", "en-US,en;q=0.9"),
        ("Accept-Encoding", "gzip, deflate, br"),
        ("Connection", "keep-alive"),
        ("Referer", BASE_REFERER),
        ("DNT", "1"),
        ("Upgrade-Insecure-Requests", "1"),
        ("Sec-Fetch-Dest", "document"),
        ("Sec-Fetch-Mode", "navigate"),
        ("Sec-Fetch-Site", "same-origin"),
        ("Sec-Fetch-User", "?1"),
    ])
}

/// Reduced document headers used when only the raw markup is needed.
pub fn document_minimal() -> Vec<(String, String)> {
    pairs(&[
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
        ("Accept-Language", "en-US,en;q=0.9"),
    ])
}

/// XHR headers for the JSON surfaces.
pub fn json(referer: &str) -> Vec<(String, String)> {
    let mut headers = pairs(&[
        ("Accept", "application/json"),
        ("Accept-Language", "en-US,en;q=0.9"),
        ("Accept-Encoding", "gzip, deflate, br"),
        ("Connection", "keep-alive"),
        ("X-IG-App-ID", APP_ID),
        ("X-Requested-With", "XMLHttpRequest"),
        ("DNT", "1"),
        ("Sec-Fetch-Dest", "empty"),
        ("Sec-Fetch-Mode", "cors"),
        ("Sec-Fetch-Site", "same-origin"),
    ]);
    headers.push(("Referer".to_string(), referer.to_string()));
    headers
}

/// Header set for the GraphQL-style query surface.
pub fn graphql(referer: &str) -> Vec<(String, String)> {
    let mut headers = pairs(&[
        ("Accept", "*/*"),
        ("Accept-Language", "en-US,en;q=0.9"),
        ("X-IG-App-ID", APP_ID),
        ("X-Requested-With", "XMLHttpRequest"),
    ]);
    headers.push(("Referer".to_string(), referer.to_string()));
    headers
}

/// Mobile client headers, minus the pinned agent string.
pub fn mobile() -> Vec<(String, String)> {
    pairs(&[
        ("Accept", "application/json"),
        ("Accept-Language", "en-US"),
        ("Accept-Encoding", "gzip, deflate, br"),
        ("X-IG-App-ID", APP_ID),
        ("X-IG-WWW-Claim", "0"),
        ("Origin", "https://www.instagram.com"),
        ("Connection", "keep-alive"),
        ("Referer", BASE_REFERER),
    ])
}

/// Desktop XHR headers for the web API surface.
pub fn web_api() -> Vec<(String, String)> {
    pairs(&[
        ("Accept", "application/json"),
        ("Accept-Language", "en-US,en;q=0.9"),
        ("X-IG-App-ID", APP_ID),
        ("X-ASBD-ID", ASBD_ID),
        ("X-IG-WWW-Claim", "0"),
        ("X-Requested-With", "XMLHttpRequest"),
        ("Referer", BASE_REFERER),
        ("Sec-Fetch-Dest", "empty"),
        ("Sec-Fetch-Mode", "cors"),
        ("Sec-Fetch-Site", "same-origin"),
    ])
}
