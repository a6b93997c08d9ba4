//! Normalization of heterogeneous strategy payloads into the canonical
//! profile record.
//!
//! Each retrieval surface nests the user object differently and names
//! fields in its own dialect. The normalizer locates the user sub-structure
//! by trying a fixed list of candidate paths, then fills each canonical
//! field from an ordered fallback chain of source keys, first present wins.

use serde_json::Value;
use tracing::debug;

use crate::error::StrategyError;
use crate::profile::Profile;

/// Candidate JSON-pointer paths to the user object, in priority order.
const USER_PATHS: [&str; 5] = [
    "/graphql/user",
    "/user",
    "/data/user",
    "/users/0/user",
    "/users/0",
];

/// One source for a count-valued canonical field.
enum CountSource {
    /// Nested `{"count": n}` object under the named key.
    Edge(&'static str),
    /// Flat integer under the named key.
    Flat(&'static str),
}

use CountSource::{Edge, Flat};

const POST_SOURCES: [CountSource; 3] = [
    Edge("edge_owner_to_timeline_media"),
    Flat("media_count"),
    Flat("post_count"),
];

const FOLLOWER_SOURCES: [CountSource; 3] = [
    Edge("edge_followed_by"),
    Flat("follower_count"),
    Flat("followers"),
];

const FOLLOWING_SOURCES: [CountSource; 3] = [
    Edge("edge_follow"),
    Flat("following_count"),
    Flat("following"),
];

/// Map a raw strategy payload into the canonical record.
///
/// Fails with [`StrategyError::MissingUser`] when no candidate path holds a
/// user object; that is a structural failure of the payload, distinct from
/// the remote reporting the handle as nonexistent.
pub fn normalize(payload: &Value) -> Result<Profile, StrategyError> {
    let user = locate_user(payload).ok_or(StrategyError::MissingUser)?;

    Ok(Profile {
        username: first_string(user, &["username"]),
        id: first_id(user, &["id", "pk", "user_id"]),
        full_name: first_string(user, &["full_name"]),
        biography: first_string(user, &["biography", "bio"]),
        external_url: first_string(user, &["external_url", "url"]),
        is_private: first_bool(user, &["is_private"]),
        is_verified: first_bool(user, &["is_verified"]),
        is_business: first_bool(user, &["is_business_account", "is_business"]),
        profile_pic_url: first_string(user, &["profile_pic_url_hd", "profile_pic_url"]),
        total_posts: first_count(user, &POST_SOURCES),
        total_followers: first_count(user, &FOLLOWER_SOURCES),
        total_following: first_count(user, &FOLLOWING_SOURCES),
        business_email: first_string(user, &["business_email"]),
        public_email: first_string(user, &["public_email"]),
        contact_phone: first_string(user, &["contact_phone_number"]),
        business_address: business_address(user),
    })
}

fn locate_user(payload: &Value) -> Option<&Value> {
    USER_PATHS.iter().find_map(|path| {
        let candidate = payload.pointer(path)?;
        if candidate.is_object() {
            debug!("user object located at {}", path);
            Some(candidate)
        } else {
            None
        }
    })
}

/// First non-empty string across the fallback chain.
fn first_string(user: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        user.get(key)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    })
}

/// First id-like value: sources disagree on whether ids are strings or
/// integers, so both are accepted and canonicalized to a string.
fn first_id(user: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match user.get(key) {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn first_bool(user: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter()
        .find_map(|key| user.get(key).and_then(Value::as_bool))
}

/// First present count across edge-shaped and flat sources.
fn first_count(user: &Value, sources: &[CountSource]) -> Option<u64> {
    sources.iter().find_map(|source| match source {
        Edge(key) => user.get(key)?.get("count")?.as_u64(),
        Flat(key) => user.get(key)?.as_u64(),
    })
}

/// Business address arrives as a JSON string inside the payload. Malformed
/// or non-object content is dropped rather than surfaced as an error.
fn business_address(user: &Value) -> Option<Value> {
    let raw = user.get("business_address_json")?.as_str()?;
    let decoded: Value = serde_json::from_str(raw).ok()?;
    decoded.is_object().then_some(decoded)
}
