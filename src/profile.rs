//! Canonical profile record produced by normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical profile record with a fixed schema.
///
/// Every field is present in the serialized form, with `null` standing in
/// for data the source payload did not expose. Consumers may rely on key
/// presence rather than probing for optional keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Handle the profile was resolved from.
    pub username: Option<String>,
    /// Numeric account id, kept as a string since sources disagree on type.
    pub id: Option<String>,
    /// Display name.
    pub full_name: Option<String>,
    /// Biography text.
    pub biography: Option<String>,
    /// External link from the profile header.
    pub external_url: Option<String>,
    pub is_private: Option<bool>,
    pub is_verified: Option<bool>,
    pub is_business: Option<bool>,
    /// Avatar URL, highest resolution the source offers.
    pub profile_pic_url: Option<String>,
    pub total_posts: Option<u64>,
    pub total_followers: Option<u64>,
    pub total_following: Option<u64>,
    /// Business contact fields, populated only when the source exposes them.
    pub business_email: Option<String>,
    pub public_email: Option<String>,
    pub contact_phone: Option<String>,
    /// Structured business address, decoded from the source's embedded JSON.
    pub business_address: Option<Value>,
}

impl Profile {
    /// Text fields worth scanning for literal contact identifiers.
    pub fn contact_sources(&self) -> impl Iterator<Item = &str> {
        [
            self.biography.as_deref(),
            self.external_url.as_deref(),
            self.full_name.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_emits_every_key() {
        let profile = Profile::default();
        let value = serde_json::to_value(&profile).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "username",
            "id",
            "full_name",
            "biography",
            "external_url",
            "is_private",
            "is_verified",
            "is_business",
            "profile_pic_url",
            "total_posts",
            "total_followers",
            "total_following",
            "business_email",
            "public_email",
            "contact_phone",
            "business_address",
        ] {
            assert!(object.contains_key(key), "missing key: {}", key);
            assert!(object[key].is_null());
        }
        assert_eq!(object.len(), 16);
    }

    #[test]
    fn test_contact_sources_skips_absent_fields() {
        let profile = Profile {
            biography: Some("reach me at work".to_string()),
            ..Default::default()
        };
        let sources: Vec<&str> = profile.contact_sources().collect();
        assert_eq!(sources, vec!["reach me at work"]);
    }
}
