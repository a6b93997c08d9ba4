//! Contact-candidate inference over canonical records.
//!
//! Literal extraction finds email-shaped strings already present in profile
//! text; synthesis derives plausible addresses from the handle and display
//! name. Synthesized candidates are guesses, never validated contact data.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::profile::Profile;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email pattern")
});

static NON_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid name-stripping pattern"));

/// Public providers used for candidate synthesis.
pub const PROVIDER_DOMAINS: [&str; 5] = [
    "gmail.com",
    "yahoo.com",
    "outlook.com",
    "hotmail.com",
    "icloud.com",
];

/// Role accounts suggested for a registrable domain.
const ROLE_ACCOUNTS: [&str; 5] = ["admin", "info", "contact", "support", "abuse"];

/// Email candidates derived from one canonical record.
///
/// Ordered sets keep repeated inference bit-identical. `found` holds
/// literal matches from profile text; `potential` holds synthesized
/// guesses and is populated even when literals exist, since callers decide
/// which to trust.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandidateEmails {
    pub found: BTreeSet<String>,
    pub potential: BTreeSet<String>,
}

/// Infer contact candidates from a canonical record.
pub fn infer(profile: &Profile) -> CandidateEmails {
    let mut found = BTreeSet::new();
    for source in profile.contact_sources() {
        for capture in EMAIL_RE.find_iter(source) {
            found.insert(capture.as_str().to_string());
        }
    }

    CandidateEmails {
        found,
        potential: synthesize(
            profile.username.as_deref(),
            profile.full_name.as_deref(),
        ),
    }
}

/// Candidate addresses from the handle and a parsed display name, against
/// the fixed provider list.
fn synthesize(username: Option<&str>, full_name: Option<&str>) -> BTreeSet<String> {
    let mut candidates = BTreeSet::new();
    let Some(username) = username.filter(|name| !name.is_empty()) else {
        return candidates;
    };

    for domain in PROVIDER_DOMAINS {
        candidates.insert(format!("{username}@{domain}"));
    }

    if let Some((first, last)) = name_parts(full_name) {
        // Char-based initials; display names are not guaranteed ASCII.
        let first_initial: String = first.chars().take(1).collect();
        let last_initial: String = last.chars().take(1).collect();
        for domain in PROVIDER_DOMAINS {
            candidates.insert(format!("{first}.{last}@{domain}"));
            candidates.insert(format!("{first}{last}@{domain}"));
            candidates.insert(format!("{first_initial}{last}@{domain}"));
            candidates.insert(format!("{first}{last_initial}@{domain}"));
        }
    }

    candidates
}

/// Split a display name into lowercased first/last tokens, stripping
/// punctuation. Single-token names yield nothing to permute.
fn name_parts(full_name: Option<&str>) -> Option<(String, String)> {
    let cleaned = NON_NAME_RE.replace_all(full_name?, "");
    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }
    Some((
        parts[0].to_lowercase(),
        parts[parts.len() - 1].to_lowercase(),
    ))
}

/// Role-account candidates for a registrable domain, e.g. one recovered
/// from a reverse-DNS hostname. Pure synthesis; nothing is verified.
pub fn domain_contacts(domain: &str, handle: Option<&str>) -> Vec<String> {
    let mut candidates: Vec<String> = ROLE_ACCOUNTS
        .iter()
        .map(|account| format!("{account}@{domain}"))
        .collect();
    if let Some(handle) = handle.filter(|h| !h.is_empty()) {
        let address = format!("{handle}@{domain}");
        if !candidates.contains(&address) {
            candidates.push(address);
        }
    }
    candidates
}
