//! Resilient profile retrieval from a rate-limiting, anti-scraping remote.
//!
//! The engine tries five independent retrieval surfaces in order of
//! decreasing reliability, retrying blocked requests on a fixed backoff
//! schedule with a fresh client identity per resend, then normalizes
//! whichever payload shape arrives into one canonical record and infers
//! contact candidates from its text fields.
//!
//! ```no_run
//! use igscout::{retrieve_profile, Settings};
//!
//! # async fn run() {
//! match retrieve_profile("somehandle", Settings::default()).await {
//!     Ok(report) => println!("{:?}", report.profile.full_name),
//!     Err(error) => eprintln!("{error}"),
//! }
//! # }
//! ```

pub mod client;
pub mod config;
pub mod contact;
pub mod error;
pub mod identity;
pub mod normalize;
pub mod profile;
pub mod strategies;

pub use client::{RequestExecutor, RequestSpec, Sleep, TokioSleep, Transport};
pub use config::Settings;
pub use contact::{domain_contacts, infer, CandidateEmails};
pub use error::{FetchError, LookupError, StrategyError, StrategyFailure};
pub use identity::{ClientIdentity, IdentityRotator};
pub use normalize::normalize;
pub use profile::Profile;
pub use strategies::{
    retrieve_profile, AttemptOutcome, ProfileLookup, ProfileReport, ProfileStrategy,
    StrategyAttempt,
};
