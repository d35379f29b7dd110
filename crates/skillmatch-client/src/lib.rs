//! Typed HTTP client for the SkillMatch API and the in-memory stores a
//! dashboard renders from.

pub mod api;
pub mod error;
pub mod filters;
pub mod store;

pub use api::ApiClient;
pub use error::{ClientError, ClientResult};
pub use store::{ApplicationsStore, CandidateStore, RecruiterJobsStore};
