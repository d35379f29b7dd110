pub mod applications;
pub mod auth;
pub mod candidate;
pub mod convert;
pub mod error;
pub mod jobs;
pub mod middleware;
pub mod public;
pub mod recruiter;
pub mod routes;
pub mod state;
pub mod validation;

pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::{AppState, AppStateInner, AuthConfig};
