use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::middleware::require_session;
use crate::state::AppState;
use crate::{applications, auth, candidate, jobs, public, recruiter};

/// All API routes. Transport layers (CORS, tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(public::health))
        .route("/api/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/public/jobs", get(public::list_jobs));

    // Authentication only; each handler checks the role it needs
    let protected_routes = Router::new()
        .route("/api/auth/session", get(auth::session))
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/api/jobs/{id}",
            get(jobs::get_job).put(jobs::update_job).delete(jobs::delete_job),
        )
        .route("/api/applications/{id}/status", patch(applications::update_status))
        .route("/api/apply", post(applications::apply))
        .route("/api/candidate/jobs", get(candidate::list_jobs))
        .route("/api/candidate/applications", get(candidate::list_applications))
        .route(
            "/api/candidate/saved-jobs",
            get(candidate::list_saved_jobs)
                .post(candidate::save_job)
                .delete(candidate::unsave_job),
        )
        .route("/api/recruiter/applications", get(recruiter::list_applications))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
