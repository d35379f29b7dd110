use axum::{Extension, Json, extract::State};

use skillmatch_types::Role;
use skillmatch_types::api::{ApplicationStats, RecruiterApplication, RecruiterApplicationsResponse};

use crate::convert::recruiter_application;
use crate::error::ApiResult;
use crate::middleware::Session;
use crate::state::{AppState, with_db};

/// GET /api/recruiter/applications: applications across all of the caller's jobs.
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<RecruiterApplicationsResponse>> {
    session.require(Role::Recruiter)?;

    let rid = session.user_id.to_string();
    let rows = with_db(&state, move |db| db.list_applications_for_recruiter(&rid)).await?;

    let applications: Vec<RecruiterApplication> = rows.into_iter().map(recruiter_application).collect();
    let stats = ApplicationStats::tally(applications.iter().map(|app| app.status));

    Ok(Json(RecruiterApplicationsResponse {
        applications,
        stats,
    }))
}
