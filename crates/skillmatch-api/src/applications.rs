use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use skillmatch_db::{ApplyOutcome, timestamp};
use skillmatch_types::api::{
    ApplyRequest, ApplyResponse, RecruiterApplication, StatusUpdateRequest,
};
use skillmatch_types::Role;

use crate::convert::recruiter_application;
use crate::error::{ApiError, ApiResult};
use crate::middleware::Session;
use crate::state::{AppState, with_db};
use crate::validation::parse_uuid_field;

/// POST /api/apply: one application per candidate and job.
pub async fn apply(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<ApplyRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    session.require(Role::Candidate)?;
    let Json(req) = payload.map_err(ApiError::unprocessable_body)?;
    let job_id = parse_uuid_field("jobId", &req.job_id).map_err(ApiError::Unprocessable)?;

    let application_id = Uuid::new_v4();
    let (aid, jid, cid) = (
        application_id.to_string(),
        job_id.to_string(),
        session.user_id.to_string(),
    );
    let created_at = timestamp(Utc::now());
    let outcome =
        with_db(&state, move |db| db.create_application(&aid, &jid, &cid, &created_at)).await?;

    match outcome {
        ApplyOutcome::Created => {
            info!("Candidate {} applied to job {}", session.user_id, job_id);
            Ok((StatusCode::CREATED, Json(ApplyResponse { id: application_id })))
        }
        ApplyOutcome::AlreadyApplied => Err(ApiError::conflict("Already applied")),
        ApplyOutcome::JobMissing => Err(ApiError::not_found("Job not found")),
    }
}

/// PATCH /api/applications/{id}/status
///
/// Only the recruiter owning the application's job may change it. Any status
/// value is stored; the workflow in
/// [`skillmatch_types::ApplicationStatus::next_statuses`] is enforced by the
/// dashboard, not here.
pub async fn update_status(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(application_id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> ApiResult<Json<RecruiterApplication>> {
    session.require(Role::Recruiter)?;
    let application_id: Uuid = application_id.parse().map_err(|_| application_not_found())?;

    // Ownership first: a non-owner gets 404 whatever the body says
    let (aid, rid) = (application_id.to_string(), session.user_id.to_string());
    with_db(&state, move |db| db.get_application_for_recruiter(&aid, &rid))
        .await?
        .ok_or_else(application_not_found)?;

    let Json(StatusUpdateRequest { status }) = payload.map_err(ApiError::bad_body)?;

    let (aid, rid) = (application_id.to_string(), session.user_id.to_string());
    let change = with_db(&state, move |db| db.update_application_status(&aid, &rid, status))
        .await?
        .ok_or_else(application_not_found)?;

    info!(
        "Application {} moved {} -> {} by {}",
        application_id, change.previous, status, session.user_id
    );
    Ok(Json(recruiter_application(change.application)))
}

fn application_not_found() -> ApiError {
    ApiError::not_found("Application not found or not authorized")
}
