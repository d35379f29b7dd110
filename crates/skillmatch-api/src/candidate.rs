use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;
use uuid::Uuid;

use skillmatch_db::timestamp;
use skillmatch_types::Role;
use skillmatch_types::api::{
    ApplicationStats, CandidateApplication, CandidateApplicationsResponse, CandidateJobsResponse,
    CandidateStats, SavedJobRequest, SavedJobsResponse,
};

use crate::convert::{candidate_application, candidate_job, parse_id};
use crate::error::{ApiError, ApiResult};
use crate::middleware::Session;
use crate::state::{AppState, with_db};
use crate::validation::parse_uuid_field;

/// GET /api/candidate/jobs: the whole board, newest first.
pub async fn list_jobs(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<CandidateJobsResponse>> {
    session.require(Role::Candidate)?;

    let rows = with_db(&state, |db| db.list_jobs(None)).await?;
    Ok(Json(CandidateJobsResponse {
        jobs: rows.into_iter().map(candidate_job).collect(),
    }))
}

/// GET /api/candidate/applications
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<CandidateApplicationsResponse>> {
    session.require(Role::Candidate)?;

    let cid = session.user_id.to_string();
    let (rows, saved) = with_db(&state, move |db| {
        let rows = db.list_applications_for_candidate(&cid)?;
        let saved = db.list_saved_job_ids(&cid)?;
        Ok((rows, saved))
    })
    .await?;

    let applications: Vec<CandidateApplication> =
        rows.into_iter().map(candidate_application).collect();
    let stats = CandidateStats {
        applications: ApplicationStats::tally(applications.iter().map(|app| app.status)),
        saved_jobs: saved.len() as i64,
    };

    Ok(Json(CandidateApplicationsResponse {
        applications,
        stats,
    }))
}

/// GET /api/candidate/saved-jobs
pub async fn list_saved_jobs(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<SavedJobsResponse>> {
    session.require(Role::Candidate)?;

    let cid = session.user_id.to_string();
    let ids = with_db(&state, move |db| db.list_saved_job_ids(&cid)).await?;
    Ok(Json(SavedJobsResponse {
        job_ids: ids.iter().map(|id| parse_id(id, "saved job_id", id)).collect(),
    }))
}

/// POST /api/candidate/saved-jobs
pub async fn save_job(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<SavedJobRequest>, JsonRejection>,
) -> ApiResult<Json<SavedJobsResponse>> {
    session.require(Role::Candidate)?;
    let job_id = saved_job_id(payload)?;

    let (cid, jid) = (session.user_id.to_string(), job_id.to_string());
    let created_at = timestamp(Utc::now());
    let found = with_db(&state, move |db| db.save_job(&cid, &jid, &created_at)).await?;
    if !found {
        return Err(ApiError::not_found("Job not found"));
    }

    list_saved_jobs(State(state), Extension(session)).await
}

/// DELETE /api/candidate/saved-jobs
pub async fn unsave_job(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<SavedJobRequest>, JsonRejection>,
) -> ApiResult<Json<SavedJobsResponse>> {
    session.require(Role::Candidate)?;
    let job_id = saved_job_id(payload)?;

    let (cid, jid) = (session.user_id.to_string(), job_id.to_string());
    with_db(&state, move |db| db.unsave_job(&cid, &jid)).await?;

    list_saved_jobs(State(state), Extension(session)).await
}

fn saved_job_id(payload: Result<Json<SavedJobRequest>, JsonRejection>) -> ApiResult<Uuid> {
    let Json(req) = payload.map_err(ApiError::unprocessable_body)?;
    parse_uuid_field("jobId", &req.job_id).map_err(ApiError::Unprocessable)
}
