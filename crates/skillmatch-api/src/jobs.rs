//! Recruiter job management. Every lookup is scoped to the caller: a job
//! owned by someone else is reported exactly like a job that does not exist.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use skillmatch_db::models::JobFields;
use skillmatch_db::timestamp;
use skillmatch_types::Role;
use skillmatch_types::api::{
    JobDetailResponse, JobPayload, JobResponse, JobsStats, MessageResponse, RecruiterJobsResponse,
};

use crate::convert::{job_applicant, job_response};
use crate::error::{ApiError, ApiResult};
use crate::middleware::Session;
use crate::state::{AppState, with_db};
use crate::validation::validate_job;

/// Jobs younger than this count as recent in the dashboard stats.
const RECENT_WINDOW_DAYS: i64 = 7;

/// GET /api/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<RecruiterJobsResponse>> {
    session.require(Role::Recruiter)?;

    let rid = session.user_id.to_string();
    let rows = with_db(&state, move |db| db.list_jobs_for_recruiter(&rid)).await?;
    let jobs: Vec<JobResponse> = rows.into_iter().map(job_response).collect();
    let stats = jobs_stats(&jobs, Utc::now());

    Ok(Json(RecruiterJobsResponse { jobs, stats }))
}

/// POST /api/jobs
pub async fn create_job(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<JobPayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    session.require(Role::Recruiter)?;
    let Json(payload) = payload.map_err(ApiError::bad_body)?;
    validate_job(&payload).map_err(ApiError::Validation)?;

    let job_id = Uuid::new_v4();
    let (jid, rid) = (job_id.to_string(), session.user_id.to_string());
    let created_at = timestamp(Utc::now());
    let row = with_db(&state, move |db| {
        db.create_job(&jid, &rid, &job_fields(&payload), &created_at)?;
        db.get_job_for_recruiter(&jid, &rid)
    })
    .await?
    .ok_or_else(|| ApiError::internal("job vanished after insert"))?;

    info!("Recruiter {} created job {}", session.user_id, job_id);
    Ok((StatusCode::CREATED, Json(job_response(row))))
}

/// GET /api/jobs/{id}: the job with its applicants.
pub async fn get_job(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobDetailResponse>> {
    session.require(Role::Recruiter)?;
    let job_id = parse_job_id(&job_id)?;

    let (jid, rid) = (job_id.to_string(), session.user_id.to_string());
    let found = with_db(&state, move |db| {
        let Some(job) = db.get_job_for_recruiter(&jid, &rid)? else {
            return Ok(None);
        };
        let applicants = db.list_applications_for_job(&jid)?;
        Ok(Some((job, applicants)))
    })
    .await?;

    let (job, applicants) = found.ok_or_else(job_not_found)?;
    Ok(Json(JobDetailResponse {
        job: job_response(job),
        applications: applicants.into_iter().map(job_applicant).collect(),
    }))
}

/// PUT /api/jobs/{id}
pub async fn update_job(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(job_id): Path<String>,
    payload: Result<Json<JobPayload>, JsonRejection>,
) -> ApiResult<Json<JobResponse>> {
    session.require(Role::Recruiter)?;
    let job_id = parse_job_id(&job_id)?;
    ensure_owned(&state, job_id, session.user_id).await?;

    let Json(payload) = payload.map_err(ApiError::bad_body)?;
    validate_job(&payload).map_err(ApiError::Validation)?;

    let (jid, rid) = (job_id.to_string(), session.user_id.to_string());
    let row = with_db(&state, move |db| {
        if !db.update_job(&jid, &rid, &job_fields(&payload))? {
            return Ok(None);
        }
        db.get_job_for_recruiter(&jid, &rid)
    })
    .await?
    .ok_or_else(job_not_found)?;

    Ok(Json(job_response(row)))
}

/// DELETE /api/jobs/{id}, taking its applications with it.
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    session.require(Role::Recruiter)?;
    let job_id = parse_job_id(&job_id)?;
    ensure_owned(&state, job_id, session.user_id).await?;

    let (jid, rid) = (job_id.to_string(), session.user_id.to_string());
    if !with_db(&state, move |db| db.delete_job(&jid, &rid)).await? {
        return Err(job_not_found());
    }

    info!("Recruiter {} deleted job {}", session.user_id, job_id);
    Ok(Json(MessageResponse {
        message: "Job deleted successfully".into(),
    }))
}

pub fn jobs_stats(jobs: &[JobResponse], now: DateTime<Utc>) -> JobsStats {
    let total_jobs = jobs.len() as i64;
    let week_ago = now - Duration::days(RECENT_WINDOW_DAYS);

    JobsStats {
        total_jobs,
        total_applications: jobs.iter().map(|job| job.count.applications).sum(),
        // No draft/closed state exists, so every posted job is active
        active_jobs: total_jobs,
        recent_jobs: jobs.iter().filter(|job| job.created_at >= week_ago).count() as i64,
    }
}

async fn ensure_owned(state: &AppState, job_id: Uuid, recruiter_id: Uuid) -> ApiResult<()> {
    let (jid, rid) = (job_id.to_string(), recruiter_id.to_string());
    with_db(state, move |db| db.get_job_for_recruiter(&jid, &rid))
        .await?
        .map(|_| ())
        .ok_or_else(job_not_found)
}

fn job_fields(payload: &JobPayload) -> JobFields<'_> {
    JobFields {
        title: &payload.title,
        description: &payload.description,
        location: &payload.location,
        company: &payload.company,
        salary: payload.salary,
        category: payload.category.map(|category| category.as_str()),
    }
}

/// A malformed id cannot name a job the caller owns.
fn parse_job_id(raw: &str) -> ApiResult<Uuid> {
    raw.parse().map_err(|_| job_not_found())
}

fn job_not_found() -> ApiError {
    ApiError::not_found("Job not found")
}
