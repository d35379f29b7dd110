use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ApplicationStatus, JobCategory, Role};

// -- JWT Claims --

/// Session token claims. Shared by the API (issuing and verifying the cookie)
/// and the client (which never decodes the token but reads the session echo).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

// -- Errors --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldIssue>,
}

// -- Auth --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: UserSummary,
    pub redirect: String,
}

// -- Jobs --

/// Body of job create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPayload {
    pub title: String,
    pub description: String,
    pub location: String,
    pub company: String,
    #[serde(default)]
    pub salary: Option<i64>,
    #[serde(default)]
    pub category: Option<JobCategory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobCount {
    pub applications: i64,
}

/// A job as its owning recruiter sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub company: String,
    pub salary: Option<i64>,
    pub category: Option<JobCategory>,
    pub created_at: DateTime<Utc>,
    pub recruiter_id: Uuid,
    #[serde(rename = "_count")]
    pub count: JobCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicant {
    pub id: Uuid,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub candidate: PersonSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetailResponse {
    #[serde(flatten)]
    pub job: JobResponse,
    pub applications: Vec<JobApplicant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsStats {
    pub total_jobs: i64,
    pub total_applications: i64,
    pub active_jobs: i64,
    pub recent_jobs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecruiterJobsResponse {
    pub jobs: Vec<JobResponse>,
    pub stats: JobsStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// -- Applications --

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApplyRequest {
    pub job_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub location: String,
}

/// An application as the recruiter owning its job sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub candidate: PersonSummary,
    pub job: JobSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    pub total_applications: i64,
    pub pending_applications: i64,
    pub shortlisted_applications: i64,
    pub rejected_applications: i64,
    pub hired_applications: i64,
}

impl ApplicationStats {
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = ApplicationStatus>,
    {
        let mut stats = Self::default();
        for status in statuses {
            stats.total_applications += 1;
            match status {
                ApplicationStatus::Pending => stats.pending_applications += 1,
                ApplicationStatus::Shortlisted => stats.shortlisted_applications += 1,
                ApplicationStatus::Rejected => stats.rejected_applications += 1,
                ApplicationStatus::Hired => stats.hired_applications += 1,
            }
        }
        stats
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecruiterApplicationsResponse {
    pub applications: Vec<RecruiterApplication>,
    pub stats: ApplicationStats,
}

// -- Candidate views --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterSummary {
    pub id: Uuid,
    pub name: String,
}

/// A job on the candidate board and on the public listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateJob {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub company: String,
    pub salary: Option<i64>,
    pub category: Option<JobCategory>,
    pub created_at: DateTime<Utc>,
    pub recruiter: Option<RecruiterSummary>,
    #[serde(rename = "_count")]
    pub count: JobCount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateJobsResponse {
    pub jobs: Vec<CandidateJob>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterName {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateApplicationJob {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub salary: Option<i64>,
    pub recruiter: Option<RecruiterName>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateApplication {
    pub id: Uuid,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub job_id: Uuid,
    pub job: Option<CandidateApplicationJob>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStats {
    #[serde(flatten)]
    pub applications: ApplicationStats,
    pub saved_jobs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateApplicationsResponse {
    pub applications: Vec<CandidateApplication>,
    pub stats: CandidateStats,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SavedJobRequest {
    pub job_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobsResponse {
    pub job_ids: Vec<Uuid>,
}

// -- Public listing --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicJobsResponse {
    pub jobs: Vec<CandidateJob>,
    pub categories: Vec<CategoryCount>,
    pub total_jobs: i64,
}
