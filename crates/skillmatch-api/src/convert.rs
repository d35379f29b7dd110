//! Row → response conversions.
//!
//! Rows come from our own schema, so a value that fails to parse means a
//! corrupt row. Those are logged and replaced with a default instead of
//! failing the whole listing.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use skillmatch_db::models::{CandidateApplicationRow, JobRow, RecruiterApplicationRow};
use skillmatch_types::api::{
    CandidateApplication, CandidateApplicationJob, CandidateJob, JobApplicant, JobCount,
    JobResponse, JobSummary, PersonSummary, RecruiterApplication, RecruiterName, RecruiterSummary,
};
use skillmatch_types::{ApplicationStatus, JobCategory};

pub fn job_response(row: JobRow) -> JobResponse {
    JobResponse {
        id: parse_id(&row.id, "job id", &row.id),
        recruiter_id: parse_id(&row.recruiter_id, "recruiter_id", &row.id),
        category: parse_category(row.category.as_deref(), &row.id),
        created_at: parse_timestamp(&row.created_at, &row.id),
        count: JobCount {
            applications: row.application_count,
        },
        title: row.title,
        description: row.description,
        location: row.location,
        company: row.company,
        salary: row.salary,
    }
}

pub fn candidate_job(row: JobRow) -> CandidateJob {
    let recruiter = row.recruiter_name.clone().map(|name| RecruiterSummary {
        id: parse_id(&row.recruiter_id, "recruiter_id", &row.id),
        name,
    });
    let job = job_response(row);

    CandidateJob {
        id: job.id,
        title: job.title,
        description: job.description,
        location: job.location,
        company: job.company,
        salary: job.salary,
        category: job.category,
        created_at: job.created_at,
        recruiter,
        count: job.count,
    }
}

pub fn recruiter_application(row: RecruiterApplicationRow) -> RecruiterApplication {
    let id = parse_id(&row.id, "application id", &row.id);
    let job_id = parse_id(&row.job_id, "job_id", &row.id);
    let candidate_id = parse_id(&row.candidate_id, "candidate_id", &row.id);

    RecruiterApplication {
        id,
        job_id,
        candidate_id,
        status: parse_status(&row.status, &row.id),
        created_at: parse_timestamp(&row.created_at, &row.id),
        candidate: PersonSummary {
            id: candidate_id,
            name: row.candidate_name,
            email: row.candidate_email,
        },
        job: JobSummary {
            id: job_id,
            title: row.job_title,
            location: row.job_location,
        },
    }
}

pub fn job_applicant(row: RecruiterApplicationRow) -> JobApplicant {
    let application = recruiter_application(row);
    JobApplicant {
        id: application.id,
        status: application.status,
        created_at: application.created_at,
        candidate: application.candidate,
    }
}

pub fn candidate_application(row: CandidateApplicationRow) -> CandidateApplication {
    let job_id = parse_id(&row.job_id, "job_id", &row.id);

    CandidateApplication {
        id: parse_id(&row.id, "application id", &row.id),
        status: parse_status(&row.status, &row.id),
        created_at: parse_timestamp(&row.created_at, &row.id),
        job_id,
        job: Some(CandidateApplicationJob {
            id: job_id,
            title: row.job_title,
            location: row.job_location,
            salary: row.job_salary,
            recruiter: row.recruiter_name.map(|name| RecruiterName { name }),
        }),
    }
}

pub fn parse_id(raw: &str, what: &str, row_id: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}' on row '{}': {}", what, raw, row_id, e);
        Uuid::default()
    })
}

/// Accepts RFC 3339 and, for rows written by hand in the sqlite shell,
/// SQLite's own `YYYY-MM-DD HH:MM:SS`.
pub fn parse_timestamp(raw: &str, row_id: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on row '{}': {}", raw, row_id, e);
            DateTime::default()
        })
}

fn parse_status(raw: &str, row_id: &str) -> ApplicationStatus {
    raw.parse().unwrap_or_else(|e| {
        warn!("{} on application '{}'", e, row_id);
        ApplicationStatus::Pending
    })
}

fn parse_category(raw: Option<&str>, row_id: &str) -> Option<JobCategory> {
    let raw = raw?;
    match raw.parse() {
        Ok(category) => Some(category),
        Err(e) => {
            warn!("{} on job '{}'", e, row_id);
            None
        }
    }
}
