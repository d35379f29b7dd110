//! Derived views over fetched lists.
//!
//! Every list is fetched whole and narrowed here in memory. The functions are
//! pure; anything time-dependent takes `now` from the caller.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use skillmatch_types::ApplicationStatus;
use skillmatch_types::api::{CandidateApplication, CandidateJob, JobResponse, RecruiterApplication};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePosted {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DatePosted {
    fn max_age_days(self) -> Option<f64> {
        match self {
            DatePosted::All => None,
            DatePosted::Today => Some(1.0),
            DatePosted::Week => Some(7.0),
            DatePosted::Month => Some(30.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SalaryRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// Bounds of zero count as unset, and a salary of zero counts as unlisted.
impl SalaryRange {
    fn min(&self) -> Option<i64> {
        self.min.filter(|&min| min != 0)
    }

    fn max(&self) -> Option<i64> {
        self.max.filter(|&max| max != 0)
    }

    fn is_set(&self) -> bool {
        self.min().is_some() || self.max().is_some()
    }

    fn contains(&self, salary: i64) -> bool {
        self.min().is_none_or(|min| salary >= min) && self.max().is_none_or(|max| salary <= max)
    }
}

fn listed_salary(salary: Option<i64>) -> Option<i64> {
    salary.filter(|&s| s != 0)
}

/// Candidate job board filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilters {
    pub search: String,
    pub location: String,
    pub salary: SalaryRange,
    pub date_posted: DatePosted,
}

/// Recruiter's own-jobs filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecruiterJobFilters {
    pub search: String,
    pub location: String,
    pub salary: SalaryRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilters {
    pub status: StatusFilter,
    pub search: String,
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Candidate board. A job without a listed salary is never excluded by salary
/// bounds.
pub fn filter_candidate_jobs<'a>(
    jobs: &'a [CandidateJob],
    filters: &JobFilters,
    now: DateTime<Utc>,
) -> Vec<&'a CandidateJob> {
    let search = filters.search.to_lowercase();
    let location = filters.location.to_lowercase();

    jobs.iter()
        .filter(|job| {
            search.is_empty()
                || contains_ci(&job.title, &search)
                || contains_ci(&job.description, &search)
                || contains_ci(&job.location, &search)
                || contains_ci(&job.company, &search)
                || job
                    .recruiter
                    .as_ref()
                    .is_some_and(|r| contains_ci(&r.name, &search))
        })
        .filter(|job| location.is_empty() || contains_ci(&job.location, &location))
        .filter(|job| listed_salary(job.salary).is_none_or(|salary| filters.salary.contains(salary)))
        .filter(|job| match filters.date_posted.max_age_days() {
            None => true,
            Some(max) => age_in_days(job.created_at, now) <= max,
        })
        .collect()
}

/// Recruiter's jobs. Unlike the candidate board, a job without a listed salary
/// drops out as soon as either bound is set.
pub fn filter_recruiter_jobs<'a>(
    jobs: &'a [JobResponse],
    filters: &RecruiterJobFilters,
) -> Vec<&'a JobResponse> {
    let search = filters.search.to_lowercase();
    let location = filters.location.to_lowercase();

    jobs.iter()
        .filter(|job| {
            contains_ci(&job.title, &search)
                || contains_ci(&job.description, &search)
                || contains_ci(&job.location, &search)
                || contains_ci(&job.company, &search)
        })
        .filter(|job| location.is_empty() || contains_ci(&job.location, &location))
        .filter(|job| {
            if !filters.salary.is_set() {
                return true;
            }
            listed_salary(job.salary).is_some_and(|salary| filters.salary.contains(salary))
        })
        .collect()
}

pub fn filter_applications<'a>(
    applications: &'a [RecruiterApplication],
    filters: &ApplicationFilters,
) -> Vec<&'a RecruiterApplication> {
    let search = filters.search.to_lowercase();

    applications
        .iter()
        .filter(|app| match filters.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => app.status == status,
        })
        .filter(|app| {
            contains_ci(&app.candidate.name, &search)
                || contains_ci(&app.candidate.email, &search)
                || contains_ci(&app.job.title, &search)
        })
        .collect()
}

pub fn applied_job_ids(applications: &[CandidateApplication]) -> Vec<Uuid> {
    applications.iter().map(|app| app.job_id).collect()
}

#[derive(Debug, Default)]
pub struct ApplicationsByStatus<'a> {
    pub pending: Vec<&'a CandidateApplication>,
    pub shortlisted: Vec<&'a CandidateApplication>,
    pub rejected: Vec<&'a CandidateApplication>,
    pub hired: Vec<&'a CandidateApplication>,
}

pub fn applications_by_status(applications: &[CandidateApplication]) -> ApplicationsByStatus<'_> {
    let mut grouped = ApplicationsByStatus::default();
    for app in applications {
        match app.status {
            ApplicationStatus::Pending => grouped.pending.push(app),
            ApplicationStatus::Shortlisted => grouped.shortlisted.push(app),
            ApplicationStatus::Rejected => grouped.rejected.push(app),
            ApplicationStatus::Hired => grouped.hired.push(app),
        }
    }
    grouped
}

fn age_in_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - created_at).num_milliseconds() as f64 / MILLIS_PER_DAY
}
