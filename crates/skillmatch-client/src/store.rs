//! Client-side mirrors of server state.
//!
//! Each store owns the last fetched lists plus UI flags (loading, error slot,
//! form state). Actions take `&mut self`, so one store never has two requests
//! of its own in flight. Failures are caught and written to the store's error
//! slot; actions a UI needs to react to also return the error.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use skillmatch_types::ApplicationStatus;
use skillmatch_types::api::{
    ApplicationStats, CandidateApplication, CandidateApplicationJob, CandidateJob, CandidateStats,
    JobPayload, JobResponse, JobsStats, RecruiterApplication, RecruiterName,
};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::filters::{
    self, ApplicationFilters, ApplicationsByStatus, JobFilters, RecruiterJobFilters,
};

fn report(slot: &mut Option<String>, action: &str, err: &ClientError) {
    warn!("{} failed: {}", action, err);
    *slot = Some(err.to_string());
}

// -- Recruiter jobs --

#[derive(Debug)]
pub struct RecruiterJobsStore {
    client: ApiClient,
    pub jobs: Vec<JobResponse>,
    pub stats: JobsStats,
    pub loading: bool,
    pub error: Option<String>,
    pub selected: Option<Uuid>,
    pub form_open: bool,
    pub edit_mode: bool,
    pub filters: RecruiterJobFilters,
}

impl RecruiterJobsStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            jobs: Vec::new(),
            stats: JobsStats::default(),
            loading: false,
            error: None,
            selected: None,
            form_open: false,
            edit_mode: false,
            filters: RecruiterJobFilters::default(),
        }
    }

    pub async fn fetch(&mut self) {
        self.begin();
        match self.client.recruiter_jobs().await {
            Ok(data) => {
                self.jobs = data.jobs;
                self.stats = data.stats;
            }
            Err(e) => report(&mut self.error, "fetch jobs", &e),
        }
        self.loading = false;
    }

    /// New jobs go to the front, matching the server's newest-first order.
    pub async fn create(&mut self, job: &JobPayload) {
        self.begin();
        match self.client.create_job(job).await {
            Ok(created) => {
                self.jobs.insert(0, created);
                self.form_open = false;
                self.stats.total_jobs += 1;
                self.stats.active_jobs += 1;
                self.stats.recent_jobs += 1;
            }
            Err(e) => report(&mut self.error, "create job", &e),
        }
        self.loading = false;
    }

    pub async fn update(&mut self, id: Uuid, job: &JobPayload) {
        self.begin();
        match self.client.update_job(id, job).await {
            Ok(updated) => {
                if let Some(slot) = self.jobs.iter_mut().find(|j| j.id == id) {
                    *slot = updated;
                }
                self.close_form();
            }
            Err(e) => report(&mut self.error, "update job", &e),
        }
        self.loading = false;
    }

    pub async fn delete(&mut self, id: Uuid) {
        self.begin();
        match self.client.delete_job(id).await {
            Ok(_) => {
                let removed_applications = self
                    .jobs
                    .iter()
                    .find(|j| j.id == id)
                    .map_or(0, |j| j.count.applications);
                self.jobs.retain(|j| j.id != id);
                self.stats.total_jobs -= 1;
                self.stats.active_jobs -= 1;
                self.stats.total_applications -= removed_applications;
                if self.selected == Some(id) {
                    self.selected = None;
                }
            }
            Err(e) => report(&mut self.error, "delete job", &e),
        }
        self.loading = false;
    }

    pub fn open_create_form(&mut self) {
        self.selected = None;
        self.edit_mode = false;
        self.form_open = true;
    }

    pub fn open_edit_form(&mut self, id: Uuid) {
        self.selected = Some(id);
        self.edit_mode = true;
        self.form_open = true;
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
        self.edit_mode = false;
        self.selected = None;
    }

    pub fn selected_job(&self) -> Option<&JobResponse> {
        let id = self.selected?;
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn filtered(&self) -> Vec<&JobResponse> {
        filters::filter_recruiter_jobs(&self.jobs, &self.filters)
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }
}

// -- Recruiter applications --

/// Applications across the recruiter's jobs.
///
/// Status changes don't patch the list in place; they bump `refresh`, and
/// [`ApplicationsStore::sync`] re-fetches whenever the counter has moved since
/// the last successful fetch.
#[derive(Debug)]
pub struct ApplicationsStore {
    client: ApiClient,
    pub applications: Vec<RecruiterApplication>,
    pub stats: ApplicationStats,
    pub loading: bool,
    pub error: Option<String>,
    pub filters: ApplicationFilters,
    refresh: u64,
    fetched_at: Option<u64>,
}

impl ApplicationsStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            applications: Vec::new(),
            stats: ApplicationStats::default(),
            loading: false,
            error: None,
            filters: ApplicationFilters::default(),
            refresh: 0,
            fetched_at: None,
        }
    }

    pub fn refresh_counter(&self) -> u64 {
        self.refresh
    }

    pub async fn fetch(&mut self) {
        self.loading = true;
        self.error = None;
        let generation = self.refresh;
        match self.client.recruiter_applications().await {
            Ok(data) => {
                self.applications = data.applications;
                self.stats = data.stats;
                self.fetched_at = Some(generation);
            }
            Err(e) => report(&mut self.error, "fetch applications", &e),
        }
        self.loading = false;
    }

    /// Re-fetch if a status change happened since the last fetch.
    pub async fn sync(&mut self) {
        if self.fetched_at != Some(self.refresh) {
            self.fetch().await;
        }
    }

    /// Moves an application along the workflow. Edges the server would reject
    /// are refused locally without a request.
    pub async fn update_status(&mut self, id: Uuid, status: ApplicationStatus) -> ClientResult<()> {
        if let Some(current) = self.applications.iter().find(|a| a.id == id).map(|a| a.status) {
            if !current.can_transition_to(status) {
                let err = ClientError::InvalidTransition {
                    from: current,
                    to: status,
                };
                report(&mut self.error, "update status", &err);
                return Err(err);
            }
        }

        match self.client.update_application_status(id, status).await {
            Ok(_) => {
                self.refresh += 1;
                Ok(())
            }
            Err(e) => {
                report(&mut self.error, "update status", &e);
                Err(e)
            }
        }
    }

    pub fn filtered(&self) -> Vec<&RecruiterApplication> {
        filters::filter_applications(&self.applications, &self.filters)
    }
}

// -- Candidate dashboard --

#[derive(Debug)]
pub struct CandidateStore {
    client: ApiClient,
    pub jobs: Vec<CandidateJob>,
    pub applications: Vec<CandidateApplication>,
    pub stats: CandidateStats,
    pub saved_job_ids: Vec<Uuid>,
    pub loading: bool,
    pub error: Option<String>,
    /// Job currently being applied to.
    pub applying: Option<Uuid>,
    pub apply_error: Option<String>,
    pub filters: JobFilters,
}

impl CandidateStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            jobs: Vec::new(),
            applications: Vec::new(),
            stats: CandidateStats::default(),
            saved_job_ids: Vec::new(),
            loading: false,
            error: None,
            applying: None,
            apply_error: None,
            filters: JobFilters::default(),
        }
    }

    /// Loads the board, the candidate's applications and saved ids together.
    pub async fn fetch_all(&mut self) {
        self.loading = true;
        self.error = None;

        let result = tokio::try_join!(
            self.client.candidate_jobs(),
            self.client.candidate_applications(),
            self.client.saved_jobs(),
        );
        match result {
            Ok((jobs, applications, saved)) => {
                self.jobs = jobs.jobs;
                self.applications = applications.applications;
                self.stats = applications.stats;
                self.saved_job_ids = saved.job_ids;
            }
            Err(e) => report(&mut self.error, "fetch candidate data", &e),
        }
        self.loading = false;
    }

    pub async fn apply(&mut self, job_id: Uuid) -> ClientResult<()> {
        self.applying = Some(job_id);
        self.apply_error = None;

        let result = self.client.apply(job_id).await;
        self.applying = None;

        match result {
            Ok(created) => {
                let job = self.jobs.iter().find(|j| j.id == job_id).map(|j| CandidateApplicationJob {
                    id: j.id,
                    title: j.title.clone(),
                    location: j.location.clone(),
                    salary: j.salary,
                    recruiter: j.recruiter.as_ref().map(|r| RecruiterName {
                        name: r.name.clone(),
                    }),
                });
                self.applications.push(CandidateApplication {
                    id: created.id,
                    status: ApplicationStatus::Pending,
                    created_at: Utc::now(),
                    job_id,
                    job,
                });
                self.stats.applications.total_applications += 1;
                self.stats.applications.pending_applications += 1;
                Ok(())
            }
            Err(e) => {
                report(&mut self.apply_error, "apply", &e);
                Err(e)
            }
        }
    }

    /// Saves the job, or unsaves it if it is already saved.
    pub async fn toggle_save(&mut self, job_id: Uuid) -> ClientResult<()> {
        let result = if self.is_saved(job_id) {
            self.client.unsave_job(job_id).await
        } else {
            self.client.save_job(job_id).await
        };

        match result {
            Ok(saved) => {
                self.saved_job_ids = saved.job_ids;
                self.stats.saved_jobs = self.saved_job_ids.len() as i64;
                Ok(())
            }
            Err(e) => {
                report(&mut self.error, "toggle saved job", &e);
                Err(e)
            }
        }
    }

    pub fn is_saved(&self, job_id: Uuid) -> bool {
        self.saved_job_ids.contains(&job_id)
    }

    pub fn has_applied(&self, job_id: Uuid) -> bool {
        self.applications.iter().any(|app| app.job_id == job_id)
    }

    pub fn applied_job_ids(&self) -> Vec<Uuid> {
        filters::applied_job_ids(&self.applications)
    }

    pub fn applications_by_status(&self) -> ApplicationsByStatus<'_> {
        filters::applications_by_status(&self.applications)
    }

    pub fn filtered_jobs(&self, now: DateTime<Utc>) -> Vec<&CandidateJob> {
        filters::filter_candidate_jobs(&self.jobs, &self.filters, now)
    }

    pub fn saved_jobs(&self) -> Vec<&CandidateJob> {
        self.jobs.iter().filter(|j| self.is_saved(j.id)).collect()
    }
}
