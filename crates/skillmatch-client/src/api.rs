use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use skillmatch_types::ApplicationStatus;
use skillmatch_types::api::{
    ApplyResponse, CandidateApplicationsResponse, CandidateJobsResponse, ErrorBody, JobDetailResponse,
    JobPayload, JobResponse, LoginRequest, MessageResponse, PublicJobsResponse, RecruiterApplication,
    RecruiterApplicationsResponse, RecruiterJobsResponse, RegisterRequest, SavedJobsResponse,
    SessionResponse, UserSummary,
};

use crate::error::{ClientError, ClientResult};

/// Session-holding client for one user.
///
/// Cookies set by `login` are kept in the client's cookie store and replayed on
/// every later request, so one `ApiClient` is one signed-in browser.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -- Auth --

    pub async fn register(&self, req: &RegisterRequest) -> ClientResult<UserSummary> {
        self.send(self.http.post(self.url("/api/register")).json(req)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<UserSummary> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send(self.http.post(self.url("/api/auth/login")).json(&body)).await
    }

    pub async fn logout(&self) -> ClientResult<MessageResponse> {
        self.send(self.http.post(self.url("/api/auth/logout"))).await
    }

    pub async fn session(&self) -> ClientResult<SessionResponse> {
        self.send(self.http.get(self.url("/api/auth/session"))).await
    }

    // -- Recruiter --

    pub async fn recruiter_jobs(&self) -> ClientResult<RecruiterJobsResponse> {
        self.send(self.http.get(self.url("/api/jobs"))).await
    }

    pub async fn job(&self, id: Uuid) -> ClientResult<JobDetailResponse> {
        self.send(self.http.get(self.url(&format!("/api/jobs/{id}")))).await
    }

    pub async fn create_job(&self, job: &JobPayload) -> ClientResult<JobResponse> {
        self.send(self.http.post(self.url("/api/jobs")).json(job)).await
    }

    pub async fn update_job(&self, id: Uuid, job: &JobPayload) -> ClientResult<JobResponse> {
        self.send(self.http.put(self.url(&format!("/api/jobs/{id}"))).json(job))
            .await
    }

    pub async fn delete_job(&self, id: Uuid) -> ClientResult<MessageResponse> {
        self.send(self.http.delete(self.url(&format!("/api/jobs/{id}")))).await
    }

    pub async fn recruiter_applications(&self) -> ClientResult<RecruiterApplicationsResponse> {
        self.send(self.http.get(self.url("/api/recruiter/applications"))).await
    }

    pub async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> ClientResult<RecruiterApplication> {
        let url = self.url(&format!("/api/applications/{id}/status"));
        self.send(self.http.patch(url).json(&json!({ "status": status })))
            .await
    }

    // -- Candidate --

    pub async fn candidate_jobs(&self) -> ClientResult<CandidateJobsResponse> {
        self.send(self.http.get(self.url("/api/candidate/jobs"))).await
    }

    pub async fn candidate_applications(&self) -> ClientResult<CandidateApplicationsResponse> {
        self.send(self.http.get(self.url("/api/candidate/applications"))).await
    }

    pub async fn apply(&self, job_id: Uuid) -> ClientResult<ApplyResponse> {
        self.send(self.http.post(self.url("/api/apply")).json(&json!({ "jobId": job_id })))
            .await
    }

    pub async fn saved_jobs(&self) -> ClientResult<SavedJobsResponse> {
        self.send(self.http.get(self.url("/api/candidate/saved-jobs"))).await
    }

    pub async fn save_job(&self, job_id: Uuid) -> ClientResult<SavedJobsResponse> {
        let url = self.url("/api/candidate/saved-jobs");
        self.send(self.http.post(url).json(&json!({ "jobId": job_id })))
            .await
    }

    pub async fn unsave_job(&self, job_id: Uuid) -> ClientResult<SavedJobsResponse> {
        let url = self.url("/api/candidate/saved-jobs");
        self.send(self.http.delete(url).json(&json!({ "jobId": job_id })))
            .await
    }

    // -- Public --

    pub async fn public_jobs(&self) -> ClientResult<PublicJobsResponse> {
        self.send(self.http.get(self.url("/api/public/jobs"))).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let resp = req.send().await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> ClientResult<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("Request failed").to_string(),
    };
    debug!("{} -> {}", status, message);
    Err(ClientError::Api { status, message })
}
