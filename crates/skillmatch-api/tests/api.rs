//! End-to-end behavior of the HTTP surface against an in-memory database.
//!
//! Most tests seed users straight into the database and mint their session
//! tokens directly, so only the auth tests pay for Argon2 hashing.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use skillmatch_api::middleware::SESSION_COOKIE;
use skillmatch_api::{AppState, AppStateInner, AuthConfig, auth, router};
use skillmatch_db::{Database, timestamp};
use skillmatch_types::Role;
use skillmatch_types::api::UserSummary;

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        let db = Database::open_in_memory().expect("in-memory db");
        let state = AppStateInner::new(
            db,
            AuthConfig {
                jwt_secret: "integration-secret".into(),
                session_days: 1,
                secure_cookies: false,
            },
        );
        Self {
            router: router(state.clone()),
            state,
        }
    }

    /// Inserts a user and returns a valid session token for them.
    fn user(&self, name: &str, role: Role) -> (Uuid, String) {
        let id = Uuid::new_v4();
        let email = format!("{}@example.com", name.to_lowercase());
        self.state
            .db
            .create_user(
                &id.to_string(),
                name,
                &email,
                "not-a-real-hash",
                role,
                &timestamp(chrono::Utc::now()),
            )
            .expect("seed user");

        let token = auth::create_token(
            &self.state.auth,
            &UserSummary {
                id,
                email,
                name: name.to_string(),
                role,
            },
        )
        .expect("token");
        (id, token)
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, _, body) = self.send_raw(method, uri, token, body).await;
        (status, body)
    }

    async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<String>, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE}={token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, cookies, body)
    }

    async fn create_job(&self, token: &str, title: &str) -> String {
        let (status, body) = self
            .send(Method::POST, "/api/jobs", Some(token), Some(job_body(title)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    async fn apply(&self, token: &str, job_id: &str) -> (StatusCode, Value) {
        self.send(Method::POST, "/api/apply", Some(token), Some(json!({ "jobId": job_id })))
            .await
    }
}

fn job_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Design and operate the payments platform",
        "location": "Amsterdam",
        "company": "Acme",
        "salary": 85000,
        "category": "IT_SOFTWARE"
    })
}

// -- Auth --

#[tokio::test]
async fn register_login_and_session_round_trip() {
    let app = TestApp::new();

    let registration = json!({
        "name": "Rita Recruiter",
        "email": "rita@example.com",
        "password": "s3cret!",
        "role": "RECRUITER"
    });
    let (status, body) = app
        .send(Method::POST, "/api/register", None, Some(registration.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "RECRUITER");
    assert_eq!(body["email"], "rita@example.com");
    assert!(body.get("password").is_none());

    let (status, body) = app
        .send(Method::POST, "/api/register", None, Some(registration))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "rita@example.com", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, cookies, body) = app
        .send_raw(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "rita@example.com", "password": "s3cret!" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Rita Recruiter");

    let cookie = cookies
        .iter()
        .find(|c| c.starts_with(SESSION_COOKIE))
        .expect("session cookie");
    assert!(cookie.contains("HttpOnly"));
    let token = cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value.to_string())
        .unwrap();

    let (status, body) = app
        .send(Method::GET, "/api/auth/session", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "RECRUITER");
    assert_eq!(body["redirect"], "/recruiter/dashboard");
}

#[tokio::test]
async fn registration_validation_is_unprocessable() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "name": "A", "email": "nope", "password": "123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"].as_array().unwrap().len(), 3);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "name": "Root", "email": "root@example.com", "password": "123456", "role": "ADMIN" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn logout_expires_the_cookie() {
    let app = TestApp::new();
    let (_, token) = app.user("Cleo", Role::Candidate);
    let (status, cookies, _) = app
        .send_raw(Method::POST, "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cookies.iter().any(|c| c.starts_with(SESSION_COOKIE) && c.contains("Max-Age=0")));
}

#[tokio::test]
async fn protected_routes_need_a_valid_session() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/api/jobs", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = app.send(Method::GET, "/api/jobs", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bearer_token_is_accepted() {
    let app = TestApp::new();
    let (_, token) = app.user("Rita", Role::Recruiter);

    let request = Request::builder()
        .uri("/api/jobs")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn handlers_enforce_roles() {
    let app = TestApp::new();
    let (_, candidate) = app.user("Cleo", Role::Candidate);
    let (_, recruiter) = app.user("Rita", Role::Recruiter);
    let (_, admin) = app.user("Ada", Role::Admin);

    let (status, body) = app.send(Method::GET, "/api/jobs", Some(&candidate), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden: Only recruiters can access this endpoint");

    let (status, _) = app
        .send(Method::GET, "/api/candidate/jobs", Some(&recruiter), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.apply(&recruiter, &Uuid::new_v4().to_string()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::GET, "/api/recruiter/applications", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// -- Jobs --

#[tokio::test]
async fn short_description_fails_validation() {
    let app = TestApp::new();
    let (_, recruiter) = app.user("Rita", Role::Recruiter);

    let mut body = job_body("Backend Engineer");
    body["description"] = json!("short");
    let (status, body) = app.send(Method::POST, "/api/jobs", Some(&recruiter), Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"][0]["field"], "description");
    assert_eq!(
        body["details"][0]["message"],
        "Description must be at least 10 characters"
    );
}

#[tokio::test]
async fn malformed_job_json_is_a_bad_request() {
    let app = TestApp::new();
    let (_, recruiter) = app.user("Rita", Role::Recruiter);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/jobs",
            Some(&recruiter),
            Some(json!({ "title": "No other fields" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "body");
}

#[tokio::test]
async fn recruiter_manages_own_jobs() {
    let app = TestApp::new();
    let (recruiter_id, recruiter) = app.user("Rita", Role::Recruiter);
    let job_id = app.create_job(&recruiter, "Backend Engineer").await;

    let (status, body) = app.send(Method::GET, "/api/jobs", Some(&recruiter), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobs"].as_array().unwrap().len(), 1);
    assert_eq!(body["jobs"][0]["recruiterId"], recruiter_id.to_string());
    assert_eq!(body["jobs"][0]["_count"]["applications"], 0);
    assert_eq!(body["stats"]["totalJobs"], 1);
    assert_eq!(body["stats"]["recentJobs"], 1);

    let mut update = job_body("Staff Backend Engineer");
    update["salary"] = Value::Null;
    let (status, body) = app
        .send(Method::PUT, &format!("/api/jobs/{job_id}"), Some(&recruiter), Some(update))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Staff Backend Engineer");
    assert_eq!(body["salary"], Value::Null);

    let (status, body) = app
        .send(Method::GET, &format!("/api/jobs/{job_id}"), Some(&recruiter), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Staff Backend Engineer");
    assert!(body["applications"].as_array().unwrap().is_empty());

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/jobs/{job_id}"), Some(&recruiter), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Job deleted successfully");
}

#[tokio::test]
async fn other_recruiters_see_not_found() {
    let app = TestApp::new();
    let (_, owner) = app.user("Rita", Role::Recruiter);
    let (_, rival) = app.user("Rex", Role::Recruiter);
    let job_id = app.create_job(&owner, "Backend Engineer").await;
    let uri = format!("/api/jobs/{job_id}");

    let (status, body) = app.send(Method::GET, &uri, Some(&rival), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Job not found");

    let (status, body) = app
        .send(Method::PUT, &uri, Some(&rival), Some(job_body("Hijacked")))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Job not found");

    let (status, _) = app.send(Method::DELETE, &uri, Some(&rival), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Indistinguishable from a job that never existed
    let missing = format!("/api/jobs/{}", Uuid::new_v4());
    let (status, body) = app.send(Method::DELETE, &missing, Some(&rival), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Job not found");

    let (status, body) = app.send(Method::GET, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Backend Engineer");
}

#[tokio::test]
async fn malformed_job_id_is_not_found() {
    let app = TestApp::new();
    let (_, recruiter) = app.user("Rita", Role::Recruiter);
    let (status, _) = app
        .send(Method::GET, "/api/jobs/not-a-uuid", Some(&recruiter), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// -- Applications --

#[tokio::test]
async fn applying_twice_conflicts() {
    let app = TestApp::new();
    let (_, recruiter) = app.user("Rita", Role::Recruiter);
    let (_, candidate) = app.user("Cleo", Role::Candidate);
    let job_id = app.create_job(&recruiter, "Backend Engineer").await;

    let (status, body) = app.apply(&candidate, &job_id).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_str().unwrap().parse::<Uuid>().is_ok());

    let (status, body) = app.apply(&candidate, &job_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Already applied");

    let (_, body) = app
        .send(Method::GET, "/api/candidate/applications", Some(&candidate), None)
        .await;
    assert_eq!(body["applications"].as_array().unwrap().len(), 1);
    assert_eq!(body["stats"]["totalApplications"], 1);
    assert_eq!(body["stats"]["pendingApplications"], 1);
}

#[tokio::test]
async fn apply_rejects_bad_job_ids() {
    let app = TestApp::new();
    let (_, candidate) = app.user("Cleo", Role::Candidate);

    let (status, body) = app.apply(&candidate, "job-1").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "jobId");

    let (status, _) = app.apply(&candidate, &Uuid::new_v4().to_string()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_workflow_is_owner_only() {
    let app = TestApp::new();
    let (_, owner) = app.user("Rita", Role::Recruiter);
    let (_, rival) = app.user("Rex", Role::Recruiter);
    let (candidate_id, candidate) = app.user("Cleo", Role::Candidate);
    let job_id = app.create_job(&owner, "Backend Engineer").await;
    let (_, body) = app.apply(&candidate, &job_id).await;
    let application_id = body["id"].as_str().unwrap().to_string();
    let uri = format!("/api/applications/{application_id}/status");

    let (status, body) = app
        .send(Method::PATCH, &uri, Some(&rival), Some(json!({ "status": "HIRED" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Application not found or not authorized");

    let (_, body) = app
        .send(Method::GET, "/api/recruiter/applications", Some(&owner), None)
        .await;
    assert_eq!(body["applications"][0]["status"], "PENDING");

    let (status, body) = app
        .send(Method::PATCH, &uri, Some(&owner), Some(json!({ "status": "SHORTLISTED" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SHORTLISTED");
    assert_eq!(body["candidate"]["id"], candidate_id.to_string());
    assert_eq!(body["job"]["title"], "Backend Engineer");

    let (status, _) = app
        .send(Method::PATCH, &uri, Some(&owner), Some(json!({ "status": "HIRED" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(Method::PATCH, &uri, Some(&owner), Some(json!({ "status": "PENDING" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .send(Method::GET, "/api/recruiter/applications", Some(&owner), None)
        .await;
    assert_eq!(body["stats"]["pendingApplications"], 1);
    assert_eq!(body["stats"]["hiredApplications"], 0);
}

#[tokio::test]
async fn owner_may_set_any_known_status() {
    let app = TestApp::new();
    let (_, owner) = app.user("Rita", Role::Recruiter);
    let (_, candidate) = app.user("Cleo", Role::Candidate);
    let job_id = app.create_job(&owner, "Backend Engineer").await;
    let (_, body) = app.apply(&candidate, &job_id).await;
    let uri = format!("/api/applications/{}/status", body["id"].as_str().unwrap());

    // Skipping SHORTLISTED is a dashboard restriction only
    let (status, body) = app
        .send(Method::PATCH, &uri, Some(&owner), Some(json!({ "status": "HIRED" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "HIRED");

    let (status, body) = app
        .send(Method::PATCH, &uri, Some(&owner), Some(json!({ "status": "HIRED" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "HIRED");

    let (status, body) = app
        .send(Method::PATCH, &uri, Some(&owner), Some(json!({ "status": "ARCHIVED" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "body");

    let (_, body) = app
        .send(Method::GET, "/api/recruiter/applications", Some(&owner), None)
        .await;
    assert_eq!(body["applications"][0]["status"], "HIRED");
    assert_eq!(body["stats"]["hiredApplications"], 1);
}

#[tokio::test]
async fn deleting_a_job_removes_its_applications() {
    let app = TestApp::new();
    let (_, recruiter) = app.user("Rita", Role::Recruiter);
    let (_, candidate) = app.user("Cleo", Role::Candidate);
    let doomed = app.create_job(&recruiter, "Backend Engineer").await;
    let kept = app.create_job(&recruiter, "Frontend Engineer").await;
    app.apply(&candidate, &doomed).await;
    app.apply(&candidate, &kept).await;

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/jobs/{doomed}"), Some(&recruiter), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .send(Method::GET, "/api/recruiter/applications", Some(&recruiter), None)
        .await;
    let applications = body["applications"].as_array().unwrap();
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0]["job"]["id"], kept);

    let (_, body) = app
        .send(Method::GET, "/api/candidate/applications", Some(&candidate), None)
        .await;
    assert!(body["applications"]
        .as_array()
        .unwrap()
        .iter()
        .all(|app| app["jobId"] != doomed));
}

// -- Candidate views --

#[tokio::test]
async fn candidate_board_and_saved_jobs() {
    let app = TestApp::new();
    let (recruiter_id, recruiter) = app.user("Rita", Role::Recruiter);
    let (_, candidate) = app.user("Cleo", Role::Candidate);
    let job_id = app.create_job(&recruiter, "Backend Engineer").await;

    let (status, body) = app
        .send(Method::GET, "/api/candidate/jobs", Some(&candidate), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobs"][0]["recruiter"]["id"], recruiter_id.to_string());
    assert_eq!(body["jobs"][0]["recruiter"]["name"], "Rita");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/candidate/saved-jobs",
            Some(&candidate),
            Some(json!({ "jobId": job_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobIds"], json!([job_id]));

    let (_, body) = app
        .send(Method::GET, "/api/candidate/applications", Some(&candidate), None)
        .await;
    assert_eq!(body["stats"]["savedJobs"], 1);

    let (status, body) = app
        .send(
            Method::DELETE,
            "/api/candidate/saved-jobs",
            Some(&candidate),
            Some(json!({ "jobId": job_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobIds"], json!([]));

    let (status, _) = app
        .send(
            Method::POST,
            "/api/candidate/saved-jobs",
            Some(&candidate),
            Some(json!({ "jobId": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn public_listing_needs_no_session() {
    let app = TestApp::new();
    let (_, recruiter) = app.user("Rita", Role::Recruiter);
    for i in 0..12 {
        app.create_job(&recruiter, &format!("Engineer {i}")).await;
    }

    let (status, body) = app.send(Method::GET, "/api/public/jobs", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobs"].as_array().unwrap().len(), 10);
    assert_eq!(body["totalJobs"], 12);
    assert_eq!(body["categories"].as_array().unwrap().len(), 5);
    assert_eq!(body["categories"][0]["count"], 12);
    assert_eq!(body["categories"][1]["count"], 0);
}

#[tokio::test]
async fn health_check() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));
}
