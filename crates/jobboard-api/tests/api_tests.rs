//! API integration tests.
//!
//! The router runs over in-memory stores and a token verifier that knows
//! three fixed tokens.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use jobboard_api::{
    create_router, ApiConfig, ApiError, ApiResult, AppState, ApplicationStore, AuthUser,
    IdTokenVerifier, JobStore, ProfileStore,
};
use jobboard_firestore::{FirestoreError, FirestoreResult};
use jobboard_models::{
    Application, ApplicationId, ApplicationStatus, Job, JobId, NewApplication, ProfileRecord,
    Role, SalaryRange,
};
use jobboard_storage::{ResumeStore, ResumeUpload, StorageResult};

#[derive(Default)]
struct MemoryJobs {
    jobs: Mutex<Vec<Job>>,
}

impl MemoryJobs {
    fn push(&self, job: Job) {
        self.jobs.lock().unwrap().push(job);
    }
}

#[async_trait]
impl JobStore for MemoryJobs {
    async fn list(&self) -> FirestoreResult<Vec<Job>> {
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn get(&self, job_id: &JobId) -> FirestoreResult<Option<Job>> {
        Ok(self.jobs.lock().unwrap().iter().find(|j| &j.id == job_id).cloned())
    }

    async fn create(&self, job: &Job) -> FirestoreResult<Job> {
        let stored = Job {
            created_at: Some(Utc::now()),
            ..job.clone()
        };
        self.jobs.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, job_id: &JobId) -> FirestoreResult<()> {
        self.jobs.lock().unwrap().retain(|j| &j.id != job_id);
        Ok(())
    }
}

#[derive(Default)]
struct MemoryApplications {
    applications: Mutex<Vec<Application>>,
}

#[async_trait]
impl ApplicationStore for MemoryApplications {
    async fn list_by_user(&self, user_id: &str) -> FirestoreResult<Vec<Application>> {
        let applications = self.applications.lock().unwrap();
        Ok(applications.iter().filter(|a| a.user_id == user_id).cloned().collect())
    }

    async fn list_by_job(&self, job_id: &JobId) -> FirestoreResult<Vec<Application>> {
        let applications = self.applications.lock().unwrap();
        Ok(applications.iter().filter(|a| &a.job_id == job_id).cloned().collect())
    }

    async fn create(&self, application: NewApplication) -> FirestoreResult<Application> {
        let mut applications = self.applications.lock().unwrap();
        if applications.iter().any(|a| a.id == application.id) {
            return Err(FirestoreError::AlreadyExists(application.id.as_str().to_string()));
        }
        let stored = application.into_application(Some(Utc::now()));
        applications.push(stored.clone());
        Ok(stored)
    }

    async fn update_status(&self, id: &ApplicationId, status: ApplicationStatus) -> FirestoreResult<()> {
        let mut applications = self.applications.lock().unwrap();
        match applications.iter_mut().find(|a| &a.id == id) {
            Some(application) => {
                application.status = status;
                Ok(())
            }
            None => Err(FirestoreError::not_found(id.as_str())),
        }
    }
}

#[derive(Default)]
struct MemoryProfiles {
    profiles: Mutex<HashMap<String, ProfileRecord>>,
}

#[async_trait]
impl ProfileStore for MemoryProfiles {
    async fn get(&self, uid: &str) -> FirestoreResult<Option<ProfileRecord>> {
        Ok(self.profiles.lock().unwrap().get(uid).cloned())
    }

    async fn create(
        &self,
        uid: &str,
        email: Option<String>,
        username: &str,
        role: Role,
    ) -> FirestoreResult<()> {
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.contains_key(uid) {
            return Err(FirestoreError::AlreadyExists(format!("users/{}", uid)));
        }
        profiles.insert(
            uid.to_string(),
            ProfileRecord {
                email,
                username: Some(username.to_string()),
                role: Some(role.as_str().to_string()),
            },
        );
        Ok(())
    }
}

#[derive(Default)]
struct MemoryResumes {
    uploads: Mutex<Vec<String>>,
}

#[async_trait]
impl ResumeStore for MemoryResumes {
    async fn upload(&self, user_id: &str, resume: &ResumeUpload) -> StorageResult<String> {
        let url = format!("https://files.example.com/{}", resume.object_key(user_id));
        self.uploads.lock().unwrap().push(url.clone());
        Ok(url)
    }

    async fn check_connectivity(&self) -> StorageResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

struct FixedTokens;

#[async_trait]
impl IdTokenVerifier for FixedTokens {
    async fn verify(&self, token: &str) -> ApiResult<AuthUser> {
        let (uid, email) = match token {
            "admin-token" => ("A1", "admin@example.com"),
            "user-token" => ("U1", "ana@example.com"),
            "other-token" => ("U2", "ben@example.com"),
            _ => return Err(ApiError::unauthorized("Token validation failed")),
        };
        Ok(AuthUser {
            uid: uid.to_string(),
            email: Some(email.to_string()),
            email_verified: true,
        })
    }
}

struct TestApp {
    router: Router,
    jobs: Arc<MemoryJobs>,
    applications: Arc<MemoryApplications>,
    resumes: Arc<MemoryResumes>,
}

fn test_app() -> TestApp {
    let jobs = Arc::new(MemoryJobs::default());
    let applications = Arc::new(MemoryApplications::default());
    let resumes = Arc::new(MemoryResumes::default());
    let profiles = Arc::new(MemoryProfiles::default());
    profiles.profiles.lock().unwrap().insert(
        "A1".to_string(),
        ProfileRecord {
            email: Some("admin@example.com".to_string()),
            username: Some("root".to_string()),
            role: Some("admin".to_string()),
        },
    );
    profiles.profiles.lock().unwrap().insert(
        "U1".to_string(),
        ProfileRecord {
            email: None,
            username: Some("ana".to_string()),
            role: Some("user".to_string()),
        },
    );

    let state = AppState::from_parts(
        ApiConfig::default(),
        jobs.clone(),
        applications.clone(),
        profiles,
        resumes.clone(),
        Arc::new(FixedTokens),
    );

    TestApp {
        router: create_router(state, None),
        jobs,
        applications,
        resumes,
    }
}

fn job(id: &str, title: &str) -> Job {
    Job {
        id: JobId::from_string(id),
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "Pune".to_string(),
        job_type: None,
        salary: SalaryRange::new(Some(50000), Some(90000)),
        experience_level: None,
        description: "<p>Work on things</p>".to_string(),
        company_website: None,
        created_by: "A1".to_string(),
        created_at: None,
    }
}

fn application(id: &str, job_id: &str, user_id: &str) -> Application {
    Application {
        id: ApplicationId::from_string(id),
        job_id: JobId::from_string(job_id),
        user_id: user_id.to_string(),
        username: "ana".to_string(),
        email: "ana@example.com".to_string(),
        applied_at: None,
        status: ApplicationStatus::Pending,
        resume_url: None,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const BOUNDARY: &str = "jobboard-test-boundary";

fn multipart_request(uri: &str, token: &str, file_name: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{f}\"\r\n\
         Content-Type: application/pdf\r\n\r\n{c}\r\n--{b}--\r\n",
        b = BOUNDARY,
        f = file_name,
        c = content
    );
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();
    let response = app.router.clone().oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
    assert!(response.headers().contains_key("X-Request-ID"));
}

#[tokio::test]
async fn test_ready_endpoint_checks_dependencies() {
    let app = test_app();
    let (status, body) = send(&app, get("/ready", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["firestore"]["status"], "ok");
}

#[tokio::test]
async fn test_empty_listing_shows_message() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/jobs", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobs"], json!([]));
    assert_eq!(body["empty_message"], "No jobs available.");
}

#[tokio::test]
async fn test_job_detail_and_missing_job() {
    let app = test_app();
    app.jobs.push(job("J1", "Engineer"));

    let (status, body) = send(&app, get("/api/jobs/J1", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Engineer");
    assert_eq!(body["salary_display"], "₹50000 - ₹90000");

    let (status, body) = send(&app, get("/api/jobs/J404", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Job not found.");
}

#[tokio::test]
async fn test_post_job_requires_admin() {
    let app = test_app();
    let draft = json!({
        "title": "Engineer",
        "company": "Acme",
        "location": "Pune",
        "description": "<p>Build</p>"
    });

    let (status, body) = send(&app, json_request("POST", "/api/jobs", "user-token", draft.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Access Denied: Admins Only");

    let anonymous = Request::builder()
        .method("POST")
        .uri("/api/jobs")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(draft.to_string()))
        .unwrap();
    let (status, _) = send(&app, anonymous).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert!(app.jobs.jobs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_post_job_with_blank_field_writes_nothing() {
    let app = test_app();
    let draft = json!({
        "title": "Engineer",
        "company": "Acme",
        "location": "   ",
        "description": "<p>Build</p>"
    });

    let (status, body) = send(&app, json_request("POST", "/api/jobs", "admin-token", draft)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Please fill in all required fields: location");
    assert!(app.jobs.jobs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_posts_job_and_it_is_listed() {
    let app = test_app();
    let draft = json!({
        "title": "Engineer",
        "company": "Acme",
        "location": "Pune",
        "description": "<p>Build</p><script>alert(1)</script>",
        "job_type": "Full-time",
        "salary_min": 100,
        "salary_max": 200,
        "company_website": "https://acme.example.com"
    });

    let (status, body) = send(&app, json_request("POST", "/api/jobs", "admin-token", draft)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["redirect_to"], "/");
    assert_eq!(body["job"]["created_by"], "A1");
    assert_eq!(body["job"]["description"], "<p>Build</p>");

    let (_, listing) = send(&app, get("/api/jobs", None)).await;
    assert_eq!(listing["jobs"].as_array().unwrap().len(), 1);
    assert_eq!(listing["jobs"][0]["salary_display"], "₹100 - ₹200");
}

#[tokio::test]
async fn test_apply_with_resume_then_duplicate_conflicts() {
    let app = test_app();
    app.jobs.push(job("J1", "Engineer"));

    let (status, body) = send(
        &app,
        multipart_request("/api/jobs/J1/applications", "user-token", "cv.pdf", "%PDF-1.4"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Application submitted successfully!");
    assert_eq!(body["application"]["status"], "Pending");
    assert_eq!(body["application"]["username"], "ana");
    assert_eq!(body["application"]["email"], "ana@example.com");
    assert_eq!(app.resumes.uploads.lock().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        multipart_request("/api/jobs/J1/applications", "user-token", "cv.pdf", "%PDF-1.4"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "You have already applied for this job.");
    assert_eq!(app.applications.applications.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_apply_without_resume() {
    let app = test_app();
    app.jobs.push(job("J1", "Engineer"));

    let (status, body) = send(
        &app,
        multipart_request("/api/jobs/J1/applications", "other-token", "", ""),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["application"].get("resume_url").is_none());
    assert!(app.resumes.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_apply_rejects_unsupported_resume() {
    let app = test_app();
    app.jobs.push(job("J1", "Engineer"));

    let (status, _) = send(
        &app,
        multipart_request("/api/jobs/J1/applications", "user-token", "cv.exe", "MZ"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.applications.applications.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_dashboard_drops_applications_for_deleted_jobs() {
    let app = test_app();
    app.jobs.push(job("J1", "Engineer"));
    {
        let mut applications = app.applications.applications.lock().unwrap();
        applications.push(application("J1_U1", "J1", "U1"));
        applications.push(application("J2_U1", "J2", "U1"));
        applications.push(application("J1_U2", "J1", "U2"));
    }

    let (status, body) = send(&app, get("/api/dashboard", Some("user-token"))).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["applied_jobs"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["job_id"], "J1");
    assert_eq!(rows[0]["application_id"], "J1_U1");
    assert_eq!(rows[0]["job"]["title"], "Engineer");
}

#[tokio::test]
async fn test_dashboard_requires_sign_in() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/dashboard", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "You must be logged in.");
}

#[tokio::test]
async fn test_status_update_patches_only_target() {
    let app = test_app();
    app.jobs.push(job("J1", "Engineer"));
    app.jobs.push(job("J2", "Designer"));
    {
        let mut applications = app.applications.applications.lock().unwrap();
        applications.push(application("A7", "J1", "U1"));
        applications.push(application("A9", "J2", "U1"));
    }

    send(&app, get("/api/admin/jobs/J1/applications", Some("admin-token"))).await;
    send(&app, get("/api/admin/jobs/J2/applications", Some("admin-token"))).await;

    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            "/api/admin/applications/A7/status",
            "admin-token",
            json!({ "status": "Approved" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Approved");
    assert_eq!(body["application"]["id"], "A7");

    let (_, j1) = send(&app, get("/api/admin/jobs/J1/applications", Some("admin-token"))).await;
    let (_, j2) = send(&app, get("/api/admin/jobs/J2/applications", Some("admin-token"))).await;
    assert_eq!(j1["applications"][0]["status"], "Approved");
    assert_eq!(j2["applications"][0]["status"], "Pending");
}

#[tokio::test]
async fn test_loaded_applications_are_not_refetched() {
    let app = test_app();
    app.jobs.push(job("J1", "Engineer"));
    app.applications
        .applications
        .lock()
        .unwrap()
        .push(application("A7", "J1", "U1"));

    let (_, first) = send(&app, get("/api/admin/jobs/J1/applications", Some("admin-token"))).await;
    assert_eq!(first["applications"].as_array().unwrap().len(), 1);

    app.applications
        .applications
        .lock()
        .unwrap()
        .push(application("A8", "J1", "U2"));

    let (_, second) = send(&app, get("/api/admin/jobs/J1/applications", Some("admin-token"))).await;
    assert_eq!(second["applications"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_status_is_rejected() {
    let app = test_app();
    app.applications
        .applications
        .lock()
        .unwrap()
        .push(application("A7", "J1", "U1"));

    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            "/api/admin/applications/A7/status",
            "admin-token",
            json!({ "status": "Hired" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            "/api/admin/applications/A404/status",
            "admin-token",
            json!({ "status": "Rejected" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Application not found");
}

#[tokio::test]
async fn test_delete_job_twice() {
    let app = test_app();
    app.jobs.push(job("J1", "Engineer"));
    app.jobs.push(job("J2", "Designer"));
    app.applications
        .applications
        .lock()
        .unwrap()
        .push(application("A7", "J1", "U1"));

    let (_, listing) = send(&app, get("/api/admin/jobs", Some("admin-token"))).await;
    assert_eq!(listing["jobs"].as_array().unwrap().len(), 2);

    let delete = || {
        Request::builder()
            .method("DELETE")
            .uri("/api/admin/jobs/J1")
            .header(header::AUTHORIZATION, "Bearer admin-token")
            .body(Body::empty())
            .unwrap()
    };

    let (status, body) = send(&app, delete()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobs"].as_array().unwrap().len(), 1);
    assert_eq!(body["jobs"][0]["id"], "J2");
    // no cascade
    assert_eq!(app.applications.applications.lock().unwrap().len(), 1);

    let (status, body) = send(&app, delete()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Job not found");
}

#[tokio::test]
async fn test_first_console_call_is_delete() {
    let app = test_app();
    app.jobs.push(job("J1", "Engineer"));
    app.jobs.push(job("J2", "Designer"));

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/admin/jobs/J1")
        .header(header::AUTHORIZATION, "Bearer admin-token")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    let remaining = body["jobs"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["id"], "J2");
    assert_eq!(app.jobs.jobs.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_apply_conflicts_with_application_under_random_id() {
    let app = test_app();
    app.jobs.push(job("J1", "Engineer"));
    app.applications
        .applications
        .lock()
        .unwrap()
        .push(application("q8Zr2LxW", "J1", "U1"));

    let (status, body) = send(
        &app,
        multipart_request("/api/jobs/J1/applications", "user-token", "", ""),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "You have already applied for this job.");
    assert_eq!(app.applications.applications.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_status_update_accepts_long_applicant_ids() {
    let app = test_app();
    let uid = "u".repeat(128);
    let id = format!("J1_{}", uid);
    app.applications
        .applications
        .lock()
        .unwrap()
        .push(application(&id, "J1", &uid));

    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/admin/applications/{}/status", id),
            "admin-token",
            json!({ "status": "Rejected" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Rejected");
    assert_eq!(
        app.applications.applications.lock().unwrap()[0].status,
        ApplicationStatus::Rejected
    );
}

#[tokio::test]
async fn test_admin_routes_reject_users() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/admin/jobs", Some("user-token"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Access Denied: Admins Only");
}

#[tokio::test]
async fn test_session_states() {
    let app = test_app();

    let (status, body) = send(&app, get("/api/session", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "unauthenticated");

    let (_, body) = send(&app, get("/api/session", Some("admin-token"))).await;
    assert_eq!(body["state"], "authenticated");
    assert_eq!(body["profile"]["role"], "admin");

    // no profile document yet
    let (_, body) = send(&app, get("/api/session", Some("other-token"))).await;
    assert_eq!(body["profile"]["username"], "Anonymous");
    assert_eq!(body["profile"]["role"], "user");
    assert_eq!(body["profile"]["email"], "ben@example.com");

    let (status, _) = send(&app, get("/api/session", Some("forged"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_profile_once() {
    let app = test_app();

    let (status, body) = send(
        &app,
        json_request("POST", "/api/profile", "other-token", json!({ "username": "ben" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "ben");
    assert_eq!(body["role"], "user");

    let (status, _) = send(
        &app,
        json_request("POST", "/api/profile", "other-token", json!({ "username": "ben" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, session) = send(&app, get("/api/session", Some("other-token"))).await;
    assert_eq!(session["profile"]["username"], "ben");
}
