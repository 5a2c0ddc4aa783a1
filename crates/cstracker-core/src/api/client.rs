//! API client for communicating with the community service tracker REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! API requests to fetch programs, submissions and service logs.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, ClientBuilder, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::auth::SessionData;
use crate::config::Config;
use crate::models::{
    ApplicationRequest, Decision, LoginRequest, LoginResponse, ProgramLogs, Program,
    ProgressSummary, ServiceLog, SignupRequest, SignupResponse, Submission,
};

use super::ApiError;

#[derive(Debug, Serialize)]
struct StatusUpdate<'a> {
    status: &'a str,
}

/// API client for the tracker backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for `base_url` (e.g. `http://127.0.0.1:8000/api`)
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        Self::from_builder(
            Client::builder().timeout(Duration::from_secs(timeout_secs)),
            base_url,
        )
    }

    /// Build on a caller-configured `reqwest::ClientBuilder`.
    pub(crate) fn from_builder(builder: ClientBuilder, base_url: &str) -> Result<Self> {
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.base_url(), config.request_timeout_secs)
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let mut builder = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(ref token) = self.token {
            builder = builder.header(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Token {}", token))
                    .context("Token contains invalid header characters")?,
            );
        }
        Ok(builder)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let url = response.url().path().to_string();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, url = %url, "Request failed");
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to {}", what))?;
        Self::check_response(response)
            .await
            .with_context(|| format!("Failed to {}", what))
    }

    async fn parse<T: DeserializeOwned>(response: Response, url: &str) -> Result<T> {
        let body = response.text().await.map_err(ApiError::from)?;
        serde_json::from_str(&body).map_err(|e| {
            ApiError::InvalidResponse(format!("Unexpected JSON from {}: {}", url, e)).into()
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self.send(self.request(Method::GET, &url)?, what).await?;
        Self::parse(response, &url).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        what: &str,
    ) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, %method, "Sending JSON");
        let response = self
            .send(self.request(method, &url)?.json(body), what)
            .await?;
        Self::parse(response, &url).await
    }

    /// Send a request whose response body is irrelevant.
    async fn send_discard<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        what: &str,
    ) -> Result<()> {
        let url = self.url(path);
        debug!(url = %url, %method, "Sending");
        let mut builder = self.request(method, &url)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(builder, what).await?;
        Ok(())
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Authenticate and return session data
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionData> {
        let response: LoginResponse = self
            .send_json(
                Method::POST,
                "/CSTracker/login/",
                &LoginRequest { username, password },
                "send login request",
            )
            .await?;

        let role = response.role().ok_or(ApiError::UnknownRole)?;
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse("Login response has no token".into()))?;

        info!(username, %role, "Logged in");
        Ok(SessionData::new(token, username.to_string(), role))
    }

    /// Register a new student account
    pub async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse> {
        self.send_json(Method::POST, "/signup/", request, "send signup request")
            .await
    }

    // =========================================================================
    // Student
    // =========================================================================

    pub async fn fetch_programs(&self) -> Result<Vec<Program>> {
        self.get("/CSTracker/programs/", "fetch programs").await
    }

    pub async fn submit_application(&self, request: &ApplicationRequest) -> Result<()> {
        self.send_discard(
            Method::POST,
            "/CSTracker/applications/",
            Some(request),
            "submit application",
        )
        .await
    }

    pub async fn fetch_progress_summary(&self) -> Result<ProgressSummary> {
        self.get("/progress-summary/", "fetch progress summary").await
    }

    // =========================================================================
    // Review
    // =========================================================================

    pub async fn fetch_submissions(&self) -> Result<Vec<Submission>> {
        self.get("/programsubmissions/", "fetch submissions").await
    }

    pub async fn decide_submission(&self, submission_id: i64, decision: Decision) -> Result<()> {
        let body = StatusUpdate {
            status: decision.as_status(),
        };
        self.send_discard(
            Method::POST,
            &format!("/programsubmissions/{}/decide/", submission_id),
            Some(&body),
            "update submission status",
        )
        .await
    }

    /// Service logs already grouped by program (`/logs/`)
    pub async fn fetch_program_logs(&self) -> Result<Vec<ProgramLogs>> {
        self.get("/logs/", "fetch service logs").await
    }

    /// Flat service log list (`/accreditation/`)
    pub async fn fetch_accreditation_logs(&self) -> Result<Vec<ServiceLog>> {
        self.get("/accreditation/", "fetch accreditation records").await
    }

    /// Mark a service log completed (`PATCH /logs/{id}/`)
    pub async fn complete_log(&self, log_id: i64) -> Result<()> {
        let body = StatusUpdate { status: "completed" };
        self.send_discard(
            Method::PATCH,
            &format!("/logs/{}/", log_id),
            Some(&body),
            "approve service",
        )
        .await
    }

    /// Approve a service log (`POST /accreditation/{id}/approve/`)
    pub async fn approve_accreditation(&self, log_id: i64) -> Result<()> {
        self.send_discard::<()>(
            Method::POST,
            &format!("/accreditation/{}/approve/", log_id),
            None,
            "approve service",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::test_support::MockServer;

    #[tokio::test]
    async fn test_login_admin() {
        let server = MockServer::start().await;
        server.respond(
            "POST",
            "/CSTracker/login/",
            200,
            r#"{"is_admin": true, "is_student": false, "token": "abc123"}"#,
        );

        let session = server.client().login("admin", "pw").await.unwrap();
        assert_eq!(session.token, "abc123");
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.username, "admin");

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].authorization, None);
        assert_eq!(requests[0].json()["username"], "admin");
        assert_eq!(requests[0].json()["password"], "pw");
    }

    #[tokio::test]
    async fn test_login_unknown_role() {
        let server = MockServer::start().await;
        server.respond("POST", "/CSTracker/login/", 200, r#"{"token": "abc"}"#);

        let err = server.client().login("who", "pw").await.unwrap_err();
        assert!(matches!(ApiError::find(&err), Some(ApiError::UnknownRole)));
    }

    #[tokio::test]
    async fn test_login_bad_credentials() {
        let server = MockServer::start().await;
        server.respond(
            "POST",
            "/CSTracker/login/",
            400,
            r#"{"non_field_errors": ["Invalid username or password."]}"#,
        );

        let err = server.client().login("admin", "nope").await.unwrap_err();
        assert_eq!(
            ApiError::user_message(&err, "Login failed"),
            "Invalid username or password."
        );
    }

    #[tokio::test]
    async fn test_token_header() {
        let server = MockServer::start().await;
        server.respond("GET", "/progress-summary/", 200, r#"{"hours_completed": 12}"#);

        let api = server.client().with_token("secret".into());
        let summary = api.fetch_progress_summary().await.unwrap();
        assert_eq!(summary.completed(), 12.0);
        assert_eq!(server.requests()[0].authorization.as_deref(), Some("Token secret"));
    }

    #[tokio::test]
    async fn test_unauthorized_is_classified() {
        let server = MockServer::start().await;
        server.respond("GET", "/programsubmissions/", 401, r#"{"detail": "Invalid token."}"#);

        let err = server
            .client()
            .with_token("stale".into())
            .fetch_submissions()
            .await
            .unwrap_err();
        assert!(ApiError::requires_login(&err));
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_response() {
        let server = MockServer::start().await;
        server.respond("GET", "/CSTracker/programs/", 200, r#"{"not": "a list"}"#);

        let err = server.client().fetch_programs().await.unwrap_err();
        assert!(matches!(ApiError::find(&err), Some(ApiError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_network_error_is_classified() {
        // Nothing listens on port 9 locally; the connection is refused.
        let builder = Client::builder().no_proxy().timeout(Duration::from_secs(2));
        let api = ApiClient::from_builder(builder, "http://127.0.0.1:9/api").unwrap();
        let err = api.fetch_programs().await.unwrap_err();
        assert!(matches!(ApiError::find(&err), Some(ApiError::NetworkError(_))));
        assert_eq!(
            ApiError::user_message(&err, "Failed"),
            "Unable to connect to server. Check your connection."
        );
    }

    #[tokio::test]
    async fn test_decide_body_and_path() {
        let server = MockServer::start().await;
        server.respond("POST", "/programsubmissions/7/decide/", 200, "{}");

        let api = server.client().with_token("t".into());
        api.decide_submission(7, Decision::Rejected).await.unwrap();

        let req = &server.requests()[0];
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/api/programsubmissions/7/decide/");
        assert_eq!(req.json(), serde_json::json!({"status": "rejected"}));
    }

    #[tokio::test]
    async fn test_complete_log_and_approve_accreditation() {
        let server = MockServer::start().await;
        server.respond("PATCH", "/logs/5/", 200, r#"{"id": 5, "status": "completed"}"#);
        server.respond("POST", "/accreditation/6/approve/", 204, "");

        let api = server.client().with_token("t".into());
        api.complete_log(5).await.unwrap();
        api.approve_accreditation(6).await.unwrap();

        let requests = server.requests();
        assert_eq!(requests[0].method, "PATCH");
        assert_eq!(requests[0].json(), serde_json::json!({"status": "completed"}));
        assert_eq!(requests[1].path, "/api/accreditation/6/approve/");
        assert!(requests[1].body.is_empty());
    }

    #[tokio::test]
    async fn test_submit_application_validation_error() {
        let server = MockServer::start().await;
        server.respond(
            "POST",
            "/CSTracker/applications/",
            400,
            r#"{"email": ["Enter a valid email address."]}"#,
        );

        let mut request = ApplicationRequest::for_program(10);
        request.email = "nope".into();
        let err = server
            .client()
            .with_token("t".into())
            .submit_application(&request)
            .await
            .unwrap_err();
        assert_eq!(
            ApiError::user_message(&err, "Failed to submit."),
            "Email: Enter a valid email address."
        );
        assert_eq!(server.requests()[0].json()["program_id"], 10);
    }
}
