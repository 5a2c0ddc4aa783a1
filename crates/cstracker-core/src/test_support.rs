//! In-process HTTP backend for client and workflow tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    Router,
};
use tokio::net::TcpListener;

use crate::api::ApiClient;
use crate::auth::{SessionContext, SessionData};
use crate::models::Role;

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

type Responses = HashMap<(String, String), VecDeque<(u16, String)>>;

#[derive(Clone, Default)]
struct MockState {
    responses: Arc<Mutex<Responses>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Canned-response server. Each `(method, path)` answers its queued
/// responses in order; the last one repeats. Unknown routes answer 404.
pub(crate) struct MockServer {
    pub base_url: String,
    state: MockState,
}

impl MockServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        let state = MockState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: impl Into<String>) -> &Self {
        self.state
            .responses
            .lock()
            .unwrap()
            .entry((method.to_string(), format!("/api{path}")))
            .or_default()
            .push_back((status, body.into()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn client(&self) -> ApiClient {
        let builder = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5));
        ApiClient::from_builder(builder, &self.base_url).expect("build client")
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let mut responses = state.responses.lock().unwrap();
    let (status, body) = match responses.get_mut(&(method.to_string(), path)) {
        Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
        Some(queue) if !queue.is_empty() => queue[0].clone(),
        _ => (404, r#"{"detail": "Not found."}"#.to_string()),
    };
    (StatusCode::from_u16(status).unwrap(), body)
}

pub(crate) fn signed_in(role: Role) -> SessionContext {
    SessionContext::new(Some(SessionData::new("test-token".into(), "tester".into(), role)))
}
